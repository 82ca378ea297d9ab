mod common;

use axum::http::StatusCode;
use common::{future_day_at, parse_body, TestApp};
use serde_json::json;

const ALICE: &str = "user:alice";
const ADMIN: &str = "admin:root";

#[tokio::test]
async fn test_only_admin_can_manage_blocks() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/admin/maintenance-blocks",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 12),
                "end_time": future_day_at(7, 13),
                "reason": "Cleaning"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_block_over_active_reservation_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let booked = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(booked.status(), StatusCode::CREATED);

    let res = app
        .post_json(
            "/api/v1/admin/maintenance-blocks",
            Some(ADMIN),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 12),
                "reason": "Resurfacing"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reservation_over_block_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let block = app
        .post_json(
            "/api/v1/admin/maintenance-blocks",
            Some(ADMIN),
            json!({
                "facility_id": facility,
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 12),
                "reason": "Resurfacing"
            }),
        )
        .await;
    assert_eq!(block.status(), StatusCode::CREATED);
    let block = parse_body(block).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 11),
                "end_time": future_day_at(7, 12),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "MaintenanceConflict");

    // Deleting the block frees the window again.
    let deleted = app
        .delete(
            &format!("/api/v1/admin/maintenance-blocks/{}", block["id"].as_str().unwrap()),
            Some(ADMIN),
        )
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let retry = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 11),
                "end_time": future_day_at(7, 12),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_block_with_inverted_interval_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/admin/maintenance-blocks",
            Some(ADMIN),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 13),
                "end_time": future_day_at(7, 12),
                "reason": "Backwards"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_block_facility_mismatch_is_rejected() {
    let app = TestApp::new().await;
    let facility_a = app.seed_facility("UTC").await;
    let facility_b = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility_a, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/admin/maintenance-blocks",
            Some(ADMIN),
            json!({
                "facility_id": facility_b,
                "court_id": court,
                "start_time": future_day_at(7, 12),
                "end_time": future_day_at(7, 13),
                "reason": "Wrong facility"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_blocks_for_court() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    for hour in [8, 12] {
        let res = app
            .post_json(
                "/api/v1/admin/maintenance-blocks",
                Some(ADMIN),
                json!({
                    "court_id": court,
                    "start_time": future_day_at(7, hour),
                    "end_time": future_day_at(7, hour + 1),
                    "reason": "Inspection"
                }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let list = parse_body(
        app.get(&format!("/api/v1/admin/maintenance-blocks?court_id={}", court), Some(ADMIN))
            .await,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_override_writes_audit_event() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let created = parse_body(
        app.post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "on_site"
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let forbidden = app
        .post_json(
            &format!("/api/v1/admin/reservations/{}/override", id),
            Some(ALICE),
            json!({"status": "no_show"}),
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let overridden = parse_body(
        app.post_json(
            &format!("/api/v1/admin/reservations/{}/override", id),
            Some(ADMIN),
            json!({"status": "no_show", "reason": "Customer never arrived"}),
        )
        .await,
    )
    .await;
    assert_eq!(overridden["status"], "no_show");

    let (action, actor): (String, String) = sqlx::query_as(
        "SELECT action, actor_id FROM audit_events WHERE reservation_id = ?",
    )
    .bind(id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(action, "status_override:no_show");
    assert_eq!(actor, "root");

    // no_show is terminal for the normal cancellation path.
    let cancel = app
        .post_json(&format!("/api/v1/reservations/{}/cancel", id), Some(ALICE), json!({}))
        .await;
    assert_eq!(cancel.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_override_rejects_unknown_status() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let created = parse_body(
        app.post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "on_site"
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .post_json(
            &format!("/api/v1/admin/reservations/{}/override", id),
            Some(ADMIN),
            json!({"status": "vanished"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
