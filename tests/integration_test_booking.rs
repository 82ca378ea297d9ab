mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{future_day_at, parse_body, TestApp};
use serde_json::json;

const ALICE: &str = "user:alice";

#[tokio::test]
async fn test_create_reservation_returns_breakdown() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
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

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert!(body["reference"].as_str().unwrap().starts_with("BK-"));
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["breakdown"]["base_price"], 40.0);
    assert_eq!(body["breakdown"]["total_price"], 40.0);

    let profile = parse_body(app.get("/api/v1/profile", Some(ALICE)).await).await;
    assert_eq!(profile["total_bookings"], 1);
    assert_eq!(profile["total_spent"], 40.0);
}

#[tokio::test]
async fn test_double_booking_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let payload = json!({
        "court_id": court,
        "start_time": future_day_at(7, 14),
        "end_time": future_day_at(7, 15),
        "payment_method": "on_site"
    });

    let first = app.post_json("/api/v1/reservations", Some(ALICE), payload.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.post_json("/api/v1/reservations", Some("user:bob"), payload).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_body(second).await;
    assert_eq!(body["code"], "CourtConflict");
}

#[tokio::test]
async fn test_partial_overlap_conflicts_but_adjacent_is_fine() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let first = app
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
    assert_eq!(first.status(), StatusCode::CREATED);

    let overlapping = app
        .post_json(
            "/api/v1/reservations",
            Some("user:bob"),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10) + Duration::minutes(30),
                "end_time": future_day_at(7, 11) + Duration::minutes(30),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(overlapping.status(), StatusCode::CONFLICT);

    // Half-open intervals: a booking starting exactly at the previous end
    // does not collide.
    let adjacent = app
        .post_json(
            "/api/v1/reservations",
            Some("user:bob"),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 11),
                "end_time": future_day_at(7, 12),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(adjacent.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_inactive_court_wins_over_maintenance() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, false).await;

    // A block also covers the window, but the inactive court is reported
    // first.
    sqlx::query(
        "INSERT INTO maintenance_blocks (id, facility_id, court_id, start_time, end_time, reason, created_by, created_at)
         VALUES ('mb1', ?, ?, ?, ?, 'Resurfacing', 'root', ?)",
    )
    .bind(&facility)
    .bind(&court)
    .bind(future_day_at(7, 0))
    .bind(future_day_at(8, 0))
    .bind(chrono::Utc::now())
    .execute(&app.pool)
    .await
    .unwrap();

    let res = app
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

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "ResourceInactive");
}

#[tokio::test]
async fn test_coach_double_booking_across_courts() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court_a = app.seed_court(&facility, 40.0, true).await;
    let court_b = app.seed_court(&facility, 40.0, true).await;
    let coach = app.seed_coach(&facility, 25.0).await;

    let first = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court_a,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "coach_id": coach,
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = parse_body(first).await;
    assert_eq!(body["breakdown"]["coach_cost"], 25.0);
    assert_eq!(body["breakdown"]["total_price"], 65.0);

    let second = app
        .post_json(
            "/api/v1/reservations",
            Some("user:bob"),
            json!({
                "court_id": court_b,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "coach_id": coach,
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_body(second).await;
    assert_eq!(body["code"], "CoachConflict");
}

#[tokio::test]
async fn test_coach_unavailability_blocks_booking() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;
    let coach = app.seed_coach(&facility, 25.0).await;

    let start = future_day_at(7, 10);
    app.seed_coach_unavailability(&coach, start.date_naive(), None).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": start,
                "end_time": future_day_at(7, 11),
                "coach_id": coach,
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "CoachUnavailable");
}

#[tokio::test]
async fn test_coach_unavailability_sub_range_only_blocks_overlap() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;
    let coach = app.seed_coach(&facility, 25.0).await;

    let start = future_day_at(7, 10);
    app.seed_coach_unavailability(&coach, start.date_naive(), Some(("14:00", "16:00"))).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": start,
                "end_time": future_day_at(7, 11),
                "coach_id": coach,
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let blocked = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 14),
                "end_time": future_day_at(7, 15),
                "coach_id": coach,
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);
    let body = parse_body(blocked).await;
    assert_eq!(body["code"], "CoachUnavailable");
}

#[tokio::test]
async fn test_unknown_equipment_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "equipment": [{"equipment_id": "no-such-racket", "quantity": 1}],
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "NotFound");
}

#[tokio::test]
async fn test_unknown_coach_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "coach_id": "no-such-coach",
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_insufficient_stock() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;
    let equipment = app.seed_equipment(&facility, 2, 5.0).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "equipment": [{"equipment_id": equipment, "quantity": 3}],
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "InsufficientStock");
    assert_eq!(app.available_stock(&equipment).await, 2);
}

#[tokio::test]
async fn test_equipment_decrements_stock_and_prices_lines() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;
    let equipment = app.seed_equipment(&facility, 5, 5.0).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "equipment": [{"equipment_id": equipment, "quantity": 2}],
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["breakdown"]["equipment_cost"], 10.0);
    assert_eq!(body["breakdown"]["total_price"], 50.0);
    assert_eq!(body["equipment"][0]["quantity"], 2);
    assert_eq!(body["equipment"][0]["line_total"], 10.0);

    assert_eq!(app.available_stock(&equipment).await, 3);
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(-2, 10),
                "end_time": future_day_at(-2, 11),
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inverted_interval_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let res = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 11),
                "end_time": future_day_at(7, 10),
                "payment_method": "on_site"
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_idempotency_key_replays_original_reservation() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let payload = json!({
        "court_id": court,
        "start_time": future_day_at(7, 10),
        "end_time": future_day_at(7, 11),
        "payment_method": "on_site",
        "idempotency_key": "client-key-1"
    });

    let first = parse_body(app.post_json("/api/v1/reservations", Some(ALICE), payload.clone()).await).await;
    let second_res = app.post_json("/api/v1/reservations", Some(ALICE), payload).await;
    assert_eq!(second_res.status(), StatusCode::CREATED);
    let second = parse_body(second_res).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["reference"], second["reference"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_payment_capture_confirms_reservation() {
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
                "payment_method": "credit_card"
            }),
        )
        .await,
    )
    .await;
    assert_eq!(created["status"], "pending");

    let id = created["id"].as_str().unwrap();
    let paid = parse_body(
        app.post_json(&format!("/api/v1/reservations/{}/payment", id), Some(ALICE), json!({}))
            .await,
    )
    .await;
    assert_eq!(paid["status"], "confirmed");
    assert_eq!(paid["payment_status"], "paid");
}

#[tokio::test]
async fn test_declined_payment_fails_reservation_and_releases_holds() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;
    let equipment = app.seed_equipment(&facility, 5, 5.0).await;

    let created = parse_body(
        app.post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "equipment": [{"equipment_id": equipment, "quantity": 2}],
                "payment_method": "declined"
            }),
        )
        .await,
    )
    .await;
    assert_eq!(created["status"], "pending");
    assert_eq!(app.available_stock(&equipment).await, 3);

    let id = created["id"].as_str().unwrap();
    let failed = parse_body(
        app.post_json(&format!("/api/v1/reservations/{}/payment", id), Some(ALICE), json!({}))
            .await,
    )
    .await;
    assert_eq!(failed["status"], "failed");
    assert_eq!(failed["payment_status"], "failed");
    assert_eq!(app.available_stock(&equipment).await, 5);

    // The slot is free again for someone else.
    let retry = app
        .post_json(
            "/api/v1/reservations",
            Some("user:bob"),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_pending_reservation_still_blocks_the_slot() {
    let app = TestApp::new().await;
    let facility = app.seed_facility("UTC").await;
    let court = app.seed_court(&facility, 40.0, true).await;

    let first = app
        .post_json(
            "/api/v1/reservations",
            Some(ALICE),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "credit_card"
            }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post_json(
            "/api/v1/reservations",
            Some("user:bob"),
            json!({
                "court_id": court,
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11),
                "payment_method": "on_site"
            }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let res = app
        .post_json(
            "/api/v1/reservations",
            None,
            json!({
                "court_id": "c1",
                "start_time": future_day_at(7, 10),
                "end_time": future_day_at(7, 11)
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_only_access_to_reservation() {
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

    let other = app.get(&format!("/api/v1/reservations/{}", id), Some("user:bob")).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let admin = app.get(&format!("/api/v1/reservations/{}", id), Some("admin:root")).await;
    assert_eq!(admin.status(), StatusCode::OK);
}
