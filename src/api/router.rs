use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{admin, availability, health, maintenance, profile, reservation};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Booking flow
        .route("/api/v1/reservations", post(reservation::create_reservation))
        .route("/api/v1/reservations/{id}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{id}/payment", post(reservation::capture_payment))
        .route("/api/v1/reservations/{id}/cancel", post(reservation::cancel_reservation))

        // Public availability query
        .route("/api/v1/availability", get(availability::get_slots))

        // Caller aggregate
        .route("/api/v1/profile", get(profile::get_profile))

        // Admin
        .route("/api/v1/admin/maintenance-blocks", post(maintenance::create_block).get(maintenance::list_blocks))
        .route("/api/v1/admin/maintenance-blocks/{id}", delete(maintenance::delete_block))
        .route("/api/v1/admin/reservations/{id}/override", post(admin::override_reservation))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
