use crate::api::dtos::requests::OverrideReservationRequest;
use crate::api::dtos::responses::ReservationResponse;
use crate::api::extractors::auth::{require_admin, AuthPrincipal};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn override_reservation(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
    Json(payload): Json<OverrideReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&principal)?;

    let updated = state
        .booking_service
        .override_status(&id, &payload.status, &principal, payload.reason)
        .await?;

    let lines = state.reservation_repo.equipment_lines(&updated.id).await?;
    Ok(Json(ReservationResponse::from_parts(&updated, &lines)))
}
