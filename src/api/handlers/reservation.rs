use crate::api::dtos::requests::{CancelReservationRequest, CreateReservationRequest};
use crate::api::dtos::responses::{CancellationResponse, ReservationResponse};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::services::availability::EquipmentRequest;
use crate::domain::services::booking::CreateReservationCommand;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "create_reservation: court {} from {} to {}",
        payload.court_id, payload.start_time, payload.end_time
    );

    let command = CreateReservationCommand {
        user_id: principal.user_id,
        court_id: payload.court_id,
        start_time: payload.start_time,
        end_time: payload.end_time,
        coach_id: payload.coach_id,
        equipment: payload
            .equipment
            .into_iter()
            .map(|item| EquipmentRequest {
                equipment_id: item.equipment_id,
                quantity: item.quantity,
            })
            .collect(),
        payment_method: payload.payment_method,
        idempotency_key: payload.idempotency_key,
    };

    let (reservation, lines) = state.booking_service.create(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from_parts(&reservation, &lines)),
    ))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state
        .reservation_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

    if reservation.user_id != principal.user_id && !principal.is_admin() {
        return Err(AppError::Forbidden("You cannot view this reservation".into()));
    }

    let lines = state.reservation_repo.equipment_lines(&reservation.id).await?;
    Ok(Json(ReservationResponse::from_parts(&reservation, &lines)))
}

pub async fn capture_payment(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.booking_service.capture_payment(&id, &principal).await?;
    let lines = state.reservation_repo.equipment_lines(&reservation.id).await?;
    Ok(Json(ReservationResponse::from_parts(&reservation, &lines)))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
    Json(payload): Json<CancelReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .cancellation_service
        .cancel(&id, &principal, payload.reason)
        .await?;

    Ok(Json(CancellationResponse {
        reservation_id: outcome.reservation.id.clone(),
        status: outcome.reservation.status.clone(),
        refund_amount: outcome.refund_amount,
        refund_percentage: outcome.refund_percentage,
    }))
}
