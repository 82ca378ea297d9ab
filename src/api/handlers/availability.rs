use crate::api::dtos::requests::SlotsQuery;
use crate::api::dtos::responses::SlotsResponse;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.slot_service.day_slots(&query.court_id, query.date).await?;

    Ok(Json(SlotsResponse {
        court_id: query.court_id,
        date: query.date.to_string(),
        slots,
    }))
}
