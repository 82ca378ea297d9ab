use crate::api::dtos::requests::{CreateMaintenanceBlockRequest, MaintenanceQuery};
use crate::api::extractors::auth::{require_admin, AuthPrincipal};
use crate::domain::models::maintenance::MaintenanceBlock;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateMaintenanceBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&principal)?;

    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("Reason is required".into()));
    }

    let court = state
        .catalog_repo
        .find_court(&payload.court_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Court not found".into()))?;

    if let Some(facility_id) = &payload.facility_id {
        if court.facility_id != *facility_id {
            return Err(AppError::Validation("Court does not belong to specified facility".into()));
        }
    }

    let block = MaintenanceBlock::new(
        payload.facility_id,
        court.id,
        payload.start_time,
        payload.end_time,
        payload.reason,
        principal.user_id,
    );

    let created = state.maintenance_repo.create(&block).await?;
    info!("Maintenance block created: {} on court {}", created.id, created.court_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<MaintenanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&principal)?;
    let blocks = state.maintenance_repo.list_by_court(&query.court_id).await?;
    Ok(Json(blocks))
}

pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&principal)?;
    state.maintenance_repo.delete(&id).await?;
    info!("Maintenance block deleted: {}", id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
