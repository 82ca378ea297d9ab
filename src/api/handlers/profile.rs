use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::profile::UserProfile;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .profile_repo
        .find(&principal.user_id)
        .await?
        .unwrap_or(UserProfile {
            user_id: principal.user_id,
            total_bookings: 0,
            total_spent: 0.0,
        });

    Ok(Json(profile))
}
