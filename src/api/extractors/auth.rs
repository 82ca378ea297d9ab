use crate::domain::models::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::Span;

/// Extracts the authenticated principal by handing the bearer token to the
/// identity collaborator.
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let principal = app_state.identity.verify(token).await?;

        Span::current().record("user_id", principal.user_id.as_str());

        Ok(AuthPrincipal(principal))
    }
}

pub fn require_admin(principal: &Principal) -> Result<(), AppError> {
    if !principal.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(())
}
