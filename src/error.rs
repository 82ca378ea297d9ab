use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Reason codes for availability conflicts, in the order the checker
/// evaluates them. The first failing check wins on multi-conflict requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    ResourceInactive,
    CourtConflict,
    MaintenanceConflict,
    CoachConflict,
    CoachUnavailable,
    InsufficientStock,
}

impl ConflictReason {
    pub fn code(&self) -> &'static str {
        match self {
            ConflictReason::ResourceInactive => "ResourceInactive",
            ConflictReason::CourtConflict => "CourtConflict",
            ConflictReason::MaintenanceConflict => "MaintenanceConflict",
            ConflictReason::CoachConflict => "CoachConflict",
            ConflictReason::CoachUnavailable => "CoachUnavailable",
            ConflictReason::InsufficientStock => "InsufficientStock",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConflictReason::ResourceInactive => "Court not found or inactive",
            ConflictReason::CourtConflict => "Court already booked for this time",
            ConflictReason::MaintenanceConflict => "Court is under maintenance for this time",
            ConflictReason::CoachConflict => "Coach already booked for this time",
            ConflictReason::CoachUnavailable => "Coach is marked unavailable for this time",
            ConflictReason::InsufficientStock => "Insufficient equipment stock for this time",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{}", .0.message())]
    Unavailable(ConflictReason),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Reservation is already in a terminal state")]
    AlreadyCancelled,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Stable machine-readable code surfaced to clients next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "StorageFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden(_) => "NotAuthorized",
            AppError::Unavailable(reason) => reason.code(),
            AppError::Conflict(_) => "Conflict",
            AppError::AlreadyCancelled => "AlreadyCancelled",
            AppError::Validation(_) => "Validation",
            AppError::Internal | AppError::InternalWithMsg(_) => "Internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let err_code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if err_code == "2067" || err_code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "error": "Resource already exists (duplicate entry)",
                                "code": "Conflict",
                            })),
                        )
                            .into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Unavailable(reason) => (StatusCode::CONFLICT, reason.message().to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::AlreadyCancelled => (
                StatusCode::CONFLICT,
                "Reservation is already in a terminal state".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
