use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Record of an administrative override on a reservation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditEvent {
    pub id: String,
    pub reservation_id: String,
    pub actor_id: String,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(reservation_id: String, actor_id: String, action: String, detail: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reservation_id,
            actor_id,
            action,
            detail,
            created_at: Utc::now(),
        }
    }
}
