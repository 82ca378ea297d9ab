use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct MaintenanceBlock {
    pub id: String,
    pub facility_id: Option<String>,
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceBlock {
    pub fn new(
        facility_id: Option<String>,
        court_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        reason: String,
        created_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            facility_id,
            court_id,
            start_time,
            end_time,
            reason,
            created_by,
            created_at: Utc::now(),
        }
    }
}
