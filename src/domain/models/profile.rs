use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Derived per-user aggregate, updated transactionally alongside each
/// reservation creation and cancellation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct UserProfile {
    pub user_id: String,
    pub total_bookings: i64,
    pub total_spent: f64,
}
