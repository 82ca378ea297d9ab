use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    pub timezone: String,
    pub open_time: String,
    pub close_time: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Court {
    pub id: String,
    pub facility_id: String,
    pub name: String,
    pub court_type: String,
    pub base_price: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Coach {
    pub id: String,
    pub facility_id: String,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Blocks coach assignment for a date, optionally narrowed to a
/// time-of-day sub-range ("HH:MM" strings, both present or the whole
/// day is blocked).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CoachUnavailability {
    pub id: String,
    pub coach_id: String,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EquipmentItem {
    pub id: String,
    pub facility_id: String,
    pub name: String,
    pub equipment_type: String,
    pub total_stock: i64,
    pub available_stock: i64,
    pub price_per_unit: f64,
    pub is_active: bool,
}

/// A configured price adjustment. Scope columns (`facility_id`,
/// `court_type`) are NULL for "applies everywhere"; the calculator never
/// filters by scope, only by time predicate.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PricingRule {
    pub id: String,
    pub facility_id: Option<String>,
    pub name: String,
    pub kind: String,
    pub court_type: Option<String>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub day_of_week: Option<i64>,
    pub multiplier: f64,
    pub surcharge: f64,
    pub is_active: bool,
}

pub mod rule_kind {
    pub const WEEKEND: &str = "weekend";
    pub const PEAK_HOUR: &str = "peak_hour";
    pub const TIME_BASED: &str = "time_based";
}
