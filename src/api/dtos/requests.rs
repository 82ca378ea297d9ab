use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct EquipmentRequestDto {
    pub equipment_id: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub coach_id: Option<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentRequestDto>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    pub idempotency_key: Option<String>,
}

fn default_payment_method() -> String {
    "credit_card".to_string()
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CancelReservationRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateMaintenanceBlockRequest {
    pub facility_id: Option<String>,
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct OverrideReservationRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub court_id: String,
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct MaintenanceQuery {
    pub court_id: String,
}
