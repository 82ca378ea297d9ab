use crate::error::AppError;
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Half-open booking interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::Validation("start_time must be before end_time".into()));
        }
        Ok(Self { start, end })
    }

    /// Standard half-open disjointness test: overlap unless one interval
    /// ends before the other starts.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        !(end <= self.start || start >= self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Failed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no_show",
            ReservationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            "no_show" => Some(ReservationStatus::NoShow),
            "failed" => Some(ReservationStatus::Failed),
            _ => None,
        }
    }

    /// Terminal states admit no further transition outside an admin override.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled
                | ReservationStatus::Completed
                | ReservationStatus::NoShow
                | ReservationStatus::Failed
        )
    }

    /// Pending and confirmed reservations hold their resources.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "refunded" => Some(PaymentStatus::Refunded),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub reference: String,
    pub user_id: String,
    pub facility_id: String,
    pub court_id: String,
    pub coach_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub base_price: f64,
    pub equipment_cost: f64,
    pub coach_cost: f64,
    pub total_price: f64,
    pub idempotency_key: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refund_amount: Option<f64>,
    pub refund_percentage: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub user_id: String,
    pub facility_id: String,
    pub court_id: String,
    pub coach_id: Option<String>,
    pub range: TimeRange,
    pub status: ReservationStatus,
    pub payment_method: String,
    pub base_price: f64,
    pub equipment_cost: f64,
    pub coach_cost: f64,
    pub total_price: f64,
    pub idempotency_key: Option<String>,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reference: generate_reference(),
            user_id: params.user_id,
            facility_id: params.facility_id,
            court_id: params.court_id,
            coach_id: params.coach_id,
            start_time: params.range.start,
            end_time: params.range.end,
            status: params.status.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            payment_method: params.payment_method,
            base_price: params.base_price,
            equipment_cost: params.equipment_cost,
            coach_cost: params.coach_cost,
            total_price: params.total_price,
            idempotency_key: params.idempotency_key,
            cancellation_reason: None,
            cancelled_at: None,
            refund_amount: None,
            refund_percentage: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> Option<ReservationStatus> {
        ReservationStatus::parse(&self.status)
    }

    pub fn payment(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// Short uppercase alphanumeric reference, human-readable, not sequential.
/// Uniqueness is backed by the store's unique constraint.
fn generate_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("BK-{}", suffix.to_uppercase())
}

/// One equipment line held by a reservation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EquipmentLine {
    pub id: String,
    pub reservation_id: String,
    pub equipment_id: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl EquipmentLine {
    pub fn new(reservation_id: String, equipment_id: String, quantity: i64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reservation_id,
            equipment_id,
            quantity,
            unit_price,
        }
    }
}
