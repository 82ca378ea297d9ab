use crate::domain::models::{
    audit::AuditEvent,
    auth::Principal,
    catalog::{Coach, CoachUnavailability, Court, EquipmentItem, Facility, PricingRule},
    maintenance::MaintenanceBlock,
    profile::UserProfile,
    reservation::{EquipmentLine, PaymentStatus, Reservation, ReservationStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Read-only reference data: facilities, courts, coaches, equipment and
/// pricing-rule definitions. Owned by the catalog; the core never writes
/// through this port except for the stock counter, which is mutated inside
/// the reservation store's transaction boundary.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_facility(&self, id: &str) -> Result<Option<Facility>, AppError>;
    async fn find_court(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn find_coach(&self, id: &str) -> Result<Option<Coach>, AppError>;
    async fn find_equipment(&self, id: &str) -> Result<Option<EquipmentItem>, AppError>;
    async fn active_rules(&self, facility_id: &str, court_type: &str) -> Result<Vec<PricingRule>, AppError>;
    async fn coach_unavailability_on(&self, coach_id: &str, date: NaiveDate) -> Result<Vec<CoachUnavailability>, AppError>;
}

/// Applied to a reservation row together with the stock release and the
/// profile adjustment, all in one unit of work.
pub struct CancellationUpdate {
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
    pub refund_amount: f64,
    pub refund_percentage: i64,
    pub payment_status: PaymentStatus,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomic check-then-reserve: re-verifies court/coach/maintenance
    /// overlap inside the transaction, inserts the reservation and its
    /// equipment lines, decrements stock with a floor check and bumps the
    /// user-profile aggregate. Any failure rolls the whole unit back.
    async fn create(&self, reservation: &Reservation, lines: &[EquipmentLine]) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Reservation>, AppError>;
    async fn equipment_lines(&self, reservation_id: &str) -> Result<Vec<EquipmentLine>, AppError>;
    async fn list_active_overlapping(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
    async fn count_court_overlap(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError>;
    async fn count_coach_overlap(&self, coach_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError>;
    /// Quantity of one equipment item committed to active reservations
    /// overlapping the interval.
    async fn committed_equipment_quantity(&self, equipment_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError>;
    /// Atomic cancellation: status transition, stock release and profile
    /// adjustment commit or roll back together.
    async fn cancel(&self, reservation: &Reservation, update: &CancellationUpdate) -> Result<Reservation, AppError>;
    /// Settles a pending reservation after the gateway outcome.
    async fn finalize_payment(&self, id: &str, status: ReservationStatus, payment: PaymentStatus) -> Result<Reservation, AppError>;
    /// Direct administrative status set, bypassing the state machine; the
    /// audit event is written in the same transaction.
    async fn override_status(&self, id: &str, status: ReservationStatus, event: &AuditEvent) -> Result<Reservation, AppError>;
    async fn list_audit_events(&self, reservation_id: &str) -> Result<Vec<AuditEvent>, AppError>;
}

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Insert rejected when an active reservation overlaps the block
    /// (checked inside the same transaction as the insert).
    async fn create(&self, block: &MaintenanceBlock) -> Result<MaintenanceBlock, AppError>;
    async fn list_by_court(&self, court_id: &str) -> Result<Vec<MaintenanceBlock>, AppError>;
    async fn list_overlapping(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MaintenanceBlock>, AppError>;
    async fn count_overlap(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;
}

/// Injected identity collaborator. The core hands over the opaque bearer
/// token and receives a typed principal; secrets never enter the core.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, AppError>;
}

pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: String,
}

/// Boolean-outcome payment collaborator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, reference: &str, amount: f64, method: &str) -> Result<PaymentOutcome, AppError>;
    async fn refund(&self, reference: &str, amount: f64) -> Result<(), AppError>;
}

/// Informed of outcomes after commit; never affects correctness.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn reservation_confirmed(&self, reservation: &Reservation);
    async fn reservation_cancelled(&self, reservation: &Reservation, refund_amount: f64);
}
