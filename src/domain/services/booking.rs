use crate::domain::models::audit::AuditEvent;
use crate::domain::models::auth::Principal;
use crate::domain::models::reservation::{
    EquipmentLine, NewReservationParams, PaymentStatus, Reservation, ReservationStatus, TimeRange,
};
use crate::domain::ports::{CatalogRepository, NotificationDispatcher, PaymentGateway, ReservationRepository};
use crate::domain::services::availability::{AvailabilityService, EquipmentRequest};
use crate::domain::services::pricing::{compute_total, EquipmentLineInput};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Payment-method tag settled at the facility; the reservation confirms
/// immediately and payment stays pending until collected on site.
const PAYMENT_ON_SITE: &str = "on_site";

pub struct CreateReservationCommand {
    pub user_id: String,
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub coach_id: Option<String>,
    pub equipment: Vec<EquipmentRequest>,
    pub payment_method: String,
    pub idempotency_key: Option<String>,
}

/// Orchestrates the atomic check-then-reserve pipeline and owns the
/// reservation lifecycle up to cancellation.
pub struct BookingService {
    catalog: Arc<dyn CatalogRepository>,
    reservations: Arc<dyn ReservationRepository>,
    availability: AvailabilityService,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl BookingService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        reservations: Arc<dyn ReservationRepository>,
        availability: AvailabilityService,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { catalog, reservations, availability, gateway, notifier }
    }

    pub async fn create(
        &self,
        cmd: CreateReservationCommand,
    ) -> Result<(Reservation, Vec<EquipmentLine>), AppError> {
        let range = TimeRange::new(cmd.start_time, cmd.end_time)?;
        if range.start < Utc::now() {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }
        for request in &cmd.equipment {
            if request.quantity < 1 {
                return Err(AppError::Validation("Equipment quantity must be at least 1".into()));
            }
        }

        if let Some(key) = &cmd.idempotency_key {
            if let Some(existing) = self.reservations.find_by_idempotency_key(key).await? {
                info!("create_reservation: replaying idempotency key for {}", existing.id);
                let lines = self.reservations.equipment_lines(&existing.id).await?;
                return Ok((existing, lines));
            }
        }

        let court = self
            .availability
            .check(&cmd.court_id, range, cmd.coach_id.as_deref(), &cmd.equipment)
            .await?;

        let facility = self
            .catalog
            .find_facility(&court.facility_id)
            .await?
            .ok_or(AppError::Internal)?;

        let rules = self.catalog.active_rules(&facility.id, &court.court_type).await?;

        let mut equipment_cost = 0.0;
        let mut pricing_lines = Vec::new();
        let mut resolved_equipment = Vec::new();
        for request in &cmd.equipment {
            let item = self
                .catalog
                .find_equipment(&request.equipment_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", request.equipment_id)))?;
            equipment_cost += item.price_per_unit * request.quantity as f64;
            pricing_lines.push(EquipmentLineInput {
                quantity: request.quantity,
                unit_price: item.price_per_unit,
            });
            resolved_equipment.push((request.equipment_id.clone(), request.quantity, item.price_per_unit));
        }

        let coach_cost = match &cmd.coach_id {
            Some(coach_id) => {
                let coach = self
                    .catalog
                    .find_coach(coach_id)
                    .await?
                    .filter(|c| c.is_active)
                    .ok_or_else(|| AppError::NotFound(format!("Coach {} not found or inactive", coach_id)))?;
                coach.price
            }
            None => 0.0,
        };

        let tz: Tz = facility.timezone.parse().unwrap_or(chrono_tz::UTC);
        let local_start = range.start.with_timezone(&tz).naive_local();

        let total_price = compute_total(court.base_price, &rules, local_start, &pricing_lines, coach_cost);

        let status = if cmd.payment_method == PAYMENT_ON_SITE {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };

        let reservation = Reservation::new(NewReservationParams {
            user_id: cmd.user_id,
            facility_id: facility.id,
            court_id: court.id,
            coach_id: cmd.coach_id,
            range,
            status,
            payment_method: cmd.payment_method,
            base_price: court.base_price,
            equipment_cost,
            coach_cost,
            total_price,
            idempotency_key: cmd.idempotency_key,
        });

        let lines: Vec<EquipmentLine> = resolved_equipment
            .into_iter()
            .map(|(equipment_id, quantity, unit_price)| {
                EquipmentLine::new(reservation.id.clone(), equipment_id, quantity, unit_price)
            })
            .collect();

        let created = self.reservations.create(&reservation, &lines).await?;
        info!("Reservation created: {} ({})", created.id, created.reference);

        if status == ReservationStatus::Confirmed {
            self.notifier.reservation_confirmed(&created).await;
        }

        Ok((created, lines))
    }

    /// Settles a pending reservation through the payment collaborator.
    /// Success confirms the reservation; failure moves it to the terminal
    /// `failed` state and releases its resource holds.
    pub async fn capture_payment(
        &self,
        reservation_id: &str,
        principal: &Principal,
    ) -> Result<Reservation, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        if reservation.user_id != principal.user_id && !principal.is_admin() {
            return Err(AppError::Forbidden("You cannot pay for this reservation".into()));
        }
        if reservation.status() != Some(ReservationStatus::Pending)
            || reservation.payment() != Some(PaymentStatus::Pending)
        {
            return Err(AppError::Validation("Reservation is not awaiting payment".into()));
        }

        let outcome = self
            .gateway
            .charge(&reservation.reference, reservation.total_price, &reservation.payment_method)
            .await?;

        if outcome.success {
            let confirmed = self
                .reservations
                .finalize_payment(&reservation.id, ReservationStatus::Confirmed, PaymentStatus::Paid)
                .await?;
            info!(
                "Payment captured for {} (tx {})",
                confirmed.reference, outcome.transaction_id
            );
            self.notifier.reservation_confirmed(&confirmed).await;
            Ok(confirmed)
        } else {
            warn!(
                "Payment declined for {} (tx {})",
                reservation.reference, outcome.transaction_id
            );
            self.reservations
                .finalize_payment(&reservation.id, ReservationStatus::Failed, PaymentStatus::Failed)
                .await
        }
    }

    /// Administrative status set. Skips availability and state-machine
    /// checks by design; the override is recorded as an audit event in the
    /// same unit of work.
    pub async fn override_status(
        &self,
        reservation_id: &str,
        new_status: &str,
        principal: &Principal,
        reason: Option<String>,
    ) -> Result<Reservation, AppError> {
        let status = ReservationStatus::parse(new_status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", new_status)))?;

        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        let event = AuditEvent::new(
            reservation.id.clone(),
            principal.user_id.clone(),
            format!("status_override:{}", status.as_str()),
            reason,
        );

        let updated = self.reservations.override_status(&reservation.id, status, &event).await?;
        info!(
            "Reservation {} status overridden to {} by {}",
            updated.reference,
            status.as_str(),
            principal.user_id
        );
        Ok(updated)
    }
}
