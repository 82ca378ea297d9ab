use crate::domain::models::catalog::Court;
use crate::domain::models::reservation::TimeRange;
use crate::domain::ports::{CatalogRepository, MaintenanceRepository, ReservationRepository};
use crate::error::{AppError, ConflictReason};
use chrono::NaiveTime;
use std::sync::Arc;

/// One requested equipment item with its quantity.
#[derive(Debug, Clone)]
pub struct EquipmentRequest {
    pub equipment_id: String,
    pub quantity: i64,
}

/// Conflict detection across court, coach and equipment resources.
///
/// Checks run sequentially and short-circuit, so the returned reason on a
/// multi-conflict request is defined by check order: court existence,
/// court bookings, maintenance, coach bookings, coach unavailability,
/// equipment stock. The reservation store re-runs the overlap checks
/// inside its write transaction, so a race loser still aborts correctly;
/// this pass exists to produce a precise reason before any write.
pub struct AvailabilityService {
    catalog: Arc<dyn CatalogRepository>,
    reservations: Arc<dyn ReservationRepository>,
    maintenance: Arc<dyn MaintenanceRepository>,
}

impl AvailabilityService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        reservations: Arc<dyn ReservationRepository>,
        maintenance: Arc<dyn MaintenanceRepository>,
    ) -> Self {
        Self { catalog, reservations, maintenance }
    }

    /// Returns the court when every check passes, so callers resolving
    /// pricing do not need a second lookup.
    pub async fn check(
        &self,
        court_id: &str,
        range: TimeRange,
        coach_id: Option<&str>,
        equipment: &[EquipmentRequest],
    ) -> Result<Court, AppError> {
        let court = match self.catalog.find_court(court_id).await? {
            Some(court) if court.is_active => court,
            _ => return Err(AppError::Unavailable(ConflictReason::ResourceInactive)),
        };

        let court_conflicts = self
            .reservations
            .count_court_overlap(court_id, range.start, range.end)
            .await?;
        if court_conflicts > 0 {
            return Err(AppError::Unavailable(ConflictReason::CourtConflict));
        }

        let maintenance_conflicts = self
            .maintenance
            .count_overlap(court_id, range.start, range.end)
            .await?;
        if maintenance_conflicts > 0 {
            return Err(AppError::Unavailable(ConflictReason::MaintenanceConflict));
        }

        if let Some(coach_id) = coach_id {
            let coach_conflicts = self
                .reservations
                .count_coach_overlap(coach_id, range.start, range.end)
                .await?;
            if coach_conflicts > 0 {
                return Err(AppError::Unavailable(ConflictReason::CoachConflict));
            }

            let records = self
                .catalog
                .coach_unavailability_on(coach_id, range.start.date_naive())
                .await?;
            for record in &records {
                if unavailability_overlaps(record.start_time.as_deref(), record.end_time.as_deref(), range) {
                    return Err(AppError::Unavailable(ConflictReason::CoachUnavailable));
                }
            }
        }

        for request in equipment {
            let item = match self.catalog.find_equipment(&request.equipment_id).await? {
                Some(item) if item.is_active => item,
                _ => {
                    return Err(AppError::NotFound(format!(
                        "Equipment {} not found or inactive",
                        request.equipment_id
                    )))
                }
            };

            let committed = self
                .reservations
                .committed_equipment_quantity(&request.equipment_id, range.start, range.end)
                .await?;
            let available = item.available_stock - committed;
            if available < request.quantity {
                return Err(AppError::Unavailable(ConflictReason::InsufficientStock));
            }
        }

        Ok(court)
    }
}

/// A record without a parseable time sub-range blocks the whole day;
/// otherwise the sub-range is compared against the booking's times of day.
fn unavailability_overlaps(start: Option<&str>, end: Option<&str>, range: TimeRange) -> bool {
    let window = match (start, end) {
        (Some(start), Some(end)) => {
            match (
                NaiveTime::parse_from_str(start, "%H:%M"),
                NaiveTime::parse_from_str(end, "%H:%M"),
            ) {
                (Ok(start), Ok(end)) => Some((start, end)),
                _ => None,
            }
        }
        _ => None,
    };

    match window {
        Some((window_start, window_end)) => {
            let booking_start = range.start.time();
            let booking_end = range.end.time();
            !(booking_end <= window_start || booking_start >= window_end)
        }
        None => true,
    }
}
