use crate::domain::ports::{CatalogRepository, MaintenanceRepository, ReservationRepository};
use crate::error::AppError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;

const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Serialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Day grid of fixed-size slots over the facility's operating hours,
/// evaluated in the facility's timezone.
pub struct SlotService {
    catalog: Arc<dyn CatalogRepository>,
    reservations: Arc<dyn ReservationRepository>,
    maintenance: Arc<dyn MaintenanceRepository>,
}

impl SlotService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        reservations: Arc<dyn ReservationRepository>,
        maintenance: Arc<dyn MaintenanceRepository>,
    ) -> Self {
        Self { catalog, reservations, maintenance }
    }

    pub async fn day_slots(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Slot>, AppError> {
        let court = match self.catalog.find_court(court_id).await? {
            Some(court) if court.is_active => court,
            _ => return Err(AppError::NotFound("Court not found or inactive".into())),
        };
        let facility = self
            .catalog
            .find_facility(&court.facility_id)
            .await?
            .ok_or(AppError::Internal)?;

        let tz: Tz = facility.timezone.parse().unwrap_or(chrono_tz::UTC);
        let open = NaiveTime::parse_from_str(&facility.open_time, "%H:%M")
            .map_err(|_| AppError::InternalWithMsg(format!("Bad open_time for facility {}", facility.id)))?;
        let close = NaiveTime::parse_from_str(&facility.close_time, "%H:%M")
            .map_err(|_| AppError::InternalWithMsg(format!("Bad close_time for facility {}", facility.id)))?;

        let day_start = tz
            .from_local_datetime(&date.and_time(open))
            .single()
            .ok_or_else(|| AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))?
            .with_timezone(&Utc);
        let day_end = tz
            .from_local_datetime(&date.and_time(close))
            .single()
            .ok_or_else(|| AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))?
            .with_timezone(&Utc);

        let bookings = self
            .reservations
            .list_active_overlapping(&court.id, day_start, day_end)
            .await?;
        let blocks = self
            .maintenance
            .list_overlapping(&court.id, day_start, day_end)
            .await?;

        let mut slots = Vec::new();
        let mut cursor = day_start;
        while cursor + Duration::minutes(SLOT_MINUTES) <= day_end {
            let slot_end = cursor + Duration::minutes(SLOT_MINUTES);

            let is_booked = bookings
                .iter()
                .any(|b| b.start_time < slot_end && b.end_time > cursor);
            let is_maintenance = blocks
                .iter()
                .any(|m| m.start_time < slot_end && m.end_time > cursor);

            let reason = if is_booked {
                Some("Booked")
            } else if is_maintenance {
                Some("Maintenance")
            } else {
                None
            };

            slots.push(Slot {
                start: cursor,
                end: slot_end,
                available: reason.is_none(),
                reason,
            });
            cursor = slot_end;
        }

        Ok(slots)
    }
}
