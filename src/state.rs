use crate::config::Config;
use crate::domain::ports::{
    CatalogRepository, IdentityVerifier, MaintenanceRepository, ProfileRepository, ReservationRepository,
};
use crate::domain::services::booking::BookingService;
use crate::domain::services::cancellation::CancellationService;
use crate::domain::services::slots::SlotService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub maintenance_repo: Arc<dyn MaintenanceRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub booking_service: Arc<BookingService>,
    pub cancellation_service: Arc<CancellationService>,
    pub slot_service: Arc<SlotService>,
}
