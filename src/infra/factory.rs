use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    CatalogRepository, IdentityVerifier, MaintenanceRepository, NotificationDispatcher, PaymentGateway,
    ProfileRepository, ReservationRepository,
};
use crate::domain::services::availability::AvailabilityService;
use crate::domain::services::booking::BookingService;
use crate::domain::services::cancellation::CancellationService;
use crate::domain::services::slots::SlotService;
use crate::infra::identity::http_identity_service::HttpIdentityService;
use crate::infra::notify::log_notifier::LogNotifier;
use crate::infra::payment::simulated_gateway::SimulatedGateway;
use crate::infra::repositories::{
    postgres_catalog_repo::PostgresCatalogRepo, postgres_maintenance_repo::PostgresMaintenanceRepo,
    postgres_profile_repo::PostgresProfileRepo, postgres_reservation_repo::PostgresReservationRepo,
    sqlite_catalog_repo::SqliteCatalogRepo, sqlite_maintenance_repo::SqliteMaintenanceRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_reservation_repo::SqliteReservationRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let identity: Arc<dyn IdentityVerifier> =
        Arc::new(HttpIdentityService::new(config.identity_service_url.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(PostgresCatalogRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool.clone())),
            Arc::new(PostgresMaintenanceRepo::new(pool.clone())),
            Arc::new(PostgresProfileRepo::new(pool)),
            identity,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(SqliteCatalogRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteMaintenanceRepo::new(pool.clone())),
            Arc::new(SqliteProfileRepo::new(pool)),
            identity,
        )
    }
}

pub fn assemble_state(
    config: &Config,
    catalog_repo: Arc<dyn CatalogRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
    maintenance_repo: Arc<dyn MaintenanceRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    identity: Arc<dyn IdentityVerifier>,
) -> AppState {
    let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway);
    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(LogNotifier);

    let availability = AvailabilityService::new(
        catalog_repo.clone(),
        reservation_repo.clone(),
        maintenance_repo.clone(),
    );
    let booking_service = Arc::new(BookingService::new(
        catalog_repo.clone(),
        reservation_repo.clone(),
        availability,
        gateway.clone(),
        notifier.clone(),
    ));
    let cancellation_service = Arc::new(CancellationService::new(
        reservation_repo.clone(),
        gateway,
        notifier,
    ));
    let slot_service = Arc::new(SlotService::new(
        catalog_repo.clone(),
        reservation_repo.clone(),
        maintenance_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        catalog_repo,
        reservation_repo,
        maintenance_repo,
        profile_repo,
        identity,
        booking_service,
        cancellation_service,
        slot_service,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
