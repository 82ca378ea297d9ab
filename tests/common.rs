use courtside_backend::{
    api::router::create_router,
    config::Config,
    domain::models::auth::Principal,
    domain::ports::IdentityVerifier,
    error::AppError,
    infra::factory::assemble_state,
    infra::repositories::{
        sqlite_catalog_repo::SqliteCatalogRepo, sqlite_maintenance_repo::SqliteMaintenanceRepo,
        sqlite_profile_repo::SqliteProfileRepo, sqlite_reservation_repo::SqliteReservationRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Accepts `user:<id>` and `admin:<id>` tokens, standing in for the
/// external identity provider.
pub struct MockIdentityService;

#[async_trait]
impl IdentityVerifier for MockIdentityService {
    async fn verify(&self, token: &str) -> Result<Principal, AppError> {
        if let Some(id) = token.strip_prefix("user:") {
            return Ok(Principal { user_id: id.to_string(), role: "user".to_string() });
        }
        if let Some(id) = token.strip_prefix("admin:") {
            return Ok(Principal { user_id: id.to_string(), role: "admin".to_string() });
        }
        Err(AppError::Unauthorized)
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            identity_service_url: "http://localhost".to_string(),
        };

        let state = Arc::new(assemble_state(
            &config,
            Arc::new(SqliteCatalogRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteMaintenanceRepo::new(pool.clone())),
            Arc::new(SqliteProfileRepo::new(pool.clone())),
            Arc::new(MockIdentityService),
        ));

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state }
    }

    pub async fn seed_facility(&self, timezone: &str) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO facilities (id, name, address, timezone, open_time, close_time, created_at)
             VALUES (?, 'Test Arena', '1 Court Street', ?, '06:00', '22:00', ?)",
        )
        .bind(&id)
        .bind(timezone)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .expect("Failed to seed facility");
        id
    }

    pub async fn seed_court(&self, facility_id: &str, base_price: f64, active: bool) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO courts (id, facility_id, name, court_type, base_price, is_active, created_at)
             VALUES (?, ?, 'Court', 'tennis', ?, ?, ?)",
        )
        .bind(&id)
        .bind(facility_id)
        .bind(base_price)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .expect("Failed to seed court");
        id
    }

    pub async fn seed_coach(&self, facility_id: &str, price: f64) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO coaches (id, facility_id, name, price, is_active, created_at)
             VALUES (?, ?, 'Coach', ?, 1, ?)",
        )
        .bind(&id)
        .bind(facility_id)
        .bind(price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .expect("Failed to seed coach");
        id
    }

    pub async fn seed_coach_unavailability(
        &self,
        coach_id: &str,
        date: NaiveDate,
        window: Option<(&str, &str)>,
    ) {
        let (start, end) = match window {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO coach_unavailability (id, coach_id, date, start_time, end_time, reason)
             VALUES (?, ?, ?, ?, ?, 'Time off')",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(coach_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .execute(&self.pool)
        .await
        .expect("Failed to seed coach unavailability");
    }

    pub async fn seed_equipment(&self, facility_id: &str, stock: i64, price_per_unit: f64) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO equipment (id, facility_id, name, equipment_type, total_stock, available_stock, price_per_unit, is_active)
             VALUES (?, ?, 'Racket', 'racket', ?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(facility_id)
        .bind(stock)
        .bind(stock)
        .bind(price_per_unit)
        .execute(&self.pool)
        .await
        .expect("Failed to seed equipment");
        id
    }

    pub async fn available_stock(&self, equipment_id: &str) -> i64 {
        sqlx::query_scalar("SELECT available_stock FROM equipment WHERE id = ?")
            .bind(equipment_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to read stock")
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> axum::response::Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// UTC instant at `hour:00` on a day `days` ahead, clear of "in the past"
/// validation.
#[allow(dead_code)]
pub fn future_day_at(days: i64, hour: u32) -> DateTime<Utc> {
    (Utc::now() + Duration::days(days))
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}
