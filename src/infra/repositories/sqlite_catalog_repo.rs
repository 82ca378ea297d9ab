use crate::domain::models::catalog::{Coach, CoachUnavailability, Court, EquipmentItem, Facility, PricingRule};
use crate::domain::ports::CatalogRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteCatalogRepo {
    pool: SqlitePool,
}

impl SqliteCatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepo {
    async fn find_facility(&self, id: &str) -> Result<Option<Facility>, AppError> {
        sqlx::query_as::<_, Facility>("SELECT * FROM facilities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_court(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_coach(&self, id: &str) -> Result<Option<Coach>, AppError> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_equipment(&self, id: &str) -> Result<Option<EquipmentItem>, AppError> {
        sqlx::query_as::<_, EquipmentItem>("SELECT * FROM equipment WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn active_rules(&self, facility_id: &str, court_type: &str) -> Result<Vec<PricingRule>, AppError> {
        sqlx::query_as::<_, PricingRule>(
            "SELECT * FROM pricing_rules
             WHERE (facility_id = ? OR facility_id IS NULL)
             AND (court_type = ? OR court_type IS NULL)
             AND is_active = 1
             ORDER BY name ASC",
        )
        .bind(facility_id)
        .bind(court_type)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn coach_unavailability_on(&self, coach_id: &str, date: NaiveDate) -> Result<Vec<CoachUnavailability>, AppError> {
        sqlx::query_as::<_, CoachUnavailability>(
            "SELECT * FROM coach_unavailability WHERE coach_id = ? AND date = ?",
        )
        .bind(coach_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
