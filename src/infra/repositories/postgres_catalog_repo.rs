use crate::domain::models::catalog::{Coach, CoachUnavailability, Court, EquipmentItem, Facility, PricingRule};
use crate::domain::ports::CatalogRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresCatalogRepo {
    pool: PgPool,
}

impl PostgresCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepo {
    async fn find_facility(&self, id: &str) -> Result<Option<Facility>, AppError> {
        sqlx::query_as::<_, Facility>("SELECT * FROM facilities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_court(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_coach(&self, id: &str) -> Result<Option<Coach>, AppError> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_equipment(&self, id: &str) -> Result<Option<EquipmentItem>, AppError> {
        sqlx::query_as::<_, EquipmentItem>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn active_rules(&self, facility_id: &str, court_type: &str) -> Result<Vec<PricingRule>, AppError> {
        sqlx::query_as::<_, PricingRule>(
            "SELECT * FROM pricing_rules
             WHERE (facility_id = $1 OR facility_id IS NULL)
             AND (court_type = $2 OR court_type IS NULL)
             AND is_active = TRUE
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
            "SELECT * FROM coach_unavailability WHERE coach_id = $1 AND date = $2",
        )
        .bind(coach_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
