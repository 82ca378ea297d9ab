use crate::domain::models::maintenance::MaintenanceBlock;
use crate::domain::ports::MaintenanceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteMaintenanceRepo {
    pool: SqlitePool,
}

impl SqliteMaintenanceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for SqliteMaintenanceRepo {
    async fn create(&self, block: &MaintenanceBlock) -> Result<MaintenanceBlock, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The reverse of the booking-side check: a block cannot land on
        // top of an active reservation.
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations
             WHERE court_id = ? AND status IN ('pending', 'confirmed')
             AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(&block.court_id)
        .bind(block.start_time)
        .bind(block.end_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if conflicts > 0 {
            return Err(AppError::Conflict(
                "Cannot create maintenance block: existing reservations conflict with this time period".into(),
            ));
        }

        let created = sqlx::query_as::<_, MaintenanceBlock>(
            "INSERT INTO maintenance_blocks (id, facility_id, court_id, start_time, end_time, reason, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&block.id)
        .bind(&block.facility_id)
        .bind(&block.court_id)
        .bind(block.start_time)
        .bind(block.end_time)
        .bind(&block.reason)
        .bind(&block.created_by)
        .bind(block.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn list_by_court(&self, court_id: &str) -> Result<Vec<MaintenanceBlock>, AppError> {
        sqlx::query_as::<_, MaintenanceBlock>(
            "SELECT * FROM maintenance_blocks WHERE court_id = ? ORDER BY start_time DESC",
        )
        .bind(court_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_overlapping(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MaintenanceBlock>, AppError> {
        sqlx::query_as::<_, MaintenanceBlock>(
            "SELECT * FROM maintenance_blocks
             WHERE court_id = ? AND NOT (end_time <= ? OR start_time >= ?)
             ORDER BY start_time ASC",
        )
        .bind(court_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_overlap(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance_blocks
             WHERE court_id = ? AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(court_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM maintenance_blocks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Maintenance block not found".into()));
        }
        Ok(())
    }
}
