use crate::domain::models::audit::AuditEvent;
use crate::domain::models::reservation::{EquipmentLine, PaymentStatus, Reservation, ReservationStatus};
use crate::domain::ports::{CancellationUpdate, ReservationRepository};
use crate::error::{AppError, ConflictReason};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create(&self, reservation: &Reservation, lines: &[EquipmentLine]) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Overlap checks re-run inside the write transaction so a race
        // loser aborts here even if the pre-check saw a free slot.
        let court_conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations
             WHERE court_id = ? AND status IN ('pending', 'confirmed')
             AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(&reservation.court_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if court_conflicts > 0 {
            return Err(AppError::Unavailable(ConflictReason::CourtConflict));
        }

        let maintenance_conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance_blocks
             WHERE court_id = ? AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(&reservation.court_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if maintenance_conflicts > 0 {
            return Err(AppError::Unavailable(ConflictReason::MaintenanceConflict));
        }

        if let Some(coach_id) = &reservation.coach_id {
            let coach_conflicts: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM reservations
                 WHERE coach_id = ? AND status IN ('pending', 'confirmed')
                 AND NOT (end_time <= ? OR start_time >= ?)",
            )
            .bind(coach_id)
            .bind(reservation.start_time)
            .bind(reservation.end_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            if coach_conflicts > 0 {
                return Err(AppError::Unavailable(ConflictReason::CoachConflict));
            }
        }

        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, reference, user_id, facility_id, court_id, coach_id,
                start_time, end_time, status, payment_status, payment_method,
                base_price, equipment_cost, coach_cost, total_price, idempotency_key,
                cancellation_reason, cancelled_at, refund_amount, refund_percentage, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&reservation.id)
        .bind(&reservation.reference)
        .bind(&reservation.user_id)
        .bind(&reservation.facility_id)
        .bind(&reservation.court_id)
        .bind(&reservation.coach_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(&reservation.status)
        .bind(&reservation.payment_status)
        .bind(&reservation.payment_method)
        .bind(reservation.base_price)
        .bind(reservation.equipment_cost)
        .bind(reservation.coach_cost)
        .bind(reservation.total_price)
        .bind(&reservation.idempotency_key)
        .bind(&reservation.cancellation_reason)
        .bind(reservation.cancelled_at)
        .bind(reservation.refund_amount)
        .bind(reservation.refund_percentage)
        .bind(reservation.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for line in lines {
            sqlx::query(
                "INSERT INTO reservation_equipment (id, reservation_id, equipment_id, quantity, unit_price)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&line.id)
            .bind(&line.reservation_id)
            .bind(&line.equipment_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            // Decrement with floor check, atomic with the check itself.
            let result = sqlx::query(
                "UPDATE equipment SET available_stock = available_stock - ?
                 WHERE id = ? AND available_stock >= ?",
            )
            .bind(line.quantity)
            .bind(&line.equipment_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::Unavailable(ConflictReason::InsufficientStock));
            }
        }

        sqlx::query(
            "INSERT INTO user_profiles (user_id, total_bookings, total_spent) VALUES (?, 1, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                total_bookings = total_bookings + 1,
                total_spent = total_spent + excluded.total_spent",
        )
        .bind(&reservation.user_id)
        .bind(reservation.total_price)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE idempotency_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn equipment_lines(&self, reservation_id: &str) -> Result<Vec<EquipmentLine>, AppError> {
        sqlx::query_as::<_, EquipmentLine>("SELECT * FROM reservation_equipment WHERE reservation_id = ?")
            .bind(reservation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_overlapping(
        &self,
        court_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations
             WHERE court_id = ? AND status IN ('pending', 'confirmed')
             AND NOT (end_time <= ? OR start_time >= ?)
             ORDER BY start_time ASC",
        )
        .bind(court_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_court_overlap(&self, court_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations
             WHERE court_id = ? AND status IN ('pending', 'confirmed')
             AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(court_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_coach_overlap(&self, coach_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations
             WHERE coach_id = ? AND status IN ('pending', 'confirmed')
             AND NOT (end_time <= ? OR start_time >= ?)",
        )
        .bind(coach_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn committed_equipment_quantity(&self, equipment_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(re.quantity), 0) FROM reservation_equipment re
             JOIN reservations r ON re.reservation_id = r.id
             WHERE re.equipment_id = ? AND r.status IN ('pending', 'confirmed')
             AND NOT (r.end_time <= ? OR r.start_time >= ?)",
        )
        .bind(equipment_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn cancel(&self, reservation: &Reservation, update: &CancellationUpdate) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'cancelled', cancellation_reason = ?, cancelled_at = ?,
                payment_status = ?, refund_amount = ?, refund_percentage = ?
             WHERE id = ? AND status IN ('pending', 'confirmed')
             RETURNING *",
        )
        .bind(&update.reason)
        .bind(update.cancelled_at)
        .bind(update.payment_status.as_str())
        .bind(update.refund_amount)
        .bind(update.refund_percentage)
        .bind(&reservation.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::AlreadyCancelled)?;

        let lines = sqlx::query_as::<_, EquipmentLine>(
            "SELECT * FROM reservation_equipment WHERE reservation_id = ?",
        )
        .bind(&reservation.id)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for line in &lines {
            sqlx::query("UPDATE equipment SET available_stock = available_stock + ? WHERE id = ?")
                .bind(line.quantity)
                .bind(&line.equipment_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        // The aggregate tracks gross spend over non-cancelled reservations,
        // so the original total comes off regardless of the refund tier.
        sqlx::query(
            "UPDATE user_profiles SET total_bookings = total_bookings - 1, total_spent = total_spent - ?
             WHERE user_id = ?",
        )
        .bind(reservation.total_price)
        .bind(&reservation.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn finalize_payment(&self, id: &str, status: ReservationStatus, payment: PaymentStatus) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = ?, payment_status = ?
             WHERE id = ? AND status = 'pending'
             RETURNING *",
        )
        .bind(status.as_str())
        .bind(payment.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Validation("Reservation is not awaiting payment".into()))?;

        // A declined payment kills the reservation, so its holds go back.
        if status == ReservationStatus::Failed {
            let lines = sqlx::query_as::<_, EquipmentLine>(
                "SELECT * FROM reservation_equipment WHERE reservation_id = ?",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            for line in &lines {
                sqlx::query("UPDATE equipment SET available_stock = available_stock + ? WHERE id = ?")
                    .bind(line.quantity)
                    .bind(&line.equipment_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::Database)?;
            }

            sqlx::query(
                "UPDATE user_profiles SET total_bookings = total_bookings - 1, total_spent = total_spent - ?
                 WHERE user_id = ?",
            )
            .bind(updated.total_price)
            .bind(&updated.user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn override_status(&self, id: &str, status: ReservationStatus, event: &AuditEvent) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = ? WHERE id = ? RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        sqlx::query(
            "INSERT INTO audit_events (id, reservation_id, actor_id, action, detail, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.reservation_id)
        .bind(&event.actor_id)
        .bind(&event.action)
        .bind(&event.detail)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn list_audit_events(&self, reservation_id: &str) -> Result<Vec<AuditEvent>, AppError> {
        sqlx::query_as::<_, AuditEvent>(
            "SELECT * FROM audit_events WHERE reservation_id = ? ORDER BY created_at ASC",
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
