use crate::domain::models::auth::Principal;
use crate::domain::models::reservation::{PaymentStatus, Reservation};
use crate::domain::ports::{CancellationUpdate, NotificationDispatcher, PaymentGateway, ReservationRepository};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Lead-time-tiered refund: a full day out refunds everything, same-day
/// cancellations refund half, and under two hours nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefundQuote {
    pub percentage: i64,
    pub amount: f64,
}

pub fn refund_quote(total_price: f64, start_time: DateTime<Utc>, now: DateTime<Utc>) -> RefundQuote {
    let hours_until_start = (start_time - now).num_minutes() as f64 / 60.0;

    let percentage = if hours_until_start >= 24.0 {
        100
    } else if hours_until_start >= 2.0 {
        50
    } else {
        0
    };

    RefundQuote {
        percentage,
        amount: total_price * percentage as f64 / 100.0,
    }
}

pub struct CancellationOutcome {
    pub reservation: Reservation,
    pub refund_amount: f64,
    pub refund_percentage: i64,
}

/// Reverses a reservation: refund math, stock release and aggregate
/// adjustment, all against the same persistence contract as the forward
/// path.
pub struct CancellationService {
    reservations: Arc<dyn ReservationRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl CancellationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { reservations, gateway, notifier }
    }

    pub async fn cancel(
        &self,
        reservation_id: &str,
        principal: &Principal,
        reason: Option<String>,
    ) -> Result<CancellationOutcome, AppError> {
        let reservation = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".into()))?;

        if reservation.user_id != principal.user_id && !principal.is_admin() {
            return Err(AppError::Forbidden("You cannot cancel this reservation".into()));
        }

        let status = reservation.status().ok_or(AppError::Internal)?;
        if status.is_terminal() {
            return Err(AppError::AlreadyCancelled);
        }

        let now = Utc::now();
        let quote = refund_quote(reservation.total_price, reservation.start_time, now);

        let was_paid = reservation.payment() == Some(PaymentStatus::Paid);
        let payment_status = if was_paid && quote.amount > 0.0 {
            PaymentStatus::Refunded
        } else {
            reservation.payment().unwrap_or(PaymentStatus::Pending)
        };

        let update = CancellationUpdate {
            reason: reason.unwrap_or_else(|| "User cancellation".to_string()),
            cancelled_at: now,
            refund_amount: quote.amount,
            refund_percentage: quote.percentage,
            payment_status,
        };

        let cancelled = self.reservations.cancel(&reservation, &update).await?;
        info!(
            "Reservation {} cancelled, refund {}% ({})",
            cancelled.reference, quote.percentage, quote.amount
        );

        if was_paid && quote.amount > 0.0 {
            // The refund record is already committed; a gateway hiccup is
            // an operational follow-up, not a rollback.
            if let Err(e) = self.gateway.refund(&cancelled.reference, quote.amount).await {
                warn!("Refund dispatch failed for {}: {}", cancelled.reference, e);
            }
        }

        self.notifier.reservation_cancelled(&cancelled, quote.amount).await;

        Ok(CancellationOutcome {
            reservation: cancelled,
            refund_amount: quote.amount,
            refund_percentage: quote.percentage,
        })
    }
}
