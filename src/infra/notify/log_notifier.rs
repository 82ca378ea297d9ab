use crate::domain::models::reservation::Reservation;
use crate::domain::ports::NotificationDispatcher;
use async_trait::async_trait;
use tracing::info;

/// Dispatcher that records outcomes in the service log. Downstream
/// channels (mail, push) hang off the same port in deployments that
/// need them.
pub struct LogNotifier;

#[async_trait]
impl NotificationDispatcher for LogNotifier {
    async fn reservation_confirmed(&self, reservation: &Reservation) {
        info!(
            reference = %reservation.reference,
            user_id = %reservation.user_id,
            total = reservation.total_price,
            "notification: reservation confirmed"
        );
    }

    async fn reservation_cancelled(&self, reservation: &Reservation, refund_amount: f64) {
        info!(
            reference = %reservation.reference,
            user_id = %reservation.user_id,
            refund = refund_amount,
            "notification: reservation cancelled"
        );
    }
}
