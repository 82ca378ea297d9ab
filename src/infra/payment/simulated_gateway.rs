use crate::domain::ports::{PaymentGateway, PaymentOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;

/// Stand-in for a real payment provider: every charge settles
/// immediately, with the outcome keyed off the payment-method tag so
/// decline paths stay reachable.
pub struct SimulatedGateway;

const DECLINE_METHOD: &str = "declined";

fn transaction_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{}-{}", prefix, suffix.to_uppercase())
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, reference: &str, amount: f64, method: &str) -> Result<PaymentOutcome, AppError> {
        let success = method != DECLINE_METHOD;
        let tx_id = transaction_id("TX");
        info!(
            "Simulated charge for {}: {} via {} -> {}",
            reference,
            amount,
            method,
            if success { "approved" } else { "declined" }
        );
        Ok(PaymentOutcome {
            success,
            transaction_id: tx_id,
        })
    }

    async fn refund(&self, reference: &str, amount: f64) -> Result<(), AppError> {
        info!("Simulated refund for {}: {} ({})", reference, amount, transaction_id("RF"));
        Ok(())
    }
}
