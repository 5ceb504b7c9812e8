// service/payment_service.rs
use num_traits::Zero;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::{error::ServiceError, today, Store};
use crate::models::contractmodel::*;

// payments.amount is NUMERIC(12, 2).
const AMOUNT_SCALE: i64 = 2;
const AMOUNT_INTEGER_DIGITS: u32 = 10;

#[derive(Debug, Clone)]
pub struct PaymentService {
    store: Store,
}

impl PaymentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Payments are append-only; a contract may carry several.
    pub async fn record_payment(
        &self,
        actor: Uuid,
        contract_id: Uuid,
        amount: BigDecimal,
        payment_method: &str,
    ) -> Result<Payment, ServiceError> {
        if !fits_amount_column(&amount) {
            return Err(ServiceError::InvalidAmount(amount));
        }

        let payment_method = payment_method.trim();
        if payment_method.is_empty() {
            return Err(ServiceError::Validation("Payment method is required".to_string()));
        }

        let payment = self
            .store
            .record_payment(
                actor,
                NewPayment {
                    contract_id,
                    amount,
                    payment_method: payment_method.to_string(),
                },
                today(),
            )
            .await?;

        tracing::info!(
            "payment {} of {} recorded on contract {}",
            payment.id,
            payment.amount,
            contract_id
        );
        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        self.store
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))
    }

    pub async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, ServiceError> {
        self.store.get_contract_payments(contract_id).await
    }
}

fn fits_amount_column(amount: &BigDecimal) -> bool {
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    let limit = BigDecimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS));

    *amount >= BigDecimal::zero() && scale <= AMOUNT_SCALE && *amount < limit
}
