// db/paymentdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{db::DBClient, query_timeout::QueryTimeout};
use crate::{
    models::contractmodel::*,
    service::error::ServiceError,
};

#[async_trait]
pub trait PaymentExt {
    /// Appends a paid record to a completed, reviewed contract.
    async fn record_payment(
        &self,
        owner_id: Uuid,
        payment: NewPayment,
        today: NaiveDate,
    ) -> Result<Payment, ServiceError>;

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, ServiceError>;

    async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, ServiceError>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn record_payment(
        &self,
        owner_id: Uuid,
        payment: NewPayment,
        today: NaiveDate,
    ) -> Result<Payment, ServiceError> {
        let contract_id = payment.contract_id;

        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            // FOR SHARE keeps the contract and its review stable until commit.
            let contract = sqlx::query_as::<_, Contract>(
                r#"
                SELECT id, project_id, application_id, student_id, start_date, end_date
                FROM contracts
                WHERE id = $1
                FOR SHARE
                "#,
            )
            .bind(contract_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

            let project_owner: Uuid = sqlx::query_scalar("SELECT owner_id FROM projects WHERE id = $1")
                .bind(contract.project_id)
                .fetch_one(&mut *tx)
                .await?;

            if project_owner != owner_id {
                return Err(ServiceError::NotProjectOwner(owner_id, contract.project_id));
            }
            contract.ensure_completed()?;

            let reviewed: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE contract_id = $1)")
                    .bind(contract_id)
                    .fetch_one(&mut *tx)
                    .await?;

            if !reviewed {
                return Err(ServiceError::ReviewRequired(contract_id));
            }

            let payment = sqlx::query_as::<_, Payment>(
                r#"
                INSERT INTO payments (contract_id, amount, payment_date, status, payment_method)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, contract_id, amount, payment_date, status, payment_method, created_at
                "#,
            )
            .bind(contract_id)
            .bind(payment.amount)
            .bind(today)
            .bind(PAYMENT_STATUS_PAID)
            .bind(payment.payment_method)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, ServiceError>(payment)
        })
        .await
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, ServiceError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, contract_id, amount, payment_date, status, payment_method, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, ServiceError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, contract_id, amount, payment_date, status, payment_method, created_at
            FROM payments
            WHERE contract_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
