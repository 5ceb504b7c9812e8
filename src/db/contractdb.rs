// db/contractdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{db::DBClient, query_timeout::QueryTimeout};
use crate::{
    models::{contractmodel::*, projectmodel::Project},
    service::error::ServiceError,
};

#[async_trait]
pub trait ContractExt {
    /// Sets `end_date` and completes the project in one transaction.
    async fn complete_contract(
        &self,
        owner_id: Uuid,
        contract_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError>;

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, ServiceError>;

    /// Contracts where the student is the accepted applicant.
    async fn get_freelancer_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError>;

    /// Contracts on projects the student owns.
    async fn get_owner_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError>;
}

#[async_trait]
impl ContractExt for DBClient {
    async fn complete_contract(
        &self,
        owner_id: Uuid,
        contract_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError> {
        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            let project_id: Uuid = sqlx::query_scalar("SELECT project_id FROM contracts WHERE id = $1")
                .bind(contract_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ServiceError::ContractNotFound(contract_id))?;

            let project = sqlx::query_as::<_, Project>(
                r#"
                SELECT id, owner_id, title, description, deadline, status, post_date, created_at
                FROM projects
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;

            let contract = sqlx::query_as::<_, Contract>(
                r#"
                SELECT id, project_id, application_id, student_id, start_date, end_date
                FROM contracts
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(contract_id)
            .fetch_one(&mut *tx)
            .await?;

            project.ensure_owned_by(owner_id)?;
            contract.ensure_active()?;
            project.ensure_in_progress()?;

            let contract = sqlx::query_as::<_, Contract>(
                r#"
                UPDATE contracts
                SET end_date = GREATEST($2::date, start_date)
                WHERE id = $1
                RETURNING id, project_id, application_id, student_id, start_date, end_date
                "#,
            )
            .bind(contract_id)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE projects
                SET status = 'completed'::project_status
                WHERE id = $1
                "#,
            )
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, ServiceError>(contract)
        })
        .await
    }

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, ServiceError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, project_id, application_id, student_id, start_date, end_date
            FROM contracts
            WHERE id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    async fn get_freelancer_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        let contracts = sqlx::query_as::<_, ContractView>(
            r#"
            SELECT c.id AS contract_id, p.id AS project_id, p.title AS project_title,
                   p.status AS project_status, o.id AS counterpart_id, o.name AS counterpart_name,
                   c.start_date, c.end_date
            FROM contracts c
            JOIN projects p ON p.id = c.project_id
            JOIN students o ON o.id = p.owner_id
            WHERE c.student_id = $1
            ORDER BY c.start_date DESC, p.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    async fn get_owner_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        let contracts = sqlx::query_as::<_, ContractView>(
            r#"
            SELECT c.id AS contract_id, p.id AS project_id, p.title AS project_title,
                   p.status AS project_status, f.id AS counterpart_id, f.name AS counterpart_name,
                   c.start_date, c.end_date
            FROM contracts c
            JOIN projects p ON p.id = c.project_id
            JOIN students f ON f.id = c.student_id
            WHERE p.owner_id = $1
            ORDER BY c.start_date DESC, p.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }
}
