// db/applicationdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{
    db::{is_unique_violation, DBClient},
    query_timeout::QueryTimeout,
};
use crate::{
    models::{contractmodel::Contract, projectmodel::*},
    service::error::ServiceError,
};

#[async_trait]
pub trait ApplicationExt {
    async fn create_application(
        &self,
        student_id: Uuid,
        project_id: Uuid,
        today: NaiveDate,
    ) -> Result<Application, ServiceError>;

    /// Accepts one application, rejects its pending siblings, opens the
    /// contract and moves the project to in progress, all or nothing.
    async fn accept_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError>;

    async fn reject_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
    ) -> Result<Application, ServiceError>;

    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>, ServiceError>;

    async fn get_pending_applications(&self, project_id: Uuid) -> Result<Vec<ApplicantView>, ServiceError>;

    async fn get_student_applications(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StudentApplicationView>, ServiceError>;
}

/// Locks the project that owns `application_id` and then the application
/// itself. The project lock comes first on every write path touching
/// applications, which keeps lock order consistent.
async fn lock_application(
    tx: &mut Transaction<'_, Postgres>,
    application_id: Uuid,
) -> Result<(Project, Application), ServiceError> {
    let project_id: Uuid = sqlx::query_scalar("SELECT project_id FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(ServiceError::ApplicationNotFound(application_id))?;

    let project = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, owner_id, title, description, deadline, status, post_date, created_at
        FROM projects
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(project_id)
    .fetch_one(&mut **tx)
    .await?;

    let application = sqlx::query_as::<_, Application>(
        r#"
        SELECT id, project_id, student_id, application_date, status, created_at
        FROM applications
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(application_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok((project, application))
}

#[async_trait]
impl ApplicationExt for DBClient {
    async fn create_application(
        &self,
        student_id: Uuid,
        project_id: Uuid,
        today: NaiveDate,
    ) -> Result<Application, ServiceError> {
        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            // FOR SHARE blocks a concurrent accept until this insert commits.
            let project = sqlx::query_as::<_, Project>(
                r#"
                SELECT id, owner_id, title, description, deadline, status, post_date, created_at
                FROM projects
                WHERE id = $1
                FOR SHARE
                "#,
            )
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

            if project.owner_id == student_id {
                return Err(ServiceError::SelfApplication(student_id));
            }
            project.ensure_open()?;

            let application = sqlx::query_as::<_, Application>(
                r#"
                INSERT INTO applications (project_id, student_id, application_date, status)
                VALUES ($1, $2, $3, 'pending'::application_status)
                RETURNING id, project_id, student_id, application_date, status, created_at
                "#,
            )
            .bind(project_id)
            .bind(student_id)
            .bind(today)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "applications_project_student_key") {
                    ServiceError::DuplicateApplication(project_id, student_id)
                } else {
                    e.into()
                }
            })?;

            tx.commit().await?;
            Ok::<_, ServiceError>(application)
        })
        .await
    }

    async fn accept_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError> {
        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            let (project, application) = lock_application(&mut tx, application_id).await?;

            project.ensure_owned_by(owner_id)?;
            application.ensure_pending()?;
            project.ensure_open()?;

            sqlx::query(
                r#"
                UPDATE applications
                SET status = 'accepted'::application_status
                WHERE id = $1
                "#,
            )
            .bind(application_id)
            .execute(&mut *tx)
            .await?;

            let rejected = sqlx::query(
                r#"
                UPDATE applications
                SET status = 'rejected'::application_status
                WHERE project_id = $1 AND id <> $2 AND status = 'pending'::application_status
                "#,
            )
            .bind(project.id)
            .bind(application_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            let contract = sqlx::query_as::<_, Contract>(
                r#"
                INSERT INTO contracts (project_id, application_id, student_id, start_date)
                VALUES ($1, $2, $3, $4)
                RETURNING id, project_id, application_id, student_id, start_date, end_date
                "#,
            )
            .bind(project.id)
            .bind(application_id)
            .bind(application.student_id)
            .bind(today)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "contracts_project_key")
                    || is_unique_violation(&e, "contracts_application_key")
                {
                    ServiceError::ApplicationAlreadyResolved(application_id, ApplicationStatus::Accepted)
                } else {
                    e.into()
                }
            })?;

            sqlx::query(
                r#"
                UPDATE projects
                SET status = 'in_progress'::project_status
                WHERE id = $1
                "#,
            )
            .bind(project.id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            tracing::debug!(
                "accepted application {} on project {}, rejected {} siblings",
                application_id,
                project.id,
                rejected
            );

            Ok::<_, ServiceError>(contract)
        })
        .await
    }

    async fn reject_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
    ) -> Result<Application, ServiceError> {
        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            let (project, application) = lock_application(&mut tx, application_id).await?;

            project.ensure_owned_by(owner_id)?;
            application.ensure_pending()?;

            let application = sqlx::query_as::<_, Application>(
                r#"
                UPDATE applications
                SET status = 'rejected'::application_status
                WHERE id = $1
                RETURNING id, project_id, student_id, application_date, status, created_at
                "#,
            )
            .bind(application_id)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, ServiceError>(application)
        })
        .await
    }

    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>, ServiceError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, project_id, student_id, application_date, status, created_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn get_pending_applications(&self, project_id: Uuid) -> Result<Vec<ApplicantView>, ServiceError> {
        let applicants = sqlx::query_as::<_, ApplicantView>(
            r#"
            SELECT a.id AS application_id, a.application_date, s.id AS student_id,
                   s.name AS applicant_name
            FROM applications a
            JOIN students s ON s.id = a.student_id
            WHERE a.project_id = $1 AND a.status = 'pending'::application_status
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applicants)
    }

    async fn get_student_applications(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StudentApplicationView>, ServiceError> {
        let applications = sqlx::query_as::<_, StudentApplicationView>(
            r#"
            SELECT a.id AS application_id, p.id AS project_id, p.title AS project_title,
                   a.status, a.application_date
            FROM applications a
            JOIN projects p ON p.id = a.project_id
            WHERE a.student_id = $1
            ORDER BY a.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }
}
