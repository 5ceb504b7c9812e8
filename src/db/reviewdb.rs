// db/reviewdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::{
    db::{is_unique_violation, DBClient},
    query_timeout::QueryTimeout,
};
use crate::{
    models::{contractmodel::*, projectmodel::Project},
    service::error::ServiceError,
};

#[async_trait]
pub trait ReviewExt {
    async fn create_review(&self, reviewer_id: Uuid, review: NewReview) -> Result<Review, ServiceError>;

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, ServiceError>;

    async fn get_contract_review(&self, contract_id: Uuid) -> Result<Option<Review>, ServiceError>;

    /// Average and count over reviews of contracts the student worked on.
    async fn get_rating_summary(&self, student_id: Uuid) -> Result<RatingSummary, ServiceError>;

    async fn get_received_reviews(&self, student_id: Uuid) -> Result<Vec<ReceivedReview>, ServiceError>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(&self, reviewer_id: Uuid, review: NewReview) -> Result<Review, ServiceError> {
        let contract_id = review.contract_id;

        QueryTimeout::run(self.transaction_timeout, async {
            let mut tx = self.begin().await?;

            let contract = sqlx::query_as::<_, Contract>(
                r#"
                SELECT id, project_id, application_id, student_id, start_date, end_date
                FROM contracts
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(contract_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

            let project = sqlx::query_as::<_, Project>(
                r#"
                SELECT id, owner_id, title, description, deadline, status, post_date, created_at
                FROM projects
                WHERE id = $1
                "#,
            )
            .bind(contract.project_id)
            .fetch_one(&mut *tx)
            .await?;

            project.ensure_owned_by(reviewer_id)?;
            contract.ensure_completed()?;

            let already_reviewed: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE contract_id = $1)")
                    .bind(contract_id)
                    .fetch_one(&mut *tx)
                    .await?;

            if already_reviewed {
                return Err(ServiceError::DuplicateReview(contract_id));
            }

            let review = sqlx::query_as::<_, Review>(
                r#"
                INSERT INTO reviews (contract_id, reviewer_id, rating, review_text)
                VALUES ($1, $2, $3, $4)
                RETURNING id, contract_id, reviewer_id, rating, review_text, created_at
                "#,
            )
            .bind(contract_id)
            .bind(reviewer_id)
            .bind(review.rating)
            .bind(review.review_text)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "reviews_contract_key") {
                    ServiceError::DuplicateReview(contract_id)
                } else {
                    e.into()
                }
            })?;

            tx.commit().await?;
            Ok::<_, ServiceError>(review)
        })
        .await
    }

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, ServiceError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, contract_id, reviewer_id, rating, review_text, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_contract_review(&self, contract_id: Uuid) -> Result<Option<Review>, ServiceError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, contract_id, reviewer_id, rating, review_text, created_at
            FROM reviews
            WHERE contract_id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_rating_summary(&self, student_id: Uuid) -> Result<RatingSummary, ServiceError> {
        let summary = sqlx::query_as::<_, RatingSummary>(
            r#"
            SELECT COALESCE(ROUND(AVG(r.rating)::numeric, 2), 0)::float8 AS average,
                   COUNT(r.id) AS count
            FROM reviews r
            JOIN contracts c ON c.id = r.contract_id
            WHERE c.student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn get_received_reviews(&self, student_id: Uuid) -> Result<Vec<ReceivedReview>, ServiceError> {
        let reviews = sqlx::query_as::<_, ReceivedReview>(
            r#"
            SELECT r.id AS review_id, c.id AS contract_id, p.title AS project_title,
                   r.rating, r.review_text, c.end_date
            FROM reviews r
            JOIN contracts c ON c.id = r.contract_id
            JOIN projects p ON p.id = c.project_id
            WHERE c.student_id = $1
            ORDER BY c.end_date DESC NULLS LAST, r.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
