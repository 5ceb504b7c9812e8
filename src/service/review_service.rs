// service/review_service.rs
use uuid::Uuid;

use super::{error::ServiceError, Store};
use crate::models::contractmodel::*;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone)]
pub struct ReviewService {
    store: Store,
}

impl ReviewService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_review(
        &self,
        actor: Uuid,
        contract_id: Uuid,
        rating: i32,
        review_text: &str,
    ) -> Result<Review, ServiceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ServiceError::InvalidRating(rating));
        }

        let review = self
            .store
            .create_review(
                actor,
                NewReview {
                    contract_id,
                    rating,
                    review_text: review_text.trim().to_string(),
                },
            )
            .await?;

        tracing::info!("contract {} reviewed with rating {}", contract_id, rating);
        Ok(review)
    }

    pub async fn get_review(&self, review_id: Uuid) -> Result<Review, ServiceError> {
        self.store
            .get_review(review_id)
            .await?
            .ok_or(ServiceError::ReviewNotFound(review_id))
    }

    pub async fn get_contract_review(&self, contract_id: Uuid) -> Result<Option<Review>, ServiceError> {
        self.store.get_contract_review(contract_id).await
    }

    pub async fn get_rating_summary(&self, student_id: Uuid) -> Result<RatingSummary, ServiceError> {
        self.store.get_rating_summary(student_id).await
    }

    pub async fn get_average_rating(&self, student_id: Uuid) -> Result<f64, ServiceError> {
        Ok(self.get_rating_summary(student_id).await?.average)
    }

    pub async fn get_review_count(&self, student_id: Uuid) -> Result<i64, ServiceError> {
        Ok(self.get_rating_summary(student_id).await?.count)
    }

    pub async fn get_received_reviews(&self, student_id: Uuid) -> Result<Vec<ReceivedReview>, ServiceError> {
        self.store.get_received_reviews(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        error::ErrorKind,
        test_support::{memory_store, project, student},
        today,
    };

    /// Creates a completed contract for `freelancer` on a fresh project of `owner`.
    async fn completed_contract(store: &crate::service::Store, owner: Uuid, freelancer: Uuid, title: &str) -> Uuid {
        let project_id = project(store, owner, title).await;
        let application = store.create_application(freelancer, project_id, today()).await.unwrap();
        let contract = store.accept_application(owner, application.id, today()).await.unwrap();
        store.complete_contract(owner, contract.id, today()).await.unwrap();
        contract.id
    }

    #[tokio::test]
    async fn ratings_average_over_freelancer_contracts() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let freelancer = student(&store, "Freelancer").await;
        let service = ReviewService::new(store.clone());

        assert_eq!(service.get_average_rating(freelancer).await.unwrap(), 0.0);
        assert_eq!(service.get_review_count(freelancer).await.unwrap(), 0);

        for (title, rating) in [("One", 5), ("Two", 3), ("Three", 4)] {
            let contract_id = completed_contract(&store, owner, freelancer, title).await;
            service.create_review(owner, contract_id, rating, "ok").await.unwrap();
        }

        assert_eq!(service.get_average_rating(freelancer).await.unwrap(), 4.0);
        assert_eq!(service.get_review_count(freelancer).await.unwrap(), 3);

        // reviews written by the owner do not count towards the owner's rating
        assert_eq!(service.get_review_count(owner).await.unwrap(), 0);

        let received = service.get_received_reviews(freelancer).await.unwrap();
        assert_eq!(received.len(), 3);
    }

    #[tokio::test]
    async fn rating_bounds_are_validated() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let freelancer = student(&store, "Freelancer").await;
        let contract_id = completed_contract(&store, owner, freelancer, "Bounds").await;
        let service = ReviewService::new(store);

        for rating in [0, 6, -1] {
            let err = service.create_review(owner, contract_id, rating, "").await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidRating(r) if r == rating));
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(service.get_contract_review(contract_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn one_review_per_completed_contract() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let freelancer = student(&store, "Freelancer").await;
        let project_id = project(&store, owner, "Pending").await;
        let application = store.create_application(freelancer, project_id, today()).await.unwrap();
        let contract = store.accept_application(owner, application.id, today()).await.unwrap();
        let service = ReviewService::new(store.clone());

        let err = service.create_review(owner, contract.id, 4, "early").await.unwrap_err();
        assert!(matches!(err, ServiceError::ContractNotCompleted(_)));
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);

        store.complete_contract(owner, contract.id, today()).await.unwrap();

        let err = service.create_review(freelancer, contract.id, 4, "self").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let review = service.create_review(owner, contract.id, 4, " Great work ").await.unwrap();
        assert_eq!(review.review_text, "Great work");
        assert_eq!(review.reviewer_id, owner);
        assert_eq!(service.get_review(review.id).await.unwrap(), review);

        let err = service.create_review(owner, contract.id, 5, "again").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateReview(_)));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
