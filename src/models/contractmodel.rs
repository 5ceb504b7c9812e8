use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::models::projectmodel::ProjectStatus;
use crate::service::error::ServiceError;

pub const PAYMENT_STATUS_PAID: &str = "Paid";

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Contract {
    pub id: Uuid,
    pub project_id: Uuid,
    pub application_id: Uuid,
    pub student_id: Uuid, // the accepted applicant
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    pub fn is_completed(&self) -> bool {
        self.end_date.is_some()
    }

    pub fn ensure_active(&self) -> Result<(), ServiceError> {
        if self.is_completed() {
            return Err(ServiceError::ContractAlreadyCompleted(self.id));
        }
        Ok(())
    }

    pub fn ensure_completed(&self) -> Result<(), ServiceError> {
        if !self.is_completed() {
            return Err(ServiceError::ContractNotCompleted(self.id));
        }
        Ok(())
    }
}

/// Contract joined with its project and the student on the other side.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ContractView {
    pub contract_id: Uuid,
    pub project_id: Uuid,
    pub project_title: String,
    pub project_status: ProjectStatus,
    pub counterpart_id: Uuid,
    pub counterpart_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub contract_id: Uuid,
    pub rating: i32,
    pub review_text: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ReceivedReview {
    pub review_id: Uuid,
    pub contract_id: Uuid,
    pub project_title: String,
    pub rating: i32,
    pub review_text: String,
    pub end_date: Option<NaiveDate>,
}

/// Average and count over one review set, so the two never disagree.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), r| (sum + r as i64, count + 1));

        if count == 0 {
            return RatingSummary::default();
        }

        RatingSummary {
            average: round_to_cents(sum as f64 / count as f64),
            count,
        }
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub amount: BigDecimal,
    pub payment_date: NaiveDate,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub contract_id: Uuid,
    pub amount: BigDecimal,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_summary_of_mixed_reviews() {
        let summary = RatingSummary::from_ratings([5, 3, 4]);
        assert_eq!(summary.average, 4.0);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn rating_summary_without_reviews_is_zero() {
        let summary = RatingSummary::from_ratings(Vec::new());
        assert_eq!(summary, RatingSummary { average: 0.0, count: 0 });
    }

    #[test]
    fn averages_round_to_two_decimals() {
        assert_eq!(RatingSummary::from_ratings([5, 4, 4]).average, 4.33);
        assert_eq!(RatingSummary::from_ratings([5, 5, 4]).average, 4.67);
        assert_eq!(round_to_cents(3.14159), 3.14);
    }

    #[test]
    fn completion_guards() {
        let mut contract = Contract {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: None,
        };
        assert!(contract.ensure_active().is_ok());
        assert!(matches!(
            contract.ensure_completed(),
            Err(ServiceError::ContractNotCompleted(_))
        ));

        contract.end_date = NaiveDate::from_ymd_opt(2026, 4, 20);
        assert!(contract.ensure_completed().is_ok());
        assert!(matches!(
            contract.ensure_active(),
            Err(ServiceError::ContractAlreadyCompleted(_))
        ));
    }
}
