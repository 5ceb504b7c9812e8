use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use validator::Validate;

pub const DEFAULT_PAYMENT_METHOD: &str = "UPI";

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

// Rating bounds are enforced by the review service so the error keeps its kind.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub rating: i32,

    #[validate(length(max = 2000, message = "Review must not exceed 2000 characters"))]
    #[serde(default)]
    pub review_text: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordPaymentDto {
    pub amount: BigDecimal,

    #[validate(length(max = 50, message = "Payment method must not exceed 50 characters"))]
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}
