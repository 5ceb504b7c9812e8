pub mod application_service;
pub mod auth_service;
pub mod contract_service;
pub mod dashboard_service;
pub mod error;
pub mod payment_service;
pub mod project_service;
pub mod review_service;
pub mod skill_service;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::db::MarketplaceStore;

pub type Store = Arc<dyn MarketplaceStore>;

/// Calendar date used for post, application, contract and payment dates.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
