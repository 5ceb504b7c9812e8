pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use service::{
    application_service::ApplicationService, auth_service::AuthService,
    contract_service::ContractService, dashboard_service::DashboardService,
    payment_service::PaymentService, project_service::ProjectService,
    review_service::ReviewService, skill_service::SkillService, Store,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub store: Store,
    // Services
    pub auth_service: Arc<AuthService>,
    pub project_service: Arc<ProjectService>,
    pub application_service: Arc<ApplicationService>,
    pub contract_service: Arc<ContractService>,
    pub review_service: Arc<ReviewService>,
    pub payment_service: Arc<PaymentService>,
    pub skill_service: Arc<SkillService>,
    pub dashboard_service: Arc<DashboardService>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            env: config,
            auth_service: Arc::new(AuthService::new(store.clone())),
            project_service: Arc::new(ProjectService::new(store.clone())),
            application_service: Arc::new(ApplicationService::new(store.clone())),
            contract_service: Arc::new(ContractService::new(store.clone())),
            review_service: Arc::new(ReviewService::new(store.clone())),
            payment_service: Arc::new(PaymentService::new(store.clone())),
            skill_service: Arc::new(SkillService::new(store.clone())),
            dashboard_service: Arc::new(DashboardService::new(store.clone())),
            store,
        }
    }
}
