// service/dashboard_service.rs
use serde::Serialize;
use uuid::Uuid;

use super::{error::ServiceError, Store};
use crate::models::{
    contractmodel::RatingSummary,
    projectmodel::{ProjectSummary, StudentApplicationView},
};

pub const DASHBOARD_FEED_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub projects_posted: i64,
    pub applications_submitted: i64,
    pub active_contracts: i64,
    pub rating: RatingSummary,
    pub recent_applications: Vec<StudentApplicationView>,
    pub open_projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_dashboard(&self, student_id: Uuid) -> Result<Dashboard, ServiceError> {
        self.store
            .get_student(student_id)
            .await?
            .ok_or(ServiceError::StudentNotFound(student_id))?;

        let counts = self.store.get_activity_counts(student_id).await?;
        let rating = self.store.get_rating_summary(student_id).await?;
        let recent_applications = self
            .store
            .get_student_applications(student_id, DASHBOARD_FEED_LIMIT)
            .await?;
        let open_projects = self
            .store
            .get_open_projects_for(student_id, DASHBOARD_FEED_LIMIT)
            .await?;

        Ok(Dashboard {
            projects_posted: counts.projects_posted,
            applications_submitted: counts.applications_submitted,
            active_contracts: counts.active_contracts,
            rating,
            recent_applications,
            open_projects,
        })
    }
}
