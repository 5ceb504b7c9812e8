use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::projectmodel::{ProjectSearch, ProjectStatus},
    service::error::ServiceError,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"))]
    pub description: String,

    pub deadline: NaiveDate,
}

/// Query string of the project board. `status=all` or an empty value means
/// no status filter; the board labels ("In Progress") are accepted too.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchProjectsQuery {
    pub keyword: Option<String>,
    pub status: Option<String>,
}

impl SearchProjectsQuery {
    pub fn into_search(self) -> Result<ProjectSearch, ServiceError> {
        let status = match self.status.as_deref().map(str::trim) {
            None => None,
            Some(value) if value.is_empty() || value.eq_ignore_ascii_case("all") => None,
            Some(value) => Some(ProjectStatus::from_filter(value).ok_or_else(|| {
                ServiceError::Validation(format!("Unknown project status filter: {}", value))
            })?),
        };

        Ok(ProjectSearch {
            keyword: self.keyword,
            status,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct LimitQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}
