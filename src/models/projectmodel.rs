use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::error::ServiceError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::Open => "Open",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }

    /// Matches either the stored form ("in_progress") or the board label
    /// ("In Progress"), ignoring case.
    pub fn from_filter(value: &str) -> Option<ProjectStatus> {
        [ProjectStatus::Open, ProjectStatus::InProgress, ProjectStatus::Completed]
            .into_iter()
            .find(|status| value.eq_ignore_ascii_case(status.to_str()) || value.eq_ignore_ascii_case(status.label()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub post_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn ensure_owned_by(&self, student_id: Uuid) -> Result<(), ServiceError> {
        if self.owner_id != student_id {
            return Err(ServiceError::NotProjectOwner(student_id, self.id));
        }
        Ok(())
    }

    pub fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.status != ProjectStatus::Open {
            return Err(ServiceError::ProjectNotOpen(self.id, self.status));
        }
        Ok(())
    }

    pub fn ensure_in_progress(&self) -> Result<(), ServiceError> {
        if self.status != ProjectStatus::InProgress {
            return Err(ServiceError::ProjectNotInProgress(self.id, self.status));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
}

/// Search filter. `None` fields do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct ProjectSearch {
    pub keyword: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project_id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub post_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct OwnerProjectView {
    pub project_id: Uuid,
    pub title: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub post_date: NaiveDate,
    pub pending_applications: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Application {
    pub id: Uuid,
    pub project_id: Uuid,
    pub student_id: Uuid,
    pub application_date: NaiveDate,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl Application {
    pub fn ensure_pending(&self) -> Result<(), ServiceError> {
        if self.status != ApplicationStatus::Pending {
            return Err(ServiceError::ApplicationAlreadyResolved(self.id, self.status));
        }
        Ok(())
    }
}

/// A pending application as the project owner sees it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ApplicantView {
    pub application_id: Uuid,
    pub application_date: NaiveDate,
    pub student_id: Uuid,
    pub applicant_name: String,
}

/// An application as the applicant sees it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct StudentApplicationView {
    pub application_id: Uuid,
    pub project_id: Uuid,
    pub project_title: String,
    pub status: ApplicationStatus,
    pub application_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(status: ProjectStatus) -> Project {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        Project {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Landing page".to_string(),
            description: "Static site for the robotics club".to_string(),
            deadline: today + chrono::Duration::days(14),
            status,
            post_date: today,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ensure_open_reports_current_status() {
        let p = project(ProjectStatus::InProgress);
        match p.ensure_open() {
            Err(ServiceError::ProjectNotOpen(id, ProjectStatus::InProgress)) => assert_eq!(id, p.id),
            other => panic!("expected ProjectNotOpen, got {other:?}"),
        }
        assert!(project(ProjectStatus::Open).ensure_open().is_ok());
    }

    #[test]
    fn ensure_owned_by_rejects_other_students() {
        let p = project(ProjectStatus::Open);
        assert!(p.ensure_owned_by(p.owner_id).is_ok());
        assert!(matches!(
            p.ensure_owned_by(Uuid::new_v4()),
            Err(ServiceError::NotProjectOwner(_, _))
        ));
    }

    #[test]
    fn resolved_applications_are_not_pending() {
        let application = Application {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            application_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            status: ApplicationStatus::Rejected,
            created_at: Utc::now(),
        };
        assert!(matches!(
            application.ensure_pending(),
            Err(ServiceError::ApplicationAlreadyResolved(_, ApplicationStatus::Rejected))
        ));
    }

    #[test]
    fn status_labels_match_dashboard_wording() {
        assert_eq!(ProjectStatus::InProgress.label(), "In Progress");
        assert_eq!(ProjectStatus::InProgress.to_str(), "in_progress");
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn filter_accepts_labels_and_stored_names() {
        assert_eq!(ProjectStatus::from_filter("In Progress"), Some(ProjectStatus::InProgress));
        assert_eq!(ProjectStatus::from_filter("in_progress"), Some(ProjectStatus::InProgress));
        assert_eq!(ProjectStatus::from_filter("OPEN"), Some(ProjectStatus::Open));
        assert_eq!(ProjectStatus::from_filter("Completed"), Some(ProjectStatus::Completed));
        assert_eq!(ProjectStatus::from_filter("archived"), None);
    }
}
