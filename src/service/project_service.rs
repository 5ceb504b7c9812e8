// service/project_service.rs
use uuid::Uuid;

use super::{error::ServiceError, today, Store};
use crate::models::projectmodel::*;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5000;

#[derive(Debug, Clone)]
pub struct ProjectService {
    store: Store,
}

impl ProjectService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_project(&self, actor: Uuid, project: NewProject) -> Result<Project, ServiceError> {
        let today = today();
        let title = project.title.trim().to_string();
        let description = project.description.trim().to_string();

        check_length("Title", &title, MAX_TITLE_LENGTH)?;
        check_length("Description", &description, MAX_DESCRIPTION_LENGTH)?;

        if project.deadline <= today {
            return Err(ServiceError::InvalidDeadline(project.deadline));
        }

        let project = self
            .store
            .create_project(
                actor,
                NewProject {
                    title,
                    description,
                    deadline: project.deadline,
                },
                today,
            )
            .await?;

        tracing::info!("student {} posted project {}", actor, project.id);
        Ok(project)
    }

    pub async fn get_project(&self, project_id: Uuid) -> Result<Project, ServiceError> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))
    }

    /// A blank keyword behaves like no keyword.
    pub async fn search_projects(&self, search: ProjectSearch) -> Result<Vec<ProjectSummary>, ServiceError> {
        let keyword = search
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        self.store
            .search_projects(ProjectSearch {
                keyword,
                status: search.status,
            })
            .await
    }

    pub async fn get_owner_projects(&self, owner_id: Uuid) -> Result<Vec<OwnerProjectView>, ServiceError> {
        self.store.get_owner_projects(owner_id).await
    }

    pub async fn count_pending_applications(&self, project_id: Uuid) -> Result<i64, ServiceError> {
        self.store.count_pending_applications(project_id).await
    }

    pub async fn get_open_projects_for(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        self.store.get_open_projects_for(student_id, limit).await
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    let length = value.chars().count();
    if length == 0 || length > max {
        return Err(ServiceError::Validation(format!(
            "{} must be between 1 and {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::service::test_support::{memory_store, next_week, project, student};

    fn new_project(title: &str, description: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: description.to_string(),
            deadline: next_week(),
        }
    }

    #[tokio::test]
    async fn created_project_reads_back() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let service = ProjectService::new(store);

        let created = service
            .create_project(owner, new_project("  Build a website ", "Landing page for the fest"))
            .await
            .unwrap();

        assert_eq!(created.title, "Build a website");
        assert_eq!(created.status, ProjectStatus::Open);
        assert_eq!(created.post_date, today());
        assert_eq!(service.get_project(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn deadline_must_be_in_the_future() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let service = ProjectService::new(store);

        for deadline in [today(), today() - Duration::days(1)] {
            let mut project = new_project("Logo", "Design a club logo");
            project.deadline = deadline;
            let err = service.create_project(owner, project).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidDeadline(d) if d == deadline));
        }
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let service = ProjectService::new(store);

        let err = service
            .create_project(owner, new_project("   ", "Something"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .create_project(owner, new_project(&"t".repeat(201), "Something"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn search_by_keyword_and_status() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let freelancer = student(&store, "Freelancer").await;
        let website = project(&store, owner, "Website redesign").await;
        let _poster = project(&store, owner, "Fest poster").await;
        let percent = project(&store, owner, "100% coverage").await;

        let application = store
            .create_application(freelancer, website, today())
            .await
            .unwrap();
        store.accept_application(owner, application.id, today()).await.unwrap();

        let service = ProjectService::new(store);

        let all = service.search_projects(ProjectSearch::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        // newest first
        assert_eq!(all[0].project_id, percent);
        assert_eq!(all[0].owner_name, "Owner");

        let web = service
            .search_projects(ProjectSearch {
                keyword: Some("WEBSITE".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].status, ProjectStatus::InProgress);

        let open_web = service
            .search_projects(ProjectSearch {
                keyword: Some("website".to_string()),
                status: Some(ProjectStatus::Open),
            })
            .await
            .unwrap();
        assert!(open_web.is_empty());

        let blank = service
            .search_projects(ProjectSearch {
                keyword: Some("   ".to_string()),
                status: Some(ProjectStatus::Open),
            })
            .await
            .unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[tokio::test]
    async fn owner_views_count_pending_applications() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let a = student(&store, "Anu").await;
        let b = student(&store, "Bala").await;
        let project_id = project(&store, owner, "Survey app").await;

        store.create_application(a, project_id, today()).await.unwrap();
        let second = store.create_application(b, project_id, today()).await.unwrap();
        store.reject_application(owner, second.id).await.unwrap();

        let service = ProjectService::new(store.clone());

        assert_eq!(service.count_pending_applications(project_id).await.unwrap(), 1);
        let mine = service.get_owner_projects(owner).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].pending_applications, 1);

        let feed = service.get_open_projects_for(a, 5).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert!(service.get_open_projects_for(owner, 5).await.unwrap().is_empty());
        assert!(store.get_freelancer_contracts(a).await.unwrap().is_empty());
    }
}
