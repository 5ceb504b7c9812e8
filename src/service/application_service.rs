// service/application_service.rs
use uuid::Uuid;

use super::{error::ServiceError, today, Store};
use crate::models::{contractmodel::Contract, projectmodel::*};

pub const RECENT_APPLICATIONS_LIMIT: i64 = 20;

#[derive(Debug, Clone)]
pub struct ApplicationService {
    store: Store,
}

impl ApplicationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_application(&self, actor: Uuid, project_id: Uuid) -> Result<Application, ServiceError> {
        let application = self
            .store
            .create_application(actor, project_id, today())
            .await
            .map_err(|e| {
                tracing::debug!("student {} could not apply to {}: {}", actor, project_id, e);
                e
            })?;

        tracing::info!(
            "student {} applied to project {} (application {})",
            actor,
            project_id,
            application.id
        );
        Ok(application)
    }

    /// Accepts one application and turns the project into a contract. Every
    /// other pending application of the project is rejected in the same step.
    pub async fn accept_application(&self, actor: Uuid, application_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self
            .store
            .accept_application(actor, application_id, today())
            .await
            .map_err(|e| {
                tracing::warn!("accept of application {} failed: {}", application_id, e);
                e
            })?;

        tracing::info!(
            "application {} accepted, contract {} opened on project {}",
            application_id,
            contract.id,
            contract.project_id
        );
        Ok(contract)
    }

    pub async fn reject_application(&self, actor: Uuid, application_id: Uuid) -> Result<Application, ServiceError> {
        let application = self.store.reject_application(actor, application_id).await?;

        tracing::info!("application {} is now {}", application_id, application.status.to_str());
        Ok(application)
    }

    pub async fn get_application(&self, application_id: Uuid) -> Result<Application, ServiceError> {
        self.store
            .get_application(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))
    }

    /// Pending applicants of a project, visible to its owner only.
    pub async fn get_pending_applications(
        &self,
        actor: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<ApplicantView>, ServiceError> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;
        project.ensure_owned_by(actor)?;

        self.store.get_pending_applications(project_id).await
    }

    pub async fn get_student_applications(
        &self,
        student_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<StudentApplicationView>, ServiceError> {
        let limit = limit.unwrap_or(RECENT_APPLICATIONS_LIMIT);
        self.store.get_student_applications(student_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        error::ErrorKind,
        test_support::{memory_store, project, student},
    };

    #[tokio::test]
    async fn accept_rejects_the_other_applicants() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let anu = student(&store, "Anu").await;
        let bala = student(&store, "Bala").await;
        let project_id = project(&store, owner, "Timetable bot").await;
        let service = ApplicationService::new(store.clone());

        let first = service.create_application(anu, project_id).await.unwrap();
        let second = service.create_application(bala, project_id).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);
        assert_eq!(first.application_date, today());

        let pending = service.get_pending_applications(owner, project_id).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].applicant_name, "Anu");

        let contract = service.accept_application(owner, first.id).await.unwrap();
        assert_eq!(contract.student_id, anu);
        assert_eq!(contract.project_id, project_id);
        assert_eq!(contract.application_id, first.id);
        assert_eq!(contract.start_date, today());
        assert_eq!(contract.end_date, None);

        assert_eq!(
            service.get_application(first.id).await.unwrap().status,
            ApplicationStatus::Accepted
        );
        assert_eq!(
            service.get_application(second.id).await.unwrap().status,
            ApplicationStatus::Rejected
        );
        assert_eq!(
            store.get_project(project_id).await.unwrap().unwrap().status,
            ProjectStatus::InProgress
        );
        assert!(service.get_pending_applications(owner, project_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cannot_apply_to_own_project() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let project_id = project(&store, owner, "Poster").await;
        let service = ApplicationService::new(store);

        let err = service.create_application(owner, project_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::SelfApplication(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn duplicate_and_closed_applications_fail() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let anu = student(&store, "Anu").await;
        let bala = student(&store, "Bala").await;
        let project_id = project(&store, owner, "Poster").await;
        let service = ApplicationService::new(store);

        let first = service.create_application(anu, project_id).await.unwrap();
        let err = service.create_application(anu, project_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        service.accept_application(owner, first.id).await.unwrap();
        let err = service.create_application(bala, project_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::ProjectNotOpen(_, ProjectStatus::InProgress)));
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);

        let err = service.create_application(bala, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn only_the_owner_resolves_applications() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let anu = student(&store, "Anu").await;
        let project_id = project(&store, owner, "Poster").await;
        let service = ApplicationService::new(store);

        let application = service.create_application(anu, project_id).await.unwrap();

        let err = service.accept_application(anu, application.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = service.reject_application(anu, application.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = service.get_pending_applications(anu, project_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let rejected = service.reject_application(owner, application.id).await.unwrap();
        assert_eq!(rejected.status, ApplicationStatus::Rejected);

        let err = service.accept_application(owner, application.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ApplicationAlreadyResolved(_, ApplicationStatus::Rejected)
        ));
    }

    #[tokio::test]
    async fn reject_leaves_the_project_open() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let anu = student(&store, "Anu").await;
        let project_id = project(&store, owner, "Poster").await;
        let service = ApplicationService::new(store.clone());

        let application = service.create_application(anu, project_id).await.unwrap();
        service.reject_application(owner, application.id).await.unwrap();

        assert_eq!(
            store.get_project(project_id).await.unwrap().unwrap().status,
            ProjectStatus::Open
        );
        let mine = service.get_student_applications(anu, None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].project_title, "Poster");
        assert_eq!(mine[0].status, ApplicationStatus::Rejected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_accepts_produce_one_contract() {
        let store = memory_store();
        let owner = student(&store, "Owner").await;
        let anu = student(&store, "Anu").await;
        let bala = student(&store, "Bala").await;
        let project_id = project(&store, owner, "Race").await;
        let service = ApplicationService::new(store.clone());

        let first = service.create_application(anu, project_id).await.unwrap();
        let second = service.create_application(bala, project_id).await.unwrap();

        let mut handles = Vec::new();
        for application_id in [first.id, second.id] {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.accept_application(owner, application_id).await
            }));
        }

        let mut contracts = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => contracts += 1,
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::Conflict);
                    conflicts += 1;
                }
            }
        }

        assert_eq!((contracts, conflicts), (1, 1));
        assert_eq!(store.get_owner_contracts(owner).await.unwrap().len(), 1);
    }
}
