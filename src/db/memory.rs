// db/memory.rs
//! In-process store used for local demos and the test suite. Every operation
//! holds one async mutex, so each call is serializable by construction.
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    applicationdb::ApplicationExt, contractdb::ContractExt, paymentdb::PaymentExt,
    projectdb::ProjectExt, reviewdb::ReviewExt, skilldb::SkillExt, studentdb::StudentExt,
};
use crate::{
    models::{contractmodel::*, projectmodel::*, studentmodel::*},
    service::error::ServiceError,
};

#[derive(Debug, Default)]
struct MemoryState {
    students: Vec<Student>,
    skills: Vec<Skill>,
    student_skills: Vec<StudentSkill>,
    projects: Vec<Project>,
    applications: Vec<Application>,
    contracts: Vec<Contract>,
    reviews: Vec<Review>,
    payments: Vec<Payment>,
}

impl MemoryState {
    fn student(&self, id: Uuid) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    fn student_name(&self, id: Uuid) -> String {
        self.student(id).map(|s| s.name.clone()).unwrap_or_default()
    }

    fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    fn application(&self, id: Uuid) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    fn contract(&self, id: Uuid) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    fn has_review(&self, contract_id: Uuid) -> bool {
        self.reviews.iter().any(|r| r.contract_id == contract_id)
    }

    fn summarize(&self, project: &Project) -> ProjectSummary {
        ProjectSummary {
            project_id: project.id,
            owner_id: project.owner_id,
            owner_name: self.student_name(project.owner_id),
            title: project.title.clone(),
            description: project.description.clone(),
            deadline: project.deadline,
            status: project.status,
            post_date: project.post_date,
        }
    }

    /// Projects newest first: post date descending, later inserts first.
    fn projects_newest_first(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().rev().collect();
        projects.sort_by(|a, b| b.post_date.cmp(&a.post_date));
        projects
    }

    fn contract_view(&self, contract: &Contract, counterpart_id: Uuid) -> Option<ContractView> {
        let project = self.project(contract.project_id)?;
        Some(ContractView {
            contract_id: contract.id,
            project_id: project.id,
            project_title: project.title.clone(),
            project_status: project.status,
            counterpart_id,
            counterpart_name: self.student_name(counterpart_id),
            start_date: contract.start_date,
            end_date: contract.end_date,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_keyword(project: &Project, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    project.title.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
}

#[async_trait]
impl StudentExt for MemoryStore {
    async fn save_student(&self, student: NewStudent) -> Result<Student, ServiceError> {
        let mut state = self.state.lock().await;

        if state.students.iter().any(|s| s.email == student.email) {
            return Err(ServiceError::EmailAlreadyRegistered(student.email));
        }

        let student = Student {
            id: Uuid::new_v4(),
            name: student.name,
            email: student.email,
            password: student.password,
            phone_number: student.phone_number,
            department: student.department,
            year_of_study: student.year_of_study,
            created_at: Utc::now(),
        };
        state.students.push(student.clone());
        Ok(student)
    }

    async fn get_student(&self, student_id: Uuid) -> Result<Option<Student>, ServiceError> {
        Ok(self.state.lock().await.student(student_id).cloned())
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.students.iter().find(|s| s.email == email).cloned())
    }

    async fn get_activity_counts(&self, student_id: Uuid) -> Result<ActivityCounts, ServiceError> {
        let state = self.state.lock().await;
        Ok(ActivityCounts {
            projects_posted: state.projects.iter().filter(|p| p.owner_id == student_id).count() as i64,
            applications_submitted: state
                .applications
                .iter()
                .filter(|a| a.student_id == student_id)
                .count() as i64,
            active_contracts: state
                .contracts
                .iter()
                .filter(|c| c.student_id == student_id && c.end_date.is_none())
                .count() as i64,
        })
    }
}

#[async_trait]
impl ProjectExt for MemoryStore {
    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
        today: NaiveDate,
    ) -> Result<Project, ServiceError> {
        let mut state = self.state.lock().await;

        if state.student(owner_id).is_none() {
            return Err(ServiceError::StudentNotFound(owner_id));
        }

        let project = Project {
            id: Uuid::new_v4(),
            owner_id,
            title: project.title,
            description: project.description,
            deadline: project.deadline,
            status: ProjectStatus::Open,
            post_date: today,
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, ServiceError> {
        Ok(self.state.lock().await.project(project_id).cloned())
    }

    async fn search_projects(&self, search: ProjectSearch) -> Result<Vec<ProjectSummary>, ServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .projects_newest_first()
            .into_iter()
            .filter(|p| search.status.map_or(true, |status| p.status == status))
            .filter(|p| {
                search
                    .keyword
                    .as_deref()
                    .map_or(true, |keyword| matches_keyword(p, keyword))
            })
            .map(|p| state.summarize(p))
            .collect())
    }

    async fn get_owner_projects(&self, owner_id: Uuid) -> Result<Vec<OwnerProjectView>, ServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .projects_newest_first()
            .into_iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| OwnerProjectView {
                project_id: p.id,
                title: p.title.clone(),
                deadline: p.deadline,
                status: p.status,
                post_date: p.post_date,
                pending_applications: state
                    .applications
                    .iter()
                    .filter(|a| a.project_id == p.id && a.status == ApplicationStatus::Pending)
                    .count() as i64,
            })
            .collect())
    }

    async fn get_open_projects_for(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .projects_newest_first()
            .into_iter()
            .filter(|p| p.status == ProjectStatus::Open && p.owner_id != student_id)
            .take(limit.max(0) as usize)
            .map(|p| state.summarize(p))
            .collect())
    }

    async fn count_pending_applications(&self, project_id: Uuid) -> Result<i64, ServiceError> {
        let state = self.state.lock().await;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.project_id == project_id && a.status == ApplicationStatus::Pending)
            .count() as i64)
    }
}

#[async_trait]
impl ApplicationExt for MemoryStore {
    async fn create_application(
        &self,
        student_id: Uuid,
        project_id: Uuid,
        today: NaiveDate,
    ) -> Result<Application, ServiceError> {
        let mut state = self.state.lock().await;

        let project = state
            .project(project_id)
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

        if project.owner_id == student_id {
            return Err(ServiceError::SelfApplication(student_id));
        }
        project.ensure_open()?;

        if state
            .applications
            .iter()
            .any(|a| a.project_id == project_id && a.student_id == student_id)
        {
            return Err(ServiceError::DuplicateApplication(project_id, student_id));
        }

        let application = Application {
            id: Uuid::new_v4(),
            project_id,
            student_id,
            application_date: today,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };
        state.applications.push(application.clone());
        Ok(application)
    }

    async fn accept_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError> {
        let mut state = self.state.lock().await;

        let application = state
            .application(application_id)
            .cloned()
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;
        let project = state
            .project(application.project_id)
            .cloned()
            .ok_or(ServiceError::ProjectNotFound(application.project_id))?;

        project.ensure_owned_by(owner_id)?;
        application.ensure_pending()?;
        project.ensure_open()?;

        if state.contracts.iter().any(|c| c.project_id == project.id) {
            return Err(ServiceError::ApplicationAlreadyResolved(
                application_id,
                ApplicationStatus::Accepted,
            ));
        }

        for sibling in state
            .applications
            .iter_mut()
            .filter(|a| a.project_id == project.id)
        {
            if sibling.id == application_id {
                sibling.status = ApplicationStatus::Accepted;
            } else if sibling.status == ApplicationStatus::Pending {
                sibling.status = ApplicationStatus::Rejected;
            }
        }

        let contract = Contract {
            id: Uuid::new_v4(),
            project_id: project.id,
            application_id,
            student_id: application.student_id,
            start_date: today,
            end_date: None,
        };
        state.contracts.push(contract.clone());

        if let Some(p) = state.project_mut(project.id) {
            p.status = ProjectStatus::InProgress;
        }

        Ok(contract)
    }

    async fn reject_application(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
    ) -> Result<Application, ServiceError> {
        let mut state = self.state.lock().await;

        let application = state
            .application(application_id)
            .cloned()
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;
        let project = state
            .project(application.project_id)
            .ok_or(ServiceError::ProjectNotFound(application.project_id))?;

        project.ensure_owned_by(owner_id)?;
        application.ensure_pending()?;

        let stored = state
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;
        stored.status = ApplicationStatus::Rejected;

        Ok(stored.clone())
    }

    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>, ServiceError> {
        Ok(self.state.lock().await.application(application_id).cloned())
    }

    async fn get_pending_applications(&self, project_id: Uuid) -> Result<Vec<ApplicantView>, ServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .applications
            .iter()
            .filter(|a| a.project_id == project_id && a.status == ApplicationStatus::Pending)
            .map(|a| ApplicantView {
                application_id: a.id,
                application_date: a.application_date,
                student_id: a.student_id,
                applicant_name: state.student_name(a.student_id),
            })
            .collect())
    }

    async fn get_student_applications(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StudentApplicationView>, ServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|a| a.student_id == student_id)
            .take(limit.max(0) as usize)
            .filter_map(|a| {
                let project = state.project(a.project_id)?;
                Some(StudentApplicationView {
                    application_id: a.id,
                    project_id: project.id,
                    project_title: project.title.clone(),
                    status: a.status,
                    application_date: a.application_date,
                })
            })
            .collect())
    }
}

#[async_trait]
impl ContractExt for MemoryStore {
    async fn complete_contract(
        &self,
        owner_id: Uuid,
        contract_id: Uuid,
        today: NaiveDate,
    ) -> Result<Contract, ServiceError> {
        let mut state = self.state.lock().await;

        let contract = state
            .contract(contract_id)
            .cloned()
            .ok_or(ServiceError::ContractNotFound(contract_id))?;
        let project = state
            .project(contract.project_id)
            .ok_or(ServiceError::ProjectNotFound(contract.project_id))?;

        project.ensure_owned_by(owner_id)?;
        contract.ensure_active()?;
        project.ensure_in_progress()?;

        let project_id = project.id;
        if let Some(p) = state.project_mut(project_id) {
            p.status = ProjectStatus::Completed;
        }

        let stored = state
            .contracts
            .iter_mut()
            .find(|c| c.id == contract_id)
            .ok_or(ServiceError::ContractNotFound(contract_id))?;
        stored.end_date = Some(today.max(stored.start_date));

        Ok(stored.clone())
    }

    async fn get_contract(&self, contract_id: Uuid) -> Result<Option<Contract>, ServiceError> {
        Ok(self.state.lock().await.contract(contract_id).cloned())
    }

    async fn get_freelancer_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        let state = self.state.lock().await;

        let mut views: Vec<ContractView> = state
            .contracts
            .iter()
            .rev()
            .filter(|c| c.student_id == student_id)
            .filter_map(|c| {
                let owner_id = state.project(c.project_id)?.owner_id;
                state.contract_view(c, owner_id)
            })
            .collect();
        views.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(views)
    }

    async fn get_owner_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        let state = self.state.lock().await;

        let mut views: Vec<ContractView> = state
            .contracts
            .iter()
            .rev()
            .filter(|c| {
                state
                    .project(c.project_id)
                    .map_or(false, |p| p.owner_id == student_id)
            })
            .filter_map(|c| state.contract_view(c, c.student_id))
            .collect();
        views.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(views)
    }
}

#[async_trait]
impl ReviewExt for MemoryStore {
    async fn create_review(&self, reviewer_id: Uuid, review: NewReview) -> Result<Review, ServiceError> {
        let mut state = self.state.lock().await;

        let contract = state
            .contract(review.contract_id)
            .ok_or(ServiceError::ContractNotFound(review.contract_id))?;
        let project = state
            .project(contract.project_id)
            .ok_or(ServiceError::ProjectNotFound(contract.project_id))?;

        project.ensure_owned_by(reviewer_id)?;
        contract.ensure_completed()?;

        if state.has_review(review.contract_id) {
            return Err(ServiceError::DuplicateReview(review.contract_id));
        }

        let review = Review {
            id: Uuid::new_v4(),
            contract_id: review.contract_id,
            reviewer_id,
            rating: review.rating,
            review_text: review.review_text,
            created_at: Utc::now(),
        };
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.reviews.iter().find(|r| r.id == review_id).cloned())
    }

    async fn get_contract_review(&self, contract_id: Uuid) -> Result<Option<Review>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.reviews.iter().find(|r| r.contract_id == contract_id).cloned())
    }

    async fn get_rating_summary(&self, student_id: Uuid) -> Result<RatingSummary, ServiceError> {
        let state = self.state.lock().await;

        let ratings = state.reviews.iter().filter_map(|r| {
            let contract = state.contract(r.contract_id)?;
            (contract.student_id == student_id).then_some(r.rating)
        });

        Ok(RatingSummary::from_ratings(ratings))
    }

    async fn get_received_reviews(&self, student_id: Uuid) -> Result<Vec<ReceivedReview>, ServiceError> {
        let state = self.state.lock().await;

        let mut reviews: Vec<ReceivedReview> = state
            .reviews
            .iter()
            .rev()
            .filter_map(|r| {
                let contract = state.contract(r.contract_id)?;
                if contract.student_id != student_id {
                    return None;
                }
                let project = state.project(contract.project_id)?;
                Some(ReceivedReview {
                    review_id: r.id,
                    contract_id: contract.id,
                    project_title: project.title.clone(),
                    rating: r.rating,
                    review_text: r.review_text.clone(),
                    end_date: contract.end_date,
                })
            })
            .collect();
        reviews.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        Ok(reviews)
    }
}

#[async_trait]
impl PaymentExt for MemoryStore {
    async fn record_payment(
        &self,
        owner_id: Uuid,
        payment: NewPayment,
        today: NaiveDate,
    ) -> Result<Payment, ServiceError> {
        let mut state = self.state.lock().await;

        let contract = state
            .contract(payment.contract_id)
            .ok_or(ServiceError::ContractNotFound(payment.contract_id))?;
        let project = state
            .project(contract.project_id)
            .ok_or(ServiceError::ProjectNotFound(contract.project_id))?;

        project.ensure_owned_by(owner_id)?;
        contract.ensure_completed()?;

        if !state.has_review(payment.contract_id) {
            return Err(ServiceError::ReviewRequired(payment.contract_id));
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            contract_id: payment.contract_id,
            amount: payment.amount,
            payment_date: today,
            status: PAYMENT_STATUS_PAID.to_string(),
            payment_method: payment.payment_method,
            created_at: Utc::now(),
        };
        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.payments.iter().find(|p| p.id == payment_id).cloned())
    }

    async fn get_contract_payments(&self, contract_id: Uuid) -> Result<Vec<Payment>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state
            .payments
            .iter()
            .filter(|p| p.contract_id == contract_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SkillExt for MemoryStore {
    async fn ensure_skill(&self, name: &str) -> Result<Skill, ServiceError> {
        let mut state = self.state.lock().await;

        if let Some(skill) = state.skills.iter().find(|s| s.name == name) {
            return Ok(skill.clone());
        }

        let skill = Skill {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn get_skill(&self, skill_id: Uuid) -> Result<Option<Skill>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.skills.iter().find(|s| s.id == skill_id).cloned())
    }

    async fn set_student_skill(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        proficiency: Proficiency,
    ) -> Result<StudentSkill, ServiceError> {
        let mut state = self.state.lock().await;

        if !state.skills.iter().any(|s| s.id == skill_id) {
            return Err(ServiceError::SkillNotFound(skill_id));
        }

        let entry = StudentSkill {
            student_id,
            skill_id,
            proficiency,
        };

        let existing = state
            .student_skills
            .iter()
            .position(|ss| ss.student_id == student_id && ss.skill_id == skill_id);

        match existing {
            Some(index) => state.student_skills[index].proficiency = proficiency,
            None => state.student_skills.push(entry.clone()),
        }

        Ok(entry)
    }

    async fn remove_student_skill(&self, student_id: Uuid, skill_id: Uuid) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state
            .student_skills
            .retain(|ss| !(ss.student_id == student_id && ss.skill_id == skill_id));
        Ok(())
    }

    async fn get_student_skills(&self, student_id: Uuid) -> Result<Vec<StudentSkillView>, ServiceError> {
        let state = self.state.lock().await;

        let mut skills: Vec<StudentSkillView> = state
            .student_skills
            .iter()
            .filter(|ss| ss.student_id == student_id)
            .filter_map(|ss| {
                let skill = state.skills.iter().find(|s| s.id == ss.skill_id)?;
                Some(StudentSkillView {
                    skill_id: skill.id,
                    skill_name: skill.name.clone(),
                    proficiency: ss.proficiency,
                })
            })
            .collect();
        skills.sort_by(|a, b| a.skill_name.cmp(&b.skill_name));
        Ok(skills)
    }
}
