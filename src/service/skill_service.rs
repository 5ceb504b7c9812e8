// service/skill_service.rs
use uuid::Uuid;

use super::{error::ServiceError, Store};
use crate::models::studentmodel::*;

const MAX_SKILL_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone)]
pub struct SkillService {
    store: Store,
}

impl SkillService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Names are trimmed and matched exactly, so "Python" and "python" are
    /// different skills.
    pub async fn ensure_skill(&self, name: &str) -> Result<Skill, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Skill name is required".to_string()));
        }
        if name.chars().count() > MAX_SKILL_NAME_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Skill name must not exceed {} characters",
                MAX_SKILL_NAME_LENGTH
            )));
        }

        self.store.ensure_skill(name).await
    }

    pub async fn set_student_skill(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        proficiency: Proficiency,
    ) -> Result<StudentSkill, ServiceError> {
        self.store
            .get_skill(skill_id)
            .await?
            .ok_or(ServiceError::SkillNotFound(skill_id))?;

        let student_skill = self
            .store
            .set_student_skill(student_id, skill_id, proficiency)
            .await?;

        tracing::info!(
            "student {} set skill {} to {}",
            student_id,
            skill_id,
            proficiency.to_str()
        );
        Ok(student_skill)
    }

    pub async fn add_skill_by_name(
        &self,
        student_id: Uuid,
        name: &str,
        proficiency: Proficiency,
    ) -> Result<StudentSkillView, ServiceError> {
        let skill = self.ensure_skill(name).await?;
        let student_skill = self.set_student_skill(student_id, skill.id, proficiency).await?;

        Ok(StudentSkillView {
            skill_id: skill.id,
            skill_name: skill.name,
            proficiency: student_skill.proficiency,
        })
    }

    /// Removing a skill the student does not have is a no-op.
    pub async fn remove_student_skill(&self, student_id: Uuid, skill_id: Uuid) -> Result<(), ServiceError> {
        self.store.remove_student_skill(student_id, skill_id).await
    }

    pub async fn get_student_skills(&self, student_id: Uuid) -> Result<Vec<StudentSkillView>, ServiceError> {
        self.store.get_student_skills(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        error::ErrorKind,
        test_support::{memory_store, student},
    };

    #[tokio::test]
    async fn ensure_skill_is_idempotent() {
        let service = SkillService::new(memory_store());

        let first = service.ensure_skill("Python").await.unwrap();
        let second = service.ensure_skill("  Python ").await.unwrap();
        let lower = service.ensure_skill("python").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first.id, lower.id);
        assert_eq!(
            service.ensure_skill("  ").await.unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_ensure_skill_returns_one_id() {
        let service = SkillService::new(memory_store());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.ensure_skill("Python").await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        assert_eq!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn student_skills_upsert_and_remove() {
        let store = memory_store();
        let anu = student(&store, "Anu").await;
        let service = SkillService::new(store);

        let rust = service
            .add_skill_by_name(anu, "Rust", Proficiency::Beginner)
            .await
            .unwrap();
        service
            .add_skill_by_name(anu, "Figma", Proficiency::Advanced)
            .await
            .unwrap();
        service
            .set_student_skill(anu, rust.skill_id, Proficiency::Intermediate)
            .await
            .unwrap();

        let skills = service.get_student_skills(anu).await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(names, vec!["Figma", "Rust"]);
        assert_eq!(skills[1].proficiency, Proficiency::Intermediate);

        service.remove_student_skill(anu, rust.skill_id).await.unwrap();
        service.remove_student_skill(anu, rust.skill_id).await.unwrap();
        assert_eq!(service.get_student_skills(anu).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_skill_is_not_found() {
        let store = memory_store();
        let anu = student(&store, "Anu").await;
        let service = SkillService::new(store);

        let err = service
            .set_student_skill(anu, Uuid::new_v4(), Proficiency::Beginner)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
