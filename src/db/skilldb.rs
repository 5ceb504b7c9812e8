// db/skilldb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    models::studentmodel::*,
    service::error::ServiceError,
};

#[async_trait]
pub trait SkillExt {
    /// Returns the skill named exactly `name`, creating it when absent.
    async fn ensure_skill(&self, name: &str) -> Result<Skill, ServiceError>;

    async fn get_skill(&self, skill_id: Uuid) -> Result<Option<Skill>, ServiceError>;

    async fn set_student_skill(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        proficiency: Proficiency,
    ) -> Result<StudentSkill, ServiceError>;

    async fn remove_student_skill(&self, student_id: Uuid, skill_id: Uuid) -> Result<(), ServiceError>;

    async fn get_student_skills(&self, student_id: Uuid) -> Result<Vec<StudentSkillView>, ServiceError>;
}

#[async_trait]
impl SkillExt for DBClient {
    async fn ensure_skill(&self, name: &str) -> Result<Skill, ServiceError> {
        // A racing insert loses the ON CONFLICT and falls through to the lookup.
        let inserted = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(skill) = inserted {
            return Ok(skill);
        }

        let skill = sqlx::query_as::<_, Skill>("SELECT id, name FROM skills WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(skill)
    }

    async fn get_skill(&self, skill_id: Uuid) -> Result<Option<Skill>, ServiceError> {
        let skill = sqlx::query_as::<_, Skill>("SELECT id, name FROM skills WHERE id = $1")
            .bind(skill_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(skill)
    }

    async fn set_student_skill(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        proficiency: Proficiency,
    ) -> Result<StudentSkill, ServiceError> {
        let student_skill = sqlx::query_as::<_, StudentSkill>(
            r#"
            INSERT INTO student_skills (student_id, skill_id, proficiency)
            VALUES ($1, $2, $3)
            ON CONFLICT (student_id, skill_id) DO UPDATE SET proficiency = EXCLUDED.proficiency
            RETURNING student_id, skill_id, proficiency
            "#,
        )
        .bind(student_id)
        .bind(skill_id)
        .bind(proficiency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let foreign_key = e
                .as_database_error()
                .map(|db_err| db_err.is_foreign_key_violation())
                .unwrap_or(false);

            if foreign_key {
                ServiceError::SkillNotFound(skill_id)
            } else {
                e.into()
            }
        })?;

        Ok(student_skill)
    }

    async fn remove_student_skill(&self, student_id: Uuid, skill_id: Uuid) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM student_skills WHERE student_id = $1 AND skill_id = $2")
            .bind(student_id)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_student_skills(&self, student_id: Uuid) -> Result<Vec<StudentSkillView>, ServiceError> {
        let skills = sqlx::query_as::<_, StudentSkillView>(
            r#"
            SELECT s.id AS skill_id, s.name AS skill_name, ss.proficiency
            FROM student_skills ss
            JOIN skills s ON s.id = ss.skill_id
            WHERE ss.student_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }
}
