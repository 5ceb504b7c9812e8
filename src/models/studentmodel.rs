use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "proficiency_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
}

impl Proficiency {
    pub fn to_str(&self) -> &str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: Option<String>,
    pub department: String,
    pub year_of_study: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a student. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub department: String,
    pub year_of_study: i32,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct StudentSkill {
    pub student_id: Uuid,
    pub skill_id: Uuid,
    pub proficiency: Proficiency,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct StudentSkillView {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub proficiency: Proficiency,
}

/// Counters shown on the dashboard header.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub projects_posted: i64,
    pub applications_submitted: i64,
    pub active_contracts: i64,
}
