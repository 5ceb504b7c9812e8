// db/studentdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::{is_unique_violation, DBClient};
use crate::{
    models::studentmodel::{ActivityCounts, NewStudent, Student},
    service::error::ServiceError,
};

#[async_trait]
pub trait StudentExt {
    async fn save_student(&self, student: NewStudent) -> Result<Student, ServiceError>;

    async fn get_student(&self, student_id: Uuid) -> Result<Option<Student>, ServiceError>;

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, ServiceError>;

    async fn get_activity_counts(&self, student_id: Uuid) -> Result<ActivityCounts, ServiceError>;
}

#[async_trait]
impl StudentExt for DBClient {
    async fn save_student(&self, student: NewStudent) -> Result<Student, ServiceError> {
        let email = student.email.clone();

        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, email, password, phone_number, department, year_of_study)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password, phone_number, department, year_of_study, created_at
            "#,
        )
        .bind(student.name)
        .bind(student.email)
        .bind(student.password)
        .bind(student.phone_number)
        .bind(student.department)
        .bind(student.year_of_study)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "students_email_key") {
                ServiceError::EmailAlreadyRegistered(email)
            } else {
                e.into()
            }
        })
    }

    async fn get_student(&self, student_id: Uuid) -> Result<Option<Student>, ServiceError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, password, phone_number, department, year_of_study, created_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, ServiceError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, password, phone_number, department, year_of_study, created_at
            FROM students
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn get_activity_counts(&self, student_id: Uuid) -> Result<ActivityCounts, ServiceError> {
        let counts = sqlx::query_as::<_, ActivityCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects WHERE owner_id = $1) AS projects_posted,
                (SELECT COUNT(*) FROM applications WHERE student_id = $1) AS applications_submitted,
                (SELECT COUNT(*) FROM contracts WHERE student_id = $1 AND end_date IS NULL) AS active_contracts
            "#,
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
