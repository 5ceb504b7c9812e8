// db/projectdb.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::db::{like_pattern, DBClient};
use crate::{
    models::projectmodel::*,
    service::error::ServiceError,
};

#[async_trait]
pub trait ProjectExt {
    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
        today: NaiveDate,
    ) -> Result<Project, ServiceError>;

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, ServiceError>;

    async fn search_projects(&self, search: ProjectSearch) -> Result<Vec<ProjectSummary>, ServiceError>;

    async fn get_owner_projects(&self, owner_id: Uuid) -> Result<Vec<OwnerProjectView>, ServiceError>;

    /// Open projects the student could apply to, newest first.
    async fn get_open_projects_for(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, ServiceError>;

    async fn count_pending_applications(&self, project_id: Uuid) -> Result<i64, ServiceError>;
}

#[async_trait]
impl ProjectExt for DBClient {
    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
        today: NaiveDate,
    ) -> Result<Project, ServiceError> {
        let owner_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        if !owner_exists {
            return Err(ServiceError::StudentNotFound(owner_id));
        }

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (owner_id, title, description, deadline, status, post_date)
            VALUES ($1, $2, $3, $4, 'open'::project_status, $5)
            RETURNING id, owner_id, title, description, deadline, status, post_date, created_at
            "#,
        )
        .bind(owner_id)
        .bind(project.title)
        .bind(project.description)
        .bind(project.deadline)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, ServiceError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, owner_id, title, description, deadline, status, post_date, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn search_projects(&self, search: ProjectSearch) -> Result<Vec<ProjectSummary>, ServiceError> {
        let pattern = search.keyword.as_deref().map(like_pattern);

        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id AS project_id, p.owner_id, s.name AS owner_name, p.title,
                   p.description, p.deadline, p.status, p.post_date
            FROM projects p
            JOIN students s ON s.id = p.owner_id
            WHERE ($1::text IS NULL OR p.title ILIKE $1 OR p.description ILIKE $1)
              AND ($2::project_status IS NULL OR p.status = $2)
            ORDER BY p.post_date DESC, p.created_at DESC
            "#,
        )
        .bind(pattern)
        .bind(search.status)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_owner_projects(&self, owner_id: Uuid) -> Result<Vec<OwnerProjectView>, ServiceError> {
        let projects = sqlx::query_as::<_, OwnerProjectView>(
            r#"
            SELECT p.id AS project_id, p.title, p.deadline, p.status, p.post_date,
                   COUNT(a.id) FILTER (WHERE a.status = 'pending') AS pending_applications
            FROM projects p
            LEFT JOIN applications a ON a.project_id = p.id
            WHERE p.owner_id = $1
            GROUP BY p.id
            ORDER BY p.post_date DESC, p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_open_projects_for(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id AS project_id, p.owner_id, s.name AS owner_name, p.title,
                   p.description, p.deadline, p.status, p.post_date
            FROM projects p
            JOIN students s ON s.id = p.owner_id
            WHERE p.status = 'open'::project_status AND p.owner_id <> $1
            ORDER BY p.post_date DESC, p.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn count_pending_applications(&self, project_id: Uuid) -> Result<i64, ServiceError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM applications
            WHERE project_id = $1 AND status = 'pending'::application_status
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
