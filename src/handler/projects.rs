use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        projectdtos::{CreateProjectDto, SearchProjectsQuery},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    models::projectmodel::NewProject,
    AppState,
};

pub fn projects_handler() -> Router {
    Router::new()
        .route("/", get(search_projects).post(create_project))
        .route("/mine", get(get_my_projects))
        .route("/:project_id", get(get_project))
        .route(
            "/:project_id/applications",
            get(get_project_applications).post(apply_to_project),
        )
}

pub async fn create_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    body: Result<Json<CreateProjectDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let project = app_state
        .project_service
        .create_project(
            auth.student.id,
            NewProject {
                title: body.title,
                description: body.description,
                deadline: body.deadline,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Project posted successfully", project)),
    ))
}

pub async fn search_projects(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchProjectsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let search = query.into_search()?;
    let projects = app_state.project_service.search_projects(search).await?;

    Ok(Json(ApiResponse::success("Projects retrieved successfully", projects)))
}

pub async fn get_my_projects(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let projects = app_state
        .project_service
        .get_owner_projects(auth.student.id)
        .await?;

    Ok(Json(ApiResponse::success("Projects retrieved successfully", projects)))
}

pub async fn get_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state.project_service.get_project(project_id).await?;

    Ok(Json(ApiResponse::success("Project retrieved successfully", project)))
}

pub async fn apply_to_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .application_service
        .create_application(auth.student.id, project_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Application submitted successfully", application)),
    ))
}

pub async fn get_project_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let applicants = app_state
        .application_service
        .get_pending_applications(auth.student.id, project_id)
        .await?;

    Ok(Json(ApiResponse::success("Applications retrieved successfully", applicants)))
}
