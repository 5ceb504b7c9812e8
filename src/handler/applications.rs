use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{projectdtos::LimitQuery, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn applications_handler() -> Router {
    Router::new()
        .route("/mine", get(get_my_applications))
        .route("/:application_id", get(get_application))
        .route("/:application_id/accept", put(accept_application))
        .route("/:application_id/reject", put(reject_application))
}

pub async fn get_my_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let applications = app_state
        .application_service
        .get_student_applications(auth.student.id, query.limit)
        .await?;

    Ok(Json(ApiResponse::success("Applications retrieved successfully", applications)))
}

pub async fn get_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .application_service
        .get_application(application_id)
        .await?;

    Ok(Json(ApiResponse::success("Application retrieved successfully", application)))
}

pub async fn accept_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(application_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .application_service
        .accept_application(auth.student.id, application_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Application accepted and contract created",
        contract,
    )))
}

pub async fn reject_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(application_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .application_service
        .reject_application(auth.student.id, application_id)
        .await?;

    Ok(Json(ApiResponse::success("Application rejected", application)))
}
