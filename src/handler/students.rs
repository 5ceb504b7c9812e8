use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        studentdtos::{AddSkillDto, UpdateSkillDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn students_handler() -> Router {
    Router::new()
        .route("/me/skills", get(get_my_skills).post(add_skill))
        .route("/me/skills/:skill_id", put(update_skill).delete(remove_skill))
        .route("/me/dashboard", get(get_dashboard))
        .route("/:student_id/rating", get(get_rating))
        .route("/:student_id/reviews", get(get_received_reviews))
}

pub async fn get_my_skills(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let skills = app_state
        .skill_service
        .get_student_skills(auth.student.id)
        .await?;

    Ok(Json(ApiResponse::success("Skills retrieved successfully", skills)))
}

pub async fn add_skill(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    body: Result<Json<AddSkillDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let skill = app_state
        .skill_service
        .add_skill_by_name(auth.student.id, &body.name, body.proficiency)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Skill added successfully", skill)),
    ))
}

pub async fn update_skill(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(skill_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    body: Result<Json<UpdateSkillDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    let skill = app_state
        .skill_service
        .set_student_skill(auth.student.id, skill_id, body.proficiency)
        .await?;

    Ok(Json(ApiResponse::success("Skill updated successfully", skill)))
}

pub async fn remove_skill(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(skill_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .skill_service
        .remove_student_skill(auth.student.id, skill_id)
        .await?;

    Ok(Json(ApiResponse::success("Skill removed", ())))
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let dashboard = app_state
        .dashboard_service
        .get_dashboard(auth.student.id)
        .await?;

    Ok(Json(ApiResponse::success("Dashboard retrieved successfully", dashboard)))
}

pub async fn get_rating(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let rating = app_state
        .review_service
        .get_rating_summary(student_id)
        .await?;

    Ok(Json(ApiResponse::success("Rating retrieved successfully", rating)))
}

pub async fn get_received_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .review_service
        .get_received_reviews(student_id)
        .await?;

    Ok(Json(ApiResponse::success("Reviews retrieved successfully", reviews)))
}
