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
        contractdtos::{CreateReviewDto, RecordPaymentDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn contracts_handler() -> Router {
    Router::new()
        .route("/working", get(get_working_contracts))
        .route("/hired", get(get_hired_contracts))
        .route("/:contract_id", get(get_contract))
        .route("/:contract_id/complete", put(complete_contract))
        .route("/:contract_id/review", get(get_contract_review).post(create_review))
        .route("/:contract_id/payments", get(get_contract_payments).post(record_payment))
}

/// Contracts the caller works on as the freelancer.
pub async fn get_working_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contracts = app_state
        .contract_service
        .get_freelancer_contracts(auth.student.id)
        .await?;

    Ok(Json(ApiResponse::success("Contracts retrieved successfully", contracts)))
}

/// Contracts on projects the caller posted.
pub async fn get_hired_contracts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contracts = app_state
        .contract_service
        .get_owner_contracts(auth.student.id)
        .await?;

    Ok(Json(ApiResponse::success("Contracts retrieved successfully", contracts)))
}

pub async fn get_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state.contract_service.get_contract(contract_id).await?;

    Ok(Json(ApiResponse::success("Contract retrieved successfully", contract)))
}

pub async fn complete_contract(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let contract = app_state
        .contract_service
        .complete_contract(auth.student.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Contract completed", contract)))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    body: Result<Json<CreateReviewDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let review = app_state
        .review_service
        .create_review(auth.student.id, contract_id, body.rating, &body.review_text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Review submitted successfully", review)),
    ))
}

pub async fn get_contract_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .review_service
        .get_contract_review(contract_id)
        .await?
        .ok_or_else(|| HttpError::not_found("This contract has not been reviewed yet").with_kind("not_found"))?;

    Ok(Json(ApiResponse::success("Review retrieved successfully", review)))
}

pub async fn record_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    body: Result<Json<RecordPaymentDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let payment = app_state
        .payment_service
        .record_payment(auth.student.id, contract_id, body.amount, &body.payment_method)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Payment recorded successfully", payment)),
    ))
}

pub async fn get_contract_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .payment_service
        .get_contract_payments(contract_id)
        .await?;

    Ok(Json(ApiResponse::success("Payments retrieved successfully", payments)))
}
