use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    dtos::{
        studentdtos::{FilterStudentDto, LoginStudentDto, RegisterStudentDto, StudentData, StudentLoginResponseDto},
        ApiResponse, Response,
    },
    error::HttpError,
    middleware::auth,
    service::auth_service::{CredentialVerifier, Registration},
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout).layer(middleware::from_fn(auth)))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<RegisterStudentDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let student = app_state
        .auth_service
        .register_student(Registration {
            name: body.name,
            email: body.email,
            password: body.password,
            phone_number: body.phone_number,
            department: body.department,
            year_of_study: body.year_of_study,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Registration successful",
            StudentData {
                student: FilterStudentDto::filter_student(&student),
            },
        )),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<LoginStudentDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()).with_kind("validation_error"))?;

    let verified = app_state
        .auth_service
        .verify_credentials(&body.email, &body.password)
        .await?;

    let token = token::create_token(
        &verified.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie_header(&cookie)?);

    tracing::info!("student {} logged in", verified.id);

    let mut response = Json(StudentLoginResponseDto {
        status: "success".to_string(),
        token,
        student_id: verified.id.to_string(),
        name: verified.name,
        department: verified.department,
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie_header(&cookie)?);

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

fn cookie_header(cookie: &Cookie<'_>) -> Result<HeaderValue, HttpError> {
    cookie
        .to_string()
        .parse::<HeaderValue>()
        .map_err(|e| HttpError::server_error(e.to_string()))
}
