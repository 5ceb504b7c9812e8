use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::{
    error::{ErrorMessage, HttpError},
    models::studentmodel::Student,
    service::error::ServiceError,
    utils::token,
    AppState,
};

/// The authenticated caller, inserted into request extensions by [`auth`].
#[derive(Debug, Serialize, Clone)]
pub struct JWTAuthMiddleware {
    pub student: Student,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let token_details = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let student_id = uuid::Uuid::parse_str(&token_details)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let student = match app_state.auth_service.get_student(student_id).await {
        Ok(student) => student,
        Err(ServiceError::StudentNotFound(_)) => {
            return Err(HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    req.extensions_mut().insert(JWTAuthMiddleware { student });

    Ok(next.run(req).await)
}
