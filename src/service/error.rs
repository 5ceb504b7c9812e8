use axum::http::StatusCode;
use chrono::NaiveDate;
use sqlx::types::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::projectmodel::{ApplicationStatus, ProjectStatus},
};

/// Caller-facing classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    PreconditionFailed,
    Conflict,
    NotFound,
    AuthFailure,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AuthFailure => "auth_failure",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rating must be an integer between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("Payment amount must be between 0 and 9999999999.99 with at most two decimals, got {0}")]
    InvalidAmount(BigDecimal),

    #[error("Deadline {0} must be after today")]
    InvalidDeadline(NaiveDate),

    #[error("Student {0} cannot apply to their own project")]
    SelfApplication(Uuid),

    #[error("Project {0} is not open (status {1:?})")]
    ProjectNotOpen(Uuid, ProjectStatus),

    #[error("Project {0} is not in progress (status {1:?})")]
    ProjectNotInProgress(Uuid, ProjectStatus),

    #[error("Contract {0} has not been completed")]
    ContractNotCompleted(Uuid),

    #[error("Contract {0} must be reviewed before a payment is recorded")]
    ReviewRequired(Uuid),

    #[error("Application {0} was already resolved (status {1:?})")]
    ApplicationAlreadyResolved(Uuid, ApplicationStatus),

    #[error("Student {1} already applied to project {0}")]
    DuplicateApplication(Uuid, Uuid),

    #[error("Contract {0} is already completed")]
    ContractAlreadyCompleted(Uuid),

    #[error("Contract {0} already has a review")]
    DuplicateReview(Uuid),

    #[error("Email {0} is already registered")]
    EmailAlreadyRegistered(String),

    #[error("Another transaction changed the same records, please retry")]
    TransactionConflict,

    #[error("Student {0} not found")]
    StudentNotFound(Uuid),

    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    #[error("Application {0} not found")]
    ApplicationNotFound(Uuid),

    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Skill {0} not found")]
    SkillNotFound(Uuid),

    #[error("Review {0} not found")]
    ReviewNotFound(Uuid),

    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Email or password is wrong")]
    WrongCredentials,

    #[error("Student {0} does not own project {1}")]
    NotProjectOwner(Uuid, Uuid),

    #[error("Operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_)
            | ServiceError::InvalidRating(_)
            | ServiceError::InvalidAmount(_)
            | ServiceError::InvalidDeadline(_)
            | ServiceError::SelfApplication(_) => ErrorKind::Validation,

            ServiceError::ProjectNotOpen(_, _)
            | ServiceError::ProjectNotInProgress(_, _)
            | ServiceError::ContractNotCompleted(_)
            | ServiceError::ReviewRequired(_) => ErrorKind::PreconditionFailed,

            ServiceError::ApplicationAlreadyResolved(_, _)
            | ServiceError::DuplicateApplication(_, _)
            | ServiceError::ContractAlreadyCompleted(_)
            | ServiceError::DuplicateReview(_)
            | ServiceError::EmailAlreadyRegistered(_)
            | ServiceError::TransactionConflict => ErrorKind::Conflict,

            ServiceError::StudentNotFound(_)
            | ServiceError::ProjectNotFound(_)
            | ServiceError::ApplicationNotFound(_)
            | ServiceError::ContractNotFound(_)
            | ServiceError::SkillNotFound(_)
            | ServiceError::ReviewNotFound(_)
            | ServiceError::PaymentNotFound(_) => ErrorKind::NotFound,

            ServiceError::WrongCredentials => ErrorKind::AuthFailure,

            ServiceError::NotProjectOwner(_, _) => ErrorKind::Forbidden,

            ServiceError::Timeout | ServiceError::Database(_) | ServiceError::Credential(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::PreconditionFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AuthFailure => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => match self {
                ServiceError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// SQLSTATE codes reported by Postgres.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const QUERY_CANCELED: &str = "57014";
const LOCK_NOT_AVAILABLE: &str = "55P03";

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                    return ServiceError::TransactionConflict
                }
                Some(QUERY_CANCELED) | Some(LOCK_NOT_AVAILABLE) => return ServiceError::Timeout,
                _ => {}
            }
        }
        if matches!(err, sqlx::Error::PoolTimedOut) {
            return ServiceError::Timeout;
        }
        ServiceError::Database(err)
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let kind = error.kind();
        let status = error.status_code();

        // Store details stay in the logs.
        let message = match &error {
            ServiceError::Database(e) => {
                tracing::error!("database failure: {}", e);
                ErrorMessage::ServerError.to_string()
            }
            ServiceError::Credential(e) => {
                tracing::error!("credential failure: {}", e);
                ErrorMessage::ServerError.to_string()
            }
            other => other.to_string(),
        };

        HttpError::new(message, status).with_kind(kind.to_str())
    }
}
