// service/auth_service.rs
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::{error::ServiceError, Store};
use crate::{
    error::ErrorMessage,
    models::studentmodel::{NewStudent, Student},
    utils::password,
};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub department: String,
    pub year_of_study: i32,
}

/// Identity handed back to the caller after a successful login.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VerifiedStudent {
    pub id: Uuid,
    pub name: String,
    pub department: String,
}

#[async_trait]
pub trait CredentialVerifier {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<VerifiedStudent, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct AuthService {
    store: Store,
}

impl AuthService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn register_student(&self, registration: Registration) -> Result<Student, ServiceError> {
        let name = registration.name.trim().to_string();
        let department = registration.department.trim().to_string();
        let email = normalize_email(&registration.email);

        if name.is_empty() {
            return Err(ServiceError::Validation("Name is required".to_string()));
        }
        if department.is_empty() {
            return Err(ServiceError::Validation("Department is required".to_string()));
        }
        if !validator::validate_email(&email) {
            return Err(ServiceError::Validation("Email is invalid".to_string()));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if !(1..=4).contains(&registration.year_of_study) {
            return Err(ServiceError::Validation(
                "Year of study must be between 1 and 4".to_string(),
            ));
        }

        let hashed_password = password::hash(&registration.password).map_err(|e| match e {
            ErrorMessage::HashingError => ServiceError::Credential(e.to_string()),
            other => ServiceError::Validation(other.to_string()),
        })?;

        let phone_number = registration
            .phone_number
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        let student = self
            .store
            .save_student(NewStudent {
                name,
                email,
                password: hashed_password,
                phone_number,
                department,
                year_of_study: registration.year_of_study,
            })
            .await?;

        tracing::info!("registered student {}", student.id);
        Ok(student)
    }

    pub async fn get_student(&self, student_id: Uuid) -> Result<Student, ServiceError> {
        self.store
            .get_student(student_id)
            .await?
            .ok_or(ServiceError::StudentNotFound(student_id))
    }
}

#[async_trait]
impl CredentialVerifier for AuthService {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<VerifiedStudent, ServiceError> {
        let student = self
            .store
            .get_student_by_email(&normalize_email(email))
            .await?
            .ok_or(ServiceError::WrongCredentials)?;

        let matched = match password::compare(password, &student.password) {
            Ok(matched) => matched,
            Err(ErrorMessage::InvalidHashFormat) => {
                return Err(ServiceError::Credential(format!(
                    "stored hash for student {} is malformed",
                    student.id
                )))
            }
            Err(_) => false,
        };

        if !matched {
            tracing::debug!("failed login for student {}", student.id);
            return Err(ServiceError::WrongCredentials);
        }

        Ok(VerifiedStudent {
            id: student.id,
            name: student.name,
            department: student.department,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
