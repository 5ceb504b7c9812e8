use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::studentmodel::{Proficiency, Student};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterStudentDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,

    #[validate(range(min = 1, max = 4, message = "Year of study must be between 1 and 4"))]
    pub year_of_study: i32,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginStudentDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterStudentDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department: String,
    pub year_of_study: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterStudentDto {
    pub fn filter_student(student: &Student) -> Self {
        FilterStudentDto {
            id: student.id.to_string(),
            name: student.name.to_owned(),
            email: student.email.to_owned(),
            phone_number: student.phone_number.clone(),
            department: student.department.to_owned(),
            year_of_study: student.year_of_study,
            created_at: student.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentData {
    pub student: FilterStudentDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentLoginResponseDto {
    pub status: String,
    pub token: String,
    pub student_id: String,
    pub name: String,
    pub department: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct AddSkillDto {
    #[validate(length(min = 1, max = 100, message = "Skill name must be between 1 and 100 characters"))]
    pub name: String,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSkillDto {
    pub proficiency: Proficiency,
}
