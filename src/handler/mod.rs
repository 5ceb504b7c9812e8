pub mod applications;
pub mod auth;
pub mod contracts;
pub mod projects;
pub mod students;
