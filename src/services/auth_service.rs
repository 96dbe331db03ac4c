//! Domain service for teacher and student authentication.
//!
//! Both roles authenticate by exact match: teachers with username and
//! password, students with roll number and email.

use thiserror::Error;

use crate::models::roster::{Student, Teacher};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No row matched the presented credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db_err) => db_err.into(),
            Err(err) => Self::Internal(format!("{err:#}")),
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the username is unknown
    /// or the password does not match.
    async fn authenticate_teacher(&self, username: &str, password: &str)
    -> Result<Teacher, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no student has this
    /// roll and email pair.
    async fn authenticate_student(&self, roll: &str, email: &str) -> Result<Student, AuthError>;

    async fn teacher_by_id(&self, id: i32) -> Result<Teacher, AuthError>;

    async fn student_by_id(&self, id: i32) -> Result<Student, AuthError>;
}
