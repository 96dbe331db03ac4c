//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::models::roster::{Student, Teacher};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate_teacher(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Teacher, AuthError> {
        self.store
            .verify_teacher_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn authenticate_student(&self, roll: &str, email: &str) -> Result<Student, AuthError> {
        self.store
            .find_student_by_credentials(roll, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn teacher_by_id(&self, id: i32) -> Result<Teacher, AuthError> {
        self.store
            .get_teacher(id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("Teacher {id}")))
    }

    async fn student_by_id(&self, id: i32) -> Result<Student, AuthError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("Student {id}")))
    }
}
