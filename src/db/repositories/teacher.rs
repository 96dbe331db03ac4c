use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::teachers;
use crate::models::roster::Teacher;

impl From<teachers::Model> for Teacher {
    fn from(model: teachers::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

pub struct TeacherRepository {
    conn: DatabaseConnection,
}

impl TeacherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        teachers::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count teachers")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>> {
        let teacher = teachers::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query teacher by ID")?;

        Ok(teacher.map(Teacher::from))
    }

    /// Returns the teacher when `username` exists and `password` matches its hash.
    /// Argon2 verification runs on the blocking pool.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<Teacher>> {
        let teacher = teachers::Entity::find()
            .filter(teachers::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query teacher for password verification")?;

        let Some(teacher) = teacher else {
            return Ok(None);
        };

        let password_hash = teacher.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| Teacher::from(teacher)))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
