//! First-boot population of the roster tables.

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tokio::task;
use tracing::info;

use crate::config::{SecurityConfig, SeedConfig};
use crate::db::repositories::teacher::hash_password;
use crate::domain::derive_bluetooth_id;
use crate::entities::{classes, students, teachers};
use crate::models::roster::StudentInput;

const DEFAULT_STUDENTS: [&str; 4] = ["Aarav Sharma", "Isha Kapoor", "Rohit Singh", "Meera Patel"];
const DEFAULT_DEPT: &str = "Mechanical";
const DEFAULT_CLASS_NAME: &str = "CE-2A";
const DEFAULT_CLASSES: [(&str, &str); 2] = [("ME101", "Thermodynamics"), ("ME102", "Mechanics")];
const EMAIL_DOMAIN: &str = "univ.edu";

/// Rows inserted per table by one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub teachers: u64,
    pub students: u64,
    pub classes: u64,
}

impl SeedReport {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.teachers == 0 && self.students == 0 && self.classes == 0
    }
}

/// The fixed roster, ordinals starting at 1.
#[must_use]
pub fn default_roster(bluetooth_seed: u64) -> Vec<StudentInput> {
    DEFAULT_STUDENTS
        .iter()
        .zip(1u32..)
        .map(|(name, ordinal)| {
            let first = name.split_whitespace().next().unwrap_or(name).to_lowercase();
            StudentInput {
                name: (*name).to_string(),
                roll: format!("ME{}", 100 + ordinal),
                email: format!("{first}@{EMAIL_DOMAIN}"),
                dept: DEFAULT_DEPT.to_string(),
                class_name: DEFAULT_CLASS_NAME.to_string(),
                bluetooth_id: derive_bluetooth_id(name, ordinal, bluetooth_seed),
            }
        })
        .collect()
}

/// Inserts default rows into each of `teachers`, `students` and `classes`
/// that is currently empty. Tables are checked independently, and all
/// inserts commit together.
pub async fn seed_if_empty(
    conn: &DatabaseConnection,
    seed: &SeedConfig,
    security: &SecurityConfig,
) -> Result<SeedReport> {
    let needs_teacher = teachers::Entity::find().count(conn).await? == 0;

    // Hash outside the transaction so the write lock is not held during Argon2.
    let password_hash = if needs_teacher {
        let password = seed.teacher_password.clone();
        let security = security.clone();
        Some(
            task::spawn_blocking(move || hash_password(&password, &security))
                .await
                .context("Password hashing task panicked")??,
        )
    } else {
        None
    };

    let txn = conn.begin().await.context("Failed to start seed transaction")?;
    let mut report = SeedReport::default();

    if let Some(password_hash) = password_hash
        && teachers::Entity::find().count(&txn).await? == 0
    {
        teachers::ActiveModel {
            username: Set(seed.teacher_username.clone()),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to seed teacher")?;
        report.teachers = 1;
    }

    if students::Entity::find().count(&txn).await? == 0 {
        for student in default_roster(seed.bluetooth_seed) {
            students::ActiveModel {
                name: Set(student.name),
                roll: Set(student.roll),
                email: Set(student.email),
                dept: Set(student.dept),
                class_name: Set(student.class_name),
                bluetooth_id: Set(student.bluetooth_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to seed student")?;
            report.students += 1;
        }
    }

    if classes::Entity::find().count(&txn).await? == 0 {
        for (code, title) in DEFAULT_CLASSES {
            classes::ActiveModel {
                code: Set(code.to_string()),
                title: Set(title.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to seed class")?;
            report.classes += 1;
        }
    }

    txn.commit().await.context("Failed to commit seed transaction")?;

    if report.is_noop() {
        info!("Roster already seeded");
    } else {
        info!(
            teachers = report.teachers,
            students = report.students,
            classes = report.classes,
            "Seeded roster tables"
        );
    }

    Ok(report)
}
