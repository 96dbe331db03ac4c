//! Domain service for the attendance ledger.
//!
//! Owns roster seeding, event logging, the bluetooth check-in rule and every
//! read over attendance data. Callers pass the authenticated principal in;
//! the service keeps no session state.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::db::SeedReport;
use crate::domain::TimeWindow;
use crate::models::attendance::{AttendanceEvent, AttendanceSummary, FlaggedEvent, NewEvent};
use crate::models::roster::{Class, Student};

/// Errors specific to ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The presented bluetooth id does not match the student's.
    #[error("Wrong bluetooth id")]
    WrongCredential,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for LedgerError {
    fn from(err: DbErr) -> Self {
        if let Some(
            SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg),
        ) = err.sql_err()
        {
            return Self::ConstraintViolation(msg);
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for LedgerError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DbErr>() {
            Ok(db_err) => db_err.into(),
            Err(err) => Self::Internal(format!("{err:#}")),
        }
    }
}

/// Domain service trait for attendance.
#[async_trait::async_trait]
pub trait LedgerService: Send + Sync {
    /// Populates empty roster tables. Safe to call on every start.
    async fn seed_if_empty(&self) -> Result<SeedReport, LedgerError>;

    /// Appends one event stamped with the current UTC time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ConstraintViolation`] if the student or class
    /// does not exist, and [`LedgerError::Validation`] for a confidence
    /// outside `0.0..=1.0`.
    async fn log_event(&self, event: NewEvent) -> Result<AttendanceEvent, LedgerError>;

    /// Records a bluetooth check-in for `student` if `presented_id` equals
    /// their stored bluetooth id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WrongCredential`] on mismatch; no event is written.
    async fn check_in_bluetooth(
        &self,
        student: &Student,
        class_id: i32,
        presented_id: &str,
    ) -> Result<AttendanceEvent, LedgerError>;

    async fn list_students(&self) -> Result<Vec<Student>, LedgerError>;

    async fn get_student(&self, id: i32) -> Result<Student, LedgerError>;

    async fn list_classes(&self) -> Result<Vec<Class>, LedgerError>;

    /// Events in insertion order, optionally limited to a time window.
    async fn list_attendance(&self, window: TimeWindow)
    -> Result<Vec<AttendanceEvent>, LedgerError>;

    /// A student's events, newest first.
    async fn attendance_for_student(
        &self,
        student_id: i32,
    ) -> Result<Vec<AttendanceEvent>, LedgerError>;

    /// The last `limit` events, oldest first.
    async fn recent_attendance(&self, limit: u64) -> Result<Vec<AttendanceEvent>, LedgerError>;

    /// Events in the window annotated by the duplicate-device check.
    async fn flagged_events(&self, window: TimeWindow) -> Result<Vec<FlaggedEvent>, LedgerError>;

    async fn summary(&self) -> Result<AttendanceSummary, LedgerError>;
}
