//! `SeaORM` implementation of the `LedgerService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::{Config, SecurityConfig, SeedConfig};
use crate::db::{SeedReport, Store};
use crate::domain::{TimeWindow, format_timestamp};
use crate::models::attendance::{AttendanceEvent, AttendanceSummary, FlaggedEvent, NewEvent};
use crate::models::roster::{Class, Student};
use crate::services::ledger_service::{LedgerError, LedgerService};
use crate::services::proxy_detection::{FlagPolicy, flag_suspicious};

pub struct SeaOrmLedgerService {
    store: Store,
    seed: SeedConfig,
    security: SecurityConfig,
    flag_policy: FlagPolicy,
}

impl SeaOrmLedgerService {
    #[must_use]
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            seed: config.seed.clone(),
            security: config.security.clone(),
            flag_policy: FlagPolicy::from(&config.flagging),
        }
    }

    fn validate_window(window: TimeWindow) -> Result<(), LedgerError> {
        if window.is_valid() {
            Ok(())
        } else {
            Err(LedgerError::Validation(
                "Window start must be before its end".to_string(),
            ))
        }
    }

    async fn ensure_references(&self, student_id: i32, class_id: i32) -> Result<(), LedgerError> {
        if self.store.get_student(student_id).await?.is_none() {
            return Err(LedgerError::ConstraintViolation(format!(
                "student {student_id} does not exist"
            )));
        }
        if self.store.get_class(class_id).await?.is_none() {
            return Err(LedgerError::ConstraintViolation(format!(
                "class {class_id} does not exist"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerService for SeaOrmLedgerService {
    async fn seed_if_empty(&self) -> Result<SeedReport, LedgerError> {
        Ok(self.store.seed_if_empty(&self.seed, &self.security).await?)
    }

    async fn log_event(&self, event: NewEvent) -> Result<AttendanceEvent, LedgerError> {
        if let Some(confidence) = event.confidence
            && !(confidence.is_finite() && (0.0..=1.0).contains(&confidence))
        {
            return Err(LedgerError::Validation(format!(
                "Confidence must be between 0 and 1, got {confidence}"
            )));
        }

        self.ensure_references(event.student_id, event.class_id)
            .await?;

        let ts = format_timestamp(Utc::now());
        let stored = self.store.append_attendance(&event, &ts).await?;

        metrics::counter!("attendance_events_total", "method" => stored.method.as_str())
            .increment(1);
        info!(
            event_id = stored.id,
            student_id = stored.student_id,
            class_id = stored.class_id,
            method = %stored.method,
            status = %stored.status,
            "Attendance recorded"
        );

        Ok(stored)
    }

    async fn check_in_bluetooth(
        &self,
        student: &Student,
        class_id: i32,
        presented_id: &str,
    ) -> Result<AttendanceEvent, LedgerError> {
        // Compare against the stored row, not the caller's copy.
        let current = self.get_student(student.id).await?;

        if presented_id != current.bluetooth_id {
            metrics::counter!("checkin_rejections_total").increment(1);
            warn!(
                student_id = current.id,
                class_id, "Bluetooth check-in rejected: id mismatch"
            );
            return Err(LedgerError::WrongCredential);
        }

        self.log_event(NewEvent::bluetooth(current.id, class_id, presented_id))
            .await
    }

    async fn list_students(&self) -> Result<Vec<Student>, LedgerError> {
        Ok(self.store.list_students().await?)
    }

    async fn get_student(&self, id: i32) -> Result<Student, LedgerError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("Student {id} not found")))
    }

    async fn list_classes(&self) -> Result<Vec<Class>, LedgerError> {
        Ok(self.store.list_classes().await?)
    }

    async fn list_attendance(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<AttendanceEvent>, LedgerError> {
        Self::validate_window(window)?;
        Ok(self.store.list_attendance(window).await?)
    }

    async fn attendance_for_student(
        &self,
        student_id: i32,
    ) -> Result<Vec<AttendanceEvent>, LedgerError> {
        Ok(self.store.attendance_for_student(student_id).await?)
    }

    async fn recent_attendance(&self, limit: u64) -> Result<Vec<AttendanceEvent>, LedgerError> {
        Ok(self.store.recent_attendance(limit).await?)
    }

    async fn flagged_events(&self, window: TimeWindow) -> Result<Vec<FlaggedEvent>, LedgerError> {
        let events = self.list_attendance(window).await?;
        Ok(flag_suspicious(&events, self.flag_policy))
    }

    async fn summary(&self) -> Result<AttendanceSummary, LedgerError> {
        let students = self.store.count_students().await?;
        let classes = self.store.count_classes().await?;
        let (total, present) = self.store.attendance_counts().await?;
        Ok(AttendanceSummary::new(students, classes, total, present))
    }
}
