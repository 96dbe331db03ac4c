use serde::{Deserialize, Serialize};

use crate::domain::{AttendanceStatus, CheckInMethod};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub ts: String,
    pub method: CheckInMethod,
    pub device_id: Option<String>,
    pub confidence: Option<f64>,
    pub status: AttendanceStatus,
}

/// Arguments for appending an event. The timestamp is assigned on write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub student_id: i32,
    pub class_id: i32,
    pub method: CheckInMethod,
    pub device_id: Option<String>,
    pub confidence: Option<f64>,
    pub status: AttendanceStatus,
}

impl NewEvent {
    /// A manual mark by a teacher, status `present`.
    #[must_use]
    pub fn teacher_mark(student_id: i32, class_id: i32) -> Self {
        Self {
            student_id,
            class_id,
            method: CheckInMethod::Teacher,
            device_id: None,
            confidence: None,
            status: AttendanceStatus::Present,
        }
    }

    #[must_use]
    pub fn bluetooth(student_id: i32, class_id: i32, device_id: impl Into<String>) -> Self {
        Self {
            student_id,
            class_id,
            method: CheckInMethod::Bluetooth,
            device_id: Some(device_id.into()),
            confidence: None,
            status: AttendanceStatus::Present,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }
}

/// An event annotated by the duplicate-device check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedEvent {
    #[serde(flatten)]
    pub event: AttendanceEvent,
    pub suspicious: bool,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total_students: u64,
    pub total_classes: u64,
    pub total_events: u64,
    pub present_events: u64,
    /// `None` until at least one event exists.
    pub present_percent: Option<f64>,
}

impl AttendanceSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(total_students: u64, total_classes: u64, total_events: u64, present_events: u64) -> Self {
        let present_percent = (total_events > 0)
            .then(|| present_events as f64 / total_events as f64 * 100.0);
        Self {
            total_students,
            total_classes,
            total_events,
            present_events,
            present_percent,
        }
    }
}
