use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AttendanceStatus, TimeWindow};
use crate::models::roster::Student;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Student as shown to teachers. The bluetooth id is withheld since it is
/// the student's check-in secret.
#[derive(Debug, Serialize)]
pub struct StudentDto {
    pub id: i32,
    pub name: String,
    pub roll: String,
    pub email: String,
    pub dept: String,
    pub class_name: String,
}

impl From<Student> for StudentDto {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            roll: s.roll,
            email: s.email,
            dept: s.dept,
            class_name: s.class_name,
        }
    }
}

/// `?since=&until=` as RFC 3339 timestamps.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl From<WindowQuery> for TimeWindow {
    fn from(q: WindowQuery) -> Self {
        Self {
            since: q.since,
            until: q.until,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: u64,
}

const fn default_recent_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub student_id: i32,
    pub class_id: i32,
    #[serde(default)]
    pub status: AttendanceStatus,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub class_id: i32,
    pub bluetooth_id: String,
}
