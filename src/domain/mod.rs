//! Domain primitives for the attendance ledger.
//!
//! String columns in the store are parsed into these enums at the repository
//! boundary so the rest of the crate never compares raw strings.

pub mod bluetooth;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use bluetooth::derive_bluetooth_id;

/// How an attendance event was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInMethod {
    /// Marked manually by a logged-in teacher.
    Teacher,
    /// Self check-in by a student presenting their bluetooth id.
    Bluetooth,
}

impl CheckInMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Bluetooth => "bluetooth",
        }
    }
}

impl fmt::Display for CheckInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckInMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Self::Teacher),
            "bluetooth" => Ok(Self::Bluetooth),
            other => Err(UnknownVariant {
                kind: "check-in method",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome recorded on an attendance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Late,
    Absent,
}

impl AttendanceStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "late" => Ok(Self::Late),
            "absent" => Ok(Self::Absent),
            other => Err(UnknownVariant {
                kind: "attendance status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// The authenticated caller. Stored in the session and handed to ledger
/// operations explicitly; the ledger itself never tracks who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Principal {
    Teacher { id: i32, username: String },
    Student { id: i32, roll: String },
}

impl Principal {
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self {
            Self::Teacher { .. } => "teacher",
            Self::Student { .. } => "student",
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher { username, .. } => write!(f, "teacher:{username}"),
            Self::Student { roll, .. } => write!(f, "student:{roll}"),
        }
    }
}

/// Half-open time range `[since, until)` over event timestamps.
/// Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            since: None,
            until: None,
        }
    }

    /// Returns false when both bounds are set and the range is empty or inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match (self.since, self.until) {
            (Some(since), Some(until)) => since < until,
            _ => true,
        }
    }
}

/// Formats a timestamp the way the `attendance.ts` column stores it.
///
/// Fixed microsecond precision with a `Z` suffix keeps lexical and
/// chronological order identical, which the history queries rely on.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Formats a window bound for comparison against stored timestamps.
///
/// Stored values carry whole microseconds, so a bound with a sub-microsecond
/// remainder is rounded up: for any stored `ts`, `bound <= ts` and `ts < bound`
/// then hold exactly when they hold for the rounded string.
#[must_use]
pub fn format_bound(bound: DateTime<Utc>) -> String {
    let remainder = bound.timestamp_subsec_nanos() % 1_000;
    let rounded = if remainder == 0 {
        bound
    } else {
        bound + chrono::Duration::nanoseconds(i64::from(1_000 - remainder))
    };
    format_timestamp(rounded)
}
