//! Duplicate-device heuristic for spotting proxy check-ins.
//!
//! An event is suspicious when its device id is shared with at least one
//! other event in the same set. Nothing temporal or statistical: two honest
//! check-ins from one device on different days still flag each other.

use std::collections::HashMap;

use crate::config::FlaggingConfig;
use crate::models::attendance::{AttendanceEvent, FlaggedEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagPolicy {
    /// Group events without a device id together. Off by default, so
    /// teacher-marked events never flag each other.
    pub include_missing_devices: bool,
}

impl From<&FlaggingConfig> for FlagPolicy {
    fn from(config: &FlaggingConfig) -> Self {
        Self {
            include_missing_devices: config.include_missing_devices,
        }
    }
}

/// Annotates every event with whether its device id occurs more than once.
///
/// Output order matches input order. The events themselves are not altered.
#[must_use]
pub fn flag_suspicious(events: &[AttendanceEvent], policy: FlagPolicy) -> Vec<FlaggedEvent> {
    let mut occurrences: HashMap<Option<&str>, usize> = HashMap::new();
    for event in events {
        *occurrences.entry(event.device_id.as_deref()).or_default() += 1;
    }

    events
        .iter()
        .map(|event| {
            let key = event.device_id.as_deref();
            let shared = occurrences.get(&key).copied().unwrap_or(0) > 1;
            let suspicious = shared && (key.is_some() || policy.include_missing_devices);
            FlaggedEvent {
                event: event.clone(),
                suspicious,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttendanceStatus, CheckInMethod};

    fn event(id: i32, device: Option<&str>) -> AttendanceEvent {
        AttendanceEvent {
            id,
            student_id: id,
            class_id: 1,
            ts: format!("2025-01-01T09:00:{id:02}.000000Z"),
            method: if device.is_some() {
                CheckInMethod::Bluetooth
            } else {
                CheckInMethod::Teacher
            },
            device_id: device.map(str::to_string),
            confidence: None,
            status: AttendanceStatus::Present,
        }
    }

    fn flags(out: &[FlaggedEvent]) -> Vec<(i32, bool)> {
        out.iter().map(|f| (f.event.id, f.suspicious)).collect()
    }

    #[test]
    fn shared_device_flags_both_events() {
        let events = [event(1, Some("AA")), event(2, Some("AA")), event(3, Some("BB"))];
        let out = flag_suspicious(&events, FlagPolicy::default());
        assert_eq!(flags(&out), vec![(1, true), (2, true), (3, false)]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(flag_suspicious(&[], FlagPolicy::default()).is_empty());
    }

    #[test]
    fn missing_devices_are_ignored_by_default() {
        let events = [event(1, None), event(2, None), event(3, Some("CC"))];
        let out = flag_suspicious(&events, FlagPolicy::default());
        assert_eq!(flags(&out), vec![(1, false), (2, false), (3, false)]);
    }

    #[test]
    fn missing_devices_group_when_enabled() {
        let events = [event(1, None), event(2, None), event(3, Some("CC"))];
        let policy = FlagPolicy {
            include_missing_devices: true,
        };
        let out = flag_suspicious(&events, policy);
        assert_eq!(flags(&out), vec![(1, true), (2, true), (3, false)]);
    }

    #[test]
    fn single_missing_device_is_never_suspicious() {
        let policy = FlagPolicy {
            include_missing_devices: true,
        };
        let out = flag_suspicious(&[event(1, None)], policy);
        assert_eq!(flags(&out), vec![(1, false)]);
    }

    #[test]
    fn events_pass_through_unchanged() {
        let events = [event(7, Some("DD")), event(8, Some("DD"))];
        let out = flag_suspicious(&events, FlagPolicy::default());
        assert_eq!(out[0].event, events[0]);
        assert_eq!(out[1].event, events[1]);
    }
}
