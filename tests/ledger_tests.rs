use rollcall::config::Config;
use rollcall::db::Store;
use rollcall::domain::{AttendanceStatus, CheckInMethod, TimeWindow};
use rollcall::models::attendance::NewEvent;
use rollcall::services::{AuthError, LedgerError};
use rollcall::state::SharedState;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

async fn setup() -> SharedState {
    let store = Store::in_memory().await.expect("in-memory store");
    SharedState::with_store(Config::default(), store)
        .await
        .expect("shared state")
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let state = setup().await;

    let again = state.ledger.seed_if_empty().await.unwrap();
    assert!(again.is_noop());

    assert_eq!(state.ledger.list_students().await.unwrap().len(), 4);
    assert_eq!(state.ledger.list_classes().await.unwrap().len(), 2);
    assert_eq!(state.store.count_teachers().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seeded_bluetooth_ids_are_unique_and_well_formed() {
    let state = setup().await;
    let students = state.ledger.list_students().await.unwrap();

    let ids: HashSet<_> = students.iter().map(|s| s.bluetooth_id.clone()).collect();
    assert_eq!(ids.len(), students.len());
    for id in &ids {
        let octets: Vec<&str> = id.split(':').collect();
        assert_eq!(octets.len(), 4, "{id}");
        assert!(octets.iter().all(|o| o.len() == 2 && u8::from_str_radix(o, 16).is_ok()));
    }
}

#[tokio::test]
async fn test_authenticate_teacher() {
    let state = setup().await;

    let teacher = state
        .auth
        .authenticate_teacher("teacher", "1234")
        .await
        .unwrap();
    assert_eq!(teacher.username, "teacher");

    let err = state
        .auth
        .authenticate_teacher("teacher", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = state
        .auth
        .authenticate_teacher("nobody", "1234")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_authenticate_student() {
    let state = setup().await;

    let student = state
        .auth
        .authenticate_student("ME101", "aarav@univ.edu")
        .await
        .unwrap();
    assert_eq!(student.name, "Aarav Sharma");

    let err = state
        .auth
        .authenticate_student("ME101", "isha@univ.edu")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_bluetooth_check_in() {
    let state = setup().await;
    let student = state
        .auth
        .authenticate_student("ME102", "isha@univ.edu")
        .await
        .unwrap();
    let class = &state.ledger.list_classes().await.unwrap()[0];

    let stored = state
        .ledger
        .check_in_bluetooth(&student, class.id, &student.bluetooth_id)
        .await
        .unwrap();

    assert_eq!(stored.student_id, student.id);
    assert_eq!(stored.class_id, class.id);
    assert_eq!(stored.method, CheckInMethod::Bluetooth);
    assert_eq!(stored.status, AttendanceStatus::Present);
    assert_eq!(stored.device_id.as_deref(), Some(student.bluetooth_id.as_str()));
}

#[tokio::test]
async fn test_wrong_bluetooth_id_writes_nothing() {
    let state = setup().await;
    let students = state.ledger.list_students().await.unwrap();
    let class = &state.ledger.list_classes().await.unwrap()[0];

    let err = state
        .ledger
        .check_in_bluetooth(&students[0], class.id, &students[1].bluetooth_id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::WrongCredential));

    let events = state
        .ledger
        .list_attendance(TimeWindow::unbounded())
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_log_event_rejects_unknown_references() {
    let state = setup().await;
    let class = &state.ledger.list_classes().await.unwrap()[0];

    let err = state
        .ledger
        .log_event(NewEvent::teacher_mark(999, class.id))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ConstraintViolation(_)));

    let err = state
        .ledger
        .log_event(NewEvent::teacher_mark(1, 999))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ConstraintViolation(_)));

    let summary = state.ledger.summary().await.unwrap();
    assert_eq!(summary.total_events, 0);
}

#[tokio::test]
async fn test_log_event_rejects_bad_confidence() {
    let state = setup().await;

    let err = state
        .ledger
        .log_event(NewEvent::teacher_mark(1, 1).with_confidence(Some(1.5)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let state = setup().await;

    let first = state
        .ledger
        .log_event(NewEvent::teacher_mark(1, 1))
        .await
        .unwrap();
    let second = state
        .ledger
        .log_event(NewEvent::teacher_mark(1, 2).with_status(AttendanceStatus::Late))
        .await
        .unwrap();
    state
        .ledger
        .log_event(NewEvent::teacher_mark(2, 1))
        .await
        .unwrap();

    let history = state.ledger.attendance_for_student(1).await.unwrap();
    let ids: Vec<i32> = history.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(history[0].status, AttendanceStatus::Late);

    let all = state
        .ledger
        .list_attendance(TimeWindow::unbounded())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_list_attendance_rejects_inverted_window() {
    let state = setup().await;
    let now = chrono::Utc::now();

    let err = state
        .ledger
        .list_attendance(TimeWindow {
            since: Some(now),
            until: Some(now - chrono::Duration::hours(1)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn test_recent_attendance_returns_tail() {
    let state = setup().await;
    for student_id in 1..=4 {
        state
            .ledger
            .log_event(NewEvent::teacher_mark(student_id, 1))
            .await
            .unwrap();
    }

    let recent = state.ledger.recent_attendance(2).await.unwrap();
    let students: Vec<i32> = recent.iter().map(|e| e.student_id).collect();
    assert_eq!(students, vec![3, 4]);
}

#[tokio::test]
async fn test_shared_device_is_flagged() {
    let state = setup().await;
    let students = state.ledger.list_students().await.unwrap();
    let shared = students[0].bluetooth_id.clone();

    state
        .ledger
        .log_event(NewEvent::bluetooth(students[0].id, 1, shared.clone()))
        .await
        .unwrap();
    state
        .ledger
        .log_event(NewEvent::bluetooth(students[1].id, 1, shared))
        .await
        .unwrap();
    state
        .ledger
        .log_event(NewEvent::bluetooth(
            students[2].id,
            1,
            students[2].bluetooth_id.clone(),
        ))
        .await
        .unwrap();
    state
        .ledger
        .log_event(NewEvent::teacher_mark(students[3].id, 1))
        .await
        .unwrap();

    let flagged = state
        .ledger
        .flagged_events(TimeWindow::unbounded())
        .await
        .unwrap();
    let marks: Vec<bool> = flagged.iter().map(|f| f.suspicious).collect();
    assert_eq!(marks, vec![true, true, false, false]);
}

#[tokio::test]
async fn test_summary_counts() {
    let state = setup().await;

    let empty = state.ledger.summary().await.unwrap();
    assert_eq!(empty.total_students, 4);
    assert_eq!(empty.total_classes, 2);
    assert_eq!(empty.present_percent, None);

    state
        .ledger
        .log_event(NewEvent::teacher_mark(1, 1))
        .await
        .unwrap();
    state
        .ledger
        .log_event(NewEvent::teacher_mark(2, 1).with_status(AttendanceStatus::Absent))
        .await
        .unwrap();

    let summary = state.ledger.summary().await.unwrap();
    assert_eq!(summary.total_events, 2);
    assert_eq!(summary.present_events, 1);
    assert_eq!(summary.present_percent, Some(50.0));
}

fn parse_ts(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

/// Logs three bluetooth events a little apart; the first two share a device.
async fn log_spaced_events(state: &SharedState) -> Vec<DateTime<Utc>> {
    let students = state.ledger.list_students().await.unwrap();
    let shared = students[0].bluetooth_id.clone();
    let events = [
        NewEvent::bluetooth(students[0].id, 1, shared.clone()),
        NewEvent::bluetooth(students[1].id, 1, shared),
        NewEvent::bluetooth(students[2].id, 1, students[2].bluetooth_id.clone()),
    ];

    let mut stamps = Vec::new();
    for event in events {
        let stored = state.ledger.log_event(event).await.unwrap();
        stamps.push(parse_ts(&stored.ts));
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    stamps
}

async fn ids_in(
    state: &SharedState,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Vec<i32> {
    state
        .ledger
        .list_attendance(TimeWindow { since, until })
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect()
}

#[tokio::test]
async fn test_list_attendance_window_is_half_open() {
    let state = setup().await;
    let ts = log_spaced_events(&state).await;

    assert_eq!(ids_in(&state, Some(ts[0]), None).await, vec![1, 2, 3]);
    assert_eq!(ids_in(&state, None, Some(ts[0])).await, Vec::<i32>::new());
    assert_eq!(ids_in(&state, Some(ts[1]), Some(ts[2])).await, vec![2]);
    assert_eq!(ids_in(&state, None, Some(ts[2])).await, vec![1, 2]);
}

#[tokio::test]
async fn test_window_bounds_below_a_microsecond() {
    let state = setup().await;
    let ts = log_spaced_events(&state).await;
    let nudge = Duration::nanoseconds(500);

    assert_eq!(ids_in(&state, Some(ts[0] + nudge), None).await, vec![2, 3]);
    assert_eq!(ids_in(&state, None, Some(ts[0] + nudge)).await, vec![1]);
    assert_eq!(
        ids_in(&state, Some(ts[1] - nudge), Some(ts[1] + nudge)).await,
        vec![2]
    );
}

#[tokio::test]
async fn test_flagging_only_sees_events_in_window() {
    let state = setup().await;
    let ts = log_spaced_events(&state).await;

    let all = state
        .ledger
        .flagged_events(TimeWindow::unbounded())
        .await
        .unwrap();
    let marks: Vec<bool> = all.iter().map(|f| f.suspicious).collect();
    assert_eq!(marks, vec![true, true, false]);

    // The other event on the shared device falls before the window.
    let later = state
        .ledger
        .flagged_events(TimeWindow {
            since: Some(ts[1]),
            until: None,
        })
        .await
        .unwrap();
    let marks: Vec<(i32, bool)> = later.iter().map(|f| (f.event.id, f.suspicious)).collect();
    assert_eq!(marks, vec![(2, false), (3, false)]);
}
