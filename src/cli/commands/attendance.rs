//! Attendance command handlers

use chrono::{DateTime, Utc};

use super::{open, print_rule};
use crate::config::Config;
use crate::domain::{AttendanceStatus, TimeWindow};
use crate::models::attendance::{AttendanceEvent, NewEvent};

fn print_event(event: &AttendanceEvent, marker: &str) {
    let device = event.device_id.as_deref().unwrap_or("-");
    let confidence = event
        .confidence
        .map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));
    println!(
        "{marker} #{} {} student={} class={} {} {} device={} conf={}",
        event.id,
        event.ts,
        event.student_id,
        event.class_id,
        event.method,
        event.status,
        device,
        confidence
    );
}

pub async fn cmd_attendance(
    config: &Config,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let state = open(config).await?;
    let events = state
        .ledger
        .list_attendance(TimeWindow { since, until })
        .await?;

    if events.is_empty() {
        println!("No attendance yet.");
        return Ok(());
    }

    println!("Attendance ({} events)", events.len());
    print_rule();
    for event in &events {
        print_event(event, "•");
    }
    Ok(())
}

pub async fn cmd_history(config: &Config, student_id: i32) -> anyhow::Result<()> {
    let state = open(config).await?;
    let student = state.ledger.get_student(student_id).await?;
    let events = state.ledger.attendance_for_student(student_id).await?;

    println!("{} ({}) - {} events", student.name, student.roll, events.len());
    print_rule();
    for event in &events {
        print_event(event, "•");
    }
    Ok(())
}

pub async fn cmd_mark(
    config: &Config,
    username: &str,
    password: &str,
    student_id: i32,
    class_id: i32,
    status: AttendanceStatus,
) -> anyhow::Result<()> {
    let state = open(config).await?;
    let teacher = state.auth.authenticate_teacher(username, password).await?;

    let event = NewEvent::teacher_mark(student_id, class_id).with_status(status);
    let stored = state.ledger.log_event(event).await?;

    println!(
        "✓ {} marked student {} {} in class {} (event #{})",
        teacher.username, stored.student_id, stored.status, stored.class_id, stored.id
    );
    Ok(())
}

pub async fn cmd_flagged(
    config: &Config,
    only_suspicious: bool,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let state = open(config).await?;
    let flagged = state
        .ledger
        .flagged_events(TimeWindow { since, until })
        .await?;

    let suspicious = flagged.iter().filter(|f| f.suspicious).count();
    println!(
        "Proxy check: {} suspicious of {} events",
        suspicious,
        flagged.len()
    );
    print_rule();

    for f in flagged.iter().filter(|f| f.suspicious || !only_suspicious) {
        print_event(&f.event, if f.suspicious { "⚠" } else { "•" });
    }

    println!();
    println!("Legend: ⚠ device id shared with another event");
    Ok(())
}

pub async fn cmd_summary(config: &Config) -> anyhow::Result<()> {
    let state = open(config).await?;
    let summary = state.ledger.summary().await?;

    println!("Dashboard");
    print_rule();
    println!("Total students:     {}", summary.total_students);
    println!("Classes:            {}", summary.total_classes);
    println!("Attendance records: {}", summary.total_events);
    match summary.present_percent {
        Some(pct) => println!("Present:            {pct:.1}%"),
        None => println!("No attendance yet"),
    }
    Ok(())
}
