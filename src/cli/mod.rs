//! CLI module - Command-line interface for Rollcall
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::domain::AttendanceStatus;

/// Rollcall - Attendance ledger
/// Teacher marking, bluetooth-id check-in and proxy flagging
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create tables and seed the default roster if empty
    Seed,

    /// List students
    #[command(alias = "ls")]
    Students,

    /// List classes
    Classes,

    /// List attendance events in insertion order
    Attendance {
        /// Only events at or after this RFC 3339 time
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        /// Only events before this RFC 3339 time
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },

    /// Show one student's attendance, newest first
    #[command(alias = "h")]
    History {
        /// Student ID
        student_id: i32,
    },

    /// Mark a student as a teacher
    Mark {
        /// Student ID
        student_id: i32,
        /// Class ID
        class_id: i32,
        /// Teacher username
        #[arg(long, short)]
        username: String,
        /// Teacher password
        #[arg(long, short)]
        password: String,
        /// present, late or absent
        #[arg(long, default_value = "present")]
        status: AttendanceStatus,
    },

    /// Show events that share a device id with another event
    Flagged {
        /// Only print suspicious events
        #[arg(long)]
        only_suspicious: bool,
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },

    /// Print dashboard counters
    Summary,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
