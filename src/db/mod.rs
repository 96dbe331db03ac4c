use crate::config::{SecurityConfig, SeedConfig};
use crate::domain::TimeWindow;
use crate::models::attendance::{AttendanceEvent, NewEvent};
use crate::models::roster::{Class, Student, Teacher};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;
pub mod seed;

pub use seed::SeedReport;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Private in-memory database, mostly for tests and dry runs.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
        let in_memory = path_str.starts_with(":memory:");

        // Each sqlite memory connection is its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn teacher_repo(&self) -> repositories::teacher::TeacherRepository {
        repositories::teacher::TeacherRepository::new(self.conn.clone())
    }

    fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    fn class_repo(&self) -> repositories::class::ClassRepository {
        repositories::class::ClassRepository::new(self.conn.clone())
    }

    fn attendance_repo(&self) -> repositories::attendance::AttendanceRepository {
        repositories::attendance::AttendanceRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    pub async fn seed_if_empty(
        &self,
        seed: &SeedConfig,
        security: &SecurityConfig,
    ) -> Result<SeedReport> {
        seed::seed_if_empty(&self.conn, seed, security).await
    }

    // ------------------------------------------------------------------
    // Teachers
    // ------------------------------------------------------------------

    pub async fn count_teachers(&self) -> Result<u64> {
        self.teacher_repo().count().await
    }

    pub async fn get_teacher(&self, id: i32) -> Result<Option<Teacher>> {
        self.teacher_repo().get_by_id(id).await
    }

    pub async fn verify_teacher_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Teacher>> {
        self.teacher_repo().verify_password(username, password).await
    }

    // ------------------------------------------------------------------
    // Students & classes
    // ------------------------------------------------------------------

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.student_repo().list().await
    }

    pub async fn get_student(&self, id: i32) -> Result<Option<Student>> {
        self.student_repo().get(id).await
    }

    pub async fn find_student_by_credentials(
        &self,
        roll: &str,
        email: &str,
    ) -> Result<Option<Student>> {
        self.student_repo().find_by_credentials(roll, email).await
    }

    pub async fn count_students(&self) -> Result<u64> {
        self.student_repo().count().await
    }

    pub async fn list_classes(&self) -> Result<Vec<Class>> {
        self.class_repo().list().await
    }

    pub async fn get_class(&self, id: i32) -> Result<Option<Class>> {
        self.class_repo().get(id).await
    }

    pub async fn count_classes(&self) -> Result<u64> {
        self.class_repo().count().await
    }

    // ------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------

    pub async fn append_attendance(&self, event: &NewEvent, ts: &str) -> Result<AttendanceEvent> {
        self.attendance_repo().append(event, ts).await
    }

    pub async fn list_attendance(&self, window: TimeWindow) -> Result<Vec<AttendanceEvent>> {
        self.attendance_repo().list(window).await
    }

    pub async fn attendance_for_student(&self, student_id: i32) -> Result<Vec<AttendanceEvent>> {
        self.attendance_repo().for_student(student_id).await
    }

    pub async fn recent_attendance(&self, limit: u64) -> Result<Vec<AttendanceEvent>> {
        self.attendance_repo().recent(limit).await
    }

    pub async fn attendance_counts(&self) -> Result<(u64, u64)> {
        self.attendance_repo().counts().await
    }
}
