use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use crate::domain::{AttendanceStatus, TimeWindow, format_bound};
use crate::entities::attendance;
use crate::models::attendance::{AttendanceEvent, NewEvent};

impl TryFrom<attendance::Model> for AttendanceEvent {
    type Error = anyhow::Error;

    fn try_from(model: attendance::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            student_id: model.student_id,
            class_id: model.class_id,
            method: model
                .method
                .parse()
                .with_context(|| format!("Corrupt attendance row {}", model.id))?,
            status: model
                .status
                .parse()
                .with_context(|| format!("Corrupt attendance row {}", model.id))?,
            ts: model.ts,
            device_id: model.device_id,
            confidence: model.confidence,
        })
    }
}

/// Append-only access to the `attendance` table. There is deliberately no
/// update or delete here.
pub struct AttendanceRepository {
    conn: DatabaseConnection,
}

impl AttendanceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_rows(rows: Vec<attendance::Model>) -> Result<Vec<AttendanceEvent>> {
        rows.into_iter().map(AttendanceEvent::try_from).collect()
    }

    fn windowed(window: TimeWindow) -> Select<attendance::Entity> {
        let mut query = attendance::Entity::find();
        if let Some(since) = window.since {
            query = query.filter(attendance::Column::Ts.gte(format_bound(since)));
        }
        if let Some(until) = window.until {
            query = query.filter(attendance::Column::Ts.lt(format_bound(until)));
        }
        query
    }

    pub async fn append(&self, event: &NewEvent, ts: &str) -> Result<AttendanceEvent> {
        let active = attendance::ActiveModel {
            student_id: Set(event.student_id),
            class_id: Set(event.class_id),
            ts: Set(ts.to_string()),
            method: Set(event.method.as_str().to_string()),
            device_id: Set(event.device_id.clone()),
            confidence: Set(event.confidence),
            status: Set(event.status.as_str().to_string()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert attendance event")?;

        AttendanceEvent::try_from(model)
    }

    /// Events in insertion order.
    pub async fn list(&self, window: TimeWindow) -> Result<Vec<AttendanceEvent>> {
        let rows = Self::windowed(window)
            .order_by_asc(attendance::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list attendance")?;

        Self::map_rows(rows)
    }

    /// Newest first; rows sharing a timestamp fall back to id order.
    pub async fn for_student(&self, student_id: i32) -> Result<Vec<AttendanceEvent>> {
        let rows = attendance::Entity::find()
            .filter(attendance::Column::StudentId.eq(student_id))
            .order_by_desc(attendance::Column::Ts)
            .order_by_desc(attendance::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query attendance for student")?;

        Self::map_rows(rows)
    }

    /// The last `limit` events, returned oldest to newest.
    pub async fn recent(&self, limit: u64) -> Result<Vec<AttendanceEvent>> {
        let mut rows = attendance::Entity::find()
            .order_by_desc(attendance::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query recent attendance")?;
        rows.reverse();

        Self::map_rows(rows)
    }

    /// `(total, present)` event counts.
    pub async fn counts(&self) -> Result<(u64, u64)> {
        let total = attendance::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count attendance")?;

        let present = attendance::Entity::find()
            .filter(attendance::Column::Status.eq(AttendanceStatus::Present.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count present attendance")?;

        Ok((total, present))
    }
}
