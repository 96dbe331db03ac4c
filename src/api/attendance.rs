//! Teacher-facing attendance endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState, LimitQuery, MarkAttendanceRequest, WindowQuery};
use crate::models::attendance::{AttendanceEvent, FlaggedEvent, NewEvent};
use crate::models::roster::Teacher;

/// GET /attendance
pub async fn list_attendance(
    State(state): State<Arc<AppState>>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceEvent>>>, ApiError> {
    let events = state.ledger().list_attendance(window.into()).await?;
    Ok(Json(ApiResponse::success(events)))
}

/// GET /attendance/recent
pub async fn recent_attendance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceEvent>>>, ApiError> {
    let limit = validate_limit(query.limit)?;
    let events = state.ledger().recent_attendance(limit).await?;
    Ok(Json(ApiResponse::success(events)))
}

/// GET /attendance/flagged
///
/// Every event in the window with a `suspicious` flag for shared device ids.
pub async fn flagged_attendance(
    State(state): State<Arc<AppState>>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<FlaggedEvent>>>, ApiError> {
    let flagged = state.ledger().flagged_events(window.into()).await?;
    Ok(Json(ApiResponse::success(flagged)))
}

/// POST /attendance/mark
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    Extension(teacher): Extension<Teacher>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceEvent>>), ApiError> {
    let student_id = validate_id("student", payload.student_id)?;
    let class_id = validate_id("class", payload.class_id)?;

    let event = NewEvent::teacher_mark(student_id, class_id)
        .with_status(payload.status)
        .with_confidence(payload.confidence);

    let stored = state.ledger().log_event(event).await?;
    tracing::info!(
        teacher = %teacher.username,
        event_id = stored.id,
        "Attendance marked by teacher"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(stored))))
}
