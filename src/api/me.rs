//! Student self-service endpoints. The student comes from the session, never
//! from the request body.

use axum::{Extension, Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, CheckInRequest};
use crate::models::attendance::AttendanceEvent;
use crate::models::roster::Student;

/// GET /me/profile
///
/// Includes the student's own bluetooth id.
pub async fn get_profile(
    Extension(student): Extension<Student>,
) -> Json<ApiResponse<Student>> {
    Json(ApiResponse::success(student))
}

/// GET /me/attendance
pub async fn my_attendance(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<Student>,
) -> Result<Json<ApiResponse<Vec<AttendanceEvent>>>, ApiError> {
    let events = state.ledger().attendance_for_student(student.id).await?;
    Ok(Json(ApiResponse::success(events)))
}

/// POST /me/check-in
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<Student>,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceEvent>>), ApiError> {
    let class_id = validate_id("class", payload.class_id)?;

    let stored = state
        .ledger()
        .check_in_bluetooth(&student, class_id, &payload.bluetooth_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(stored))))
}
