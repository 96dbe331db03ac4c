//! Roster reads: students and classes.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, StudentDto};
use crate::models::attendance::AttendanceEvent;
use crate::models::roster::Class;

/// GET /students
pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StudentDto>>>, ApiError> {
    let students = state.ledger().list_students().await?;
    Ok(Json(ApiResponse::success(
        students.into_iter().map(StudentDto::from).collect(),
    )))
}

/// GET /students/{id}
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    let id = validate_id("student", id)?;
    let student = state.ledger().get_student(id).await?;
    Ok(Json(ApiResponse::success(student.into())))
}

/// GET /students/{id}/attendance
pub async fn student_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<AttendanceEvent>>>, ApiError> {
    let id = validate_id("student", id)?;
    // 404 for unknown students rather than an empty history.
    state.ledger().get_student(id).await?;
    let events = state.ledger().attendance_for_student(id).await?;
    Ok(Json(ApiResponse::success(events)))
}

/// GET /classes
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Class>>>, ApiError> {
    let classes = state.ledger().list_classes().await?;
    Ok(Json(ApiResponse::success(classes)))
}
