use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::validate_required;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Principal;

const PRINCIPAL_KEY: &str = "principal";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct TeacherLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct StudentLoginRequest {
    pub roll: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub principal: Principal,
    pub display_name: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires any logged-in principal and exposes it as an extension.
pub async fn require_principal(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = get_session_principal(&session).await?;
    Ok(run_as(principal, request, next).await)
}

/// Requires a teacher session; the resolved [`Teacher`](crate::models::roster::Teacher)
/// is inserted into request extensions.
pub async fn require_teacher(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = get_session_principal(&session).await?;
    let Principal::Teacher { id, .. } = principal else {
        return Err(ApiError::Forbidden("Teacher access required".to_string()));
    };

    let teacher = state.auth().teacher_by_id(id).await?;
    request.extensions_mut().insert(teacher);
    Ok(run_as(principal, request, next).await)
}

/// Requires a student session; the resolved [`Student`](crate::models::roster::Student)
/// is inserted into request extensions.
pub async fn require_student(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = get_session_principal(&session).await?;
    let Principal::Student { id, .. } = principal else {
        return Err(ApiError::Forbidden("Student access required".to_string()));
    };

    let student = state.auth().student_by_id(id).await?;
    request.extensions_mut().insert(student);
    Ok(run_as(principal, request, next).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/teacher/login
pub async fn teacher_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<TeacherLoginRequest>,
) -> Result<(Extension<Principal>, Json<ApiResponse<LoginResponse>>), ApiError> {
    validate_required("Username", &payload.username)?;
    validate_required("Password", &payload.password)?;

    let teacher = state
        .auth()
        .authenticate_teacher(&payload.username, &payload.password)
        .await
        .inspect_err(|_| tracing::info!(username = %payload.username, "Teacher login failed"))?;

    let principal = Principal::Teacher {
        id: teacher.id,
        username: teacher.username.clone(),
    };
    start_session(&session, &principal).await?;
    tracing::info!(%principal, "Teacher logged in");

    Ok((
        Extension(principal.clone()),
        Json(ApiResponse::success(LoginResponse {
            principal,
            display_name: teacher.username,
        })),
    ))
}

/// POST /auth/student/login
pub async fn student_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<StudentLoginRequest>,
) -> Result<(Extension<Principal>, Json<ApiResponse<LoginResponse>>), ApiError> {
    validate_required("Roll", &payload.roll)?;
    validate_required("Email", &payload.email)?;

    let student = state
        .auth()
        .authenticate_student(&payload.roll, &payload.email)
        .await
        .inspect_err(|_| tracing::info!(roll = %payload.roll, "Student login failed"))?;

    let principal = Principal::Student {
        id: student.id,
        roll: student.roll.clone(),
    };
    start_session(&session, &principal).await?;
    tracing::info!(%principal, "Student logged in");

    Ok((
        Extension(principal.clone()),
        Json(ApiResponse::success(LoginResponse {
            principal,
            display_name: student.name,
        })),
    ))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
pub async fn get_current_principal(
    session: Session,
) -> Result<Json<ApiResponse<Principal>>, ApiError> {
    let principal = get_session_principal(&session).await?;
    Ok(Json(ApiResponse::success(principal)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Runs the request as `principal`. The principal is visible to handlers as
/// a request extension and to the logging middleware as a response extension.
async fn run_as(principal: Principal, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(principal.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

async fn start_session(session: &Session, principal: &Principal) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(PRINCIPAL_KEY, principal)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

/// Get the principal from the session, returns error if not authenticated
async fn get_session_principal(session: &Session) -> Result<Principal, ApiError> {
    session
        .get::<Principal>(PRINCIPAL_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
