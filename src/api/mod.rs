use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod attendance;
pub mod auth;
mod error;
mod me;
mod observability;
mod roster;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn crate::services::LedgerService> {
        &self.shared.ledger
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_idle_minutes,
        )));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = Router::new()
        .merge(teacher_routes(state.clone()))
        .merge(student_routes(state.clone()))
        .merge(principal_routes())
        .route("/auth/teacher/login", post(auth::teacher_login))
        .route("/auth/student/login", post(auth::student_login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(system::get_health))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn teacher_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/students", get(roster::list_students))
        .route("/students/{id}", get(roster::get_student))
        .route("/students/{id}/attendance", get(roster::student_attendance))
        .route("/attendance", get(attendance::list_attendance))
        .route("/attendance/recent", get(attendance::recent_attendance))
        .route("/attendance/flagged", get(attendance::flagged_attendance))
        .route("/attendance/mark", post(attendance::mark_attendance))
        .route_layer(middleware::from_fn_with_state(state, auth::require_teacher))
}

fn student_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me/profile", get(me::get_profile))
        .route("/me/attendance", get(me::my_attendance))
        .route("/me/check-in", post(me::check_in))
        .route_layer(middleware::from_fn_with_state(state, auth::require_student))
}

fn principal_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_principal))
        .route("/classes", get(roster::list_classes))
        .route("/dashboard", get(system::get_dashboard))
        .route_layer(middleware::from_fn(auth::require_principal))
}
