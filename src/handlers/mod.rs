//! HTTP handlers and routing
//!
//! All responses use the JSON envelope `{ "success": true, "data": ... }`
//! on success; errors render through `SixkulError::into_response`.

pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod enrollments;
pub mod extracurriculars;
pub mod notifications;
pub mod schedules;
pub mod sessions;
pub mod users;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::middleware::LoginRateLimiter;
use crate::services::ServiceFactory;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderValue, Method};
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub db: DatabaseService,
    pub settings: Settings,
    pub login_limiter: LoginRateLimiter,
}

/// Success envelope used by every handler
pub fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings);

    Router::new()
        // Authentication
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // User administration
        .route("/api/admin/users", get(users::list).post(users::create))
        .route(
            "/api/admin/users/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
        .route("/api/admin/stats", get(users::stats))
        // Extracurriculars
        .route(
            "/api/extracurriculars",
            get(extracurriculars::list).post(extracurriculars::create),
        )
        .route(
            "/api/extracurriculars/{id}",
            get(extracurriculars::show)
                .put(extracurriculars::update)
                .delete(extracurriculars::remove),
        )
        .route(
            "/api/extracurriculars/{id}/health",
            get(extracurriculars::health),
        )
        .route("/api/admin/reports/health", get(dashboard::health_report))
        // Schedules and sessions
        .route(
            "/api/extracurriculars/{id}/schedules",
            get(schedules::list).post(schedules::create),
        )
        .route(
            "/api/schedules/{id}",
            put(schedules::update).delete(schedules::remove),
        )
        .route(
            "/api/schedules/{id}/sessions/generate",
            post(schedules::generate_sessions),
        )
        .route(
            "/api/extracurriculars/{id}/sessions",
            get(sessions::list).post(sessions::create),
        )
        .route("/api/sessions/{id}", put(sessions::update))
        .route("/api/sessions/{id}/cancel", post(sessions::cancel))
        // Enrollments
        .route(
            "/api/extracurriculars/{id}/enroll",
            post(enrollments::enroll),
        )
        .route(
            "/api/extracurriculars/{id}/enrollments",
            get(enrollments::list_for_extracurricular),
        )
        .route(
            "/api/enrollments/{id}/decision",
            post(enrollments::decide),
        )
        .route("/api/enrollments/{id}", delete(enrollments::deactivate))
        .route("/api/enrollments/mine", get(enrollments::mine))
        // Attendance
        .route("/api/attendance/batch", post(attendance::mark_batch))
        .route(
            "/api/sessions/{id}/attendance",
            get(attendance::list_for_session),
        )
        .route("/api/attendance/mine", get(attendance::mine))
        .route(
            "/api/extracurriculars/{id}/attendance/recap",
            get(attendance::recap),
        )
        // Announcements
        .route(
            "/api/announcements",
            get(announcements::list).post(announcements::create),
        )
        .route(
            "/api/announcements/{id}",
            put(announcements::update).delete(announcements::remove),
        )
        // Notifications and preferences
        .route("/api/notifications", get(notifications::list))
        .route(
            "/api/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/preferences",
            get(notifications::get_preferences).put(notifications::update_preferences),
        )
        // Dashboard and liveness
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/health", get(dashboard::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, COOKIE])
        .allow_credentials(true);

    for origin in &settings.server.cors_allow_origins {
        if let Ok(value) = origin.parse::<HeaderValue>() {
            cors = cors.allow_origin(value);
        }
    }

    cors
}
