//! Enrollment handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::enrollment::{EnrollmentDecisionRequest, EnrollmentStatus};
use crate::services::auth::Permission;
use crate::utils::errors::{Result, SixkulError};
use crate::utils::logging::log_enrollment_event;
use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListEnrollmentsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DeactivateRequest {
    pub note: Option<String>,
}

/// POST /api/extracurriculars/{id}/enroll
///
/// Students apply for themselves.
pub async fn enroll(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    if ctx.permission != Permission::Siswa {
        return Err(SixkulError::PermissionDenied(
            "only students may apply to an extracurricular".to_string(),
        ));
    }

    let enrollment = state
        .services
        .enrollment_service
        .enroll(ctx.user_id(), extracurricular_id)
        .await?;
    log_enrollment_event(enrollment.id, "applied", ctx.user_id(), None);

    Ok(ok(enrollment))
}

/// GET /api/extracurriculars/{id}/enrollments
pub async fn list_for_extracurricular(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
    Query(query): Query<ListEnrollmentsQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(raw.parse::<EnrollmentStatus>().map_err(|_| {
            SixkulError::InvalidInput(format!("unknown enrollment status: {raw}"))
        })?),
        None => None,
    };

    let enrollments = state
        .services
        .enrollment_service
        .list_for_extracurricular(&ctx, extracurricular_id, status)
        .await?;

    Ok(ok(enrollments))
}

/// POST /api/enrollments/{id}/decision
pub async fn decide(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<EnrollmentDecisionRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let enrollment = state
        .services
        .enrollment_service
        .decide(&ctx, id, request.approve, request.note)
        .await?;

    let event = if request.approve { "approved" } else { "rejected" };
    log_enrollment_event(id, event, ctx.user_id(), None);

    Ok(ok(enrollment))
}

/// DELETE /api/enrollments/{id}
///
/// Students leave their own enrollment; staff deactivate members they manage.
pub async fn deactivate(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    request: Option<Json<DeactivateRequest>>,
) -> Result<axum::Json<serde_json::Value>> {
    let note = request.and_then(|Json(r)| r.note);
    let enrollment = state
        .services
        .enrollment_service
        .deactivate(&ctx, id, note)
        .await?;
    log_enrollment_event(id, "deactivated", ctx.user_id(), None);

    Ok(ok(enrollment))
}

/// GET /api/enrollments/mine
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    let enrollments = state
        .services
        .enrollment_service
        .list_mine(ctx.user_id())
        .await?;

    Ok(ok(enrollments))
}
