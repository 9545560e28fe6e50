//! Attendance handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::attendance::BatchAttendanceRequest;
use crate::utils::errors::Result;
use crate::utils::helpers;
use crate::utils::logging::log_attendance_batch;
use axum::extract::{Json, Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MineQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecapQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// POST /api/attendance/batch
pub async fn mark_batch(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(request): Json<BatchAttendanceRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let session_id = request.session_id;
    let written = state.services.attendance_service.mark_batch(&ctx, request).await?;
    log_attendance_batch(session_id, ctx.user_id(), written.len());

    Ok(ok(serde_json::json!({
        "recorded": written.len(),
        "attendance": written,
    })))
}

/// GET /api/sessions/{id}/attendance
pub async fn list_for_session(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(session_id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    let attendance = state
        .services
        .attendance_service
        .list_for_session(&ctx, session_id)
        .await?;

    Ok(ok(attendance))
}

/// GET /api/attendance/mine
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Query(query): Query<MineQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let limit = helpers::clamp_limit(query.limit);
    let offset = helpers::calculate_offset(query.page.unwrap_or(1), limit);
    let attendance = state
        .services
        .attendance_service
        .list_mine(ctx.user_id(), query.from, query.to, limit, offset)
        .await?;

    let mut summary: std::collections::HashMap<&str, i64> = std::collections::HashMap::new();
    for row in &attendance {
        *summary.entry(row.status.as_str()).or_insert(0) += 1;
    }

    Ok(ok(serde_json::json!({
        "attendance": attendance,
        "summary": summary,
    })))
}

/// GET /api/extracurriculars/{id}/attendance/recap
pub async fn recap(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
    Query(query): Query<RecapQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let recap = state
        .services
        .attendance_service
        .recap(&ctx, extracurricular_id, query.from, query.to)
        .await?;

    Ok(ok(serde_json::json!({
        "from": query.from,
        "to": query.to,
        "students": recap,
    })))
}
