//! Schedule handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::schedule::{
    CreateScheduleRequest, GenerateSessionsRequest, UpdateScheduleRequest,
};
use crate::utils::errors::{Result, SixkulError};
use axum::extract::{Json, Path, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateScheduleBody {
    pub day_of_week: i16,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub location: Option<String>,
}

/// GET /api/extracurriculars/{id}/schedules
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    let schedules = state
        .services
        .scheduling_service
        .list_schedules(extracurricular_id)
        .await?;

    Ok(ok(schedules))
}

/// POST /api/extracurriculars/{id}/schedules
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
    Json(body): Json<CreateScheduleBody>,
) -> Result<axum::Json<serde_json::Value>> {
    let request = CreateScheduleRequest {
        extracurricular_id,
        day_of_week: body.day_of_week,
        start_time: body.start_time,
        end_time: body.end_time,
        location: body.location,
    };

    let schedule = state
        .services
        .scheduling_service
        .create_schedule(&ctx, request)
        .await?;

    Ok(ok(schedule))
}

/// PUT /api/schedules/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let schedule = state
        .services
        .scheduling_service
        .update_schedule(&ctx, id, request)
        .await?;

    Ok(ok(schedule))
}

/// DELETE /api/schedules/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.scheduling_service.delete_schedule(&ctx, id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

/// POST /api/schedules/{id}/sessions/generate
pub async fn generate_sessions(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<GenerateSessionsRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    if request.from > request.to {
        return Err(SixkulError::InvalidInput(
            "generation range start is after its end".to_string(),
        ));
    }

    let sessions = state
        .services
        .scheduling_service
        .generate_sessions(&ctx, id, request.from, request.to)
        .await?;

    Ok(ok(serde_json::json!({
        "created": sessions.len(),
        "sessions": sessions,
    })))
}
