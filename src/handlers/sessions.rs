//! Session handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::schedule::{CreateSessionRequest, UpdateSessionRequest};
use crate::utils::errors::Result;
use axum::extract::{Json, Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    pub session_date: NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub location: Option<String>,
    pub topic: Option<String>,
}

/// GET /api/extracurriculars/{id}/sessions
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let sessions = state
        .services
        .scheduling_service
        .list_sessions(extracurricular_id, query.from, query.to)
        .await?;

    Ok(ok(sessions))
}

/// POST /api/extracurriculars/{id}/sessions
///
/// Creates an ad hoc session outside the weekly schedule.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(extracurricular_id): Path<i64>,
    Json(body): Json<CreateSessionBody>,
) -> Result<axum::Json<serde_json::Value>> {
    let request = CreateSessionRequest {
        extracurricular_id,
        session_date: body.session_date,
        start_time: body.start_time,
        end_time: body.end_time,
        location: body.location,
        topic: body.topic,
    };

    let session = state
        .services
        .scheduling_service
        .create_session(&ctx, request)
        .await?;

    Ok(ok(session))
}

/// PUT /api/sessions/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let session = state
        .services
        .scheduling_service
        .update_session(&ctx, id, request)
        .await?;

    Ok(ok(session))
}

/// POST /api/sessions/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    let session = state.services.scheduling_service.cancel_session(&ctx, id).await?;
    Ok(ok(session))
}
