//! Announcement handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::announcement::{CreateAnnouncementRequest, UpdateAnnouncementRequest};
use crate::utils::errors::Result;
use crate::utils::helpers;
use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub extracurricular_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/announcements
///
/// Students see global announcements plus those of their active enrollments.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let limit = helpers::clamp_limit(query.limit);
    let offset = helpers::calculate_offset(query.page.unwrap_or(1), limit);
    let announcements = state
        .services
        .announcement_service
        .list_visible(&ctx, query.extracurricular_id, limit, offset)
        .await?;

    Ok(ok(announcements))
}

/// POST /api/announcements
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let announcement = state
        .services
        .announcement_service
        .publish(&ctx, request)
        .await?;

    Ok(ok(announcement))
}

/// PUT /api/announcements/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    let announcement = state
        .services
        .announcement_service
        .update(&ctx, id, request)
        .await?;

    Ok(ok(announcement))
}

/// DELETE /api/announcements/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.announcement_service.delete(&ctx, id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}
