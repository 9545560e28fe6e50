//! Notification and preference handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::preferences::UpdatePreferencesRequest;
use crate::utils::errors::{Result, SixkulError};
use crate::utils::helpers;
use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub unread_only: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let limit = helpers::clamp_limit(query.limit);
    let offset = helpers::calculate_offset(query.page.unwrap_or(1), limit);
    let notifications = state
        .db
        .notifications
        .list_by_user(ctx.user_id(), query.unread_only.unwrap_or(false), limit, offset)
        .await?;
    let unread = state.db.notifications.count_unread(ctx.user_id()).await?;

    Ok(ok(serde_json::json!({
        "notifications": notifications,
        "unread": unread,
    })))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    let notification = state
        .db
        .notifications
        .mark_read(id, ctx.user_id())
        .await?
        .ok_or(SixkulError::NotificationNotFound { id })?;

    Ok(ok(notification))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    let updated = state.db.notifications.mark_all_read(ctx.user_id()).await?;
    Ok(ok(serde_json::json!({ "marked_read": updated })))
}

/// GET /api/preferences
///
/// Users who never saved preferences get the defaults.
pub async fn get_preferences(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    match state.db.preferences.find_by_user(ctx.user_id()).await? {
        Some(prefs) => Ok(ok(prefs)),
        None => Ok(ok(serde_json::json!({
            "user_id": ctx.user_id(),
            "notify_enrollment": true,
            "notify_announcements": true,
            "notify_session_reminders": true,
            "language": state.settings.notifications.default_language,
        }))),
    }
}

/// PUT /api/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    if let Some(language) = &request.language {
        if !state
            .settings
            .notifications
            .supported_languages
            .contains(language)
        {
            return Err(SixkulError::InvalidInput(format!(
                "unsupported language: {language}"
            )));
        }
    }

    let prefs = state.db.preferences.upsert(ctx.user_id(), &request).await?;
    Ok(ok(prefs))
}
