//! User administration handlers. Admin only.

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserRole};
use crate::services::auth::Permission;
use crate::utils::errors::Result;
use crate::utils::helpers;
use crate::utils::logging::log_admin_action;
use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/admin/users
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let limit = helpers::clamp_limit(query.limit);
    let offset = helpers::calculate_offset(query.page.unwrap_or(1), limit);
    let users = state
        .services
        .user_service
        .list_users(query.role, limit, offset)
        .await?;

    Ok(ok(users))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let created = state.services.user_service.create_user(request).await?;
    log_admin_action(
        ctx.user_id(),
        "create_user",
        Some(&created.user.id.to_string()),
        None,
    );

    Ok(ok(created))
}

/// GET /api/admin/users/{id}
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let user = state.services.user_service.get_user(id).await?;
    Ok(ok(user))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let updated = state.services.user_service.update_user(id, request).await?;
    log_admin_action(ctx.user_id(), "update_user", Some(&id.to_string()), None);

    Ok(ok(updated))
}

/// DELETE /api/admin/users/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    state.services.user_service.deactivate_user(id).await?;
    log_admin_action(ctx.user_id(), "deactivate_user", Some(&id.to_string()), None);

    Ok(ok(serde_json::json!({ "deactivated": true })))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let mut stats = state.db.get_system_stats().await?;
    if let Some(map) = stats.as_object_mut() {
        map.insert(
            "notification_delivery".to_string(),
            serde_json::to_value(state.services.notification_service.get_stats())?,
        );
    }
    Ok(ok(stats))
}
