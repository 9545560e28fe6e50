//! Extracurricular handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::models::extracurricular::{CreateExtracurricularRequest, UpdateExtracurricularRequest};
use crate::services::auth::Permission;
use crate::utils::errors::Result;
use crate::utils::helpers;
use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/extracurriculars
///
/// Visible to every authenticated role; students browse this catalogue.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_ctx): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<axum::Json<serde_json::Value>> {
    let limit = helpers::clamp_limit(query.limit);
    let offset = helpers::calculate_offset(query.page.unwrap_or(1), limit);
    let list = state
        .services
        .extracurricular_service
        .list(query.category.as_deref(), limit, offset)
        .await?;

    Ok(ok(list))
}

/// POST /api/extracurriculars
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(request): Json<CreateExtracurricularRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let created = state.services.extracurricular_service.create(request).await?;
    Ok(ok(created))
}

/// GET /api/extracurriculars/{id}
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(_ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    let ekskul = state.services.extracurricular_service.get(id).await?;
    let active_members = state.db.enrollments.count_active(id).await?;

    Ok(ok(serde_json::json!({
        "extracurricular": ekskul,
        "active_members": active_members,
    })))
}

/// PUT /api/extracurriculars/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateExtracurricularRequest>,
) -> Result<axum::Json<serde_json::Value>> {
    // Pembina may tune their own activity but not reassign it.
    if request.pembina_id.is_some() {
        state.services.auth_service.require_permission(&ctx, Permission::Admin)?;
    }
    state
        .services
        .extracurricular_service
        .assert_can_manage(&ctx, id)
        .await?;

    let updated = state.services.extracurricular_service.update(id, request).await?;
    Ok(ok(updated))
}

/// DELETE /api/extracurriculars/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    state.services.extracurricular_service.delete(id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

/// GET /api/extracurriculars/{id}/health
pub async fn health(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(id): Path<i64>,
) -> Result<axum::Json<serde_json::Value>> {
    state
        .services
        .extracurricular_service
        .assert_can_manage(&ctx, id)
        .await?;

    let report = state.services.report_service.extracurricular_health(id).await?;
    Ok(ok(report))
}
