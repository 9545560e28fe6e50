//! Dashboard, health report and liveness handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::services::auth::Permission;
use crate::utils::errors::Result;
use axum::extract::State;

/// GET /api/dashboard
///
/// Role-shaped summary for the landing page.
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    let payload = state.services.report_service.dashboard(&ctx).await?;
    Ok(ok(payload))
}

/// GET /api/admin/reports/health
///
/// Health classification for every extracurricular. Admin only.
pub async fn health_report(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    state.services.auth_service.require_permission(&ctx, Permission::Admin)?;

    let report = state.services.report_service.health_overview().await?;
    Ok(ok(report))
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn health(
    State(state): State<AppState>,
) -> Result<axum::Json<serde_json::Value>> {
    let database_ok = state.db.health_check().await.is_ok();
    let services = state.services.health_check().await;

    Ok(ok(serde_json::json!({
        "status": if database_ok && services.is_healthy() { "ok" } else { "degraded" },
        "database": database_ok,
        "identity_provider": services.identity_reachable,
        "issues": services.get_issues(),
    })))
}
