//! Reporting service
//!
//! Activity health classification over a rolling window, plus the role-based
//! dashboard payloads.

use crate::database::DatabaseService;
use crate::models::extracurricular::{ExtracurricularHealth, HealthStatus};
use crate::models::schedule::SessionStatus;
use crate::services::auth::{AuthContext, Permission};
use crate::utils::errors::Result;
use chrono::{Duration, Utc};
use tracing::debug;

/// Rolling window used for health classification.
pub const HEALTH_WINDOW_DAYS: i64 = 30;

/// Classify an extracurricular from its recent numbers.
///
/// No sessions in the window means the activity is dormant regardless of
/// its membership. `attendance_rate` is HADIR over all recorded rows, None
/// when nothing was recorded.
pub fn classify_health(
    active_members: i64,
    capacity: i32,
    sessions_held: i64,
    attendance_rate: Option<f64>,
) -> HealthStatus {
    if sessions_held == 0 {
        return HealthStatus::Inactive;
    }

    let rate = attendance_rate.unwrap_or(0.0);
    if active_members < 5 || rate < 0.4 {
        return HealthStatus::Critical;
    }
    if rate < 0.7 || active_members * 2 < capacity as i64 {
        return HealthStatus::NeedsAttention;
    }

    HealthStatus::Healthy
}

#[derive(Debug, Clone)]
pub struct ReportService {
    db: DatabaseService,
}

impl ReportService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Health report for one extracurricular over the last 30 days
    pub async fn extracurricular_health(
        &self,
        extracurricular_id: i64,
    ) -> Result<ExtracurricularHealth> {
        let ekskul = self
            .db
            .extracurriculars
            .find_by_id(extracurricular_id)
            .await?
            .ok_or(crate::utils::errors::SixkulError::ExtracurricularNotFound {
                id: extracurricular_id,
            })?;

        let to = Utc::now().date_naive();
        let from = to - Duration::days(HEALTH_WINDOW_DAYS);

        let active_members = self.db.enrollments.count_active(ekskul.id).await?;
        let sessions_held = self
            .db
            .sessions
            .count_held_in_window(ekskul.id, from, to)
            .await?;
        let (total, hadir) = self.db.attendance.window_counts(ekskul.id, from, to).await?;
        let attendance_rate = if total > 0 {
            Some(hadir as f64 / total as f64)
        } else {
            None
        };

        let status = classify_health(active_members, ekskul.capacity, sessions_held, attendance_rate);
        debug!(
            extracurricular_id = ekskul.id,
            status = ?status,
            active_members = active_members,
            sessions_held = sessions_held,
            "Health computed"
        );

        Ok(ExtracurricularHealth {
            extracurricular_id: ekskul.id,
            name: ekskul.name,
            status,
            active_members,
            capacity: ekskul.capacity,
            sessions_held,
            attendance_rate,
        })
    }

    /// Health report across all extracurriculars
    pub async fn health_overview(&self) -> Result<Vec<ExtracurricularHealth>> {
        let all = self.db.extracurriculars.list(None, 1000, 0).await?;
        futures::future::try_join_all(
            all.into_iter()
                .map(|ekskul| self.extracurricular_health(ekskul.id)),
        )
        .await
    }

    /// Role-based dashboard payload
    pub async fn dashboard(&self, ctx: &AuthContext) -> Result<serde_json::Value> {
        match ctx.permission {
            Permission::Admin => {
                let stats = self.db.get_system_stats().await?;
                let health = self.health_overview().await?;
                Ok(serde_json::json!({
                    "role": "ADMIN",
                    "stats": stats,
                    "health": health,
                }))
            }
            Permission::Pembina => {
                let supervised = self
                    .db
                    .extracurriculars
                    .list_by_pembina(ctx.user_id())
                    .await?;
                let pending = self
                    .db
                    .enrollments
                    .count_pending_for_pembina(ctx.user_id())
                    .await?;

                let today = Utc::now().date_naive();
                let horizon = today + Duration::days(7);
                let mut upcoming = Vec::new();
                for ekskul in &supervised {
                    let sessions = self
                        .db
                        .sessions
                        .list_by_extracurricular(ekskul.id, Some(today), Some(horizon))
                        .await?;
                    upcoming.extend(
                        sessions
                            .into_iter()
                            .filter(|s| s.status() == SessionStatus::Scheduled),
                    );
                }

                Ok(serde_json::json!({
                    "role": "PEMBINA",
                    "supervised": supervised,
                    "pending_applications": pending,
                    "upcoming_sessions": upcoming,
                }))
            }
            Permission::Siswa => {
                let enrollments = self.db.enrollments.list_by_student(ctx.user_id()).await?;
                let upcoming = self
                    .db
                    .sessions
                    .list_upcoming_for_student(ctx.user_id(), Utc::now().date_naive(), 10)
                    .await?;
                let unread = self.db.notifications.count_unread(ctx.user_id()).await?;
                Ok(serde_json::json!({
                    "role": "SISWA",
                    "enrollments": enrollments,
                    "upcoming_sessions": upcoming,
                    "unread_notifications": unread,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sessions_means_inactive() {
        assert_eq!(classify_health(20, 30, 0, None), HealthStatus::Inactive);
        assert_eq!(classify_health(0, 30, 0, Some(1.0)), HealthStatus::Inactive);
    }

    #[test]
    fn test_tiny_membership_is_critical() {
        assert_eq!(classify_health(4, 30, 5, Some(0.9)), HealthStatus::Critical);
    }

    #[test]
    fn test_low_attendance_is_critical() {
        assert_eq!(classify_health(20, 30, 5, Some(0.39)), HealthStatus::Critical);
        assert_eq!(classify_health(20, 30, 5, None), HealthStatus::Critical);
    }

    #[test]
    fn test_middling_attendance_needs_attention() {
        assert_eq!(
            classify_health(20, 30, 5, Some(0.6)),
            HealthStatus::NeedsAttention
        );
    }

    #[test]
    fn test_underfilled_roster_needs_attention() {
        // Good attendance but fewer than half of capacity enrolled.
        assert_eq!(
            classify_health(10, 30, 5, Some(0.9)),
            HealthStatus::NeedsAttention
        );
    }

    #[test]
    fn test_healthy() {
        assert_eq!(classify_health(20, 30, 5, Some(0.85)), HealthStatus::Healthy);
        assert_eq!(classify_health(15, 30, 1, Some(0.7)), HealthStatus::Healthy);
    }
}
