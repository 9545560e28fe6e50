//! Preferences repository implementation

use crate::models::preferences::{Preferences, UpdatePreferencesRequest};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const PREFERENCES_COLUMNS: &str = "id, user_id, notify_enrollment, notify_announcements, notify_session_reminders, language, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PreferencesRepository {
    pool: PgPool,
}

impl PreferencesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find preferences for a user
    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<Preferences>, SixkulError> {
        let prefs = sqlx::query_as::<_, Preferences>(&format!(
            "SELECT {PREFERENCES_COLUMNS} FROM preferences WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prefs)
    }

    /// Create or update preferences for a user. Unspecified fields keep
    /// their stored value, or the default on first write.
    pub async fn upsert(
        &self,
        user_id: i64,
        request: &UpdatePreferencesRequest,
    ) -> Result<Preferences, SixkulError> {
        let prefs = sqlx::query_as::<_, Preferences>(&format!(
            r#"
            INSERT INTO preferences (user_id, notify_enrollment, notify_announcements, notify_session_reminders, language, created_at, updated_at)
            VALUES ($1, COALESCE($2, TRUE), COALESCE($3, TRUE), COALESCE($4, TRUE), COALESCE($5, 'id'), $6, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET notify_enrollment = COALESCE($2, preferences.notify_enrollment),
                notify_announcements = COALESCE($3, preferences.notify_announcements),
                notify_session_reminders = COALESCE($4, preferences.notify_session_reminders),
                language = COALESCE($5, preferences.language),
                updated_at = $6
            RETURNING {PREFERENCES_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(request.notify_enrollment)
        .bind(request.notify_announcements)
        .bind(request.notify_session_reminders)
        .bind(request.language.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(prefs)
    }
}
