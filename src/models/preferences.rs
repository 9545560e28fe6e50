//! Per-user notification preferences

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preferences {
    pub id: i64,
    pub user_id: i64,
    pub notify_enrollment: bool,
    pub notify_announcements: bool,
    pub notify_session_reminders: bool,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub notify_enrollment: Option<bool>,
    pub notify_announcements: Option<bool>,
    pub notify_session_reminders: Option<bool>,
    pub language: Option<String>,
}
