//! Notification repository implementation

use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, body, reference_id, is_read, created_at";

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification for one user
    pub async fn create(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<Notification, SixkulError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, kind, title, body, reference_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(&request.kind)
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.reference_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// List a user's notifications, newest first
    pub async fn list_by_user(
        &self,
        user_id: i64,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, SixkulError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark one notification as read. Returns None when the notification
    /// does not belong to the user.
    pub async fn mark_read(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Notification>, SixkulError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Mark all of a user's notifications as read. Returns the number of
    /// rows updated.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, SixkulError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Count unread notifications for a user
    pub async fn count_unread(&self, user_id: i64) -> Result<i64, SixkulError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
