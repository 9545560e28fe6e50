//! Announcement repository implementation

use crate::models::announcement::{
    Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const ANNOUNCEMENT_COLUMNS: &str = "id, title, body, extracurricular_id, created_by, published_at, deleted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Publish an announcement
    pub async fn create(
        &self,
        request: &CreateAnnouncementRequest,
        created_by: i64,
    ) -> Result<Announcement, SixkulError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            INSERT INTO announcements (title, body, extracurricular_id, created_by, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5, $5)
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "#
        ))
        .bind(&request.title)
        .bind(&request.body)
        .bind(request.extracurricular_id)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Find announcement by ID, excluding soft-deleted rows
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>, SixkulError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Update announcement text
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateAnnouncementRequest,
    ) -> Result<Announcement, SixkulError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            UPDATE announcements
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title.as_deref())
        .bind(request.body.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Soft delete an announcement
    pub async fn soft_delete(&self, id: i64) -> Result<(), SixkulError> {
        sqlx::query("UPDATE announcements SET deleted_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List announcements, newest first
    pub async fn list(
        &self,
        extracurricular_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>, SixkulError> {
        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements
            WHERE deleted_at IS NULL
              AND ($1::BIGINT IS NULL OR extracurricular_id = $1)
            ORDER BY published_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(extracurricular_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }

    /// Announcements visible to a student: global ones plus those scoped to
    /// extracurriculars the student is actively enrolled in.
    pub async fn list_visible_to_student(
        &self,
        student_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>, SixkulError> {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT a.id, a.title, a.body, a.extracurricular_id, a.created_by, a.published_at,
                   a.deleted_at, a.created_at, a.updated_at
            FROM announcements a
            WHERE a.deleted_at IS NULL
              AND (a.extracurricular_id IS NULL
                   OR a.extracurricular_id IN (
                       SELECT extracurricular_id FROM enrollments
                       WHERE student_id = $1 AND status = 'ACTIVE'
                   ))
            ORDER BY a.published_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }
}
