//! Session repository implementation

use crate::models::schedule::{CreateSessionRequest, Session, SessionStatus, UpdateSessionRequest};
use crate::utils::errors::SixkulError;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

const SESSION_COLUMNS: &str = "id, extracurricular_id, schedule_id, session_date, start_time, end_time, location, topic, status, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an ad hoc session not anchored to a weekly schedule
    pub async fn create_adhoc(
        &self,
        request: &CreateSessionRequest,
        created_by: i64,
    ) -> Result<Session, SixkulError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (extracurricular_id, session_date, start_time, end_time, location, topic, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(request.extracurricular_id)
        .bind(request.session_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location.as_deref())
        .bind(request.topic.as_deref())
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Insert a session materialized from a weekly schedule. Returns None
    /// when a session already exists for that schedule and date.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_generated(
        &self,
        extracurricular_id: i64,
        schedule_id: i64,
        session_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        location: Option<&str>,
        created_by: i64,
    ) -> Result<Option<Session>, SixkulError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (extracurricular_id, schedule_id, session_date, start_time, end_time, location, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (schedule_id, session_date) WHERE schedule_id IS NOT NULL DO NOTHING
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(extracurricular_id)
        .bind(schedule_id)
        .bind(session_date)
        .bind(start_time)
        .bind(end_time)
        .bind(location)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Find session by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Session>, SixkulError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Update session details
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateSessionRequest,
    ) -> Result<Session, SixkulError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            UPDATE sessions
            SET session_date = COALESCE($2, session_date),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                location = COALESCE($5, location),
                topic = COALESCE($6, topic),
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.session_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location.as_deref())
        .bind(request.topic.as_deref())
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Set the session status
    pub async fn set_status(&self, id: i64, status: SessionStatus) -> Result<Session, SixkulError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "UPDATE sessions SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// List sessions for an extracurricular, optionally bounded by date
    pub async fn list_by_extracurricular(
        &self,
        extracurricular_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Session>, SixkulError> {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            r#"
            SELECT {SESSION_COLUMNS} FROM sessions
            WHERE extracurricular_id = $1
              AND ($2::DATE IS NULL OR session_date >= $2)
              AND ($3::DATE IS NULL OR session_date <= $3)
            ORDER BY session_date, start_time
            "#
        ))
        .bind(extracurricular_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Count non-cancelled sessions in a date window
    pub async fn count_held_in_window(
        &self,
        extracurricular_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, SixkulError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM sessions
            WHERE extracurricular_id = $1
              AND session_date BETWEEN $2 AND $3
              AND status <> 'CANCELLED'
            "#,
        )
        .bind(extracurricular_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Upcoming sessions for the extracurriculars a student is active in
    pub async fn list_upcoming_for_student(
        &self,
        student_id: i64,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Session>, SixkulError> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT s.id, s.extracurricular_id, s.schedule_id, s.session_date, s.start_time,
                   s.end_time, s.location, s.topic, s.status, s.created_by, s.created_at, s.updated_at
            FROM sessions s
            JOIN enrollments e ON e.extracurricular_id = s.extracurricular_id
            WHERE e.student_id = $1
              AND e.status = 'ACTIVE'
              AND s.session_date >= $2
              AND s.status = 'SCHEDULED'
            ORDER BY s.session_date, s.start_time
            LIMIT $3
            "#,
        )
        .bind(student_id)
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }
}
