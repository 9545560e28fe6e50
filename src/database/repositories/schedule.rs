//! Schedule repository implementation

use crate::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const SCHEDULE_COLUMNS: &str = "id, extracurricular_id, day_of_week, start_time, end_time, location, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a weekly schedule slot
    pub async fn create(&self, request: &CreateScheduleRequest) -> Result<Schedule, SixkulError> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            r#"
            INSERT INTO schedules (extracurricular_id, day_of_week, start_time, end_time, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(request.extracurricular_id)
        .bind(request.day_of_week)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Find schedule by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Schedule>, SixkulError> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Update a schedule slot
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateScheduleRequest,
    ) -> Result<Schedule, SixkulError> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            r#"
            UPDATE schedules
            SET day_of_week = COALESCE($2, day_of_week),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                location = COALESCE($5, location),
                is_active = COALESCE($6, is_active),
                updated_at = $7
            WHERE id = $1
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.day_of_week)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.location.as_deref())
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Delete a schedule slot. Sessions generated from it keep their rows
    /// with schedule_id set to NULL.
    pub async fn delete(&self, id: i64) -> Result<(), SixkulError> {
        sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List schedule slots for an extracurricular
    pub async fn list_by_extracurricular(
        &self,
        extracurricular_id: i64,
    ) -> Result<Vec<Schedule>, SixkulError> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE extracurricular_id = $1 ORDER BY day_of_week, start_time"
        ))
        .bind(extracurricular_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }
}
