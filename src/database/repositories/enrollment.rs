//! Enrollment repository implementation

use crate::models::enrollment::{Enrollment, EnrollmentStatus};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const ENROLLMENT_COLUMNS: &str = "id, extracurricular_id, student_id, status, note, decided_by, decided_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending enrollment application
    pub async fn create(
        &self,
        extracurricular_id: i64,
        student_id: i64,
    ) -> Result<Enrollment, SixkulError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            INSERT INTO enrollments (extracurricular_id, student_id, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(extracurricular_id)
        .bind(student_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Find enrollment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Enrollment>, SixkulError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Find the enrollment of a student in an extracurricular
    pub async fn find_by_pair(
        &self,
        extracurricular_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>, SixkulError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE extracurricular_id = $1 AND student_id = $2"
        ))
        .bind(extracurricular_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Record a decision on an enrollment
    pub async fn set_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
        decided_by: Option<i64>,
        note: Option<&str>,
    ) -> Result<Enrollment, SixkulError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            UPDATE enrollments
            SET status = $2,
                decided_by = $3,
                decided_at = $4,
                note = COALESCE($5, note),
                updated_at = $4
            WHERE id = $1
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(decided_by)
        .bind(Utc::now())
        .bind(note)
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Reopen a closed enrollment as a fresh pending application
    pub async fn reopen(&self, id: i64) -> Result<Enrollment, SixkulError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            UPDATE enrollments
            SET status = 'PENDING',
                note = NULL,
                decided_by = NULL,
                decided_at = NULL,
                updated_at = $2
            WHERE id = $1
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// List enrollments for an extracurricular, optionally by status
    pub async fn list_by_extracurricular(
        &self,
        extracurricular_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>, SixkulError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS} FROM enrollments
            WHERE extracurricular_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#
        ))
        .bind(extracurricular_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// List all enrollments of a student
    pub async fn list_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>, SixkulError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 ORDER BY created_at DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// Count active members of an extracurricular
    pub async fn count_active(&self, extracurricular_id: i64) -> Result<i64, SixkulError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM enrollments WHERE extracurricular_id = $1 AND status = 'ACTIVE'",
        )
        .bind(extracurricular_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Count pending applications across all extracurriculars
    pub async fn count_pending(&self) -> Result<i64, SixkulError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE status = 'PENDING'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count pending applications for one pembina's extracurriculars
    pub async fn count_pending_for_pembina(&self, pembina_id: i64) -> Result<i64, SixkulError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM enrollments e
            JOIN extracurriculars x ON x.id = e.extracurricular_id
            WHERE x.pembina_id = $1 AND e.status = 'PENDING'
            "#,
        )
        .bind(pembina_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
