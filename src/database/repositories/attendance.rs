//! Attendance repository implementation
//!
//! Attendance rows are append-only. Batch marking inserts inside a caller
//! supplied transaction so a whole session is recorded atomically.

use crate::models::attendance::{Attendance, AttendanceRecap, AttendanceStatus};
use crate::utils::errors::SixkulError;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};

const ATTENDANCE_COLUMNS: &str =
    "id, enrollment_id, session_id, attendance_date, status, note, marked_by, created_at";

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, SixkulError> {
        Ok(self.pool.begin().await?)
    }

    /// Insert one attendance row inside a batch transaction
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        enrollment_id: i64,
        session_id: i64,
        attendance_date: NaiveDate,
        status: AttendanceStatus,
        note: Option<&str>,
        marked_by: i64,
    ) -> Result<Attendance, SixkulError> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"
            INSERT INTO attendance (enrollment_id, session_id, attendance_date, status, note, marked_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(enrollment_id)
        .bind(session_id)
        .bind(attendance_date)
        .bind(status.as_str())
        .bind(note)
        .bind(marked_by)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(attendance)
    }

    /// Check whether attendance is already recorded for an enrollment on a date
    pub async fn exists(
        &self,
        enrollment_id: i64,
        attendance_date: NaiveDate,
    ) -> Result<bool, SixkulError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE enrollment_id = $1 AND attendance_date = $2)",
        )
        .bind(enrollment_id)
        .bind(attendance_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// List attendance recorded for a session
    pub async fn list_by_session(&self, session_id: i64) -> Result<Vec<Attendance>, SixkulError> {
        let rows = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE session_id = $1 ORDER BY enrollment_id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List a student's attendance history, newest first, optionally
    /// restricted to a date range
    pub async fn list_by_student(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Attendance>, SixkulError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT a.id, a.enrollment_id, a.session_id, a.attendance_date, a.status, a.note, a.marked_by, a.created_at
            FROM attendance a
            JOIN enrollments e ON e.id = a.enrollment_id
            WHERE e.student_id = $1
              AND ($2::DATE IS NULL OR a.attendance_date >= $2)
              AND ($3::DATE IS NULL OR a.attendance_date <= $3)
            ORDER BY a.attendance_date DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(student_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-student attendance recap for an extracurricular over a period
    pub async fn recap_for_extracurricular(
        &self,
        extracurricular_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecap>, SixkulError> {
        let rows = sqlx::query_as::<_, AttendanceRecap>(
            r#"
            SELECT e.student_id,
                   u.full_name,
                   COUNT(*) FILTER (WHERE a.status = 'HADIR') AS hadir,
                   COUNT(*) FILTER (WHERE a.status = 'IZIN') AS izin,
                   COUNT(*) FILTER (WHERE a.status = 'SAKIT') AS sakit,
                   COUNT(*) FILTER (WHERE a.status = 'ALPA') AS alpa
            FROM attendance a
            JOIN enrollments e ON e.id = a.enrollment_id
            JOIN users u ON u.id = e.student_id
            WHERE e.extracurricular_id = $1
              AND a.attendance_date BETWEEN $2 AND $3
            GROUP BY e.student_id, u.full_name
            ORDER BY u.full_name
            "#,
        )
        .bind(extracurricular_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total and present counts for an extracurricular in a date window
    pub async fn window_counts(
        &self,
        extracurricular_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(i64, i64), SixkulError> {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE a.status = 'HADIR')
            FROM attendance a
            JOIN enrollments e ON e.id = a.enrollment_id
            WHERE e.extracurricular_id = $1
              AND a.attendance_date BETWEEN $2 AND $3
            "#,
        )
        .bind(extracurricular_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
