//! Attendance service
//!
//! Attendance for a session is marked in one atomic batch. Rows are locked
//! once written: there is no update or delete path.

use crate::database::DatabaseService;
use crate::models::attendance::{Attendance, AttendanceRecap, BatchAttendanceRequest};
use crate::models::enrollment::EnrollmentStatus;
use crate::models::schedule::SessionStatus;
use crate::services::auth::AuthContext;
use crate::services::extracurricular::ExtracurricularService;
use crate::utils::errors::{Result, SixkulError};
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AttendanceService {
    db: DatabaseService,
    extracurriculars: ExtracurricularService,
}

impl AttendanceService {
    pub fn new(db: DatabaseService, extracurriculars: ExtracurricularService) -> Self {
        Self { db, extracurriculars }
    }

    /// Mark attendance for a session in one transaction. Either every entry
    /// is written or none is.
    pub async fn mark_batch(
        &self,
        ctx: &AuthContext,
        request: BatchAttendanceRequest,
    ) -> Result<Vec<Attendance>> {
        if request.entries.is_empty() {
            return Err(SixkulError::InvalidInput(
                "attendance batch is empty".to_string(),
            ));
        }

        let session = self
            .db
            .sessions
            .find_by_id(request.session_id)
            .await?
            .ok_or(SixkulError::SessionNotFound {
                id: request.session_id,
            })?;

        if session.status() == SessionStatus::Cancelled {
            return Err(SixkulError::InvalidInput(
                "attendance cannot be marked on a cancelled session".to_string(),
            ));
        }

        self.extracurriculars
            .assert_can_manage(ctx, session.extracurricular_id)
            .await?;

        // Validate every entry before opening the transaction.
        for entry in &request.entries {
            let enrollment = self
                .db
                .enrollments
                .find_by_id(entry.enrollment_id)
                .await?
                .ok_or(SixkulError::EnrollmentNotFound {
                    id: entry.enrollment_id,
                })?;

            if enrollment.extracurricular_id != session.extracurricular_id {
                return Err(SixkulError::InvalidInput(format!(
                    "enrollment {} does not belong to this extracurricular",
                    entry.enrollment_id
                )));
            }
            if enrollment.status() != EnrollmentStatus::Active {
                return Err(SixkulError::InvalidInput(format!(
                    "enrollment {} is not an active membership",
                    entry.enrollment_id
                )));
            }
            if self
                .db
                .attendance
                .exists(entry.enrollment_id, session.session_date)
                .await?
            {
                return Err(SixkulError::AttendanceLocked {
                    enrollment_id: entry.enrollment_id,
                    date: session.session_date,
                });
            }
        }

        let mut tx = self.db.attendance.begin().await?;
        let mut written = Vec::with_capacity(request.entries.len());
        for entry in &request.entries {
            let row = self
                .db
                .attendance
                .insert_in_tx(
                    &mut tx,
                    entry.enrollment_id,
                    session.id,
                    session.session_date,
                    entry.status,
                    entry.note.as_deref(),
                    ctx.user_id(),
                )
                .await;

            match row {
                Ok(row) => written.push(row),
                // Unique violation here means a concurrent batch won the race.
                Err(SixkulError::Database(sqlx::Error::Database(db_err)))
                    if db_err.is_unique_violation() =>
                {
                    tx.rollback().await?;
                    return Err(SixkulError::AttendanceLocked {
                        enrollment_id: entry.enrollment_id,
                        date: session.session_date,
                    });
                }
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }
        tx.commit().await?;

        if session.status() == SessionStatus::Scheduled {
            self.db
                .sessions
                .set_status(session.id, SessionStatus::Completed)
                .await?;
        }

        info!(
            session_id = session.id,
            marked_by = ctx.user_id(),
            count = written.len(),
            "Attendance batch recorded"
        );
        Ok(written)
    }

    /// Attendance recorded for one session
    pub async fn list_for_session(
        &self,
        ctx: &AuthContext,
        session_id: i64,
    ) -> Result<Vec<Attendance>> {
        let session = self
            .db
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SixkulError::SessionNotFound { id: session_id })?;

        self.extracurriculars
            .assert_can_manage(ctx, session.extracurricular_id)
            .await?;

        self.db.attendance.list_by_session(session_id).await
    }

    /// A student's own attendance history
    pub async fn list_mine(
        &self,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Attendance>> {
        self.db
            .attendance
            .list_by_student(student_id, from, to, limit, offset)
            .await
    }

    /// Per-student recap for an extracurricular over a period
    pub async fn recap(
        &self,
        ctx: &AuthContext,
        extracurricular_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecap>> {
        if from > to {
            return Err(SixkulError::InvalidInput(
                "recap period start is after its end".to_string(),
            ));
        }

        self.extracurriculars
            .assert_can_manage(ctx, extracurricular_id)
            .await?;

        self.db
            .attendance
            .recap_for_extracurricular(extracurricular_id, from, to)
            .await
    }
}
