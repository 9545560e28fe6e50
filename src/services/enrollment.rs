//! Enrollment lifecycle service
//!
//! Applications move PENDING -> ACTIVE/REJECTED, active members can be
//! deactivated, and closed applications reopen to PENDING when the student
//! applies again.

use crate::database::DatabaseService;
use crate::models::enrollment::{Enrollment, EnrollmentStatus};
use crate::services::auth::AuthContext;
use crate::services::extracurricular::ExtracurricularService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, SixkulError};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EnrollmentService {
    db: DatabaseService,
    extracurriculars: ExtracurricularService,
    notifications: NotificationService,
}

impl EnrollmentService {
    pub fn new(
        db: DatabaseService,
        extracurriculars: ExtracurricularService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            extracurriculars,
            notifications,
        }
    }

    /// Apply to join an extracurricular. A previously rejected or inactive
    /// enrollment is reopened as a fresh pending application.
    pub async fn enroll(&self, student_id: i64, extracurricular_id: i64) -> Result<Enrollment> {
        let ekskul = self.extracurriculars.get(extracurricular_id).await?;

        if !ekskul.is_open {
            return Err(SixkulError::EnrollmentClosed);
        }

        let enrollment = match self
            .db
            .enrollments
            .find_by_pair(extracurricular_id, student_id)
            .await?
        {
            Some(existing) => match existing.status() {
                EnrollmentStatus::Pending | EnrollmentStatus::Active => {
                    return Err(SixkulError::DuplicateEnrollment);
                }
                EnrollmentStatus::Rejected | EnrollmentStatus::Inactive => {
                    info!(
                        enrollment_id = existing.id,
                        student_id = student_id,
                        "Reopening closed enrollment"
                    );
                    self.db.enrollments.reopen(existing.id).await?
                }
            },
            None => {
                self.db
                    .enrollments
                    .create(extracurricular_id, student_id)
                    .await?
            }
        };

        info!(
            enrollment_id = enrollment.id,
            student_id = student_id,
            extracurricular_id = extracurricular_id,
            "Enrollment application submitted"
        );

        // Tell the assigned pembina about the new application.
        if let Some(pembina_id) = ekskul.pembina_id {
            let student_name = self
                .db
                .users
                .find_by_id(student_id)
                .await?
                .map(|u| u.full_name)
                .unwrap_or_else(|| format!("student {student_id}"));

            let mut params = HashMap::new();
            params.insert("student_name".to_string(), student_name);
            params.insert("extracurricular_name".to_string(), ekskul.name.clone());
            if let Err(e) = self
                .notifications
                .notify(pembina_id, "enrollment_applied", &params, Some(enrollment.id))
                .await
            {
                warn!(error = %e, "Failed to notify pembina about application");
            }
        }

        Ok(enrollment)
    }

    /// Approve or reject a pending application. The caller must manage the
    /// extracurricular. Approval re-checks capacity.
    pub async fn decide(
        &self,
        ctx: &AuthContext,
        enrollment_id: i64,
        approve: bool,
        note: Option<String>,
    ) -> Result<Enrollment> {
        let enrollment = self
            .db
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or(SixkulError::EnrollmentNotFound { id: enrollment_id })?;

        let ekskul = self
            .extracurriculars
            .assert_can_manage(ctx, enrollment.extracurricular_id)
            .await?;

        let target = if approve {
            EnrollmentStatus::Active
        } else {
            EnrollmentStatus::Rejected
        };
        let current = enrollment.status();
        if !current.can_transition_to(target) {
            return Err(SixkulError::InvalidStateTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        if approve {
            let active = self
                .db
                .enrollments
                .count_active(enrollment.extracurricular_id)
                .await?;
            if active >= ekskul.capacity as i64 {
                return Err(SixkulError::CapacityReached);
            }
        }

        let updated = self
            .db
            .enrollments
            .set_status(enrollment_id, target, Some(ctx.user_id()), note.as_deref())
            .await?;

        info!(
            enrollment_id = enrollment_id,
            decided_by = ctx.user_id(),
            status = %target,
            "Enrollment decision recorded"
        );

        let template = if approve {
            "enrollment_approved"
        } else {
            "enrollment_rejected"
        };
        let mut params = HashMap::new();
        params.insert("extracurricular_name".to_string(), ekskul.name);
        params.insert("note".to_string(), note.unwrap_or_default());
        if let Err(e) = self
            .notifications
            .notify(updated.student_id, template, &params, Some(updated.id))
            .await
        {
            warn!(error = %e, "Failed to notify student about decision");
        }

        Ok(updated)
    }

    /// Deactivate an active member. The student may leave on their own;
    /// anyone else needs management rights over the extracurricular.
    pub async fn deactivate(
        &self,
        ctx: &AuthContext,
        enrollment_id: i64,
        note: Option<String>,
    ) -> Result<Enrollment> {
        let enrollment = self
            .db
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or(SixkulError::EnrollmentNotFound { id: enrollment_id })?;

        if ctx.user_id() != enrollment.student_id {
            self.extracurriculars
                .assert_can_manage(ctx, enrollment.extracurricular_id)
                .await?;
        }

        let current = enrollment.status();
        if !current.can_transition_to(EnrollmentStatus::Inactive) {
            return Err(SixkulError::InvalidStateTransition {
                from: current.to_string(),
                to: EnrollmentStatus::Inactive.to_string(),
            });
        }

        let updated = self
            .db
            .enrollments
            .set_status(
                enrollment_id,
                EnrollmentStatus::Inactive,
                Some(ctx.user_id()),
                note.as_deref(),
            )
            .await?;

        info!(enrollment_id = enrollment_id, "Enrollment deactivated");
        Ok(updated)
    }

    /// List a student's own enrollments
    pub async fn list_mine(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.db.enrollments.list_by_student(student_id).await
    }

    /// List enrollments for an extracurricular the caller manages
    pub async fn list_for_extracurricular(
        &self,
        ctx: &AuthContext,
        extracurricular_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>> {
        self.extracurriculars
            .assert_can_manage(ctx, extracurricular_id)
            .await?;

        self.db
            .enrollments
            .list_by_extracurricular(extracurricular_id, status)
            .await
    }
}
