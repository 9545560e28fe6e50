//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AnnouncementRepository, AttendanceRepository, DatabasePool, EnrollmentRepository,
    ExtracurricularRepository, NotificationRepository, PreferencesRepository, ScheduleRepository,
    SessionRepository, UserRepository,
};
use crate::models::UserRole;
use crate::utils::errors::SixkulError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub extracurriculars: ExtracurricularRepository,
    pub schedules: ScheduleRepository,
    pub sessions: SessionRepository,
    pub enrollments: EnrollmentRepository,
    pub attendance: AttendanceRepository,
    pub announcements: AnnouncementRepository,
    pub notifications: NotificationRepository,
    pub preferences: PreferencesRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            extracurriculars: ExtracurricularRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            enrollments: EnrollmentRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            announcements: AnnouncementRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            preferences: PreferencesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Verify the database connection is alive
    pub async fn health_check(&self) -> Result<(), SixkulError> {
        crate::database::connection::health_check(&self.pool).await
    }

    /// Get system-wide statistics for the admin dashboard
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, SixkulError> {
        let total_students = self.users.count_by_role(UserRole::Siswa).await?;
        let total_pembina = self.users.count_by_role(UserRole::Pembina).await?;
        let total_extracurriculars = self.extracurriculars.count().await?;
        let pending_enrollments = self.enrollments.count_pending().await?;

        Ok(serde_json::json!({
            "total_students": total_students,
            "total_pembina": total_pembina,
            "total_extracurriculars": total_extracurriculars,
            "pending_enrollments": pending_enrollments,
        }))
    }
}
