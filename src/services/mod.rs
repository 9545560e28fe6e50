//! Services module
//!
//! This module contains business logic services

pub mod announcement;
pub mod attendance;
pub mod auth;
pub mod enrollment;
pub mod extracurricular;
pub mod identity;
pub mod notification;
pub mod report;
pub mod scheduling;
pub mod user;

// Re-export commonly used services
pub use announcement::AnnouncementService;
pub use attendance::AttendanceService;
pub use auth::{AuthContext, AuthService, Claims, Permission, SESSION_COOKIE};
pub use enrollment::EnrollmentService;
pub use extracurricular::ExtracurricularService;
pub use identity::{IdentityService, IdentityResponse, IdentityResult};
pub use notification::{MessageTemplate, NotificationService, NotificationStats};
pub use report::ReportService;
pub use scheduling::SchedulingService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub identity_service: IdentityService,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub extracurricular_service: ExtracurricularService,
    pub scheduling_service: SchedulingService,
    pub enrollment_service: EnrollmentService,
    pub attendance_service: AttendanceService,
    pub announcement_service: AnnouncementService,
    pub notification_service: NotificationService,
    pub report_service: ReportService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let identity_service = IdentityService::new(settings.clone())?;
        let auth_service = AuthService::new(settings.clone());
        let user_service = UserService::new(db.clone());
        let extracurricular_service = ExtracurricularService::new(db.clone());
        let notification_service = NotificationService::new(db.clone(), settings);
        let scheduling_service = SchedulingService::new(
            db.clone(),
            extracurricular_service.clone(),
            notification_service.clone(),
        );
        let enrollment_service = EnrollmentService::new(
            db.clone(),
            extracurricular_service.clone(),
            notification_service.clone(),
        );
        let attendance_service =
            AttendanceService::new(db.clone(), extracurricular_service.clone());
        let announcement_service = AnnouncementService::new(
            db.clone(),
            extracurricular_service.clone(),
            notification_service.clone(),
        );
        let report_service = ReportService::new(db);

        Ok(Self {
            identity_service,
            auth_service,
            user_service,
            extracurricular_service,
            scheduling_service,
            enrollment_service,
            attendance_service,
            announcement_service,
            notification_service,
            report_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let identity_reachable = self.identity_service.health_check().await;

        ServiceHealthStatus { identity_reachable }
    }
}

/// Health status for external dependencies of the service layer
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub identity_reachable: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.identity_reachable
    }

    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.identity_reachable {
            issues.push("Identity provider unreachable".to_string());
        }
        issues
    }
}
