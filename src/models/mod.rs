//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod announcement;
pub mod attendance;
pub mod enrollment;
pub mod extracurricular;
pub mod notification;
pub mod preferences;
pub mod schedule;
pub mod user;

// Re-export commonly used models
pub use announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest};
pub use attendance::{
    Attendance, AttendanceEntry, AttendanceRecap, AttendanceStatus, BatchAttendanceRequest,
};
pub use enrollment::{Enrollment, EnrollmentDecisionRequest, EnrollmentStatus};
pub use extracurricular::{
    CreateExtracurricularRequest, Extracurricular, ExtracurricularHealth, HealthStatus,
    UpdateExtracurricularRequest,
};
pub use notification::{CreateNotificationRequest, Notification};
pub use preferences::{Preferences, UpdatePreferencesRequest};
pub use schedule::{
    CreateScheduleRequest, CreateSessionRequest, GenerateSessionsRequest, Schedule, Session,
    SessionStatus, UpdateScheduleRequest, UpdateSessionRequest,
};
pub use user::{
    CreateUserRequest, PembinaProfile, StudentProfile, UpdateUserRequest, User, UserRole,
    UserWithProfile,
};
