//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{
    AnnouncementRepository, AttendanceRepository, EnrollmentRepository, ExtracurricularRepository,
    NotificationRepository, PreferencesRepository, ScheduleRepository, SessionRepository,
    UserRepository,
};
pub use service::DatabaseService;
