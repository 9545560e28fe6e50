//! Repository implementations for data access

pub mod announcement;
pub mod attendance;
pub mod enrollment;
pub mod extracurricular;
pub mod notification;
pub mod preferences;
pub mod schedule;
pub mod session;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use attendance::AttendanceRepository;
pub use enrollment::EnrollmentRepository;
pub use extracurricular::ExtracurricularRepository;
pub use notification::NotificationRepository;
pub use preferences::PreferencesRepository;
pub use schedule::ScheduleRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
