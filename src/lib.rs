//! SIXKUL school extracurricular management backend
//!
//! A web backend for managing school extracurricular activities: the
//! activity catalogue, weekly schedules and sessions, student enrollment,
//! attendance recording, announcements and in-app notifications, with
//! role-based access for admins, pembina and students.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, SixkulError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::{create_router, AppState};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
