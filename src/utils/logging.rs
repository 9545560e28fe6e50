//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the SIXKUL application.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the worker guard for the non-blocking file writer; the caller
/// must keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "sixkul.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log enrollment lifecycle events
pub fn log_enrollment_event(enrollment_id: i64, event: &str, actor_id: i64, details: Option<&str>) {
    info!(
        enrollment_id = enrollment_id,
        event = event,
        actor_id = actor_id,
        details = details,
        "Enrollment event occurred"
    );
}

/// Log attendance batch writes
pub fn log_attendance_batch(session_id: i64, marked_by: i64, rows: usize) {
    info!(
        session_id = session_id,
        marked_by = marked_by,
        rows = rows,
        "Attendance batch recorded"
    );
}

/// Log identity provider interactions
pub fn log_identity_check(email: &str, success: bool) {
    if success {
        debug!(email = email, "Identity provider verification succeeded");
    } else {
        warn!(email = email, "Identity provider verification failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_the_log_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file_path: dir.path().join("logs").to_string_lossy().into_owned(),
        };

        let guard = init_logging(&config).expect("logging should initialize");
        info!("logging smoke test");
        drop(guard);

        assert!(dir.path().join("logs").exists());
    }
}
