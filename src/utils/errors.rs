//! Error handling for SIXKUL
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every error that reaches
//! a handler boundary is rendered as the JSON envelope
//! `{ "success": false, "message": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

/// Main error type for the SIXKUL application
#[derive(Error, Debug)]
pub enum SixkulError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Extracurricular not found: {id}")]
    ExtracurricularNotFound { id: i64 },

    #[error("Schedule not found: {id}")]
    ScheduleNotFound { id: i64 },

    #[error("Session not found: {id}")]
    SessionNotFound { id: i64 },

    #[error("Enrollment not found: {id}")]
    EnrollmentNotFound { id: i64 },

    #[error("Announcement not found: {id}")]
    AnnouncementNotFound { id: i64 },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: i64 },

    #[error("Invalid enrollment transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Attendance for enrollment {enrollment_id} on {date} is already recorded and locked")]
    AttendanceLocked { enrollment_id: i64, date: NaiveDate },

    #[error("Student is already enrolled in this extracurricular")]
    DuplicateEnrollment,

    #[error("Extracurricular has reached its member capacity")]
    CapacityReached,

    #[error("Extracurricular is not open for enrollment")]
    EnrollmentClosed,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Identity provider specific errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity provider request failed: {0}")]
    RequestFailed(String),

    #[error("Identity provider timeout")]
    Timeout,

    #[error("Invalid identity provider response: {0}")]
    InvalidResponse(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Identity provider unavailable")]
    ServiceUnavailable,
}

/// Result type alias for SIXKUL operations
pub type Result<T> = std::result::Result<T, SixkulError>;

/// Result type alias for identity provider operations
pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

impl SixkulError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            SixkulError::Database(_) => false,
            SixkulError::Migration(_) => false,
            SixkulError::Identity(IdentityError::InvalidCredentials) => false,
            SixkulError::Identity(_) => true,
            SixkulError::Config(_) => false,
            SixkulError::Unauthenticated(_) => false,
            SixkulError::PermissionDenied(_) => false,
            SixkulError::UserNotFound { .. } => false,
            SixkulError::ExtracurricularNotFound { .. } => false,
            SixkulError::ScheduleNotFound { .. } => false,
            SixkulError::SessionNotFound { .. } => false,
            SixkulError::EnrollmentNotFound { .. } => false,
            SixkulError::AnnouncementNotFound { .. } => false,
            SixkulError::NotificationNotFound { .. } => false,
            SixkulError::InvalidStateTransition { .. } => false,
            SixkulError::AttendanceLocked { .. } => false,
            SixkulError::DuplicateEnrollment => false,
            SixkulError::CapacityReached => false,
            SixkulError::EnrollmentClosed => false,
            SixkulError::Http(_) => true,
            SixkulError::Serialization(_) => false,
            SixkulError::Io(_) => true,
            SixkulError::UrlParse(_) => false,
            SixkulError::Token(_) => false,
            SixkulError::RateLimitExceeded => true,
            SixkulError::InvalidInput(_) => false,
            SixkulError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SixkulError::Database(_) => ErrorSeverity::Critical,
            SixkulError::Migration(_) => ErrorSeverity::Critical,
            SixkulError::Config(_) => ErrorSeverity::Critical,
            SixkulError::PermissionDenied(_) => ErrorSeverity::Warning,
            SixkulError::Unauthenticated(_) => ErrorSeverity::Warning,
            SixkulError::Token(_) => ErrorSeverity::Warning,
            SixkulError::RateLimitExceeded => ErrorSeverity::Warning,
            SixkulError::InvalidInput(_) => ErrorSeverity::Info,
            SixkulError::DuplicateEnrollment
            | SixkulError::CapacityReached
            | SixkulError::EnrollmentClosed
            | SixkulError::AttendanceLocked { .. }
            | SixkulError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code used when rendering the error to a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            SixkulError::Unauthenticated(_) | SixkulError::Token(_) => StatusCode::UNAUTHORIZED,
            SixkulError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            SixkulError::UserNotFound { .. }
            | SixkulError::ExtracurricularNotFound { .. }
            | SixkulError::ScheduleNotFound { .. }
            | SixkulError::SessionNotFound { .. }
            | SixkulError::EnrollmentNotFound { .. }
            | SixkulError::AnnouncementNotFound { .. }
            | SixkulError::NotificationNotFound { .. } => StatusCode::NOT_FOUND,
            SixkulError::InvalidStateTransition { .. }
            | SixkulError::AttendanceLocked { .. }
            | SixkulError::DuplicateEnrollment
            | SixkulError::CapacityReached
            | SixkulError::EnrollmentClosed => StatusCode::CONFLICT,
            SixkulError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SixkulError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            SixkulError::Identity(IdentityError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            SixkulError::Identity(_) | SixkulError::Http(_) => StatusCode::BAD_GATEWAY,
            SixkulError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Internal failures are not leaked.
    fn client_message(&self) -> String {
        match self {
            SixkulError::Database(_)
            | SixkulError::Migration(_)
            | SixkulError::Serialization(_)
            | SixkulError::Io(_)
            | SixkulError::Config(_)
            | SixkulError::UrlParse(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for SixkulError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, severity = %self.severity(), "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        let body = Json(json!({
            "success": false,
            "message": self.client_message(),
        }));
        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SixkulError::Unauthenticated("no session".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SixkulError::PermissionDenied("admin only".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SixkulError::UserNotFound { user_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SixkulError::DuplicateEnrollment.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SixkulError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            SixkulError::Identity(IdentityError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SixkulError::Identity(IdentityError::Timeout).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let err = SixkulError::Config("secret path /etc/sixkul".into());
        assert_eq!(err.client_message(), "internal server error");

        let err = SixkulError::CapacityReached;
        assert!(err.client_message().contains("capacity"));
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            SixkulError::Config("bad".into()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            SixkulError::InvalidInput("bad".into()).severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            SixkulError::RateLimitExceeded.severity(),
            ErrorSeverity::Warning
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(!SixkulError::DuplicateEnrollment.is_recoverable());
        assert!(SixkulError::ServiceUnavailable("idp".into()).is_recoverable());
        assert!(SixkulError::Identity(IdentityError::Timeout).is_recoverable());
        assert!(!SixkulError::Identity(IdentityError::InvalidCredentials).is_recoverable());
    }
}
