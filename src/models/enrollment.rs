//! Enrollment model and status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Rejected,
    Inactive,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "PENDING",
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Rejected => "REJECTED",
            EnrollmentStatus::Inactive => "INACTIVE",
        }
    }

    /// Allowed lifecycle transitions.
    ///
    /// PENDING may be approved (ACTIVE) or rejected. ACTIVE members may be
    /// deactivated. REJECTED and INACTIVE rows are reopened to PENDING when
    /// the student applies again.
    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Rejected)
                | (Active, Inactive)
                | (Rejected, Pending)
                | (Inactive, Pending)
        )
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EnrollmentStatus::Pending),
            "ACTIVE" => Ok(EnrollmentStatus::Active),
            "REJECTED" => Ok(EnrollmentStatus::Rejected),
            "INACTIVE" => Ok(EnrollmentStatus::Inactive),
            other => Err(format!("unknown enrollment status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub extracurricular_id: i64,
    pub student_id: i64,
    pub status: String,
    pub note: Option<String>,
    pub decided_by: Option<i64>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn status(&self) -> EnrollmentStatus {
        EnrollmentStatus::from_str(&self.status).unwrap_or(EnrollmentStatus::Pending)
    }
}

/// Approve or reject a pending enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDecisionRequest {
    pub approve: bool,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_decisions() {
        assert!(EnrollmentStatus::Pending.can_transition_to(EnrollmentStatus::Active));
        assert!(EnrollmentStatus::Pending.can_transition_to(EnrollmentStatus::Rejected));
        assert!(!EnrollmentStatus::Pending.can_transition_to(EnrollmentStatus::Inactive));
    }

    #[test]
    fn test_active_can_only_deactivate() {
        assert!(EnrollmentStatus::Active.can_transition_to(EnrollmentStatus::Inactive));
        assert!(!EnrollmentStatus::Active.can_transition_to(EnrollmentStatus::Rejected));
        assert!(!EnrollmentStatus::Active.can_transition_to(EnrollmentStatus::Pending));
    }

    #[test]
    fn test_closed_states_reopen_to_pending() {
        assert!(EnrollmentStatus::Rejected.can_transition_to(EnrollmentStatus::Pending));
        assert!(EnrollmentStatus::Inactive.can_transition_to(EnrollmentStatus::Pending));
        assert!(!EnrollmentStatus::Rejected.can_transition_to(EnrollmentStatus::Active));
        assert!(!EnrollmentStatus::Inactive.can_transition_to(EnrollmentStatus::Active));
    }

    #[test]
    fn test_no_self_transitions() {
        for status in [
            EnrollmentStatus::Pending,
            EnrollmentStatus::Active,
            EnrollmentStatus::Rejected,
            EnrollmentStatus::Inactive,
        ] {
            assert!(!status.can_transition_to(status));
        }
    }
}
