//! Attendance model
//!
//! Attendance rows are immutable once created. There is no update or delete
//! path, and the database enforces one row per enrollment per date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    /// Present
    Hadir,
    /// Excused absence
    Izin,
    /// Sick
    Sakit,
    /// Unexcused absence
    Alpa,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Hadir => "HADIR",
            AttendanceStatus::Izin => "IZIN",
            AttendanceStatus::Sakit => "SAKIT",
            AttendanceStatus::Alpa => "ALPA",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HADIR" => Ok(AttendanceStatus::Hadir),
            "IZIN" => Ok(AttendanceStatus::Izin),
            "SAKIT" => Ok(AttendanceStatus::Sakit),
            "ALPA" => Ok(AttendanceStatus::Alpa),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub enrollment_id: i64,
    pub session_id: i64,
    pub attendance_date: NaiveDate,
    pub status: String,
    pub note: Option<String>,
    pub marked_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One student entry inside a batch marking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub enrollment_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Mark attendance for a whole session in one atomic operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAttendanceRequest {
    pub session_id: i64,
    pub entries: Vec<AttendanceEntry>,
}

/// Per-student attendance recap over a period.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecap {
    pub student_id: i64,
    pub full_name: String,
    pub hadir: i64,
    pub izin: i64,
    pub sakit: i64,
    pub alpa: i64,
}
