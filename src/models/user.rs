//! User and profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Role assigned to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Pembina,
    Siswa,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Pembina => "PEMBINA",
            UserRole::Siswa => "SISWA",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "PEMBINA" => Ok(UserRole::Pembina),
            "SISWA" => Ok(UserRole::Siswa),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub external_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Parse the stored role column, defaulting to the least privileged role
    /// if the column holds an unknown value.
    pub fn role(&self) -> UserRole {
        UserRole::from_str(&self.role).unwrap_or(UserRole::Siswa)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub nis: String,
    pub class_name: String,
    pub guardian_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PembinaProfile {
    pub id: i64,
    pub user_id: i64,
    pub nip: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub external_id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    /// Student number, required when role is SISWA
    pub nis: Option<String>,
    pub class_name: Option<String>,
    pub guardian_phone: Option<String>,
    /// Employee number, required when role is PEMBINA
    pub nip: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub nis: Option<String>,
    pub class_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub nip: Option<String>,
    pub phone: Option<String>,
}

/// User together with the profile matching its role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub student_profile: Option<StudentProfile>,
    pub pembina_profile: Option<PembinaProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Pembina, UserRole::Siswa] {
            assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(UserRole::from_str("GURU").is_err());
        assert!(UserRole::from_str("admin").is_err());
    }
}
