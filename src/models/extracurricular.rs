//! Extracurricular activity model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Extracurricular {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pembina_id: Option<i64>,
    pub capacity: i32,
    pub is_open: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExtracurricularRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pembina_id: Option<i64>,
    pub capacity: Option<i32>,
    pub is_open: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExtracurricularRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pembina_id: Option<i64>,
    pub capacity: Option<i32>,
    pub is_open: Option<bool>,
}

/// Derived activity health classification over a recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
    Critical,
    Inactive,
}

/// Health report entry for a single extracurricular.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtracurricularHealth {
    pub extracurricular_id: i64,
    pub name: String,
    pub status: HealthStatus,
    pub active_members: i64,
    pub capacity: i32,
    pub sessions_held: i64,
    pub attendance_rate: Option<f64>,
}
