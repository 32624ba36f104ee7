//! Controlling Officer Model

use serde::{Deserialize, Serialize};

/// Controlling officer: reviews non-gazetted applications assigned to them.
///
/// Reviewer identity is resolved by email at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ControllingOfficer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create controlling officer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllingOfficerCreate {
    pub name: String,
    pub email: String,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
}
