//! I-Card Model

use serde::{Deserialize, Serialize};

/// I-Card status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum IcardStatus {
    Active,
    Revoked,
}

impl IcardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

/// Issued identity card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Icard {
    pub id: i64,
    pub hrms_id: String,
    /// Application that produced this card
    pub application_id: i64,
    /// Sequence-derived card number (e.g. `GAZ0007`)
    pub icard_number: String,
    /// Rendered artifact reference; empty until the producer has run
    pub pdf_path: Option<String>,
    pub status: IcardStatus,
    /// At most one current card per employee
    pub is_current: bool,
    pub generated_at: i64,
    pub revoked_at: Option<i64>,
    pub revocation_reason: Option<String>,
}

impl Icard {
    pub fn is_active(&self) -> bool {
        self.status == IcardStatus::Active
    }
}

/// Fields written when an I-Card is issued
#[derive(Debug, Clone)]
pub struct IcardCreate {
    pub hrms_id: String,
    pub application_id: i64,
    pub icard_number: String,
    pub generated_at: i64,
}
