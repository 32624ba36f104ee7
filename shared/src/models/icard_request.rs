//! I-Card Request Model (吊销申请)

use serde::{Deserialize, Serialize};

/// Kind of request raised against an issued card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Revoke,
    Update,
    Lost,
}

/// Request decision status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request against one I-Card, decided once by the AWO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct IcardRequest {
    pub id: i64,
    pub icard_id: i64,
    pub request_type: RequestType,
    /// Composed reason text
    pub reason: String,
    pub status: RequestStatus,
    /// Principal that raised the request (dealer)
    pub requested_by: String,
    pub awo_remarks: Option<String>,
    pub awo_reviewed_at: Option<i64>,
    pub created_at: i64,
}

/// Create revocation request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationCreate {
    /// Short reason (e.g. "Retirement", "Transfer")
    pub reason: String,
    /// Free-text detail
    pub detailed_reason: Option<String>,
}

impl RevocationCreate {
    /// Reason text stored on the request: `"<reason>: <detail>"`, or the reason alone
    pub fn composed_reason(&self) -> String {
        let reason = self.reason.trim();
        match self.detailed_reason.as_deref().map(str::trim) {
            Some(detail) if !detail.is_empty() => format!("{reason}: {detail}"),
            _ => reason.to_string(),
        }
    }
}
