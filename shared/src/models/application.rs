//! Application Model (I-Card 申请)

use serde::{Deserialize, Serialize};

/// Application workflow status
///
/// `Draft` / `Submitted` exist in the schema but no current flow produces them:
/// submission routes straight to `CoPending` or `DealerPending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    CoPending,
    DealerPending,
    AwoPending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::CoPending => "co_pending",
            Self::DealerPending => "dealer_pending",
            Self::AwoPending => "awo_pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Approved and rejected applications are immutable
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// The review stage that owns this status, if any
    pub fn pending_stage(&self) -> Option<ReviewStage> {
        match self {
            Self::CoPending => Some(ReviewStage::Co),
            Self::DealerPending => Some(ReviewStage::Dealer),
            Self::AwoPending => Some(ReviewStage::Awo),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review stage in the approval chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Co,
    Dealer,
    Awo,
}

impl ReviewStage {
    /// Display name of the reviewer role
    pub fn reviewer(&self) -> &'static str {
        match self {
            Self::Co => "Controlling Officer",
            Self::Dealer => "Dealer",
            Self::Awo => "AWO",
        }
    }

    /// Status an application sits in while waiting for this stage
    pub fn pending_status(&self) -> ApplicationStatus {
        match self {
            Self::Co => ApplicationStatus::CoPending,
            Self::Dealer => ApplicationStatus::DealerPending,
            Self::Awo => ApplicationStatus::AwoPending,
        }
    }
}

/// Reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Application entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Application {
    pub id: i64,
    /// Owning employee
    pub hrms_id: String,
    pub designation: String,
    pub blood_group: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub identification_mark: Option<String>,
    /// Uploaded document references (storage is handled elsewhere)
    pub photo_path: Option<String>,
    pub signature_path: Option<String>,
    /// Required iff the employee is non-gazetted
    pub controlling_officer_id: Option<i64>,
    pub current_status: ApplicationStatus,
    pub co_remarks: Option<String>,
    pub co_reviewed_at: Option<i64>,
    pub dealer_remarks: Option<String>,
    pub dealer_reviewed_at: Option<i64>,
    pub awo_remarks: Option<String>,
    pub awo_reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Application {
    /// Stage that rejected this application (None unless status is rejected)
    pub fn rejected_by(&self) -> Option<ReviewStage> {
        if self.current_status != ApplicationStatus::Rejected {
            return None;
        }
        rejection_stage(
            self.co_reviewed_at,
            self.dealer_reviewed_at,
            self.awo_reviewed_at,
        )
    }

    /// Human-readable status for reviewer dashboards
    pub fn status_label(&self) -> String {
        match self.current_status {
            ApplicationStatus::Draft => "Draft".to_string(),
            ApplicationStatus::Submitted => "Submitted".to_string(),
            ApplicationStatus::CoPending => "Pending CO Review".to_string(),
            ApplicationStatus::DealerPending => "Pending Dealer Review".to_string(),
            ApplicationStatus::AwoPending => "Pending AWO Approval".to_string(),
            ApplicationStatus::Approved => "Approved".to_string(),
            ApplicationStatus::Rejected => match self.rejected_by() {
                Some(stage) => format!("Rejected by {}", stage.reviewer()),
                None => "Rejected".to_string(),
            },
        }
    }
}

/// Derive which stage rejected an application from its review timestamps.
///
/// Precedence is AWO > Dealer > CO: a later stage can only have acted after every
/// earlier stage approved, so the latest timestamp set is the rejecting one.
pub fn rejection_stage(
    co_reviewed_at: Option<i64>,
    dealer_reviewed_at: Option<i64>,
    awo_reviewed_at: Option<i64>,
) -> Option<ReviewStage> {
    if awo_reviewed_at.is_some() {
        Some(ReviewStage::Awo)
    } else if dealer_reviewed_at.is_some() {
        Some(ReviewStage::Dealer)
    } else if co_reviewed_at.is_some() {
        Some(ReviewStage::Co)
    } else {
        None
    }
}

/// Submit application payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationCreate {
    pub hrms_id: String,
    pub designation: String,
    pub blood_group: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub identification_mark: Option<String>,
    pub photo_path: Option<String>,
    pub signature_path: Option<String>,
    pub controlling_officer_id: Option<i64>,
}

/// Review decision payload (CO / Dealer / AWO)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub action: ReviewAction,
    pub remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(status: ApplicationStatus) -> Application {
        Application {
            id: 1,
            hrms_id: "E100".to_string(),
            designation: "Senior Section Engineer".to_string(),
            blood_group: Some("B+".to_string()),
            mobile_number: None,
            address: None,
            identification_mark: None,
            photo_path: None,
            signature_path: None,
            controlling_officer_id: Some(1),
            current_status: status,
            co_remarks: None,
            co_reviewed_at: None,
            dealer_remarks: None,
            dealer_reviewed_at: None,
            awo_remarks: None,
            awo_reviewed_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::CoPending.is_terminal());
        assert!(!ApplicationStatus::AwoPending.is_terminal());
    }

    #[test]
    fn test_pending_stage_roundtrip() {
        for stage in [ReviewStage::Co, ReviewStage::Dealer, ReviewStage::Awo] {
            assert_eq!(stage.pending_status().pending_stage(), Some(stage));
        }
        assert_eq!(ApplicationStatus::Approved.pending_stage(), None);
    }

    #[test]
    fn test_rejection_stage_precedence() {
        assert_eq!(rejection_stage(None, None, None), None);
        assert_eq!(rejection_stage(Some(1), None, None), Some(ReviewStage::Co));
        // CO approved earlier, dealer rejected
        assert_eq!(
            rejection_stage(Some(1), Some(2), None),
            Some(ReviewStage::Dealer)
        );
        assert_eq!(
            rejection_stage(Some(1), Some(2), Some(3)),
            Some(ReviewStage::Awo)
        );
        // Gazetted path: no CO timestamp
        assert_eq!(
            rejection_stage(None, Some(2), Some(3)),
            Some(ReviewStage::Awo)
        );
    }

    #[test]
    fn test_status_label_for_dealer_rejection() {
        let mut app = application(ApplicationStatus::Rejected);
        app.co_reviewed_at = Some(10);
        app.dealer_reviewed_at = Some(20);
        assert_eq!(app.rejected_by(), Some(ReviewStage::Dealer));
        assert_eq!(app.status_label(), "Rejected by Dealer");
    }

    #[test]
    fn test_rejected_by_only_for_rejected_status() {
        let mut app = application(ApplicationStatus::AwoPending);
        app.co_reviewed_at = Some(10);
        app.dealer_reviewed_at = Some(20);
        assert_eq!(app.rejected_by(), None);
        assert_eq!(app.status_label(), "Pending AWO Approval");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&ApplicationStatus::DealerPending).unwrap();
        assert_eq!(json, "\"dealer_pending\"");
        let status: ApplicationStatus = serde_json::from_str("\"awo_pending\"").unwrap();
        assert_eq!(status, ApplicationStatus::AwoPending);
    }
}
