//! Approval state machine (纯函数)
//!
//! ```text
//! submit ─┬─ non_gazetted ─► co_pending ──approve──► dealer_pending
//!         └─ gazetted ─────────────────────────────► dealer_pending
//! dealer_pending ──approve──► awo_pending ──approve──► approved
//! any *_pending ──reject──► rejected
//! ```

use shared::error::ErrorCode;
use shared::models::{ApplicationStatus, EmployeeCategory, RequestStatus, ReviewAction, ReviewStage};

use super::{WorkflowError, WorkflowResult};

/// Status a freshly submitted application is routed to.
///
/// Non-gazetted employees need a controlling officer; gazetted employees skip CO review.
pub fn route_on_submit(
    category: EmployeeCategory,
    controlling_officer_id: Option<i64>,
) -> WorkflowResult<ApplicationStatus> {
    if category.requires_co_review() {
        if controlling_officer_id.is_none() {
            return Err(WorkflowError::ValidationFailed(
                ErrorCode::ControllingOfficerRequired,
                "A controlling officer is required for non-gazetted employees".to_string(),
            ));
        }
        Ok(ApplicationStatus::CoPending)
    } else {
        Ok(ApplicationStatus::DealerPending)
    }
}

/// Status after a reviewer decision at `stage`
pub fn next_status(stage: ReviewStage, action: ReviewAction) -> ApplicationStatus {
    match (stage, action) {
        (_, ReviewAction::Reject) => ApplicationStatus::Rejected,
        (ReviewStage::Co, ReviewAction::Approve) => ApplicationStatus::DealerPending,
        (ReviewStage::Dealer, ReviewAction::Approve) => ApplicationStatus::AwoPending,
        (ReviewStage::Awo, ReviewAction::Approve) => ApplicationStatus::Approved,
    }
}

/// Whether `from -> to` is an edge of the state machine
pub fn is_allowed(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    match from.pending_stage() {
        Some(stage) => {
            to == next_status(stage, ReviewAction::Approve)
                || to == next_status(stage, ReviewAction::Reject)
        }
        None => false,
    }
}

/// Request status after the AWO decision
pub fn next_request_status(action: ReviewAction) -> RequestStatus {
    match action {
        ReviewAction::Approve => RequestStatus::Approved,
        ReviewAction::Reject => RequestStatus::Rejected,
    }
}
