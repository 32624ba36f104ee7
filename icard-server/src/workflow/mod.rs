//! Approval workflow (审批流程)
//!
//! # 流程
//!
//! ```text
//! submit ──► co_pending (non-gazetted) ──► dealer_pending ──► awo_pending ──► approved
//!        └─► dealer_pending (gazetted)                                   └──► I-Card issued
//! ```
//!
//! Every transition is a guarded update on the expected status. When the guard
//! matches no row another reviewer got there first and the caller receives
//! [`WorkflowError::AlreadyReviewed`]. AWO approval and revocation approval
//! each run in one SQLite transaction.
//!
//! Callers pass an explicit [`AuthContext`]; role and ownership checks happen here.

mod allocator;
mod application;
mod error;
mod revocation;
pub mod transitions;

pub use allocator::{SequenceAllocator, format_card_number};
pub use application::ReviewOutcome;
pub use error::{WorkflowError, WorkflowResult};
pub use revocation::RevocationOutcome;

use shared::error::ErrorCode;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::artifact::CardRenderer;
use crate::auth::{AuthContext, Role};
use crate::security_log;
use crate::utils::validation::{MAX_NOTE_LEN, validate_workflow_text};

/// Approval workflow service
#[derive(Clone)]
pub struct WorkflowService {
    pool: SqlitePool,
    allocator: SequenceAllocator,
    renderer: Arc<dyn CardRenderer>,
}

impl WorkflowService {
    pub fn new(pool: SqlitePool, allocator: SequenceAllocator, renderer: Arc<dyn CardRenderer>) -> Self {
        Self {
            pool,
            allocator,
            renderer,
        }
    }

    fn require_role(&self, ctx: &AuthContext, allowed: &[Role], action: &'static str) -> WorkflowResult<()> {
        if ctx.has_any_role(allowed) {
            return Ok(());
        }
        security_log!(
            "WARN",
            "role_denied",
            principal = ctx.current_principal_id().to_string(),
            role = ctx.current_role().as_str(),
            action = action
        );
        Err(WorkflowError::Forbidden(format!(
            "Role {} may not {}",
            ctx.current_role(),
            action.replace('_', " ")
        )))
    }
}

/// Reviewer remarks must be non-empty (minimum length is an HTTP-boundary rule)
fn validate_remarks(remarks: &str) -> WorkflowResult<()> {
    validate_workflow_text(remarks, "Remarks", ErrorCode::RemarksRequired, MAX_NOTE_LEN)
}

#[cfg(test)]
mod tests;
