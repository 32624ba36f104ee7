//! I-Card revocation (吊销)

use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::{
    Icard, IcardRequest, IcardStatus, RequestStatus, RequestType, ReviewAction, ReviewDecision,
    RevocationCreate,
};

use super::{WorkflowError, WorkflowResult, WorkflowService, transitions, validate_remarks};
use crate::auth::{AuthContext, Role};
use crate::db::repository::icard::IcardStatusFields;
use crate::db::repository::{RepoError, icard, icard_request};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_workflow_text};

/// Result of a committed revocation decision
#[derive(Debug, Clone, Serialize)]
pub struct RevocationOutcome {
    pub request: IcardRequest,
    pub icard: Icard,
}

fn request_not_found(id: i64) -> WorkflowError {
    WorkflowError::NotFound(
        ErrorCode::RevocationRequestNotFound,
        format!("Revocation request {id} not found"),
    )
}

fn icard_not_found(id: i64) -> WorkflowError {
    WorkflowError::NotFound(ErrorCode::IcardNotFound, format!("I-Card {id} not found"))
}

fn pending_exists(icard_number: &str, request_id: Option<i64>) -> WorkflowError {
    let message = match request_id {
        Some(id) => format!("Revocation request {id} for I-Card {icard_number} is already pending"),
        None => format!("A revocation request for I-Card {icard_number} is already pending"),
    };
    WorkflowError::InvalidTransition(ErrorCode::AlreadyExists, message)
}

fn icard_not_active(card: &Icard) -> WorkflowError {
    WorkflowError::InvalidTransition(
        ErrorCode::IcardNotActive,
        format!("I-Card {} is {}", card.icard_number, card.status.as_str()),
    )
}

impl WorkflowService {
    /// Raise a revocation request against an active card
    pub async fn create_revocation_request(
        &self,
        ctx: &AuthContext,
        icard_id: i64,
        payload: &RevocationCreate,
    ) -> WorkflowResult<IcardRequest> {
        self.require_role(ctx, &[Role::Dealer, Role::Admin], "request_revocation")?;
        validate_workflow_text(&payload.reason, "Reason", ErrorCode::RequiredField, MAX_NAME_LEN)?;
        if let Some(detail) = &payload.detailed_reason {
            let len = detail.chars().count();
            if len > MAX_NOTE_LEN {
                return Err(WorkflowError::ValidationFailed(
                    ErrorCode::ValidationFailed,
                    format!("Detailed reason is too long ({len} chars, max {MAX_NOTE_LEN})"),
                ));
            }
        }

        let card = icard::find_by_id(&self.pool, icard_id)
            .await?
            .ok_or_else(|| icard_not_found(icard_id))?;
        if !card.is_active() {
            return Err(icard_not_active(&card));
        }
        if let Some(existing) =
            icard_request::find_pending_for_icard(&self.pool, card.id, RequestType::Revoke).await?
        {
            return Err(pending_exists(&card.icard_number, Some(existing.id)));
        }

        let request = icard_request::insert(
            &self.pool,
            card.id,
            RequestType::Revoke,
            &payload.composed_reason(),
            ctx.current_principal_id(),
        )
        .await
        .map_err(|e| match e {
            // Concurrent intake lost on the pending-request unique index
            RepoError::Duplicate(_) => pending_exists(&card.icard_number, None),
            other => other.into(),
        })?;

        tracing::info!(
            request_id = request.id,
            icard_id = card.id,
            icard_number = %card.icard_number,
            requested_by = %request.requested_by,
            "Revocation requested"
        );
        Ok(request)
    }

    /// Pending revocation requests (oldest first)
    pub async fn pending_revocations(&self, ctx: &AuthContext) -> WorkflowResult<Vec<IcardRequest>> {
        self.require_role(ctx, &[Role::Awo, Role::Dealer, Role::Admin], "list_revocations")?;
        Ok(icard_request::find_by_status(&self.pool, RequestStatus::Pending).await?)
    }

    /// AWO decision on a pending revocation request
    pub async fn awo_revocation_decision(
        &self,
        ctx: &AuthContext,
        request_id: i64,
        decision: &ReviewDecision,
    ) -> WorkflowResult<RevocationOutcome> {
        self.require_role(ctx, &[Role::Awo], "decide_revocation")?;
        validate_remarks(&decision.remarks)?;

        let request = icard_request::find_by_id(&self.pool, request_id)
            .await?
            .ok_or_else(|| request_not_found(request_id))?;
        if request.status != RequestStatus::Pending {
            return Err(WorkflowError::InvalidTransition(
                ErrorCode::RevocationAlreadyDecided,
                format!("Revocation request {} is already {}", request.id, request.status),
            ));
        }
        if request.request_type != RequestType::Revoke {
            return Err(WorkflowError::InvalidTransition(
                ErrorCode::InvalidRequest,
                format!("Request {} is not a revocation request", request.id),
            ));
        }

        self.apply_revocation_decision(&request, decision).await
    }

    /// Commit the decision against the request as loaded.
    ///
    /// Approval flips the request and the card in one transaction.
    pub(crate) async fn apply_revocation_decision(
        &self,
        request: &IcardRequest,
        decision: &ReviewDecision,
    ) -> WorkflowResult<RevocationOutcome> {
        let remarks = decision.remarks.trim();
        let now = shared::util::now_millis();
        let new_status = transitions::next_request_status(decision.action);

        let mut tx = self.pool.begin().await?;
        let rows = icard_request::conditional_update_status(
            &mut *tx,
            request.id,
            RequestStatus::Pending,
            new_status,
            remarks,
            now,
        )
        .await?;
        if rows == 0 {
            tracing::warn!(request_id = request.id, "Revocation decision lost to a concurrent decision");
            return Err(WorkflowError::AlreadyReviewed(
                ErrorCode::RevocationAlreadyDecided,
                format!("Revocation request {} was already decided", request.id),
            ));
        }

        if decision.action == ReviewAction::Approve {
            let fields = IcardStatusFields {
                is_current: false,
                revoked_at: Some(now),
                revocation_reason: Some(remarks),
            };
            let rows = icard::conditional_update_status(
                &mut *tx,
                request.icard_id,
                IcardStatus::Active,
                IcardStatus::Revoked,
                fields,
            )
            .await?;
            if rows == 0 {
                // Rolls the request decision back with the transaction
                let card = icard::find_by_id(&mut *tx, request.icard_id)
                    .await?
                    .ok_or_else(|| icard_not_found(request.icard_id))?;
                return Err(icard_not_active(&card));
            }
        }

        tx.commit().await?;

        let request = icard_request::find_by_id(&self.pool, request.id)
            .await?
            .ok_or_else(|| request_not_found(request.id))?;
        let card = icard::find_by_id(&self.pool, request.icard_id)
            .await?
            .ok_or_else(|| icard_not_found(request.icard_id))?;

        tracing::info!(
            request_id = request.id,
            icard_id = card.id,
            icard_number = %card.icard_number,
            action = ?decision.action,
            status = %request.status,
            "Revocation decided"
        );
        Ok(RevocationOutcome { request, icard: card })
    }
}
