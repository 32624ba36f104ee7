//! Revocation API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;

use crate::auth::{AuthContext, Role};
use crate::core::ServerState;
use crate::db::repository::icard;
use crate::utils::validation::validate_remarks_len;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Icard, IcardRequest, ReviewDecision, RevocationCreate};

/// Revocation decision response
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub request: IcardRequest,
    pub icard: Icard,
}

/// GET /api/icards/:id
///
/// Employees may only read their own cards.
pub async fn get_icard(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> AppResult<Json<Icard>> {
    let card = icard::find_by_id(&state.pool, id)
        .await?
        .filter(|card| {
            ctx.current_role() != Role::Employee || card.hrms_id == ctx.current_principal_id()
        })
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::IcardNotFound, format!("I-Card {id} not found"))
        })?;
    Ok(Json(card))
}

/// POST /api/icards/:id/revocations - 发起吊销申请
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<RevocationCreate>,
) -> AppResult<Json<IcardRequest>> {
    let request = state
        .workflow
        .create_revocation_request(&ctx, id, &payload)
        .await?;
    Ok(Json(request))
}

/// GET /api/revocations/pending
pub async fn pending(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<Json<Vec<IcardRequest>>> {
    let requests = state.workflow.pending_revocations(&ctx).await?;
    Ok(Json(requests))
}

/// POST /api/revocations/:id/decision - AWO 裁决
pub async fn decide(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewDecision>,
) -> AppResult<Json<DecisionResponse>> {
    validate_remarks_len(&payload.remarks, state.config.min_remarks_len)?;
    let outcome = state
        .workflow
        .awo_revocation_decision(&ctx, id, &payload)
        .await?;
    Ok(Json(DecisionResponse {
        request: outcome.request,
        icard: outcome.icard,
    }))
}
