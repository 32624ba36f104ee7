//! Application API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_remarks_len, validate_required_text,
};
use shared::models::{Application, ApplicationCreate, Icard, ReviewDecision, ReviewStage};

/// Application with derived display fields
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub status_label: String,
    pub rejected_by: Option<ReviewStage>,
}

impl From<Application> for ApplicationView {
    fn from(application: Application) -> Self {
        Self {
            status_label: application.status_label(),
            rejected_by: application.rejected_by(),
            application,
        }
    }
}

/// AWO decision response
#[derive(Debug, Serialize)]
pub struct AwoDecisionResponse {
    pub application: ApplicationView,
    pub icard_number: Option<String>,
    pub icard: Option<Icard>,
}

fn validate_form(payload: &ApplicationCreate) -> AppResult<()> {
    validate_required_text(&payload.hrms_id, "hrms_id", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.designation, "designation", MAX_NAME_LEN)?;
    validate_optional_text(&payload.blood_group, "blood_group", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.mobile_number, "mobile_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.identification_mark, "identification_mark", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.photo_path, "photo_path", MAX_URL_LEN)?;
    validate_optional_text(&payload.signature_path, "signature_path", MAX_URL_LEN)?;
    Ok(())
}

/// POST /api/applications - 提交申请
pub async fn submit(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ApplicationCreate>,
) -> AppResult<Json<ApplicationView>> {
    validate_form(&payload)?;
    let application = state.workflow.submit_application(&ctx, payload).await?;
    Ok(Json(application.into()))
}

/// GET /api/applications/:id - 获取申请 (含状态说明)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApplicationView>> {
    let application = state.workflow.get_application(&ctx, id).await?;
    Ok(Json(application.into()))
}

/// GET /api/applications/queue - 当前角色的待审列表
pub async fn queue(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<Json<Vec<ApplicationView>>> {
    let queue = state.workflow.pending_queue(&ctx).await?;
    Ok(Json(queue.into_iter().map(ApplicationView::from).collect()))
}

/// POST /api/applications/:id/co-review
pub async fn co_review(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewDecision>,
) -> AppResult<Json<ApplicationView>> {
    validate_remarks_len(&payload.remarks, state.config.min_remarks_len)?;
    let application = state.workflow.co_review(&ctx, id, &payload).await?;
    Ok(Json(application.into()))
}

/// POST /api/applications/:id/dealer-review
pub async fn dealer_review(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewDecision>,
) -> AppResult<Json<ApplicationView>> {
    validate_remarks_len(&payload.remarks, state.config.min_remarks_len)?;
    let application = state.workflow.dealer_review(&ctx, id, &payload).await?;
    Ok(Json(application.into()))
}

/// POST /api/applications/:id/awo-decision - 审批通过即发卡
pub async fn awo_decision(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewDecision>,
) -> AppResult<Json<AwoDecisionResponse>> {
    validate_remarks_len(&payload.remarks, state.config.min_remarks_len)?;
    let outcome = state.workflow.awo_decision(&ctx, id, &payload).await?;
    Ok(Json(AwoDecisionResponse {
        application: outcome.application.into(),
        icard_number: outcome.icard.as_ref().map(|c| c.icard_number.clone()),
        icard: outcome.icard,
    }))
}
