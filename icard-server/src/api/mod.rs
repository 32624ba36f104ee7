//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`applications`] - I-Card 申请与审批
//! - [`revocations`] - I-Card 吊销
//! - [`employees`] - 员工与 Controlling Officer 档案

pub mod applications;
pub mod employees;
pub mod health;
pub mod revocations;

use axum::Router;
use http::HeaderName;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthContext, Role};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(applications::router())
        .merge(revocations::router())
        .merge(employees::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // JWT 认证 - require_auth 内部跳过非 /api 路由
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(ConcurrencyLimitLayer::new(state.config.max_concurrent_requests))
}

/// Role check for record-keeping endpoints outside the approval workflow
pub(crate) fn require_role(ctx: &AuthContext, allowed: &[Role]) -> AppResult<()> {
    if ctx.has_any_role(allowed) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "role_denied",
        principal = ctx.current_principal_id().to_string(),
        role = ctx.current_role().as_str()
    );
    Err(AppError::forbidden(format!(
        "Role {} is not allowed here",
        ctx.current_role()
    )))
}
