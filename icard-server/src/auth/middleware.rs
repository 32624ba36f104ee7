//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthContext, Claims, JwtError, JwtService, Role};
use crate::core::ServerState;
use crate::db::repository::controlling_officer;
use crate::security_log;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后将 [`AuthContext`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health`)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
/// | CO 身份无法解析 | 403 Forbidden |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证
    if !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    let ctx = resolve_context(&state, claims).await?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Build the caller context from validated claims.
///
/// Controlling officers are bound to their officer row by login email.
async fn resolve_context(state: &ServerState, claims: Claims) -> Result<AuthContext, AppError> {
    let role: Role = claims.role.parse().map_err(|e: String| {
        security_log!("WARN", "unknown_role", principal = claims.sub.clone(), error = e.clone());
        AppError::invalid_token(e)
    })?;

    if role != Role::ControllingOfficer {
        return Ok(AuthContext::new(claims.sub, role));
    }

    match controlling_officer::find_by_email(&state.pool, &claims.sub).await? {
        Some(officer) if officer.is_active => {
            Ok(AuthContext::controlling_officer(claims.sub, officer.id))
        }
        _ => {
            security_log!("WARN", "officer_unresolved", principal = claims.sub.clone());
            Err(AppError::forbidden(
                "No active controlling officer is registered for this login",
            ))
        }
    }
}
