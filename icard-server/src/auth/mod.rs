//! 认证授权模块
//!
//! 提供 JWT 认证和调用者上下文：
//! - [`JwtService`] - JWT 令牌服务
//! - [`AuthContext`] - 当前调用者 (principal + role)
//! - [`require_auth`] - 认证中间件

pub mod context;
pub mod jwt;
pub mod middleware;

pub use context::{AuthContext, Role};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
