//! I-Card Server - 员工身份卡签发审批服务
//!
//! # 架构概述
//!
//! - **审批流程** (`workflow`): CO → Dealer → AWO 三级审批，状态守卫更新
//! - **数据库** (`db`): SQLite (sqlx)，迁移与仓储函数
//! - **认证** (`auth`): JWT + 角色上下文
//! - **卡面产出** (`artifact`): 发卡后渲染，失败由后台任务补做
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! icard-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── auth/          # JWT 认证、角色
//! ├── workflow/      # 状态机、卡号分配、吊销
//! ├── artifact/      # 卡面渲染与补偿任务
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod artifact;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;
pub mod workflow;

// Re-export 公共类型
pub use auth::{AuthContext, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};
pub use workflow::{SequenceAllocator, WorkflowError, WorkflowService};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 `.env`，初始化日志
///
/// - `LOG_LEVEL` - 默认日志级别 (RUST_LOG 优先)
/// - `LOG_JSON` - `true` 时输出 JSON 格式
/// - `LOG_DIR` - 日志目录，存在时按天滚动写文件
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 可选
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____      ______               __
   /  _/     / ____/___ __________/ /
   / /______/ /   / __ `/ ___/ __  /
 _/ /_____/ /___/ /_/ / /  / /_/ /
/___/     \____/\__,_/_/   \__,_/
    "#
    );
}
