use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、I-Card 文件、日志) |
/// | DATABASE_PATH | {WORK_DIR}/database/icard.db | SQLite 文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CARD_PREFIX_GAZ | GAZ | Gazetted 卡号前缀 |
/// | CARD_PREFIX_NG | NG | Non-gazetted 卡号前缀 |
/// | MIN_REMARKS_LEN | 5 | 审批意见最小长度 |
/// | ARTIFACT_RETRY_INTERVAL_SECS | 300 | 补做 I-Card 文件的扫描间隔 |
/// | MAX_CONCURRENT_REQUESTS | 256 | 并发请求上限 |
///
/// Logging (`LOG_LEVEL`, `LOG_JSON`, `LOG_DIR`) is read by [`crate::setup_environment`].
/// JWT settings come from `JWT_SECRET`, `JWT_EXPIRATION_MINUTES`, `JWT_ISSUER`, `JWT_AUDIENCE`.
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub card_prefix_gazetted: String,
    pub card_prefix_non_gazetted: String,
    /// Minimum reviewer remarks length accepted over HTTP
    pub min_remarks_len: usize,
    pub artifact_retry_interval_secs: u64,
    pub max_concurrent_requests: usize,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{work_dir}/database/icard.db"));
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            database_path,
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            card_prefix_gazetted: std::env::var("CARD_PREFIX_GAZ").unwrap_or_else(|_| "GAZ".into()),
            card_prefix_non_gazetted: std::env::var("CARD_PREFIX_NG").unwrap_or_else(|_| "NG".into()),
            min_remarks_len: env_or("MIN_REMARKS_LEN", 5),
            artifact_retry_interval_secs: env_or("ARTIFACT_RETRY_INTERVAL_SECS", 300),
            max_concurrent_requests: env_or("MAX_CONCURRENT_REQUESTS", 256),
            jwt,
            work_dir,
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景: everything lives under `work_dir`
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16, jwt: JwtConfig) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: format!("{work_dir}/database/icard.db"),
            http_port,
            environment: "development".into(),
            card_prefix_gazetted: "GAZ".into(),
            card_prefix_non_gazetted: "NG".into(),
            min_remarks_len: 5,
            artifact_retry_interval_secs: 300,
            max_concurrent_requests: 256,
            jwt,
            work_dir,
        }
    }

    /// Directory the default card renderer writes to
    pub fn artifact_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("icards")
    }
}
