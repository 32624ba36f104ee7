//! 服务器状态
//!
//! Shared by every handler through axum's `State` extractor; cloning is cheap.

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::artifact::{CardArtifactWorker, CardRenderer, FileCardRenderer};
use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::workflow::{SequenceAllocator, WorkflowService};

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub workflow: WorkflowService,
    pub jwt_service: Arc<JwtService>,
    renderer: Arc<dyn CardRenderer>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl ServerState {
    /// Prepare the work directory, open the database and wire the services
    pub async fn initialize(config: &Config) -> Result<Self> {
        let renderer: Arc<dyn CardRenderer> = Arc::new(FileCardRenderer::new(config.artifact_dir()));
        Self::initialize_with_renderer(config, renderer).await
    }

    pub async fn initialize_with_renderer(
        config: &Config,
        renderer: Arc<dyn CardRenderer>,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(&config.work_dir).await?;
        tokio::fs::create_dir_all(config.artifact_dir()).await?;
        if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = DbService::new(&config.database_path)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        let allocator = SequenceAllocator::new(
            config.card_prefix_gazetted.clone(),
            config.card_prefix_non_gazetted.clone(),
        );
        let workflow = WorkflowService::new(db.pool.clone(), allocator, renderer.clone());
        let (shutdown, _) = watch::channel(false);

        tracing::info!(
            work_dir = %config.work_dir,
            database = %config.database_path,
            "Server state initialized"
        );

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            workflow,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            renderer,
            shutdown: Arc::new(shutdown),
        })
    }

    /// Spawn the artifact retry worker
    pub fn start_background_tasks(&self) {
        let worker = CardArtifactWorker::new(
            self.pool.clone(),
            self.renderer.clone(),
            Duration::from_secs(self.config.artifact_retry_interval_secs.max(1)),
        );
        tokio::spawn(worker.run(self.shutdown.subscribe()));
    }

    /// Signal background tasks to stop
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
