//! Artifact Worker - 补做缺失的 I-Card 文件
//!
//! Scans for cards issued without an artifact (render failed or the process
//! stopped between commit and render) and produces them.

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::{CardRenderer, produce_for_card};
use crate::db::repository::icard;

/// Cards handled per scan
const DEFAULT_BATCH_SIZE: i64 = 50;

/// Worker that retries artifact production for cards with an empty `pdf_path`
pub struct CardArtifactWorker {
    pool: SqlitePool,
    renderer: Arc<dyn CardRenderer>,
    interval: Duration,
    batch_size: i64,
}

impl CardArtifactWorker {
    pub fn new(pool: SqlitePool, renderer: Arc<dyn CardRenderer>, interval: Duration) -> Self {
        Self {
            pool,
            renderer,
            interval,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// One scan over pending cards. Returns how many artifacts were recorded.
    pub async fn run_once(&self) -> usize {
        let cards = match icard::find_missing_artifacts(&self.pool, self.batch_size).await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::error!(error = %e, "Failed to scan cards without artifacts");
                return 0;
            }
        };

        let mut produced = 0;
        for card in &cards {
            match produce_for_card(&self.pool, self.renderer.as_ref(), card).await {
                Ok(Some(_)) => produced += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        icard_id = card.id,
                        icard_number = %card.icard_number,
                        error = %e,
                        "Artifact retry failed, will retry next scan"
                    );
                }
            }
        }

        if produced > 0 {
            tracing::info!(produced, pending = cards.len(), "Artifact scan completed");
        }
        produced
    }

    /// Run until `shutdown` flips to `true`
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Card artifact worker started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Card artifact worker stopped");
    }
}
