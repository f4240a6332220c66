//! Maintenance routine for expired and revoked refresh token records.
//!
//! Runs on demand (with dry-run support) or as a periodic background task.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::TokenRepository;

/// Configuration for the token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Service for purging expired and revoked refresh token records
pub struct TokenCleanupService<T: TokenRepository + 'static> {
    repository: Arc<T>,
    config: TokenCleanupConfig,
}

impl<T: TokenRepository> TokenCleanupService<T> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<T>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Purge records that are revoked or past their expiry
    ///
    /// A dry run reports the exact count a real run would delete: both paths
    /// evaluate the same store predicate, the dry run without mutation.
    ///
    /// # Returns
    /// * `Ok(usize)` - Rows deleted (real run) or rows that would be deleted
    ///   (dry run)
    pub async fn purge(&self, dry_run: bool) -> DomainResult<usize> {
        let affected = if dry_run {
            self.repository.count_expired_or_revoked().await?
        } else {
            self.repository.purge_expired_or_revoked().await?
        };

        info!(dry_run, affected, "Refresh token purge completed");
        Ok(affected)
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that runs a real purge at regular intervals.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.purge(false).await {
                    error!("Token cleanup cycle failed: {}", e);
                }
            }
        });
    }
}
