use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use tokio::time::MissedTickBehavior;

use super::store::RevocationError;
use super::store::RevocationStore;

/// Periodically removes revocation records whose token has expired anyway.
pub struct RevocationSweeper<RS: RevocationStore> {
    store: Arc<RS>,
    interval: Duration,
}

impl<RS: RevocationStore> RevocationSweeper<RS> {
    pub fn new(store: Arc<RS>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run a single collection pass at `now`.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<u64, RevocationError> {
        let removed = self.store.gc(now).await?;
        if removed > 0 {
            tracing::debug!(removed, "Expired revocation records removed");
        }
        Ok(removed)
    }

    /// Start the collection loop
    ///
    /// This is a long-running task that should be spawned in a separate tokio task.
    /// A failed pass is logged and retried on the next tick.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting revocation sweeper loop"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if let Err(error) = self.sweep_once(Utc::now()).await {
                tracing::warn!(error = %error, "Revocation sweep failed");
            }
        }
    }
}
