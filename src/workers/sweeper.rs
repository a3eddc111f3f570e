use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::core::error::Error;
use crate::token::TokenStore;

/// Periodically removes expired session tokens from the store.
pub(crate) struct Sweeper {
    store: Arc<dyn TokenStore>,
    period: Duration,
}

impl Sweeper {
    pub(crate) fn new(store: Arc<dyn TokenStore>, period: Duration) -> Self {
        Self { store, period }
    }

    pub(crate) async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.sweep().await {
                tracing::error!("Error purging expired session tokens: {}", e);
            }
        }
    }

    #[tracing::instrument(skip_all)]
    pub(crate) async fn sweep(&self) -> Result<u64, Error> {
        let purged = self.store.purge_expired(Utc::now()).await?;

        if purged > 0 {
            tracing::info!(purged, "Purged expired session tokens");
        } else {
            tracing::debug!("No expired session tokens");
        }

        Ok(purged)
    }
}
