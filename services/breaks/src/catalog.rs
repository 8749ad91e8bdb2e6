//! Live copy of the break definitions that the status watcher evaluates.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::domain::repository::BreakRepository;
use crate::domain::types::BreakDefinition;
use crate::error::BreaksServiceError;

/// Shared break catalog. `None` until the first successful load.
#[derive(Clone)]
pub struct BreakCatalog {
    tx: Arc<watch::Sender<Option<Vec<BreakDefinition>>>>,
}

impl Default for BreakCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakCatalog {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<BreakDefinition>>> {
        self.tx.subscribe()
    }

    pub fn publish(&self, definitions: Vec<BreakDefinition>) {
        self.tx.send_replace(Some(definitions));
    }

    pub fn current(&self) -> Option<Vec<BreakDefinition>> {
        self.tx.borrow().clone()
    }

    /// Re-read every definition from `repo` and publish the result.
    pub async fn reload<R: BreakRepository>(&self, repo: &R) -> Result<usize, BreaksServiceError> {
        let definitions = repo.list().await?;
        let count = definitions.len();
        self.publish(definitions);
        Ok(count)
    }
}

/// Reload `catalog` from `repo` every `every`, picking up edits made through
/// other service instances. Failures keep the previous catalog.
pub async fn refresh_periodically<R: BreakRepository>(
    catalog: BreakCatalog,
    repo: R,
    every: Duration,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match catalog.reload(&repo).await {
            Ok(count) => tracing::debug!(count, "break catalog refreshed"),
            Err(e) => tracing::warn!(error = %e, "break catalog refresh failed"),
        }
    }
}
