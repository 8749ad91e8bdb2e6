use chrono::Local;
use sea_orm::DatabaseConnection;
use tokio::sync::watch;

use crate::catalog::BreakCatalog;
use crate::domain::types::BreakStatus;
use crate::infra::db::DbBreakRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub catalog: BreakCatalog,
    /// Latest status published by the watcher.
    pub status: watch::Receiver<BreakStatus>,
}

impl AppState {
    pub fn break_repo(&self) -> DbBreakRepository {
        DbBreakRepository {
            db: self.db.clone(),
        }
    }

    /// Break times are entered and displayed in the server's local zone.
    pub fn tz(&self) -> Local {
        Local
    }

    /// Republish the catalog after a write so the watcher sees it on its next
    /// tick. The write already succeeded, so a failed reload is only logged.
    pub async fn refresh_catalog(&self) {
        if let Err(e) = self.catalog.reload(&self.break_repo()).await {
            tracing::warn!(error = %e, "failed to reload break catalog after write");
        }
    }
}
