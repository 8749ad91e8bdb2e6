#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{BreakDefinition, BreakEvent};
use crate::error::BreaksServiceError;

/// Repository for break definitions.
pub trait BreakRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<BreakDefinition>, BreaksServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BreakDefinition>, BreaksServiceError>;

    async fn create(&self, definition: &BreakDefinition) -> Result<(), BreaksServiceError>;

    /// Overwrite name and times in place. Returns `true` if a row was updated.
    async fn update(&self, definition: &BreakDefinition) -> Result<bool, BreaksServiceError>;

    /// Delete a break. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, BreaksServiceError>;
}

/// Destination for break lifecycle events (audit log).
pub trait BreakEventSink: Send + Sync {
    async fn record(&self, event: &BreakEvent) -> Result<(), BreaksServiceError>;
}
