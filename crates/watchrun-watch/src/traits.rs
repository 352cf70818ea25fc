//! Seams between the engine and its collaborators.

use crate::{config::WatchConfig, error::Result, events::EnrichedEvent};
use async_trait::async_trait;
use std::path::Path;

/// Registers additional paths with the notification backend.
pub trait WatchRegistrar: Send {
    /// Start watching `path` (non-recursively).
    fn add_watch(&mut self, path: &Path) -> Result<()>;
}

/// Runs the configured command for a fired event.
///
/// The coordinator awaits this before handling further input, so at most one
/// command runs at a time. `event` is `None` only for the run-on-start
/// invocation.
#[async_trait]
pub trait EventExecutor: Send + Sync {
    /// Execute the command for `event`.
    async fn execute(&self, config: &WatchConfig, event: Option<&EnrichedEvent>);
}
