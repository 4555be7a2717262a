//! Load destination: capability trait plus the placeholder implementation.

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::types::ArtifactRef;

/// Capability: write a transformed artifact to the final destination.
#[async_trait]
pub trait LoadSink: Send + Sync {
  /// Acknowledges the write, or reports why the destination rejected it.
  async fn write(&self, reference: &ArtifactRef) -> Result<(), String>;
}

/// Placeholder sink standing in for a warehouse writer: logs the ref it
/// would load and acknowledges.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl LoadSink for LogSink {
  #[instrument(level = "trace", skip(self))]
  async fn write(&self, reference: &ArtifactRef) -> Result<(), String> {
    info!(reference = %reference, "placeholder load for transformed artifact");
    Ok(())
  }
}
