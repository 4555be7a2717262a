//! Artifact handoff layer between stages.

use thiserror::Error;

use crate::types::ArtifactRef;

mod fs_store;
mod memory_store;

pub use fs_store::FsArtifactStore;
pub use memory_store::MemoryArtifactStore;

/// Failure in the artifact layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
  /// Medium unreachable, or the key already holds different bytes.
  #[error("artifact write failed for key {key}: {reason}")]
  Write { key: String, reason: String },
  /// Unknown ref, or the underlying payload was evicted.
  #[error("artifact not found: {reference}")]
  NotFound { reference: String },
}

/// Durable put/get handoff between stages.
///
/// Keys must be run-scoped (`{run_id}/{stage_name}`) so concurrent runs never
/// collide. A ref is immutable once issued: a `put` that would change the
/// bytes behind an existing key fails instead of rebinding outstanding refs.
/// Implementations support concurrent `put`/`get` from independent runs.
pub trait ArtifactStore: Send + Sync {
  /// Stores `payload` durably under `key` and returns a resolvable ref.
  fn put(&self, key: &str, payload: &[u8]) -> Result<ArtifactRef, StoreError>;

  /// Resolves a ref issued by [ArtifactStore::put] back to its payload.
  fn get(&self, reference: &ArtifactRef) -> Result<Vec<u8>, StoreError>;
}
