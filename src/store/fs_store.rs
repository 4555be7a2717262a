//! Filesystem-backed artifact store (one file per key under a root directory).

use std::fs;
use std::path::PathBuf;

use tracing::instrument;

use super::{ArtifactStore, StoreError};
use crate::types::ArtifactRef;

/// Filesystem-backed artifact store.
///
/// The key is used as a path relative to `root`; parent directories are
/// created on demand, so run-scoped keys like `{run_id}/extract` land in one
/// directory per run. Re-`put` of identical bytes is idempotent and returns
/// the same ref.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
  root: PathBuf,
}

impl FsArtifactStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.root.join(key)
  }
}

impl ArtifactStore for FsArtifactStore {
  #[instrument(level = "trace", skip(self, payload))]
  fn put(&self, key: &str, payload: &[u8]) -> Result<ArtifactRef, StoreError> {
    let path = self.path_for(key);
    let write_err = |reason: String| StoreError::Write {
      key: key.to_string(),
      reason,
    };

    if path.exists() {
      let existing = fs::read(&path).map_err(|e| write_err(e.to_string()))?;
      if existing != payload {
        return Err(write_err("key already holds different content".to_string()));
      }
      return Ok(ArtifactRef::new(key));
    }

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    fs::write(&path, payload).map_err(|e| write_err(e.to_string()))?;
    Ok(ArtifactRef::new(key))
  }

  #[instrument(level = "trace", skip(self))]
  fn get(&self, reference: &ArtifactRef) -> Result<Vec<u8>, StoreError> {
    let path = self.path_for(reference.as_str());
    fs::read(&path).map_err(|_| StoreError::NotFound {
      reference: reference.as_str().to_string(),
    })
  }
}
