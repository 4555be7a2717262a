//! In-memory artifact store for tests and single-process runs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{ArtifactStore, StoreError};
use crate::types::ArtifactRef;

/// In-memory artifact store.
///
/// Same contract as the filesystem store: run-scoped keys, refs never rebound
/// to different bytes. Safe for concurrent `put`/`get` from independent runs.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
  entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ArtifactStore for MemoryArtifactStore {
  fn put(&self, key: &str, payload: &[u8]) -> Result<ArtifactRef, StoreError> {
    let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = entries.get(key) {
      if existing != payload {
        return Err(StoreError::Write {
          key: key.to_string(),
          reason: "key already holds different content".to_string(),
        });
      }
      return Ok(ArtifactRef::new(key));
    }
    entries.insert(key.to_string(), payload.to_vec());
    Ok(ArtifactRef::new(key))
  }

  fn get(&self, reference: &ArtifactRef) -> Result<Vec<u8>, StoreError> {
    let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    entries
      .get(reference.as_str())
      .cloned()
      .ok_or_else(|| StoreError::NotFound {
        reference: reference.as_str().to_string(),
      })
  }
}
