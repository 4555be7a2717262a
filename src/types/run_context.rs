//! Per-run metadata and artifact-reference map threaded through stages.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::StageError;

/// Per-run metadata plus the key/value map stages use to hand refs forward.
///
/// Created once per triggered run and discarded when the run completes; only
/// the executor mutates it, by merging the currently executing stage's
/// context updates. Stages of one run execute sequentially, so the map is
/// never mutated concurrently.
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Unique id for this triggered run; namespaces artifact keys.
  pub run_id: String,
  /// Start of the scheduling interval this run processes (inclusive).
  pub interval_start: DateTime<Utc>,
  /// End of the scheduling interval (exclusive).
  pub interval_end: DateTime<Utc>,
  values: HashMap<String, String>,
}

impl RunContext {
  pub fn new(
    run_id: impl Into<String>,
    interval_start: DateTime<Utc>,
    interval_end: DateTime<Utc>,
  ) -> Self {
    Self {
      run_id: run_id.into(),
      interval_start,
      interval_end,
      values: HashMap::new(),
    }
  }

  /// Looks up a value published by an earlier stage.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  /// All values published so far (artifact refs and derived scalars).
  pub fn values(&self) -> &HashMap<String, String> {
    &self.values
  }

  /// Merges a completed stage's context updates.
  ///
  /// A key that is already present fails with [StageError::DuplicateKey];
  /// earlier stages' keys are never overwritten.
  #[instrument(level = "trace", skip(self, updates))]
  pub(crate) fn merge_updates(
    &mut self,
    updates: &HashMap<String, String>,
  ) -> Result<(), StageError> {
    for (key, value) in updates {
      if self.values.contains_key(key) {
        return Err(StageError::DuplicateKey { key: key.clone() });
      }
      self.values.insert(key.clone(), value.clone());
    }
    Ok(())
  }

  /// Storage key for a stage's output artifact, namespaced by run id so
  /// concurrent runs never collide.
  pub fn artifact_key(&self, stage_name: &str) -> String {
    format!("{}/{}", self.run_id, stage_name)
  }
}
