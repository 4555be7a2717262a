//! Result of executing a single pipeline stage.

use std::collections::HashMap;

use super::StageStatus;
use crate::error::StageError;

/// Result of executing a single pipeline stage.
///
/// A failed stage publishes no context updates, so a downstream stage can
/// never consume a partial ref; the constructors keep the two shapes honest.
#[derive(Debug, Clone)]
pub struct StageResult {
  pub status: StageStatus,
  pub context_updates: HashMap<String, String>,
  pub error: Option<StageError>,
}

impl StageResult {
  pub fn success(context_updates: HashMap<String, String>) -> Self {
    Self {
      status: StageStatus::Success,
      context_updates,
      error: None,
    }
  }

  pub fn failure(error: StageError) -> Self {
    Self {
      status: StageStatus::Failure,
      context_updates: HashMap::new(),
      error: Some(error),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == StageStatus::Success
  }
}
