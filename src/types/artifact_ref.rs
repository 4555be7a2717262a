//! Opaque handle to a stored intermediate payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a stored intermediate payload.
///
/// Issued by [crate::store::ArtifactStore] `put` and resolvable via `get`.
/// A ref is immutable once issued: the store never rebinds an existing ref
/// to different bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef(String);

impl ArtifactRef {
  pub fn new(key: impl Into<String>) -> Self {
    Self(key.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ArtifactRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
