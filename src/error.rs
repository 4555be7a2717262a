//! Error taxonomy: stage-level failures and pipeline-definition errors.

use std::fmt;

use thiserror::Error;

use crate::provider::FetchError;
use crate::store::StoreError;

/// Stable classification of a stage failure, reported for a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Upstream fetch returned non-success or could not complete.
  Provider,
  /// Artifact layer rejected a write.
  StorageWrite,
  /// A ref did not resolve to a payload.
  ArtifactNotFound,
  /// A required context key was absent: an orchestration bug or an
  /// out-of-order invocation.
  MissingInput,
  /// Load destination rejected the write.
  Sink,
  /// A stage tried to publish a context key that was already set.
  DuplicateKey,
  /// Unclassified failure.
  Internal,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorKind::Provider => write!(f, "provider_error"),
      ErrorKind::StorageWrite => write!(f, "storage_write_error"),
      ErrorKind::ArtifactNotFound => write!(f, "artifact_not_found_error"),
      ErrorKind::MissingInput => write!(f, "missing_input_error"),
      ErrorKind::Sink => write!(f, "sink_error"),
      ErrorKind::DuplicateKey => write!(f, "duplicate_key_error"),
      ErrorKind::Internal => write!(f, "internal_error"),
    }
  }
}

/// Failure inside a single stage.
///
/// Stages fold these into a [crate::types::StageResult] instead of raising
/// past their own boundary; the [crate::pipeline::Pipeline] executor is the
/// single point that decides to halt the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
  #[error("provider fetch failed: {0}")]
  Provider(FetchError),
  #[error("artifact write failed for key {key}: {reason}")]
  StorageWrite { key: String, reason: String },
  #[error("artifact not found: {reference}")]
  ArtifactNotFound { reference: String },
  #[error("required context key missing: {key}")]
  MissingInput { key: String },
  #[error("sink rejected write: {reason}")]
  Sink { reason: String },
  #[error("context key already set: {key}")]
  DuplicateKey { key: String },
  #[error("internal: {0}")]
  Internal(String),
}

impl StageError {
  /// Stable kind used in reports and logs.
  pub fn kind(&self) -> ErrorKind {
    match self {
      StageError::Provider(_) => ErrorKind::Provider,
      StageError::StorageWrite { .. } => ErrorKind::StorageWrite,
      StageError::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
      StageError::MissingInput { .. } => ErrorKind::MissingInput,
      StageError::Sink { .. } => ErrorKind::Sink,
      StageError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
      StageError::Internal(_) => ErrorKind::Internal,
    }
  }
}

impl From<StoreError> for StageError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::Write { key, reason } => StageError::StorageWrite { key, reason },
      StoreError::NotFound { reference } => StageError::ArtifactNotFound { reference },
    }
  }
}

/// Invalid pipeline definition, rejected at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
  #[error("pipeline has no stages")]
  Empty,
  #[error("duplicate stage name: {0}")]
  DuplicateStage(String),
  #[error("stage {stage} declares predecessor {predecessor} which does not appear earlier in the stage list")]
  UnknownPredecessor { stage: String, predecessor: String },
}
