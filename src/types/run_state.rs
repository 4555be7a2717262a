//! Per-run state machine: Pending → Running → Succeeded | Failed.

use std::fmt;

use crate::error::StageError;

/// State of one triggered run as the executor advances through the stages.
///
/// Terminal states are [RunState::Succeeded] and [RunState::Failed]; a failed
/// run records the failing stage and its error so an operator can re-trigger
/// after fixing the root cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
  /// Created by the trigger, no stage started yet.
  Pending,
  /// The named stage is executing.
  Running { stage: String },
  /// Every stage reported Success.
  Succeeded,
  /// The named stage reported Failure; no later stage ran.
  Failed { stage: String, error: StageError },
}

impl RunState {
  pub fn is_terminal(&self) -> bool {
    matches!(self, RunState::Succeeded | RunState::Failed { .. })
  }

  pub fn is_success(&self) -> bool {
    matches!(self, RunState::Succeeded)
  }
}

impl fmt::Display for RunState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunState::Pending => write!(f, "pending"),
      RunState::Running { stage } => write!(f, "running({})", stage),
      RunState::Succeeded => write!(f, "succeeded"),
      RunState::Failed { stage, error } => write!(f, "failed({}: {})", stage, error.kind()),
    }
  }
}
