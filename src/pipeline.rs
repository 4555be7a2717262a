//! Pipeline executor: runs the ordered stage list for one scheduling interval.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{PipelineError, StageError};
use crate::stages::Stage;
use crate::types::{RunContext, RunState, StageStatus};

/// Final result of one triggered run.
///
/// On failure the accumulated context and earlier stages' artifacts are kept
/// for inspection; nothing is rolled back.
#[derive(Debug, Clone)]
pub struct RunReport {
  /// Terminal state: Succeeded, or Failed with the failing stage and error.
  pub state: RunState,
  /// Names of stages that completed successfully, in order.
  pub completed_stages: Vec<String>,
  /// Accumulated run context.
  pub context: RunContext,
}

impl RunReport {
  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }
}

/// Ordered sequence of stages with a strictly linear dependency chain.
///
/// The executor runs stages in order, merges successful stages' context
/// updates into the run context, and halts on the first Failure. It never
/// retries: retry-with-backoff and alerting belong to the external trigger.
pub struct Pipeline {
  stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
  /// Validates the stage list: names unique, every declared predecessor
  /// appears earlier in the list.
  pub fn new(stages: Vec<Box<dyn Stage>>) -> Result<Self, PipelineError> {
    if stages.is_empty() {
      return Err(PipelineError::Empty);
    }
    let mut seen: Vec<&str> = Vec::with_capacity(stages.len());
    for stage in &stages {
      if seen.contains(&stage.name()) {
        return Err(PipelineError::DuplicateStage(stage.name().to_string()));
      }
      for pred in stage.predecessors() {
        if !seen.contains(pred) {
          return Err(PipelineError::UnknownPredecessor {
            stage: stage.name().to_string(),
            predecessor: pred.to_string(),
          });
        }
      }
      seen.push(stage.name());
    }
    Ok(Self { stages })
  }

  /// Runs the pipeline for one scheduling interval with a fresh run id.
  pub async fn run(
    &self,
    interval_start: DateTime<Utc>,
    interval_end: DateTime<Utc>,
  ) -> RunReport {
    self
      .run_with_id(Uuid::new_v4().to_string(), interval_start, interval_end)
      .await
  }

  /// Runs with an operator-chosen run id (e.g. a re-trigger after a failure).
  #[instrument(level = "trace", skip(self, interval_start, interval_end))]
  pub async fn run_with_id(
    &self,
    run_id: String,
    interval_start: DateTime<Utc>,
    interval_end: DateTime<Utc>,
  ) -> RunReport {
    let mut ctx = RunContext::new(run_id, interval_start, interval_end);
    let mut completed: Vec<String> = Vec::with_capacity(self.stages.len());
    let mut state = RunState::Pending;
    info!(
      run_id = %ctx.run_id,
      interval_start = %ctx.interval_start,
      interval_end = %ctx.interval_end,
      state = %state,
      "run triggered"
    );

    for stage in &self.stages {
      // Construction already validated ordering; re-check before running so
      // an out-of-order invocation cannot consume missing inputs.
      if let Some(pred) = stage
        .predecessors()
        .iter()
        .find(|p| !completed.iter().any(|c| c == *p))
      {
        let error = StageError::Internal(format!(
          "stage {} started before predecessor {}",
          stage.name(),
          pred
        ));
        warn!(stage = stage.name(), predecessor = %pred, "predecessor not completed");
        return self.fail(ctx, completed, stage.name(), error);
      }

      state = RunState::Running {
        stage: stage.name().to_string(),
      };
      info!(stage = stage.name(), state = %state, "stage started");
      let result = stage.execute(&ctx).await;

      match result.status {
        StageStatus::Success => {
          if let Err(error) = ctx.merge_updates(&result.context_updates) {
            warn!(stage = stage.name(), error = %error, "context update collision");
            return self.fail(ctx, completed, stage.name(), error);
          }
          completed.push(stage.name().to_string());
          info!(stage = stage.name(), "stage finished");
        }
        StageStatus::Failure => {
          let error = result.error.unwrap_or_else(|| {
            StageError::Internal("stage reported failure without an error".to_string())
          });
          return self.fail(ctx, completed, stage.name(), error);
        }
      }
    }

    let state = RunState::Succeeded;
    info!(run_id = %ctx.run_id, stages = ?completed, state = %state, "run succeeded");
    RunReport {
      state,
      completed_stages: completed,
      context: ctx,
    }
  }

  /// Halts the run: no later stage executes, earlier stages' artifacts stay
  /// in place for diagnosis.
  fn fail(
    &self,
    ctx: RunContext,
    completed: Vec<String>,
    stage: &str,
    error: StageError,
  ) -> RunReport {
    let state = RunState::Failed {
      stage: stage.to_string(),
      error,
    };
    warn!(run_id = %ctx.run_id, state = %state, "run failed; halting");
    RunReport {
      state,
      completed_stages: completed,
      context: ctx,
    }
  }
}
