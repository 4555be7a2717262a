//! Pipeline stages: the `Stage` trait plus extract, transform, load.

use async_trait::async_trait;

use crate::types::{RunContext, StageResult};

mod extract;
mod load;
mod transform;
#[cfg(test)]
mod transform_test;

pub use extract::ExtractStage;
pub use load::LoadStage;
pub use transform::{DATA_INTERVAL_START_FIELD, TRANSFORMATION_TIMESTAMP_FIELD, TransformStage};

/// Stage names; also the artifact-key suffix for each stage's output.
pub const EXTRACT_STAGE: &str = "extract";
pub const TRANSFORM_STAGE: &str = "transform";
pub const LOAD_STAGE: &str = "load";

/// Context key under which Extract publishes its output ref.
pub const EXTRACT_REF_KEY: &str = "extract_ref";
/// Context key under which Transform publishes its output ref.
pub const TRANSFORM_REF_KEY: &str = "transform_ref";

/// One unit of pipeline work with declared predecessors.
///
/// A stage reads refs published by earlier stages from the run context,
/// performs its operation, and returns a [StageResult]. Failures are folded
/// into the result rather than raised past the stage boundary; the executor
/// is the single point that decides to halt the run.
#[async_trait]
pub trait Stage: Send + Sync {
  /// Stable stage name, used for reports and as the artifact-key suffix.
  fn name(&self) -> &str;

  /// Names of stages that must succeed before this one starts.
  fn predecessors(&self) -> &[&str] {
    &[]
  }

  /// Executes the stage against the current run context.
  async fn execute(&self, ctx: &RunContext) -> StageResult;
}
