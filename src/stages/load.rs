//! Load: hand the transformed artifact to the sink.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, warn};

use super::{LOAD_STAGE, Stage, TRANSFORM_REF_KEY, TRANSFORM_STAGE};
use crate::error::StageError;
use crate::sink::LoadSink;
use crate::types::{ArtifactRef, RunContext, StageResult};

/// Reads the transform ref from the context and asks the sink to write it.
/// Publishes nothing: load is the end of the chain.
pub struct LoadStage {
  sink: Arc<dyn LoadSink>,
}

impl LoadStage {
  pub fn new(sink: Arc<dyn LoadSink>) -> Self {
    Self { sink }
  }
}

#[async_trait]
impl Stage for LoadStage {
  fn name(&self) -> &str {
    LOAD_STAGE
  }

  fn predecessors(&self) -> &[&str] {
    &[TRANSFORM_STAGE]
  }

  #[instrument(level = "trace", skip(self, ctx), fields(run_id = %ctx.run_id))]
  async fn execute(&self, ctx: &RunContext) -> StageResult {
    let transform_ref = match ctx.get(TRANSFORM_REF_KEY) {
      Some(r) => ArtifactRef::new(r),
      None => {
        return StageResult::failure(StageError::MissingInput {
          key: TRANSFORM_REF_KEY.to_string(),
        });
      }
    };

    match self.sink.write(&transform_ref).await {
      Ok(()) => StageResult::success(HashMap::new()),
      Err(reason) => {
        warn!(reference = %transform_ref, "sink rejected write");
        StageResult::failure(StageError::Sink { reason })
      }
    }
  }
}
