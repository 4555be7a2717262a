//! Transform: enrich raw records with interval metadata and a shared timestamp.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use super::{EXTRACT_REF_KEY, EXTRACT_STAGE, Stage, TRANSFORM_REF_KEY, TRANSFORM_STAGE};
use crate::error::StageError;
use crate::store::ArtifactStore;
use crate::types::{ArtifactRef, Record, RunContext, StageResult};

/// Format of the per-run transformation timestamp (`MM/DD/YYYY, HH:MM:SS`).
pub const TRANSFORMATION_TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";
/// Format of the stringified interval start appended to each record.
pub const INTERVAL_START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Field holding the shared per-run transformation timestamp.
pub const TRANSFORMATION_TIMESTAMP_FIELD: &str = "transformation_timestamp";
/// Field holding the stringified interval start.
pub const DATA_INTERVAL_START_FIELD: &str = "data_interval_start";

/// Reads the raw extract payload, appends the two derived fields to every
/// record, and stores the result under `{run_id}/transform`.
pub struct TransformStage {
  store: Arc<dyn ArtifactStore>,
}

impl TransformStage {
  pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
    Self { store }
  }
}

/// Appends the shared timestamp and interval start to every record in place.
pub(crate) fn enrich_records(records: &mut [Record], timestamp: &str, interval_start: &str) {
  for record in records.iter_mut() {
    record.insert(
      TRANSFORMATION_TIMESTAMP_FIELD.to_string(),
      Value::String(timestamp.to_string()),
    );
    record.insert(
      DATA_INTERVAL_START_FIELD.to_string(),
      Value::String(interval_start.to_string()),
    );
  }
}

#[async_trait]
impl Stage for TransformStage {
  fn name(&self) -> &str {
    TRANSFORM_STAGE
  }

  fn predecessors(&self) -> &[&str] {
    &[EXTRACT_STAGE]
  }

  #[instrument(level = "trace", skip(self, ctx), fields(run_id = %ctx.run_id))]
  async fn execute(&self, ctx: &RunContext) -> StageResult {
    // The executor enforces ordering; a missing ref here means an
    // out-of-order invocation.
    let extract_ref = match ctx.get(EXTRACT_REF_KEY) {
      Some(r) => ArtifactRef::new(r),
      None => {
        return StageResult::failure(StageError::MissingInput {
          key: EXTRACT_REF_KEY.to_string(),
        });
      }
    };
    let payload = match self.store.get(&extract_ref) {
      Ok(p) => p,
      Err(e) => return StageResult::failure(e.into()),
    };
    let mut records: Vec<Record> = match serde_json::from_slice(&payload) {
      Ok(r) => r,
      Err(e) => {
        return StageResult::failure(StageError::Internal(format!("decode raw records: {}", e)));
      }
    };

    // One wall-clock read per invocation, not per record: every record of a
    // run must carry a byte-identical transformation timestamp.
    let timestamp = Utc::now().format(TRANSFORMATION_TIMESTAMP_FORMAT).to_string();
    let interval_start = ctx.interval_start.format(INTERVAL_START_FORMAT).to_string();
    enrich_records(&mut records, &timestamp, &interval_start);
    info!(count = records.len(), "transformed records");

    let transformed = match serde_json::to_vec(&records) {
      Ok(p) => p,
      Err(e) => {
        return StageResult::failure(StageError::Internal(format!(
          "serialize transformed records: {}",
          e
        )));
      }
    };
    let key = ctx.artifact_key(TRANSFORM_STAGE);
    let reference = match self.store.put(&key, &transformed) {
      Ok(r) => r,
      Err(e) => return StageResult::failure(e.into()),
    };

    let mut updates = HashMap::new();
    updates.insert(TRANSFORM_REF_KEY.to_string(), reference.to_string());
    StageResult::success(updates)
  }
}
