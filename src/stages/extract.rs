//! Extract: fetch records from the provider and store the raw payload.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::{EXTRACT_REF_KEY, EXTRACT_STAGE, Stage};
use crate::config::PipelineConfig;
use crate::error::StageError;
use crate::provider::RecordProvider;
use crate::store::ArtifactStore;
use crate::types::{RunContext, StageResult};

/// Fetches the record collection for the configured country filter and
/// stores the raw payload under `{run_id}/extract`.
pub struct ExtractStage {
  provider: Arc<dyn RecordProvider>,
  store: Arc<dyn ArtifactStore>,
  country_filter: String,
}

impl ExtractStage {
  pub fn new(
    provider: Arc<dyn RecordProvider>,
    store: Arc<dyn ArtifactStore>,
    config: &PipelineConfig,
  ) -> Self {
    Self {
      provider,
      store,
      country_filter: config.country_filter.clone(),
    }
  }
}

#[async_trait]
impl Stage for ExtractStage {
  fn name(&self) -> &str {
    EXTRACT_STAGE
  }

  #[instrument(level = "trace", skip(self, ctx), fields(run_id = %ctx.run_id))]
  async fn execute(&self, ctx: &RunContext) -> StageResult {
    let records = match self.provider.fetch(&self.country_filter).await {
      Ok(r) => r,
      Err(e) => {
        warn!(country = %self.country_filter, error = %e, "provider fetch failed");
        return StageResult::failure(StageError::Provider(e));
      }
    };
    info!(count = records.len(), country = %self.country_filter, "extracted records");

    let payload = match serde_json::to_vec(&records) {
      Ok(p) => p,
      Err(e) => {
        return StageResult::failure(StageError::Internal(format!("serialize records: {}", e)));
      }
    };
    let key = ctx.artifact_key(EXTRACT_STAGE);
    let reference = match self.store.put(&key, &payload) {
      Ok(r) => r,
      Err(e) => return StageResult::failure(e.into()),
    };

    let mut updates = HashMap::new();
    updates.insert(EXTRACT_REF_KEY.to_string(), reference.to_string());
    StageResult::success(updates)
  }
}
