//! Upstream record provider: capability trait plus the HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use crate::config::PipelineConfig;
use crate::types::Record;

/// Bounded timeout for provider calls so a hung upstream surfaces as a
/// failure instead of stalling the executor.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure fetching records from the upstream provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
  /// Provider answered with a non-success status.
  #[error("status {status}: {body}")]
  Status { status: u16, body: String },
  /// The request could not complete (connect failure, timeout, bad payload).
  #[error("transport: {0}")]
  Transport(String),
}

/// Capability: fetch the record collection for one country filter.
///
/// Records are opaque key/value mappings to the pipeline; the provider owns
/// their shape.
#[async_trait]
pub trait RecordProvider: Send + Sync {
  async fn fetch(&self, country: &str) -> Result<Vec<Record>, FetchError>;
}

/// Substitutes `{country}` in the provider URL template.
pub(crate) fn build_provider_url(template: &str, country: &str) -> String {
  template.replace("{country}", country)
}

/// HTTP record provider. The API key travels in the `X-Api-Key` header.
pub struct HttpRecordProvider {
  client: reqwest::Client,
  url_template: String,
  api_key: String,
}

impl HttpRecordProvider {
  pub fn new(config: &PipelineConfig) -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    Ok(Self {
      client,
      url_template: config.provider_url_template.clone(),
      api_key: config.provider_api_key.clone(),
    })
  }
}

#[async_trait]
impl RecordProvider for HttpRecordProvider {
  #[instrument(level = "trace", skip(self))]
  async fn fetch(&self, country: &str) -> Result<Vec<Record>, FetchError> {
    let url = build_provider_url(&self.url_template, country);
    let response = self
      .client
      .get(&url)
      .header("X-Api-Key", &self.api_key)
      .send()
      .await
      .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
        body,
      });
    }

    serde_json::from_str(&body)
      .map_err(|e| FetchError::Transport(format!("invalid provider payload: {}", e)))
  }
}
