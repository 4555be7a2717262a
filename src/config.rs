//! Pipeline configuration, injected at construction.

/// Recognized configuration options for the extract provider call.
///
/// Passed explicitly into pipeline construction; there is no process-global
/// configuration state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  /// Provider URL template; `{country}` is substituted with [PipelineConfig::country_filter].
  pub provider_url_template: String,
  /// API key sent as the `X-Api-Key` header.
  pub provider_api_key: String,
  /// Country filter applied to the provider query.
  pub country_filter: String,
}
