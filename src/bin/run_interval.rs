//! CLI: trigger one pipeline run for a scheduling interval.
//!
//! The external scheduler (cron or similar) invokes this at the configured
//! cadence; the binary runs exactly the interval it is given (no backfill).
//! When no interval is passed, the most recent whole hour is used, matching
//! an hourly schedule with catch-up disabled.
//!
//! Usage: `run_interval [OPTIONS]`
//! Example: run_interval --country NL --interval-start 2024-01-01T00:00:00Z
//!
//! Artifacts are written under `.airlift/{run_id}/` on each run.
//!
//! Set RUST_LOG=airlift=trace for TRACE-level span enter/exit and events.

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use airlift::{
  ArtifactStore, ExtractStage, FsArtifactStore, HttpRecordProvider, LoadStage, LogSink, Pipeline,
  PipelineConfig, RecordProvider, RunState, Stage, TransformStage,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const RUN_DIR: &str = ".airlift";

/// Trigger one pipeline run for a scheduling interval.
///
/// Environment variables (see --help for AIRLIFT_API_KEY and AIRLIFT_RUN_DIR).
#[derive(Parser, Debug)]
#[command(name = "run_interval")]
#[command(
  after_help = r#"Environment variables (override --api-key and --run-dir when set):
  AIRLIFT_API_KEY   Provider API key, sent as the X-Api-Key header.
  AIRLIFT_RUN_DIR   Directory for run-scoped artifacts (default: .airlift).

Examples:
  run_interval --country NL
  run_interval --interval-start 2024-01-01T00:00:00Z --interval-end 2024-01-01T01:00:00Z"#
)]
struct Args {
  /// Start of the scheduling interval (RFC 3339). Default: the most recent whole hour.
  #[arg(long, value_name = "TIMESTAMP")]
  interval_start: Option<DateTime<Utc>>,

  /// End of the scheduling interval (RFC 3339). Default: interval start + 1 hour.
  #[arg(long, value_name = "TIMESTAMP")]
  interval_end: Option<DateTime<Utc>>,

  /// Provider URL template; `{country}` is substituted with --country.
  #[arg(
    long,
    value_name = "URL",
    default_value = "https://api.api-ninjas.com/v1/airports?country={country}"
  )]
  provider_url: String,

  /// Provider API key. Overridden by AIRLIFT_API_KEY if set.
  #[arg(long, value_name = "KEY", default_value = "")]
  api_key: String,

  /// Country filter for the provider query.
  #[arg(long, value_name = "CODE", default_value = "US")]
  country: String,

  /// Directory for run-scoped artifacts. Overridden by AIRLIFT_RUN_DIR if set.
  #[arg(long, value_name = "DIR", default_value = RUN_DIR)]
  run_dir: PathBuf,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  info!("run_interval starting");
  let args = Args::parse();

  // Env vars override flags. These are the values used by the program (not read from env again).
  let api_key = env::var("AIRLIFT_API_KEY").ok().unwrap_or(args.api_key);
  let run_dir = env::var("AIRLIFT_RUN_DIR")
    .ok()
    .map(PathBuf::from)
    .unwrap_or(args.run_dir);

  let interval_start = match args.interval_start {
    Some(ts) => ts,
    None => match Utc::now().duration_trunc(Duration::hours(1)) {
      Ok(ts) => ts,
      Err(e) => {
        eprintln!("Error deriving interval start: {}", e);
        process::exit(1);
      }
    },
  };
  let interval_end = args
    .interval_end
    .unwrap_or(interval_start + Duration::hours(1));

  info!(
    interval_start = %interval_start,
    interval_end = %interval_end,
    country = %args.country,
    run_dir = %run_dir.display(),
    "options (env or flags)"
  );

  let config = PipelineConfig {
    provider_url_template: args.provider_url,
    provider_api_key: api_key,
    country_filter: args.country,
  };

  let provider: Arc<dyn RecordProvider> = match HttpRecordProvider::new(&config) {
    Ok(p) => Arc::new(p),
    Err(e) => {
      eprintln!("Error building provider: {}", e);
      process::exit(1);
    }
  };
  let store: Arc<dyn ArtifactStore> = Arc::new(FsArtifactStore::new(run_dir));

  let stages: Vec<Box<dyn Stage>> = vec![
    Box::new(ExtractStage::new(provider, Arc::clone(&store), &config)),
    Box::new(TransformStage::new(Arc::clone(&store))),
    Box::new(LoadStage::new(Arc::new(LogSink))),
  ];
  let pipeline = match Pipeline::new(stages) {
    Ok(p) => p,
    Err(e) => {
      eprintln!("Error building pipeline: {}", e);
      process::exit(1);
    }
  };

  let report = pipeline.run(interval_start, interval_end).await;
  info!(state = %report.state, stages = ?report.completed_stages, "pipeline completed");
  println!("Run completed.");
  println!("  Run id: {}", report.context.run_id);
  println!("  State: {}", report.state);
  println!("  Completed stages: {:?}", report.completed_stages);
  if let RunState::Failed { stage, error } = &report.state {
    eprintln!("Stage {} failed ({}): {}", stage, error.kind(), error);
    process::exit(1);
  }
}
