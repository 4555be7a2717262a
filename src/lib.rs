//! # airlift
//!
//! Scheduled airport-data ETL as one fixed linear pipeline: extract →
//! transform → load.
//!
//! ## Architecture
//!
//! Stages hand results forward through run-scoped artifact references instead
//! of in-memory values: each stage stores its output in an
//! [store::ArtifactStore] under `{run_id}/{stage_name}` and publishes the ref
//! in the [types::RunContext] for the next stage to read. The
//! [pipeline::Pipeline] executor runs the stage list in order for one
//! scheduling interval and halts on the first failure; retry policy belongs
//! to the external trigger (see `run_interval`).

pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod sink;
pub mod stages;
pub mod store;
pub mod types;

pub use config::PipelineConfig;
pub use error::{ErrorKind, PipelineError, StageError};
pub use pipeline::{Pipeline, RunReport};
pub use provider::{FetchError, HttpRecordProvider, RecordProvider};
pub use sink::{LoadSink, LogSink};
pub use stages::{ExtractStage, LoadStage, Stage, TransformStage};
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore, StoreError};
pub use types::{ArtifactRef, Record, RunContext, RunState, StageResult, StageStatus};
