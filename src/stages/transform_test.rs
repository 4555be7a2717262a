//! Tests for the transform stage.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::transform::{DATA_INTERVAL_START_FIELD, TRANSFORMATION_TIMESTAMP_FIELD};
use super::{EXTRACT_REF_KEY, Stage, TRANSFORM_REF_KEY, TransformStage};
use crate::error::ErrorKind;
use crate::store::{ArtifactStore, MemoryArtifactStore};
use crate::types::{ArtifactRef, Record, RunContext};

fn record(id: u64, name: &str) -> Record {
  let mut r = Record::new();
  r.insert("id".to_string(), serde_json::json!(id));
  r.insert("name".to_string(), serde_json::json!(name));
  r
}

fn context_with_extract_ref(store: &MemoryArtifactStore, records: &[Record]) -> RunContext {
  let payload = serde_json::to_vec(records).unwrap();
  let reference = store.put("run-1/extract", &payload).unwrap();
  let mut ctx = RunContext::new(
    "run-1",
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
  );
  let mut updates = HashMap::new();
  updates.insert(EXTRACT_REF_KEY.to_string(), reference.to_string());
  ctx.merge_updates(&updates).unwrap();
  ctx
}

#[test]
fn enriches_every_record_and_preserves_cardinality() {
  let store = Arc::new(MemoryArtifactStore::new());
  let records = vec![record(1, "AMS"), record(2, "RTM"), record(3, "EIN")];
  let ctx = context_with_extract_ref(&store, &records);
  let stage = TransformStage::new(store.clone() as Arc<dyn ArtifactStore>);

  let result = tokio_test::block_on(stage.execute(&ctx));
  assert!(result.is_success());
  assert_eq!(
    result.context_updates.get(TRANSFORM_REF_KEY).map(String::as_str),
    Some("run-1/transform")
  );

  let stored = store.get(&ArtifactRef::new("run-1/transform")).unwrap();
  let transformed: Vec<Record> = serde_json::from_slice(&stored).unwrap();
  assert_eq!(transformed.len(), records.len());

  // Original fields survive, both derived fields are appended.
  for (raw, enriched) in records.iter().zip(&transformed) {
    assert_eq!(enriched.get("id"), raw.get("id"));
    assert_eq!(enriched.get("name"), raw.get("name"));
    assert_eq!(
      enriched.get(DATA_INTERVAL_START_FIELD),
      Some(&serde_json::json!("2024-01-01T00:00:00"))
    );
    assert!(enriched.contains_key(TRANSFORMATION_TIMESTAMP_FIELD));
  }
}

#[test]
fn all_records_share_one_transformation_timestamp() {
  let store = Arc::new(MemoryArtifactStore::new());
  let records = vec![record(1, "AMS"), record(2, "RTM"), record(3, "EIN")];
  let ctx = context_with_extract_ref(&store, &records);
  let stage = TransformStage::new(store.clone() as Arc<dyn ArtifactStore>);

  let result = tokio_test::block_on(stage.execute(&ctx));
  assert!(result.is_success());

  let stored = store.get(&ArtifactRef::new("run-1/transform")).unwrap();
  let transformed: Vec<Record> = serde_json::from_slice(&stored).unwrap();
  let first = transformed[0].get(TRANSFORMATION_TIMESTAMP_FIELD).unwrap();
  for r in &transformed {
    assert_eq!(r.get(TRANSFORMATION_TIMESTAMP_FIELD), Some(first));
  }
  // MM/DD/YYYY, HH:MM:SS
  let value = first.as_str().unwrap();
  assert_eq!(value.len(), "01/01/2024, 00:00:00".len());
  assert_eq!(&value[2..3], "/");
  assert_eq!(&value[10..12], ", ");
}

#[test]
fn missing_extract_ref_fails_with_missing_input() {
  let store = Arc::new(MemoryArtifactStore::new());
  let ctx = RunContext::new(
    "run-1",
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
  );
  let stage = TransformStage::new(store as Arc<dyn ArtifactStore>);

  let result = tokio_test::block_on(stage.execute(&ctx));
  assert!(!result.is_success());
  assert_eq!(result.error.map(|e| e.kind()), Some(ErrorKind::MissingInput));
}

#[test]
fn dangling_extract_ref_fails_with_artifact_not_found() {
  let store = Arc::new(MemoryArtifactStore::new());
  let mut ctx = RunContext::new(
    "run-1",
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
  );
  let mut updates = HashMap::new();
  updates.insert(EXTRACT_REF_KEY.to_string(), "run-1/extract".to_string());
  ctx.merge_updates(&updates).unwrap();
  let stage = TransformStage::new(store as Arc<dyn ArtifactStore>);

  let result = tokio_test::block_on(stage.execute(&ctx));
  assert_eq!(
    result.error.map(|e| e.kind()),
    Some(ErrorKind::ArtifactNotFound)
  );
}

#[test]
fn undecodable_raw_payload_fails_with_internal() {
  let store = Arc::new(MemoryArtifactStore::new());
  store.put("run-1/extract", b"not json").unwrap();
  let mut ctx = RunContext::new(
    "run-1",
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
  );
  let mut updates = HashMap::new();
  updates.insert(EXTRACT_REF_KEY.to_string(), "run-1/extract".to_string());
  ctx.merge_updates(&updates).unwrap();
  let stage = TransformStage::new(store as Arc<dyn ArtifactStore>);

  let result = tokio_test::block_on(stage.execute(&ctx));
  assert_eq!(result.error.map(|e| e.kind()), Some(ErrorKind::Internal));
}
