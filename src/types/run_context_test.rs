//! Tests for `RunContext`.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use super::RunContext;
use crate::error::StageError;

fn context() -> RunContext {
  RunContext::new(
    "run-1",
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
  )
}

#[test]
fn new_context_starts_with_no_values() {
  let ctx = context();
  assert_eq!(ctx.run_id, "run-1");
  assert!(ctx.values().is_empty());
  assert_eq!(ctx.get("extract_ref"), None);
}

#[test]
fn merge_updates_publishes_new_keys() {
  let mut ctx = context();
  let mut updates = HashMap::new();
  updates.insert("extract_ref".to_string(), "run-1/extract".to_string());
  ctx.merge_updates(&updates).unwrap();
  assert_eq!(ctx.get("extract_ref"), Some("run-1/extract"));
}

#[test]
fn merge_updates_rejects_an_existing_key() {
  let mut ctx = context();
  let mut updates = HashMap::new();
  updates.insert("extract_ref".to_string(), "run-1/extract".to_string());
  ctx.merge_updates(&updates).unwrap();

  let err = ctx.merge_updates(&updates).unwrap_err();
  assert_eq!(
    err,
    StageError::DuplicateKey {
      key: "extract_ref".to_string()
    }
  );
  // The original value is untouched.
  assert_eq!(ctx.get("extract_ref"), Some("run-1/extract"));
}

#[test]
fn artifact_key_is_namespaced_by_run_id() {
  let ctx = context();
  assert_eq!(ctx.artifact_key("extract"), "run-1/extract");
  assert_eq!(ctx.artifact_key("transform"), "run-1/transform");
}
