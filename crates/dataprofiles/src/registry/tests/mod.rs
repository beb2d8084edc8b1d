//! Tests for the profile and credential registries.
//!
//! Responsibilities:
//! - Test loading profile batches end to end (dispatch, warnings, errors).
//! - Test credential classification through the registry.
//! - Test duplicate identifier handling under both collision policies.
//!
//! Does NOT handle:
//! - Field-level validation of single variants (tested in `types`).
//! - Batch staging internals (tested in batch.rs).
//!
//! Invariants:
//! - Documents are built from `serde_json::json!` literals; no files are read.

use serde_json::Value;

use crate::types::Declaration;

pub mod collision_tests;

/// Wrap `items` in a document under `section`.
pub fn section(section: &str, items: Value) -> Declaration {
    let mut doc = Declaration::new();
    doc.insert(section.to_string(), items);
    doc
}
