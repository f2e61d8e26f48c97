//! Input file loading: current snapshot, detector config, event queue

#![allow(clippy::result_large_err)]

use crate::errors::{config_unreadable, snapshot_unreadable, Result};
use eventifier_core::config::DetectorConfig;
use eventifier_core::errors::ExError;
use eventifier_core::model::QueueEntry;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read the current snapshot: a JSON array of user objects.
///
/// Elements are returned raw; each is converted to a record on its own so a
/// bad element only affects itself.
///
/// # Errors
///
/// Returns `SnapshotUnreadable` if the file cannot be read or is not a JSON
/// array.
pub fn load_snapshot(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).map_err(|e| snapshot_unreadable(path, e))?;
    match serde_json::from_str::<Value>(&text).map_err(|e| snapshot_unreadable(path, e))? {
        Value::Array(items) => Ok(items),
        other => Err(snapshot_unreadable(
            path,
            format!("expected a JSON array, found {}", kind_of(&other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and resolve the detector field/key config.
///
/// # Errors
///
/// - `InvalidConfiguration` if the file cannot be read or parsed
/// - `ConfigurationMissing` if a required entry is absent
pub fn load_config(path: &Path, internal_campus_id: i64) -> Result<DetectorConfig> {
    let text = fs::read_to_string(path).map_err(|e| config_unreadable(path, e))?;
    DetectorConfig::from_json_str(&text, internal_campus_id)
        .map_err(|e| ExError::from(e).with_op("load_config"))
}

/// Parsed event queue
#[derive(Debug, Clone, Default)]
pub struct QueueLoad {
    pub entries: Vec<QueueEntry>,
    /// 1-based line numbers that could not be parsed
    pub skipped_lines: Vec<usize>,
}

/// Read a JSONL event queue; blank lines are ignored and unparseable lines
/// are skipped.
///
/// # Errors
///
/// Returns `SnapshotUnreadable` if the file itself cannot be read.
pub fn load_queue(path: &Path) -> Result<QueueLoad> {
    let text = fs::read_to_string(path).map_err(|e| snapshot_unreadable(path, e))?;
    let mut load = QueueLoad::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<QueueEntry>(line) {
            Ok(entry) => load.entries.push(entry),
            Err(e) => {
                tracing::warn!(line = i + 1, error = %e, "skipping queue line");
                load.skipped_lines.push(i + 1);
            }
        }
    }
    Ok(load)
}
