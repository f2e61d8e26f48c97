//! Error handling for eventifier-store
//!
//! Wraps eventifier-core ExError with store-specific helpers

use eventifier_core::errors::{ExError, ExErrorKind, Stage};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, stage: Stage, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_stage(stage)
        .with_message(err.to_string())
}

/// The current snapshot (or queue) cannot be read or parsed
pub fn snapshot_unreadable(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::SnapshotUnreadable)
        .with_op("load_snapshot")
        .with_stage(Stage::Snapshot)
        .with_message(format!("cannot read {}: {}", path.display(), reason))
}

/// The detector config file cannot be read
pub fn config_unreadable(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::InvalidConfiguration)
        .with_op("load_config")
        .with_stage(Stage::Config)
        .with_message(format!("cannot read {}: {}", path.display(), err))
}

/// A baseline file exists but cannot be used
pub fn baseline_unreadable(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::BaselineUnreadable)
        .with_op("read_baseline")
        .with_stage(Stage::Baseline)
        .with_message(format!("{}: {}", path.display(), reason))
}
