//! Eventifier Engine - Orchestration layer
//!
//! Coordinates the pure detection core with the filesystem adapters:
//! one `detect` run over a snapshot, and queue review for the `classify`
//! subcommand.

pub mod commands;
pub mod report;

pub use commands::detect::{detect, detect_records, DetectRequest, RunContext};
pub use commands::review::{review_file, review_queue, ReviewOptions, ReviewedEntry};
pub use report::{RecordFailure, RecordOutcome, RunReport};
