//! Eventifier Core - snapshot-diff event detection and classification
//!
//! This crate holds the pure domain of the detector:
//! - User records, campus derivation and the internal/external scope split
//! - Keyed HMAC fingerprints over a configured field projection
//! - The read-only baseline lookup contract
//! - Field- and path-level change extraction
//! - The ordered rule table mapping changes to event labels
//! - Event log entry assembly and the sink contract
//!
//! Filesystem adapters live in `eventifier-store`; run orchestration lives in
//! `eventifier-engine`.

pub mod baseline;
pub mod classify;
pub mod config;
pub mod diff;
pub mod emit;
pub mod errors;
pub mod fingerprint;
pub mod logging_facility;
pub mod model;
pub mod render;

// Used by the logging macros
pub use eventifier_core_types;

// Re-export commonly used types
pub use baseline::{BaselineSource, InMemoryBaselines};
pub use classify::{classify, Classification, RuleContext};
pub use config::{DetectorConfig, Granularity};
pub use emit::{build_entry, EventSink, Subject};
pub use errors::{EventifierError, ExError, ExErrorKind, Result, Stage};
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use model::{Change, EventLabel, EventLogEntry, QueueEntry, Scope, UserId, UserRecord};
