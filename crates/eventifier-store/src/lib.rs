//! Eventifier Store - filesystem adapters for the detector
//!
//! Provides:
//! - Read-only baseline store over `campus_<cid>/user_<uid>.json`
//! - Append-only JSON Lines event log
//! - Rejected-moves ledger with atomic rewrite
//! - Snapshot, config and event queue loading

pub mod baseline;
pub mod errors;
pub mod event_log;
pub mod fs;
pub mod ledger;
pub mod load;

// Re-export key types
pub use baseline::FsBaselineStore;
pub use errors::Result;
pub use event_log::JsonlEventLog;
pub use ledger::RejectedMovesLedger;
pub use load::{load_config, load_queue, load_snapshot, QueueLoad};
