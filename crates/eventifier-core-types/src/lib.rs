//! Core types shared across the eventifier crates
//!
//! - **Correlation**: [`RunId`] tagging every log line of one detection run
//! - **Secrets**: [`Sensitive<T>`] marker that redacts fingerprint keys
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
