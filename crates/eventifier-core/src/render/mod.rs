//! Human-readable reports.

pub mod summary;

pub use summary::{describe_change, format_epoch, render_summary, SummaryHeader};
