//! Queue review: classify pending queue entries for human inspection.
//!
//! Entries are classified with the path rule set, since queue producers
//! record leaf paths. Nothing is written; review is read-only.

#![allow(clippy::result_large_err)]

use eventifier_core::classify::{classify, Classification, RuleContext};
use eventifier_core::config::Granularity;
use eventifier_core::model::{QueueEntry, Scope};
use eventifier_core::render::SummaryHeader;
use eventifier_core::{log_op_end, log_op_start};
use eventifier_store::errors::Result;
use eventifier_store::load_queue;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub internal_campus_id: i64,
    /// Stop after this many reviewed entries
    pub limit: Option<usize>,
    /// Keep only entries that produced no label
    pub unknown_only: bool,
}

/// A queue entry with its classification
#[derive(Debug, Clone)]
pub struct ReviewedEntry {
    pub header: SummaryHeader,
    pub classification: Classification,
}

fn review_entry(entry: &QueueEntry, internal_campus_id: i64) -> ReviewedEntry {
    let scope = Scope::of(entry.campus_id, internal_campus_id);
    let ctx = RuleContext::new(scope, Granularity::Paths);
    ReviewedEntry {
        header: SummaryHeader {
            user_id: entry.user_id.clone(),
            login: entry.user_login.clone(),
            campus_id: entry.campus_id,
            scope,
            baseline_only: entry.is_baseline_only(),
            ts: entry.ts,
        },
        classification: classify(!entry.first_snapshot, &entry.changes, &ctx),
    }
}

/// Classify queue entries in order, applying the filters.
pub fn review_queue(entries: &[QueueEntry], options: &ReviewOptions) -> Vec<ReviewedEntry> {
    entries
        .iter()
        .map(|entry| review_entry(entry, options.internal_campus_id))
        .filter(|reviewed| !options.unknown_only || reviewed.classification.labels.is_empty())
        .take(options.limit.unwrap_or(usize::MAX))
        .collect()
}

/// Load a JSONL queue and review it.
///
/// Returns the reviewed entries and the number of skipped queue lines.
///
/// ## Errors
///
/// `SnapshotUnreadable` if the queue file cannot be read.
pub fn review_file(path: &Path, options: &ReviewOptions) -> Result<(Vec<ReviewedEntry>, usize)> {
    log_op_start!("review_queue");
    let start = std::time::Instant::now();

    let load = load_queue(path)?;
    let reviewed = review_queue(&load.entries, options);

    log_op_end!(
        "review_queue",
        duration_ms = start.elapsed().as_millis() as u64,
        entries = load.entries.len(),
        reviewed = reviewed.len(),
        skipped_lines = load.skipped_lines.len()
    );
    Ok((reviewed, load.skipped_lines.len()))
}
