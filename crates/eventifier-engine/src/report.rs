//! Run report: per-outcome counters and per-record failures.

use eventifier_core::errors::ExError;
use eventifier_core_types::RunId;
use std::fmt;

/// What happened to one snapshot element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Flagged by the fetcher; skipped before any lookup
    AcquisitionError,
    /// Fingerprints matched; nothing compared
    Unchanged,
    /// An entry was appended to the event log
    Emitted,
    /// Changes were seen but none produced a label
    NothingToReport,
}

/// A record that could not be processed
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Position in the snapshot; `None` for run-level steps (ledger flush)
    pub index: Option<usize>,
    pub error: ExError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub records: usize,
    pub acquisition_errors: usize,
    pub unchanged: usize,
    pub emitted: usize,
    pub nothing_to_report: usize,
    pub first_seen: usize,
    pub failed: usize,
    pub rejected_moves: usize,
    /// Changes no rule recognised, across all records
    pub unknown_changes: usize,
}

/// Summary of one detection run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub run_ts: i64,
    pub counts: RunCounts,
    pub failures: Vec<RecordFailure>,
}

impl RunReport {
    pub fn new(run_id: RunId, run_ts: i64) -> Self {
        Self {
            run_id,
            run_ts,
            counts: RunCounts::default(),
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        let counts = &mut self.counts;
        match outcome {
            RecordOutcome::AcquisitionError => counts.acquisition_errors += 1,
            RecordOutcome::Unchanged => counts.unchanged += 1,
            RecordOutcome::Emitted => counts.emitted += 1,
            RecordOutcome::NothingToReport => counts.nothing_to_report += 1,
        }
    }

    pub fn fail(&mut self, index: Option<usize>, error: ExError) {
        if index.is_some() {
            self.counts.failed += 1;
        }
        self.failures.push(RecordFailure { index, error });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(f, "run {}", self.run_id)?;
        writeln!(
            f,
            "records={} emitted={} first_seen={} unchanged={} nothing_to_report={} acquisition_errors={} failed={} rejected_moves={} unknown_changes={}",
            c.records,
            c.emitted,
            c.first_seen,
            c.unchanged,
            c.nothing_to_report,
            c.acquisition_errors,
            c.failed,
            c.rejected_moves,
            c.unknown_changes
        )?;
        for failure in &self.failures {
            let stage = failure
                .error
                .stage()
                .map(|s| s.as_str())
                .unwrap_or("-");
            match failure.index {
                Some(i) => writeln!(f, "  record #{} [{}] {}", i, stage, failure.error)?,
                None => writeln!(f, "  run [{}] {}", stage, failure.error)?,
            }
        }
        Ok(())
    }
}
