//! Detection run orchestration.
//!
//! ## Per-record pipeline (in order):
//! 1. Skip records flagged as acquisition errors
//! 2. Require an id (malformed otherwise)
//! 3. Derive campus id and internal/external scope
//! 4. Resolve baseline (absent means first sighting)
//! 5. Compare fingerprints; stop when equal
//! 6. Extract and classify changes
//! 7. Record a rejected move in the ledger; log unclassified changes
//! 8. Append the entry if any label was produced
//!
//! A failing record is reported with its stage and never stops the batch.
//!
//! ## Logging Ownership
//!
//! `detect` owns the `detect_run` start/end pair; per-record failures are
//! logged at warn level with the run id.

#![allow(clippy::result_large_err)]

use eventifier_core::baseline::BaselineSource;
use eventifier_core::classify::{classify, RuleContext};
use eventifier_core::config::{DetectorConfig, Granularity};
use eventifier_core::diff::extract_with;
use eventifier_core::emit::{build_entry, EventSink, Subject};
use eventifier_core::errors::{EventifierError, ExError, Stage};
use eventifier_core::fingerprint::Fingerprinter;
use eventifier_core::model::{campus_id_of, is_acquisition_error_value, Scope, UserRecord};
use eventifier_core::{log_op_end, log_op_error, log_op_start, log_record_skipped};
use eventifier_core_types::RunId;
use eventifier_store::errors::Result;
use eventifier_store::{
    load_config, load_snapshot, FsBaselineStore, JsonlEventLog, RejectedMovesLedger,
};
use serde_json::Value;
use std::path::PathBuf;

use crate::report::{RecordOutcome, RunReport};

/// Identity and clock of one run, captured once at start
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    /// Epoch seconds used when a record has no usable `updated_at`
    pub run_ts: i64,
}

impl RunContext {
    pub fn start() -> Self {
        Self {
            run_id: RunId::new(),
            run_ts: chrono::Utc::now().timestamp(),
        }
    }
}

/// File locations and resolved settings for a `detect` run
#[derive(Debug, Clone)]
pub struct DetectRequest {
    pub snapshot: PathBuf,
    pub config: PathBuf,
    pub baselines: PathBuf,
    pub event_log: PathBuf,
    pub ledger: PathBuf,
    pub internal_campus_id: i64,
    pub granularity: Granularity,
}

/// Run detection over the files named by `request`.
///
/// ## Errors
///
/// Fatal, before any record is processed:
/// - `ConfigurationMissing` / `InvalidConfiguration`: config file
/// - `SnapshotUnreadable`: current snapshot
/// - `Io`: event log cannot be opened
///
/// Record-level failures are returned inside the [`RunReport`].
pub fn detect(request: &DetectRequest) -> Result<RunReport> {
    let run = RunContext::start();
    log_op_start!("detect_run", run_id = run.run_id.as_str());
    let start = std::time::Instant::now();

    let result = detect_impl(request, run).map_err(|e| {
        log_op_error!(
            "detect_run",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "detect_run",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = result.run_id.as_str(),
        records = result.counts.records,
        emitted = result.counts.emitted,
        failed = result.counts.failed,
        rejected_moves = result.counts.rejected_moves,
        unknown_changes = result.counts.unknown_changes
    );

    Ok(result)
}

fn detect_impl(request: &DetectRequest, run: RunContext) -> Result<RunReport> {
    let config = load_config(&request.config, request.internal_campus_id)?
        .with_granularity(request.granularity);
    let records = load_snapshot(&request.snapshot)?;
    let baselines = FsBaselineStore::new(&request.baselines);
    let mut sink = JsonlEventLog::open(&request.event_log)?;
    let mut ledger = RejectedMovesLedger::new(&request.ledger);

    Ok(detect_records(
        &config,
        &records,
        &baselines,
        &mut sink,
        &mut ledger,
        run,
    ))
}

/// Process a snapshot's records in input order, then rewrite the ledger.
pub fn detect_records<B, S>(
    config: &DetectorConfig,
    records: &[Value],
    baselines: &B,
    sink: &mut S,
    ledger: &mut RejectedMovesLedger,
    run: RunContext,
) -> RunReport
where
    B: BaselineSource,
    S: EventSink,
{
    let mut report = RunReport::new(run.run_id.clone(), run.run_ts);
    report.counts.records = records.len();
    let detector = RecordDetector {
        run_id: &run.run_id,
        config,
        fingerprinter: Fingerprinter::new(config),
        baselines,
        run_ts: run.run_ts,
    };

    for (index, raw) in records.iter().enumerate() {
        match detector.process(raw, sink, ledger, &mut report) {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                log_record_skipped!(run.run_id.as_str(), index, e);
                report.fail(Some(index), e);
            }
        }
    }

    report.counts.rejected_moves = ledger.len();
    if let Err(e) = ledger.flush() {
        tracing::warn!(run_id = run.run_id.as_str(), "ledger not written: {}", e);
        report.fail(None, e);
    }

    report
}

struct RecordDetector<'a, B> {
    run_id: &'a RunId,
    config: &'a DetectorConfig,
    fingerprinter: Fingerprinter<'a>,
    baselines: &'a B,
    run_ts: i64,
}

impl<B: BaselineSource> RecordDetector<'_, B> {
    fn process<S: EventSink>(
        &self,
        raw: &Value,
        sink: &mut S,
        ledger: &mut RejectedMovesLedger,
        report: &mut RunReport,
    ) -> std::result::Result<RecordOutcome, ExError> {
        if is_acquisition_error_value(raw) {
            return Ok(RecordOutcome::AcquisitionError);
        }

        let record = UserRecord::from_value(raw.clone()).map_err(|e| {
            ExError::from(EventifierError::RecordMalformed {
                reason: e.to_string(),
            })
            .with_op("process_record")
        })?;

        let Some(user_id) = record.id.clone() else {
            return Err(ExError::from(EventifierError::RecordMalformed {
                reason: "missing or null id".to_string(),
            })
            .with_op("process_record"));
        };

        let campus_id = campus_id_of(&record);
        let scope = Scope::of(campus_id, self.config.internal_campus_id);
        let ctx = RuleContext::new(scope, self.config.granularity);
        let with_context = |e: ExError| {
            let e = e.with_op("process_record").with_user_id(user_id.to_string());
            match campus_id {
                Some(cid) => e.with_campus_id(cid),
                None => e,
            }
        };

        let baseline = self.baselines.resolve(&user_id, campus_id);
        let classification = match &baseline {
            Some(baseline) => {
                let fingerprint = |r: &UserRecord| {
                    self.fingerprinter
                        .fingerprint(r, scope)
                        .map_err(|e| with_context(ExError::from(e).with_stage(Stage::Fingerprint)))
                };
                if fingerprint(&record)? == fingerprint(baseline)? {
                    return Ok(RecordOutcome::Unchanged);
                }
                let changes = extract_with(self.config.granularity, baseline, &record);
                classify(true, &changes, &ctx)
            }
            None => {
                report.counts.first_seen += 1;
                classify(false, &[], &ctx)
            }
        };

        if classification.move_rejected {
            ledger.record(&user_id);
        }
        for change in &classification.unknown {
            tracing::info!(
                run_id = self.run_id.as_str(),
                user_id = %user_id,
                field = change.field.as_str(),
                old = %change.old,
                new = %change.new,
                "unclassified change"
            );
        }
        report.counts.unknown_changes += classification.unknown.len();

        let subject = Subject {
            user_id: user_id.clone(),
            campus_id,
            scope,
        };
        match build_entry(&subject, &record, &classification, self.run_ts) {
            Some(entry) => {
                sink.write_entry(&entry)
                    .map_err(|e| with_context(e.with_stage(Stage::Emit)))?;
                Ok(RecordOutcome::Emitted)
            }
            None => {
                tracing::debug!(
                    user_id = %user_id,
                    ignored = classification.ignored.len(),
                    "changes produced no label"
                );
                Ok(RecordOutcome::NothingToReport)
            }
        }
    }
}
