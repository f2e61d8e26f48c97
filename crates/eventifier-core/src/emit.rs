//! Event log entry construction and the sink contract.

use crate::classify::Classification;
use crate::errors::{EventifierError, ExError, Result};
use crate::model::campus::{CampusId, Scope};
use crate::model::entry::EventLogEntry;
use crate::model::record::{UserId, UserRecord};
use chrono::{DateTime, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 `updated_at` to epoch seconds.
///
/// Accepts RFC 3339 (including a `Z` suffix) and offset-less timestamps,
/// which are read as UTC.
///
/// # Errors
///
/// Returns `TimestampUnparseable` for anything else.
pub fn parse_updated_at(value: &str) -> Result<i64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc().timestamp())
        .ok_or_else(|| EventifierError::TimestampUnparseable {
            value: value.to_string(),
        })
}

/// Entry timestamp: the record's `updated_at` when parseable, else the run
/// clock captured at run start.
pub fn resolve_ts(record: &UserRecord, run_ts: i64) -> i64 {
    let Some(raw) = record.updated_at_str() else {
        return run_ts;
    };
    match parse_updated_at(raw) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::debug!(error = %e, "falling back to run clock");
            run_ts
        }
    }
}

/// Identity of the user an entry is written for
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub user_id: UserId,
    pub campus_id: CampusId,
    pub scope: Scope,
}

/// Build the log entry for a classified user, or `None` when no label was
/// produced.
pub fn build_entry(
    subject: &Subject,
    record: &UserRecord,
    classification: &Classification,
    run_ts: i64,
) -> Option<EventLogEntry> {
    if !classification.is_reportable() {
        return None;
    }
    Some(EventLogEntry {
        user_id: subject.user_id.clone(),
        user_login: record.login_str().map(str::to_string),
        campus_id: subject.campus_id,
        updated_at: record.updated_at_str().map(str::to_string),
        events: classification.labels.clone(),
        changes: classification.changes.clone(),
        internal_external: subject.scope,
        ts: resolve_ts(record, run_ts),
    })
}

/// Append-only destination for event log entries.
///
/// Implementations write each entry as one complete line; an entry is either
/// fully written or not at all.
pub trait EventSink {
    /// # Errors
    ///
    /// Returns an `Io` or `Serialization` error if the entry could not be
    /// written.
    fn write_entry(&mut self, entry: &EventLogEntry) -> std::result::Result<(), ExError>;
}

impl EventSink for Vec<EventLogEntry> {
    fn write_entry(&mut self, entry: &EventLogEntry) -> std::result::Result<(), ExError> {
        self.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::change::Change;
    use crate::model::label::EventLabel;
    use serde_json::json;

    fn subject() -> Subject {
        Subject {
            user_id: UserId::Number(7),
            campus_id: Some(21),
            scope: Scope::Internal,
        }
    }

    #[test]
    fn test_parse_updated_at_variants() {
        assert_eq!(parse_updated_at("2024-01-01T00:00:00Z").unwrap(), 1_704_067_200);
        assert_eq!(parse_updated_at("2024-01-01T01:00:00+01:00").unwrap(), 1_704_067_200);
        assert_eq!(parse_updated_at("2024-01-01T00:00:00.250Z").unwrap(), 1_704_067_200);
        assert_eq!(parse_updated_at("2024-01-01T00:00:00").unwrap(), 1_704_067_200);
        assert_eq!(parse_updated_at("2024-01-01 00:00:00").unwrap(), 1_704_067_200);
    }

    #[test]
    fn test_unparseable_timestamp() {
        let err = parse_updated_at("yesterday").unwrap_err();
        assert!(matches!(err, EventifierError::TimestampUnparseable { .. }));
    }

    #[test]
    fn test_ts_falls_back_to_run_clock() {
        let r = UserRecord::from_value(json!({"id": 7, "updated_at": "not a date"})).unwrap();
        assert_eq!(resolve_ts(&r, 42), 42);
        let r = UserRecord::from_value(json!({"id": 7})).unwrap();
        assert_eq!(resolve_ts(&r, 42), 42);
    }

    #[test]
    fn test_unlabelled_classification_builds_nothing() {
        let r = UserRecord::from_value(json!({"id": 7})).unwrap();
        assert!(build_entry(&subject(), &r, &Classification::default(), 0).is_none());
    }

    #[test]
    fn test_entry_carries_record_identity() {
        let r = UserRecord::from_value(json!({
            "id": 7, "login": "jdoe", "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let mut classification = Classification::first_seen();
        classification.changes.push(Change::new("wallet", json!(1), json!(2)));
        let entry = build_entry(&subject(), &r, &classification, 0).unwrap();
        assert_eq!(entry.user_login.as_deref(), Some("jdoe"));
        assert_eq!(entry.events, vec![EventLabel::NewSeen]);
        assert_eq!(entry.ts, 1_704_067_200);
        assert_eq!(entry.updated_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_vec_sink_collects() {
        let r = UserRecord::from_value(json!({"id": 7})).unwrap();
        let entry = build_entry(&subject(), &r, &Classification::first_seen(), 5).unwrap();
        let mut sink: Vec<EventLogEntry> = Vec::new();
        sink.write_entry(&entry).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].ts, 5);
    }
}
