//! Human-readable summary renderer for classified users.

use crate::classify::{Classification, ItemChanges};
use crate::model::campus::{CampusId, Scope};
use crate::model::change::Change;
use crate::model::record::UserId;
use chrono::DateTime;
use serde_json::Value;
use std::collections::BTreeMap;

/// Who a summary is about
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryHeader {
    pub user_id: Option<UserId>,
    pub login: Option<String>,
    pub campus_id: CampusId,
    pub scope: Scope,
    /// A first snapshot with nothing but the initial baseline
    pub baseline_only: bool,
    /// Producer clock of the queue entry, epoch seconds
    pub ts: Option<f64>,
}

/// Epoch seconds as `2024-01-01 00:00:00Z`; `None` when out of range
pub fn format_epoch(ts: f64) -> Option<String> {
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%SZ").to_string())
}

/// Strings unquoted, everything else as compact JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One-line description: `wallet 80->50 (Δ -30)`
pub fn describe_change(change: &Change) -> String {
    let mut line = format!(
        "{} {}->{}",
        change.field,
        display_value(&change.old),
        display_value(&change.new)
    );
    if let Some(delta) = &change.delta {
        line.push_str(&format!(" (Δ {})", delta));
    }
    line
}

fn render_items(
    out: &mut String,
    title: &str,
    items: &BTreeMap<usize, ItemChanges>,
    retry: impl Fn(usize) -> bool,
) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("### {}\n\n", title));
    for (index, fields) in items {
        let parts: Vec<String> = fields
            .iter()
            .map(|(field, c)| {
                format!("{} {}->{}", field, display_value(&c.old), display_value(&c.new))
            })
            .collect();
        let hint = if retry(*index) { " (retry)" } else { "" };
        out.push_str(&format!("- [{}] {}{}\n", index, parts.join(", "), hint));
    }
    out.push('\n');
}

fn render_bucket(out: &mut String, title: &str, changes: &[Change]) {
    if changes.is_empty() {
        return;
    }
    out.push_str(&format!("### {} ({})\n\n", title, changes.len()));
    for change in changes {
        out.push_str(&format!("- {}\n", describe_change(change)));
    }
    out.push('\n');
}

/// Render a Markdown summary of one classification.
///
/// Informational only: the summary never feeds back into detection.
pub fn render_summary(header: &SummaryHeader, classification: &Classification) -> String {
    let mut out = String::new();

    let user = header
        .user_id
        .as_ref()
        .map(UserId::to_string)
        .unwrap_or_else(|| "?".to_string());
    let login = header.login.as_deref().unwrap_or("-");
    let campus = header
        .campus_id
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
    let ts = header
        .ts
        .and_then(format_epoch)
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "## user {} ({}) campus {} [{}] ts={}\n\n",
        user, login, campus, header.scope, ts
    ));

    if header.baseline_only {
        out.push_str("_Baseline only: first snapshot, no changes._\n");
        return out;
    }

    if classification.labels.is_empty() {
        out.push_str("**Labels**: _none_\n\n");
    } else {
        let labels: Vec<&str> = classification.labels.iter().map(|l| l.as_str()).collect();
        out.push_str(&format!("**Labels**: {}\n\n", labels.join(", ")));
    }

    let top_level: Vec<Change> = classification
        .changes
        .iter()
        .filter(|c| {
            !c.field.starts_with("projects_users[") && !c.field.starts_with("achievements[")
        })
        .cloned()
        .collect();
    if !top_level.is_empty() {
        out.push_str("### Changes\n\n");
        for change in &top_level {
            out.push_str(&format!("- {}\n", describe_change(change)));
        }
        out.push('\n');
    }

    render_items(&mut out, "Projects", &classification.projects, |i| {
        classification.retry_projects.contains(&i)
    });
    render_items(&mut out, "Achievements", &classification.achievements, |_| false);

    if classification.move_rejected {
        out.push_str("- location move rejected\n\n");
    }

    render_bucket(&mut out, "Unknown", &classification.unknown);
    render_bucket(&mut out, "Ignored", &classification.ignored);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, RuleContext};
    use crate::config::Granularity;
    use serde_json::json;

    fn header() -> SummaryHeader {
        SummaryHeader {
            user_id: Some(UserId::Number(42)),
            login: Some("jdoe".to_string()),
            campus_id: Some(21),
            scope: Scope::Internal,
            baseline_only: false,
            ts: None,
        }
    }

    fn paths() -> RuleContext {
        RuleContext::new(Scope::Internal, Granularity::Paths)
    }

    #[test]
    fn test_wallet_line_has_delta() {
        let c = classify(true, &[Change::new("wallet", json!(80), json!(50))], &paths());
        let s = render_summary(&header(), &c);
        assert!(s.starts_with("## user 42 (jdoe) campus 21 [internal]"));
        assert!(s.contains("**Labels**: wallet"));
        assert!(s.contains("- wallet 80->50 (Δ -30)"));
    }

    #[test]
    fn test_projects_with_retry_hint() {
        let c = classify(
            true,
            &[
                Change::new("projects_users[3].status", json!("in_progress"), json!("finished")),
                Change::new("projects_users[3].retriable_at", Value::Null, json!("2024-02-01")),
            ],
            &paths(),
        );
        let s = render_summary(&header(), &c);
        assert!(s.contains("### Projects"));
        assert!(s.contains("- [3] retriable_at null->2024-02-01, status in_progress->finished (retry)"));
        assert!(!s.contains("### Changes"));
    }

    #[test]
    fn test_unknown_and_ignored_buckets() {
        let c = classify(
            true,
            &[
                Change::new("pool_year", json!("2023"), json!("2024")),
                Change::new("updated_at", json!("a"), json!("b")),
            ],
            &paths(),
        );
        let s = render_summary(&header(), &c);
        assert!(s.contains("**Labels**: _none_"));
        assert!(s.contains("### Unknown (1)"));
        assert!(s.contains("- pool_year 2023->2024"));
        assert!(s.contains("### Ignored (1)"));
    }

    #[test]
    fn test_header_renders_producer_clock() {
        let mut h = header();
        let c = Classification::default();
        let s = render_summary(&h, &c);
        assert!(s.starts_with("## user 42 (jdoe) campus 21 [internal] ts=-\n"));

        h.ts = Some(1_704_067_200.75);
        assert!(render_summary(&h, &c).contains("ts=2024-01-01 00:00:00Z"));
        assert_eq!(format_epoch(1_700_000_000.0).as_deref(), Some("2023-11-14 22:13:20Z"));
    }

    #[test]
    fn test_baseline_only() {
        let mut h = header();
        h.baseline_only = true;
        h.campus_id = None;
        h.scope = Scope::External;
        let s = render_summary(&h, &Classification::first_seen());
        assert!(s.contains("campus none [external]"));
        assert!(s.contains("Baseline only"));
        assert!(!s.contains("Labels"));
    }
}
