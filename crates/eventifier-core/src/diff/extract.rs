//! Field and path extractors.

use crate::config::Granularity;
use crate::model::change::Change;
use crate::model::record::UserRecord;
use serde_json::Value;

/// Top-level field diff, in the baseline's field order.
///
/// A field is reported when it is present in both records with different
/// values. Fields present only in `current` are not reported.
pub fn extract(baseline: &UserRecord, current: &UserRecord) -> Vec<Change> {
    baseline
        .fields()
        .into_iter()
        .filter_map(|(name, old)| {
            let new = current.get(&name)?;
            (old != new).then(|| Change::new(name, old, new))
        })
        .collect()
}

/// Leaf-level diff addressed by dotted/bracketed paths.
///
/// Recurses into objects and arrays present on both sides; object keys and
/// array slots known only to `current` are not reported, mirroring
/// [`extract`].
pub fn extract_paths(baseline: &UserRecord, current: &UserRecord) -> Vec<Change> {
    let mut changes = Vec::new();
    for (name, old) in baseline.fields() {
        if let Some(new) = current.get(&name) {
            walk(&name, &old, &new, &mut changes);
        }
    }
    changes
}

/// Dispatch on the configured granularity
pub fn extract_with(
    granularity: Granularity,
    baseline: &UserRecord,
    current: &UserRecord,
) -> Vec<Change> {
    match granularity {
        Granularity::Fields => extract(baseline, current),
        Granularity::Paths => extract_paths(baseline, current),
    }
}

fn walk(path: &str, old: &Value, new: &Value, out: &mut Vec<Change>) {
    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, a_value) in a {
                if let Some(b_value) = b.get(key) {
                    walk(&format!("{}.{}", path, key), a_value, b_value, out);
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, (a_value, b_value)) in a.iter().zip(b.iter()).enumerate() {
                walk(&format!("{}[{}]", path, i), a_value, b_value, out);
            }
        }
        _ => {
            if old != new {
                out.push(Change::new(path, old.clone(), new.clone()));
            }
        }
    }
}
