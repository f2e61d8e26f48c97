use crate::model::record::UserRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default internal ("home") campus id
pub const DEFAULT_INTERNAL_CAMPUS_ID: i64 = 21;

/// Campus identifier; `None` is a valid resolved state ("no known campus")
pub type CampusId = Option<i64>;

/// Which side of the internal/external split a user falls on.
///
/// Selects the fingerprint field list, the HMAC key and whether cross-campus
/// noise rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Internal,
    External,
}

impl Scope {
    /// Classify a campus against the configured internal campus id
    pub fn of(campus_id: CampusId, internal_campus_id: i64) -> Self {
        if campus_id == Some(internal_campus_id) {
            Scope::Internal
        } else {
            Scope::External
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Internal => "internal",
            Scope::External => "external",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a campus id value: integers pass, integral floats and numeric
/// strings are converted, anything else resolves to `None`.
fn coerce_campus_id(value: Option<&Value>) -> CampusId {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(Value::Null) | None => false,
    }
}

/// Derive the campus id of a record.
///
/// Prefers the `campus_users` entry flagged `is_primary`, else the first
/// `campus_users` entry; only when `campus_users` is absent or empty does it
/// fall back to `campus[0].id`.
pub fn campus_id_of(record: &UserRecord) -> CampusId {
    if let Some(Value::Array(entries)) = &record.campus_users {
        if !entries.is_empty() {
            let primary = entries
                .iter()
                .find(|cu| truthy(cu.get("is_primary")))
                .unwrap_or(&entries[0]);
            return coerce_campus_id(primary.get("campus_id"));
        }
    }
    if let Some(Value::Array(campuses)) = &record.campus {
        return campuses
            .first()
            .and_then(|campus| coerce_campus_id(campus.get("id")));
    }
    None
}
