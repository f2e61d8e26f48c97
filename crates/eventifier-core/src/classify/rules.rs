//! Ordered classification rules.
//!
//! Each rule is a pure function over one normalized change; the first rule
//! returning a verdict wins. Precedence is the order of [`RULES`].

use crate::config::Granularity;
use crate::diff::path::{ChangePath, Container, PathError};
use crate::errors::{EventifierError, Result};
use crate::model::campus::Scope;
use crate::model::change::Change;
use serde_json::{Number, Value};

/// Path suffixes that never drive a label
pub const IGNORE_SUFFIXES: [&str; 5] = [
    "updated_at",
    "created_at",
    "marked_at",
    "anonymize_date",
    "data_erasure_date",
];

/// Identity fields; any of them changing yields a single `name_change`
pub const IDENTITY_FIELDS: [&str; 3] = ["login", "first_name", "last_name"];

/// Per-user evaluation context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub scope: Scope,
    pub granularity: Granularity,
}

impl RuleContext {
    pub fn new(scope: Scope, granularity: Granularity) -> Self {
        Self { scope, granularity }
    }

    /// Cross-campus noise rules only exist in the path rule set
    fn suppresses_external(&self) -> bool {
        self.granularity == Granularity::Paths && self.scope == Scope::External
    }
}

/// A change paired with its parsed address
#[derive(Debug, Clone)]
pub struct NormalizedChange<'a> {
    pub change: &'a Change,
    pub path: ChangePath,
}

/// How a `location` value moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTransition {
    /// empty -> non-empty
    Connection,
    /// non-empty -> empty
    Disconnection,
    /// non-empty -> different non-empty
    Move,
    /// null <-> empty string
    Blank,
}

/// Why a change ended up in the unknown bucket
#[derive(Debug, Clone, PartialEq)]
pub enum UnknownReason {
    Unclassified,
    Uncoercible(EventifierError),
    BadPath(PathError),
}

/// Outcome of the rule table for one change
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Discarded without trace (coalitions, zero correction delta)
    Dropped,
    /// Kept in the ignored bucket, never labelled
    Ignored,
    Location(LocationTransition),
    ExternalLocation,
    Wallet { delta: Number },
    ExternalWallet,
    CorrectionPoint { delta: Number },
    ContainerItem {
        container: Container,
        index: usize,
        field: String,
    },
    Identity { field: String },
    Unknown(UnknownReason),
}

/// A named rule
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&NormalizedChange<'_>, &RuleContext) -> Option<Verdict>,
}

/// Rule precedence, first match wins
pub const RULES: &[Rule] = &[
    Rule {
        name: "coalitions",
        apply: coalitions,
    },
    Rule {
        name: "ignored_suffix",
        apply: ignored_suffix,
    },
    Rule {
        name: "location",
        apply: location,
    },
    Rule {
        name: "wallet",
        apply: wallet,
    },
    Rule {
        name: "correction_point",
        apply: correction_point,
    },
    Rule {
        name: "container_item",
        apply: container_item,
    },
    Rule {
        name: "identity",
        apply: identity,
    },
];

/// Run one change through the rule table
pub fn evaluate(change: &Change, ctx: &RuleContext) -> Verdict {
    let path = match ChangePath::parse(&change.field) {
        Ok(path) => path,
        Err(e) => return Verdict::Unknown(UnknownReason::BadPath(e)),
    };
    let normalized = NormalizedChange { change, path };
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(&normalized, ctx))
        .unwrap_or(Verdict::Unknown(UnknownReason::Unclassified))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Read a JSON value as a number: numbers pass, numeric strings are parsed.
///
/// # Errors
///
/// Returns `ValueUncoercible` for null, booleans, containers and
/// non-numeric strings.
pub fn to_number(field: &str, value: &Value) -> Result<Number> {
    let uncoercible = || EventifierError::ValueUncoercible {
        field: field.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Number::from(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(uncoercible)
        }
        _ => Err(uncoercible()),
    }
}

/// `new - old`, integral when both sides are integers
///
/// # Errors
///
/// Returns `ValueUncoercible` if either side is not numeric.
pub fn numeric_delta(field: &str, old: &Value, new: &Value) -> Result<Number> {
    let old_n = to_number(field, old)?;
    let new_n = to_number(field, new)?;
    if let (Some(a), Some(b)) = (old_n.as_i64(), new_n.as_i64()) {
        if let Some(d) = b.checked_sub(a) {
            return Ok(Number::from(d));
        }
    }
    let (a, b) = (old_n.as_f64(), new_n.as_f64());
    a.zip(b)
        .and_then(|(a, b)| Number::from_f64(b - a))
        .ok_or_else(|| EventifierError::ValueUncoercible {
            field: field.to_string(),
            value: format!("{} -> {}", old, new),
        })
}

fn coalitions(c: &NormalizedChange<'_>, ctx: &RuleContext) -> Option<Verdict> {
    (ctx.granularity == Granularity::Paths && c.path.root().starts_with("coalitions"))
        .then_some(Verdict::Dropped)
}

fn ignored_suffix(c: &NormalizedChange<'_>, ctx: &RuleContext) -> Option<Verdict> {
    (ctx.granularity == Granularity::Paths && c.path.ends_with_any(&IGNORE_SUFFIXES))
        .then_some(Verdict::Ignored)
}

fn location(c: &NormalizedChange<'_>, ctx: &RuleContext) -> Option<Verdict> {
    if c.path.leaf() != "location" {
        return None;
    }
    let transition = match (is_blank(&c.change.old), is_blank(&c.change.new)) {
        (true, false) => LocationTransition::Connection,
        (false, true) => LocationTransition::Disconnection,
        (false, false) => LocationTransition::Move,
        (true, true) => LocationTransition::Blank,
    };
    Some(match transition {
        LocationTransition::Blank => Verdict::Ignored,
        LocationTransition::Connection | LocationTransition::Disconnection
            if ctx.suppresses_external() =>
        {
            Verdict::ExternalLocation
        }
        other => Verdict::Location(other),
    })
}

fn wallet(c: &NormalizedChange<'_>, ctx: &RuleContext) -> Option<Verdict> {
    if c.path.leaf() != "wallet" {
        return None;
    }
    if ctx.suppresses_external() {
        return Some(Verdict::ExternalWallet);
    }
    Some(
        match numeric_delta(c.path.as_str(), &c.change.old, &c.change.new) {
            Ok(delta) => Verdict::Wallet { delta },
            Err(e) => Verdict::Unknown(UnknownReason::Uncoercible(e)),
        },
    )
}

fn correction_point(c: &NormalizedChange<'_>, _ctx: &RuleContext) -> Option<Verdict> {
    if c.path.leaf() != "correction_point" {
        return None;
    }
    Some(
        match numeric_delta(c.path.as_str(), &c.change.old, &c.change.new) {
            Ok(delta) if delta.as_f64() == Some(0.0) => Verdict::Dropped,
            Ok(delta) => Verdict::CorrectionPoint { delta },
            Err(e) => Verdict::Unknown(UnknownReason::Uncoercible(e)),
        },
    )
}

fn container_item(c: &NormalizedChange<'_>, _ctx: &RuleContext) -> Option<Verdict> {
    let (container, index, field) = c.path.container_item()?;
    Some(Verdict::ContainerItem {
        container,
        index,
        field: field.to_string(),
    })
}

fn identity(c: &NormalizedChange<'_>, _ctx: &RuleContext) -> Option<Verdict> {
    let leaf = c.path.leaf();
    IDENTITY_FIELDS.contains(&leaf).then(|| Verdict::Identity {
        field: leaf.to_string(),
    })
}
