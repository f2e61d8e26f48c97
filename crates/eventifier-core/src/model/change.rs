use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One field-level (or path-level) difference between baseline and current.
///
/// `field` is a bare field name (`wallet`) or a dotted/bracketed path
/// (`projects_users[3].status`); queues written by older producers use the
/// key `path`, which is accepted on input. `delta` is only set for numeric
/// wallet and correction-point changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(alias = "path")]
    pub field: String,
    #[serde(default)]
    pub old: Value,
    #[serde(default)]
    pub new: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Number>,
}

impl Change {
    pub fn new(field: impl Into<String>, old: Value, new: Value) -> Self {
        Self {
            field: field.into(),
            old,
            new,
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: Number) -> Self {
        self.delta = Some(delta);
        self
    }

    pub fn delta_f64(&self) -> Option<f64> {
        self.delta.as_ref().and_then(Number::as_f64)
    }

    /// A change must carry two different values
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}
