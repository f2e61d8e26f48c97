use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Stable user identifier as delivered by the directory service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Number(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)`.
///
/// Combined with `#[serde(default)]` a missing key stays `None`, so absence
/// and null remain distinguishable.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// True when a raw snapshot element carries the fetcher's `label: "error"`
/// marker. Checked before typed conversion, so a placeholder with an
/// unusable `id` is still recognized.
pub fn is_acquisition_error_value(raw: &Value) -> bool {
    raw.get("label").and_then(Value::as_str) == Some("error")
}

/// One user as observed in a snapshot or a baseline.
///
/// Known fields are typed slots; everything else the directory returns is
/// kept verbatim in `extra`. For every known slot, `None` means the key was
/// absent and `Some(Value::Null)` means it was present with a null value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub login: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub correction_point: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub campus_users: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub campus: Option<Value>,
    /// Acquisition marker: `"error"` flags a record the fetcher failed on
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserRecord {
    /// Build a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the value is not an object or a known
    /// field has an impossible shape (e.g. an object as `id`).
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Known fields in declaration order, present ones only (id excluded).
    fn known(&self) -> [(&'static str, Option<&Value>); 10] {
        [
            ("login", self.login.as_ref()),
            ("first_name", self.first_name.as_ref()),
            ("last_name", self.last_name.as_ref()),
            ("location", self.location.as_ref()),
            ("wallet", self.wallet.as_ref()),
            ("correction_point", self.correction_point.as_ref()),
            ("updated_at", self.updated_at.as_ref()),
            ("campus_users", self.campus_users.as_ref()),
            ("campus", self.campus.as_ref()),
            ("label", self.label.as_ref()),
        ]
    }

    /// Look up a field by name; `None` means the field is absent.
    ///
    /// `id` is returned as its JSON representation.
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return self.id.as_ref().and_then(|id| serde_json::to_value(id).ok());
        }
        self.known()
            .into_iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.cloned())
            .or_else(|| self.extra.get(name).cloned())
    }

    /// Whether the field is present (possibly null)
    pub fn contains(&self, name: &str) -> bool {
        if name == "id" {
            return self.id.is_some();
        }
        self.known()
            .into_iter()
            .any(|(key, value)| key == name && value.is_some())
            || self.extra.contains_key(name)
    }

    /// All present fields: `id` first, known fields in declaration order,
    /// then extension fields sorted by name.
    pub fn fields(&self) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        if let Some(id) = self.get("id") {
            out.push(("id".to_string(), id));
        }
        for (key, value) in self.known() {
            if let Some(value) = value {
                out.push((key.to_string(), value.clone()));
            }
        }
        for (key, value) in &self.extra {
            out.push((key.clone(), value.clone()));
        }
        out
    }

    /// True when the fetcher flagged this record as an acquisition error
    pub fn is_acquisition_error(&self) -> bool {
        matches!(&self.label, Some(Value::String(label)) if label == "error")
    }

    /// `login` as a string, when it is one
    pub fn login_str(&self) -> Option<&str> {
        self.login.as_ref().and_then(Value::as_str)
    }

    /// `updated_at` as a string, when it is one
    pub fn updated_at_str(&self) -> Option<&str> {
        self.updated_at.as_ref().and_then(Value::as_str)
    }
}
