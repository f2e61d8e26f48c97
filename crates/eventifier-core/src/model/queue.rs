use crate::model::campus::CampusId;
use crate::model::change::Change;
use crate::model::record::UserId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Keeps the changes that name a field; pathless or malformed items are
/// dropped one by one instead of failing the entry.
fn addressable_changes<'de, D>(deserializer: D) -> Result<Vec<Change>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Change>(item).ok())
        .filter(|change| !change.field.is_empty())
        .collect())
}

/// Epoch seconds, integer or fractional; anything else reads as absent.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

/// One pending entry of an event queue awaiting classification.
///
/// Producers differ in which optional keys they write, so every field
/// defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, alias = "user_name")]
    pub user_login: Option<String>,
    #[serde(default)]
    pub campus_id: CampusId,
    #[serde(default, deserialize_with = "addressable_changes")]
    pub changes: Vec<Change>,
    /// Set when the producer had no baseline for this user
    #[serde(default)]
    pub first_snapshot: bool,
    /// Producer clock, epoch seconds
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub ts: Option<f64>,
}

impl QueueEntry {
    /// A first snapshot that carries nothing but the initial baseline
    pub fn is_baseline_only(&self) -> bool {
        self.first_snapshot && self.changes.is_empty()
    }
}
