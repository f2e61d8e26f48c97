use crate::errors::Result;
use crate::model::campus::{CampusId, Scope};
use crate::model::change::Change;
use crate::model::label::EventLabel;
use crate::model::record::UserId;
use serde::{Deserialize, Serialize};

/// One line of the append-only event log.
///
/// Field names and order are the wire format of the JSON Lines file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub user_id: UserId,
    pub user_login: Option<String>,
    pub campus_id: CampusId,
    pub updated_at: Option<String>,
    pub events: Vec<EventLabel>,
    pub changes: Vec<Change>,
    pub internal_external: Scope,
    /// Epoch seconds
    pub ts: i64,
}

impl EventLogEntry {
    /// Serialize to one compact JSON line, newline included.
    ///
    /// # Errors
    ///
    /// Returns `EventifierError::Serialization` if a value cannot be encoded.
    pub fn to_json_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_line_is_compact_and_terminated() {
        let entry = EventLogEntry {
            user_id: UserId::Number(1),
            user_login: Some("ab".to_string()),
            campus_id: Some(21),
            updated_at: None,
            events: vec![EventLabel::Wallet],
            changes: vec![Change::new("wallet", json!(80), json!(50))],
            internal_external: Scope::Internal,
            ts: 1_700_000_000,
        };
        let line = entry.to_json_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(!line.contains(": "));
        assert!(line.starts_with(r#"{"user_id":1,"user_login":"ab","campus_id":21"#));
        assert!(line.contains(r#""events":["wallet"]"#));
        assert!(line.contains(r#""internal_external":"internal""#));
    }
}
