use serde::{Deserialize, Serialize};

/// Fixed event taxonomy written to the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventLabel {
    /// First observation of a user: no baseline existed
    #[serde(rename = "new_seen")]
    NewSeen,
    #[serde(rename = "connection")]
    Connection,
    #[serde(rename = "disconnection")]
    Disconnection,
    #[serde(rename = "wallet")]
    Wallet,
    /// Correction points went up
    #[serde(rename = "correction")]
    Correction,
    /// Correction points went down
    #[serde(rename = "evaluation")]
    Evaluation,
    #[serde(rename = "name_change")]
    NameChange,
    #[serde(rename = "project")]
    Project,
    #[serde(rename = "achievement")]
    Achievement,
    #[serde(rename = "error: external location change")]
    ExternalLocation,
    #[serde(rename = "error: external wallet change")]
    ExternalWallet,
}

impl EventLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLabel::NewSeen => "new_seen",
            EventLabel::Connection => "connection",
            EventLabel::Disconnection => "disconnection",
            EventLabel::Wallet => "wallet",
            EventLabel::Correction => "correction",
            EventLabel::Evaluation => "evaluation",
            EventLabel::NameChange => "name_change",
            EventLabel::Project => "project",
            EventLabel::Achievement => "achievement",
            EventLabel::ExternalLocation => "error: external location change",
            EventLabel::ExternalWallet => "error: external wallet change",
        }
    }

    /// Cross-campus noise labels, only surfaced when nothing else was produced
    pub fn is_external_noise(&self) -> bool {
        matches!(self, EventLabel::ExternalLocation | EventLabel::ExternalWallet)
    }
}

impl std::fmt::Display for EventLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_as_str() {
        let all = [
            EventLabel::NewSeen,
            EventLabel::Connection,
            EventLabel::Disconnection,
            EventLabel::Wallet,
            EventLabel::Correction,
            EventLabel::Evaluation,
            EventLabel::NameChange,
            EventLabel::Project,
            EventLabel::Achievement,
            EventLabel::ExternalLocation,
            EventLabel::ExternalWallet,
        ];
        for label in all {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }
}
