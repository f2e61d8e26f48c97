//! Rejected-moves ledger
//!
//! Plain text, one user id per line. Collected over a run and rewritten as a
//! whole at the end, so the file always lists the latest run's moves.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::fs::atomic_write;
use eventifier_core::errors::Stage;
use eventifier_core::model::UserId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RejectedMovesLedger {
    path: PathBuf,
    user_ids: Vec<UserId>,
}

impl RejectedMovesLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            user_ids: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a user whose location move was rejected (once per user)
    pub fn record(&mut self, user_id: &UserId) {
        if !self.user_ids.contains(user_id) {
            self.user_ids.push(user_id.clone());
        }
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn len(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    /// Ledger file content
    pub fn render(&self) -> String {
        self.user_ids
            .iter()
            .map(|id| format!("{}\n", id))
            .collect()
    }

    /// Atomically replace the ledger file with this run's ids
    pub fn flush(&self) -> Result<()> {
        atomic_write(&self.path, self.render().as_bytes(), Stage::Ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ids_recorded_once_in_order() {
        let mut ledger = RejectedMovesLedger::new("unused");
        ledger.record(&UserId::Number(9));
        ledger.record(&UserId::Text("x1".to_string()));
        ledger.record(&UserId::Number(9));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.render(), "9\nx1\n");
    }

    #[test]
    fn test_flush_replaces_previous_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rejected_moves.txt");
        fs::write(&path, "1\n2\n3\n").unwrap();

        let mut ledger = RejectedMovesLedger::new(&path);
        ledger.record(&UserId::Number(4));
        ledger.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "4\n");
    }

    #[test]
    fn test_empty_flush_clears_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rejected_moves.txt");
        fs::write(&path, "1\n").unwrap();

        RejectedMovesLedger::new(&path).flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
