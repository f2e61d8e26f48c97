//! Filesystem baseline store
//!
//! Layout: `<root>/campus_<campus_id>/user_<user_id>.json`, one JSON object
//! per file. Files are written by an external maintenance job; this store
//! only reads them.

#![allow(clippy::result_large_err)]

use crate::errors::{baseline_unreadable, Result};
use eventifier_core::baseline::BaselineSource;
use eventifier_core::model::{CampusId, UserId, UserRecord};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CAMPUS_DIR_PREFIX: &str = "campus_";

/// Read-only baselines under a root directory
#[derive(Debug, Clone)]
pub struct FsBaselineStore {
    root: PathBuf,
}

fn user_file(user_id: &UserId) -> String {
    format!("user_{}.json", user_id)
}

/// Read one baseline file
///
/// `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns `BaselineUnreadable` if the file exists but cannot be read or is
/// not a user record.
pub fn read_baseline(path: &Path) -> Result<Option<UserRecord>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(baseline_unreadable(path, e)),
    };
    serde_json::from_slice::<UserRecord>(&bytes)
        .map(Some)
        .map_err(|e| baseline_unreadable(path, e))
}

impl FsBaselineStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical location of a user's baseline
    pub fn canonical_path(&self, user_id: &UserId, campus_id: i64) -> PathBuf {
        self.root
            .join(format!("{}{}", CAMPUS_DIR_PREFIX, campus_id))
            .join(user_file(user_id))
    }

    /// Campus partitions in sorted directory-name order
    fn partitions(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| name.starts_with(CAMPUS_DIR_PREFIX))
                    .unwrap_or(false)
            })
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    fn load(&self, path: &Path) -> Option<UserRecord> {
        match read_baseline(path) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(error = %e, "baseline treated as absent");
                None
            }
        }
    }
}

impl BaselineSource for FsBaselineStore {
    fn resolve(&self, user_id: &UserId, campus_id: CampusId) -> Option<UserRecord> {
        if let Some(cid) = campus_id {
            if let Some(found) = self.load(&self.canonical_path(user_id, cid)) {
                return Some(found);
            }
        }
        // First match in sorted order; a user present in several partitions
        // resolves to the lowest-sorting one
        let file = user_file(user_id);
        let found = self
            .partitions()
            .into_iter()
            .map(|dir| dir.join(&file))
            .filter(|p| p.is_file())
            .find_map(|p| self.load(&p));
        if found.is_none() {
            tracing::debug!(user_id = %user_id, campus_id = ?campus_id, "no baseline");
        }
        found
    }
}
