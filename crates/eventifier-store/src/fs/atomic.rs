//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use eventifier_core::errors::Stage;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Sibling temp path: `<name>.tmp` next to the target
fn temp_path(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

/// Atomically replace a file's content
///
/// Readers see either the previous content or the new one, never a mix.
pub fn atomic_write(target_path: &Path, content: &[u8], stage: Stage) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_parent_dir", stage, e))?;
    }

    // Same directory, so the rename never crosses filesystems
    let temp_path = temp_path(target_path);

    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", stage, e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", stage, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("rejected_moves.txt");

        atomic_write(&target, b"1\n2\n", Stage::Ledger).unwrap();
        atomic_write(&target, b"3\n", Stage::Ledger).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"3\n");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("state").join("ledger.txt");

        atomic_write(&target, b"nested", Stage::Ledger).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("ledger.txt");

        atomic_write(&target, b"clean", Stage::Ledger).unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| s.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count();

        assert_eq!(tmp_count, 0);
    }
}
