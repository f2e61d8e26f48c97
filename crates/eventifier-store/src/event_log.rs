//! JSON Lines event log
//!
//! The log is opened once in append mode and never truncated. Each entry is
//! serialized to a complete line before a single `write_all`, so a failed
//! serialization writes nothing.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use eventifier_core::emit::EventSink;
use eventifier_core::errors::{ExError, Stage};
use eventifier_core::model::EventLogEntry;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL sink
#[derive(Debug)]
pub struct JsonlEventLog {
    path: PathBuf,
    file: File,
    written: usize,
}

impl JsonlEventLog {
    /// Open (creating if needed) the log for appending
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error("create_log_dir", Stage::Emit, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error("open_event_log", Stage::Emit, e))?;
        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries appended through this handle
    pub fn written(&self) -> usize {
        self.written
    }
}

impl EventSink for JsonlEventLog {
    fn write_entry(&mut self, entry: &EventLogEntry) -> std::result::Result<(), ExError> {
        let line = entry
            .to_json_line()
            .map_err(|e| ExError::from(e).with_stage(Stage::Emit))?;
        self.file
            .write_all(line.as_bytes())
            .map_err(|e| io_error("append_event", Stage::Emit, e))?;
        self.written += 1;
        Ok(())
    }
}
