// ABOUTME: Per-file outcome of a patch or restore run and its one-line textual form.
// ABOUTME: The line format is what operators read on the console.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dom::Change;
use crate::error::PatchError;

/// What happened to one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Already conformant; nothing written.
    Unchanged,
    /// Dry run: these changes would be written.
    WouldChange(Vec<Change>),
    /// Written, after backing the original up to `backup`.
    Updated { backup: PathBuf, changes: Vec<Change> },
    /// Undo: the live file was replaced by this backup.
    Restored(PathBuf),
    /// Undo: there was nothing to restore.
    NoBackup,
}

impl FileStatus {
    /// Short machine-friendly label.
    pub fn kind(&self) -> &'static str {
        match self {
            FileStatus::Unchanged => "unchanged",
            FileStatus::WouldChange(_) => "would-change",
            FileStatus::Updated { .. } => "updated",
            FileStatus::Restored(_) => "restored",
            FileStatus::NoBackup => "no-backup",
        }
    }

    /// Changes applied or planned, empty for the other states.
    pub fn changes(&self) -> &[Change] {
        match self {
            FileStatus::WouldChange(changes) | FileStatus::Updated { changes, .. } => changes.as_slice(),
            _ => &[],
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Unchanged => write!(f, "skip (already ok)"),
            FileStatus::WouldChange(_) => write!(f, "DRY-RUN would modify"),
            FileStatus::Updated { .. } => write!(f, "updated"),
            FileStatus::Restored(backup) => write!(
                f,
                "restored {}",
                backup
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_else(|| backup.to_string_lossy())
            ),
            FileStatus::NoBackup => write!(f, "no backup found"),
        }
    }
}

/// Formats the console line for one file.
pub fn report_line(path: &Path, result: &Result<FileStatus, PatchError>) -> String {
    match result {
        Ok(status) => format!("{}: {}", path.display(), status),
        Err(err) => format!("{}: ERROR {}: {}", path.display(), err.code, err),
    }
}
