// ABOUTME: Numbered backups (.bak, .bak1, .bak2, ...) written next to a page before it is rewritten.
// ABOUTME: Also lists existing backups and restores the most recently modified one.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{info, warn};

use crate::error::PatchError;

const BACKUP_SUFFIX: &str = ".bak";

/// A backup file found next to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    /// 0 for `.bak`, N for `.bakN`.
    pub index: u32,
    pub modified: SystemTime,
}

/// Path of the backup with the given index for `path`.
pub fn backup_path(path: &Path, index: u32) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    if index == 0 {
        name.push(BACKUP_SUFFIX);
    } else {
        name.push(format!("{}{}", BACKUP_SUFFIX, index));
    }
    path.with_file_name(name)
}

/// Copies the current content of `path` to the lowest unused backup name.
pub fn ensure_backup(path: &Path) -> Result<PathBuf, PatchError> {
    let bytes = fs::read(path)
        .map_err(|e| PatchError::backup(path, "read for backup", Some(e.into())))?;
    write_backup(path, &bytes)
}

/// Writes `original` to the lowest unused backup name for `path`.
/// Existing backups are never overwritten.
pub fn write_backup(path: &Path, original: &[u8]) -> Result<PathBuf, PatchError> {
    let mut index = 0u32;
    loop {
        let candidate = backup_path(path, index);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut file) => {
                file.write_all(original)
                    .and_then(|_| file.sync_all())
                    .map_err(|e| PatchError::backup(&candidate, "write backup", Some(e.into())))?;
                info!(backup = %candidate.display(), "backup written");
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                index = index.checked_add(1).ok_or_else(|| {
                    PatchError::backup(
                        path,
                        "pick backup name",
                        Some(anyhow::anyhow!("backup numbering exhausted")),
                    )
                })?;
            }
            Err(e) => {
                return Err(PatchError::backup(
                    &candidate,
                    "create backup",
                    Some(e.into()),
                ))
            }
        }
    }
}

/// Parses the backup index from a file name, if it is a backup of `base`.
fn backup_index(base: &str, name: &str) -> Option<u32> {
    let rest = name.strip_prefix(base)?.strip_prefix(BACKUP_SUFFIX)?;
    if rest.is_empty() {
        return Some(0);
    }
    // `.bak0` and `.bak01` would alias `.bak` and `.bak1`.
    if rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Lists all backups of `path`, ordered by index.
pub fn list_backups(path: &Path) -> Result<Vec<Backup>, PatchError> {
    let Some(base) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PatchError::io(dir, "list backups", Some(e.into()))),
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PatchError::io(dir, "list backups", Some(e.into())))?;
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(|n| backup_index(base, n)) else {
            continue;
        };
        let meta = entry
            .metadata()
            .map_err(|e| PatchError::io(entry.path(), "stat backup", Some(e.into())))?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta
            .modified()
            .map_err(|e| PatchError::io(entry.path(), "stat backup", Some(e.into())))?;
        backups.push(Backup {
            path: path.with_file_name(&name),
            index,
            modified,
        });
    }
    backups.sort_by_key(|b| b.index);
    Ok(backups)
}

/// Copies the most recently modified backup over `path`.
///
/// Ties on modification time go to the higher index. Returns `None` when no
/// backup exists. Backups are left in place, so intermediate states older
/// than the restored one stay on disk but are never chosen again.
pub fn restore_latest(path: &Path) -> Result<Option<PathBuf>, PatchError> {
    let backups = list_backups(path)?;
    let Some(latest) = backups.iter().max_by_key(|b| (b.modified, b.index)) else {
        return Ok(None);
    };
    if backups.len() > 1 {
        warn!(
            file = %path.display(),
            available = backups.len(),
            "restoring most recent backup; older backups are not applied"
        );
    }

    fs::copy(&latest.path, path)
        .map_err(|e| PatchError::io(path, "restore backup", Some(e.into())))?;
    info!(file = %path.display(), backup = %latest.path.display(), "restored");
    Ok(Some(latest.path.clone()))
}
