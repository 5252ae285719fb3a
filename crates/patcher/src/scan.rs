// ABOUTME: Discovers the app pages to patch: every index.html under the root.
// ABOUTME: Skips the root's own index.html and anything inside a shared assets directory.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tracing::warn;

use crate::error::ScanError;

/// File name of an app page.
pub const INDEX_FILE: &str = "index.html";
/// Directory name reserved for shared assets.
pub const SHARED_DIR: &str = "shared";

/// Returns true if `path` (below `root`) is a page the patcher should touch.
pub fn is_candidate(root: &Path, path: &Path) -> bool {
    if path.file_name().map_or(true, |n| n != INDEX_FILE) {
        return false;
    }
    let rel = path.strip_prefix(root).unwrap_or(path);
    if rel == Path::new(INDEX_FILE) {
        return false;
    }
    !rel.components().any(|c| c.as_os_str() == SHARED_DIR)
}

/// Recursively collects candidate pages under `root`, sorted by path.
///
/// Unreadable directories are logged and skipped; only a missing root is an error.
pub fn find_candidates(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_candidate(root, &path) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}
