// ABOUTME: The idempotent document patcher and its builder.
// ABOUTME: Applies a profile to HTML text or to a file on disk, writing only when something changed.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::backup::{list_backups, restore_latest, write_backup};
use crate::dom::{
    ensure_container, ensure_fragment, ensure_skeleton, insert_once_in_head, Change, SourceShape,
};
use crate::engine::ParserEngine;
use crate::error::PatchError;
use crate::profile::PatchProfile;
use crate::report::FileStatus;

/// Result of patching a document in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Serialized document after patching.
    pub html: String,
    /// Changes applied, in the order they were made.
    pub changes: Vec<Change>,
}

impl PatchOutcome {
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Applies a [`PatchProfile`] to pages.
#[derive(Debug, Clone)]
pub struct Patcher {
    profile: PatchProfile,
    engine: ParserEngine,
    dry_run: bool,
}

impl Patcher {
    pub fn new(profile: PatchProfile) -> Self {
        Self {
            profile,
            engine: ParserEngine::default(),
            dry_run: false,
        }
    }

    pub fn builder() -> PatcherBuilder {
        PatcherBuilder::new()
    }

    pub fn profile(&self) -> &PatchProfile {
        &self.profile
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Patches `source` in memory. `slug` fills `{slug}` placeholders.
    ///
    /// Returns a Parse error (with an empty path) when the parser yields no
    /// root element or the page is a frameset document.
    pub fn patch_html(&self, source: &str, slug: &str) -> Result<PatchOutcome, PatchError> {
        let doc = self.engine.parse(source);
        let mut changes = Vec::new();

        let shape = SourceShape::probe(source);
        let skeleton = ensure_skeleton(&doc, shape, &self.profile.lang, &mut changes)
            .map_err(|e| PatchError::parse("", "parse", Some(e.into())))?;

        for rule in &self.profile.head_rules {
            insert_once_in_head(&doc, &skeleton.head, rule, slug, &mut changes);
        }

        let container =
            ensure_container(&doc, &skeleton.body, &self.profile.container, &mut changes);

        if let Some(fragment) = &self.profile.fragment {
            ensure_fragment(&container, fragment, &mut changes);
        }

        Ok(PatchOutcome {
            html: doc.html().to_string(),
            changes,
        })
    }

    /// Patches the file at `path`.
    ///
    /// Nothing is written when the document is already conformant or when the
    /// patcher is in dry-run mode. Otherwise the original bytes are backed up
    /// before the file is overwritten.
    pub fn process_file(&self, path: &Path) -> Result<FileStatus, PatchError> {
        let bytes = fs::read(path).map_err(|e| PatchError::io(path, "read", Some(e.into())))?;
        let source = std::str::from_utf8(&bytes)
            .map_err(|e| PatchError::parse(path, "decode", Some(e.into())))?;

        let slug = slug_for(path);
        let outcome = self
            .patch_html(source, &slug)
            .map_err(|e| e.with_path(path))?;

        if !outcome.is_changed() {
            debug!(file = %path.display(), "already conformant");
            return Ok(FileStatus::Unchanged);
        }

        if self.dry_run {
            debug!(
                file = %path.display(),
                changes = outcome.changes.len(),
                "dry run, not writing"
            );
            return Ok(FileStatus::WouldChange(outcome.changes));
        }

        let backup = write_backup(path, &bytes)?;
        fs::write(path, outcome.html.as_bytes())
            .map_err(|e| PatchError::io(path, "write", Some(e.into())))?;
        info!(file = %path.display(), changes = outcome.changes.len(), "updated");

        Ok(FileStatus::Updated {
            backup,
            changes: outcome.changes,
        })
    }

    /// Restores the most recent backup of `path`. Honors dry-run by only
    /// reporting which backup would be used.
    pub fn restore_file(&self, path: &Path) -> Result<FileStatus, PatchError> {
        if self.dry_run {
            let latest = list_backups(path)?
                .into_iter()
                .max_by_key(|b| (b.modified, b.index));
            return Ok(match latest {
                Some(b) => FileStatus::Restored(b.path),
                None => FileStatus::NoBackup,
            });
        }

        Ok(match restore_latest(path)? {
            Some(backup) => FileStatus::Restored(backup),
            None => FileStatus::NoBackup,
        })
    }
}

/// The page slug: the name of the directory holding the page.
pub fn slug_for(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builder for constructing Patcher instances.
#[derive(Debug, Clone)]
pub struct PatcherBuilder {
    patcher: Patcher,
}

impl PatcherBuilder {
    /// Create a builder using the built-in `frame` profile.
    pub fn new() -> Self {
        Self {
            patcher: Patcher::new(PatchProfile::frame()),
        }
    }

    /// Set the profile to apply.
    pub fn profile(mut self, profile: PatchProfile) -> Self {
        self.patcher.profile = profile;
        self
    }

    /// Select the parsing engine.
    pub fn engine(mut self, engine: ParserEngine) -> Self {
        self.patcher.engine = engine;
        self
    }

    /// Detect and report only; never write.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.patcher.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Patcher {
        self.patcher
    }
}

impl Default for PatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_parent_directory_name() {
        assert_eq!(slug_for(Path::new("docs/memory_game/index.html")), "memory_game");
        assert_eq!(slug_for(Path::new("index.html")), "");
    }

    #[test]
    fn test_builder_defaults() {
        let patcher = Patcher::builder().build();
        assert_eq!(patcher.profile().name, "frame");
        assert!(!patcher.is_dry_run());
    }

    #[test]
    fn test_change_order_follows_steps() {
        let patcher = Patcher::builder()
            .profile(PatchProfile::clinician_notes())
            .build();
        let outcome = patcher.patch_html("<p>Hi</p>", "app").unwrap();
        assert_eq!(
            outcome.changes,
            vec![
                Change::CreatedHtml,
                Change::CreatedHead,
                Change::CreatedBody,
                Change::InsertedHead("script".to_string()),
                Change::WrappedContainer,
                Change::AppendedFragment,
            ]
        );
    }

    #[test]
    fn test_frameset_page_is_a_parse_error() {
        let src = r#"<html><head></head><frameset><frame src="a.html"></frameset></html>"#;
        let err = Patcher::builder().build().patch_html(src, "app").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("frameset"));
    }
}
