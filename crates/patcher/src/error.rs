// ABOUTME: Error types for the page patcher including ErrorCode enum and PatchError struct.
// ABOUTME: Also defines ConfigError and ScanError for profile loading and candidate discovery.

use std::fmt;
use std::path::{Path, PathBuf};

/// Error codes representing different categories of per-file failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Parse,
    Io,
    Backup,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Parse => "ParseError",
            ErrorCode::Io => "IoError",
            ErrorCode::Backup => "BackupError",
        };
        write!(f, "{}", s)
    }
}

/// The error type for patching or restoring a single file.
#[derive(Debug, thiserror::Error)]
pub struct PatchError {
    pub code: ErrorCode,
    pub path: PathBuf,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.path.display())?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl PatchError {
    fn new(
        code: ErrorCode,
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            path: path.as_ref().to_path_buf(),
            op: op.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Parse, path, op, source)
    }

    /// Create an Io error.
    pub fn io(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Io, path, op, source)
    }

    /// Returns the same error attributed to `path`.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Create a Backup error.
    pub fn backup(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Backup, path, op, source)
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is a Backup error.
    pub fn is_backup(&self) -> bool {
        self.code == ErrorCode::Backup
    }
}

/// Errors raised while loading or validating a patch profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read profile {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid profile: {0}")]
    Invalid(String),

    #[error("unknown profile '{0}' (expected one of: frame, clinician-notes)")]
    UnknownProfile(String),
}

impl ConfigError {
    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}

/// Errors raised while collecting candidate files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Root '{}' not found. Run from repo root or pass --root.", .0.display())]
    MissingRoot(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_op_path_and_source() {
        let err = PatchError::parse(
            "docs/app/index.html",
            "decode",
            Some(anyhow::anyhow!("invalid utf-8")),
        );
        assert_eq!(err.to_string(), "decode docs/app/index.html: invalid utf-8");
        assert_eq!(err.code.to_string(), "ParseError");
        assert!(err.is_parse());
        assert!(!err.is_io());
    }

    #[test]
    fn test_display_without_source() {
        let err = PatchError::backup("a/index.html", "copy", None);
        assert_eq!(err.to_string(), "copy a/index.html");
        assert!(err.is_backup());
    }

    #[test]
    fn test_missing_root_message() {
        let err = ScanError::MissingRoot(PathBuf::from("docs"));
        assert_eq!(
            err.to_string(),
            "Root 'docs' not found. Run from repo root or pass --root."
        );
    }
}
