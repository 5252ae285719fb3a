// ABOUTME: Main library entry point for pagepatch, the idempotent HTML page patcher.
// ABOUTME: Re-exports the public API: Patcher, PatchProfile, backups, candidate scan, and errors.

//! pagepatch - ensure every app page carries the shared header and container.
//!
//! A [`PatchProfile`] lists head tags that must exist exactly once, the
//! container element that wraps page content, and an optional HTML fragment
//! to append inside it. The [`Patcher`] applies only what is missing, so
//! running it twice leaves a page untouched the second time.
//!
//! # Example
//!
//! ```
//! use pagepatch_core::{PatchProfile, Patcher};
//!
//! let patcher = Patcher::builder().profile(PatchProfile::frame()).build();
//! let outcome = patcher.patch_html("<p>Hi</p>", "demo").unwrap();
//! assert!(outcome.is_changed());
//! assert!(outcome.html.contains(r#"<main id="app-root"><p>Hi</p></main>"#));
//!
//! let again = patcher.patch_html(&outcome.html, "demo").unwrap();
//! assert!(!again.is_changed());
//! ```

pub mod backup;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod patcher;
pub mod profile;
pub mod report;
pub mod scan;

pub use crate::backup::{ensure_backup, list_backups, restore_latest, Backup};
pub use crate::config::{load_profile, parse_profile};
pub use crate::dom::Change;
pub use crate::engine::ParserEngine;
pub use crate::error::{ConfigError, ErrorCode, PatchError, ScanError};
pub use crate::patcher::{slug_for, PatchOutcome, Patcher, PatcherBuilder};
pub use crate::profile::{ContainerSpec, FragmentSpec, HeadRule, PatchProfile};
pub use crate::report::{report_line, FileStatus};
pub use crate::scan::find_candidates;
