// ABOUTME: Integration tests for the pagepatch CLI binary.
// ABOUTME: Covers patching, dry runs, undo, error lines, profiles and JSON output on temp doc trees.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn pagepatch_cmd() -> Command {
    Command::cargo_bin("pagepatch").unwrap()
}

/// Creates docs/ with one app page plus the root and shared pages that must be skipped.
fn docs_tree(temp_dir: &TempDir, app_html: &str) -> (PathBuf, PathBuf) {
    let docs = temp_dir.path().join("docs");
    fs::create_dir_all(docs.join("memory_game")).unwrap();
    fs::create_dir_all(docs.join("shared")).unwrap();
    fs::write(docs.join("index.html"), "<h1>Catalogue</h1>").unwrap();
    fs::write(docs.join("shared").join("index.html"), "<p>shared</p>").unwrap();

    let page = docs.join("memory_game").join("index.html");
    fs::write(&page, app_html).unwrap();
    (docs, page)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn patches_app_page_and_skips_root_and_shared() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanning 1 index.html files under"))
        .stdout(predicate::str::contains("memory_game/index.html: updated"));

    let html = read(&page);
    assert!(html.contains(r#"<meta name="app-slug" content="memory_game">"#));
    assert!(html.contains(r#"<link rel="stylesheet" href="../shared/theme.css">"#));
    assert!(html.contains(r#"<script src="../shared/frame.js" defer="">"#));
    assert!(html.contains(r#"<main id="app-root"><p>Hi</p></main>"#));
    assert!(!html.contains("</meta>") && !html.contains("</link>"), "{}", html);

    assert_eq!(read(&page.with_file_name("index.html.bak")), "<p>Hi</p>");
    assert_eq!(read(&docs.join("index.html")), "<h1>Catalogue</h1>");
    assert_eq!(read(&docs.join("shared").join("index.html")), "<p>shared</p>");
}

#[test]
fn second_run_skips() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");

    pagepatch_cmd().arg("--root").arg(&docs).assert().success();
    let first = read(&page);

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .assert()
        .success()
        .stdout(predicate::str::contains("memory_game/index.html: skip (already ok)"));

    assert_eq!(read(&page), first);
    assert!(!page.with_file_name("index.html.bak1").exists());
}

#[test]
fn dry_run_does_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");
    let mtime_before = fs::metadata(&page).unwrap().modified().unwrap();

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("memory_game/index.html: DRY-RUN would modify"));

    assert_eq!(read(&page), "<p>Hi</p>");
    assert_eq!(fs::metadata(&page).unwrap().modified().unwrap(), mtime_before);
    assert!(!page.with_file_name("index.html.bak").exists());
}

#[test]
fn undo_restores_latest_backup() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");

    pagepatch_cmd().arg("--root").arg(&docs).assert().success();
    assert_ne!(read(&page), "<p>Hi</p>");

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restoring from backups (if present)"))
        .stdout(predicate::str::contains("memory_game/index.html: restored index.html.bak"));

    assert_eq!(read(&page), "<p>Hi</p>");
}

#[test]
fn undo_without_backup_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, _page) = docs_tree(&temp_dir, "<p>Hi</p>");

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("memory_game/index.html: no backup found"));
}

#[test]
fn missing_root_fails_without_scanning() {
    let temp_dir = TempDir::new().unwrap();

    pagepatch_cmd()
        .arg("--root")
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("Scanning").not());
}

#[test]
fn bad_file_is_reported_and_batch_continues() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");
    let broken = docs.join("broken_app").join("index.html");
    fs::create_dir_all(broken.parent().unwrap()).unwrap();
    fs::write(&broken, [0x3c, 0x70, 0x3e, 0xff, 0xfe, 0x00]).unwrap();

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .assert()
        .failure()
        .stdout(predicate::str::contains("broken_app/index.html: ERROR ParseError:"))
        .stdout(predicate::str::contains("memory_game/index.html: updated"));

    assert!(read(&page).contains("app-root"));
    assert!(!broken.with_file_name("index.html.bak").exists());
}

#[test]
fn clinician_profile_appends_notes_block() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<html><head></head><body><p>Hi</p></body></html>");

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--profile")
        .arg("clinician-notes")
        .assert()
        .success();

    let html = read(&page);
    assert!(html.contains(r#"<script src="../shared/js/clinician_feedback.js" defer="">"#));
    assert!(html.contains(r#"<section id="clinician-notes">"#));
    assert!(html.contains(r#"<textarea id="clinician-comment""#));
    assert!(!html.contains("app-slug"));
}

#[test]
fn unknown_profile_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, _page) = docs_tree(&temp_dir, "<p>Hi</p>");

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--profile")
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile 'bogus'"));
}

#[test]
fn config_file_profile_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, page) = docs_tree(&temp_dir, "<p>Hi</p>");
    let config = temp_dir.path().join("profile.toml");
    fs::write(
        &config,
        r#"
name = "custom"

[container]
tag = "div"
id = "page"

[[head]]
tag = "meta"
match = { name = "app-slug" }
extra = { content = "{slug}" }
"#,
    )
    .unwrap();

    pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let html = read(&page);
    assert!(html.contains(r#"<div id="page"><p>Hi</p></div>"#));
    assert!(html.contains(r#"content="memory_game""#));
    assert!(!html.contains("theme.css"));
}

#[test]
fn json_report_lists_each_file() {
    let temp_dir = TempDir::new().unwrap();
    let (docs, _page) = docs_tree(&temp_dir, "<p>Hi</p>");

    let output = pagepatch_cmd()
        .arg("--root")
        .arg(&docs)
        .arg("--dry-run")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "would-change");
    assert_eq!(entries[0]["ok"], true);
    assert!(entries[0]["changes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "wrapped body content"));
}
