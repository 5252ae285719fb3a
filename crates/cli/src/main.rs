// ABOUTME: CLI for standardizing app pages under a docs tree with pagepatch-core.
// ABOUTME: Patches every app index.html (or restores backups with --undo) and prints one line per file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pagepatch_core::{
    find_candidates, load_profile, report_line, FileStatus, ParserEngine, PatchError,
    PatchProfile, Patcher,
};
use serde_json::json;
use tracing::warn;

/// Ensure every app page carries the shared header and content container.
#[derive(Parser, Debug)]
#[command(name = "pagepatch")]
#[command(about = "Standardize app headers in docs/", long_about = None)]
struct Args {
    /// Root containing apps
    #[arg(long, default_value = "docs")]
    root: PathBuf,

    /// Show actions but do not write
    #[arg(long)]
    dry_run: bool,

    /// Restore latest .bak for each file
    #[arg(long)]
    undo: bool,

    /// HTML parser to use: html5 (default) or scraper
    #[arg(long, default_value = "html5")]
    parser: ParserEngine,

    /// Built-in profile: frame (default) or clinician-notes
    #[arg(long, default_value = "frame", conflicts_with = "config")]
    profile: String,

    /// Load the profile from a TOML file instead of a built-in one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as a JSON array instead of lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pagepatch=debug,pagepatch_core=debug"
    } else {
        "pagepatch=info,pagepatch_core=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn resolve_profile(args: &Args) -> Result<PatchProfile> {
    match &args.config {
        Some(path) => {
            load_profile(path).with_context(|| format!("loading profile {}", path.display()))
        }
        None => Ok(PatchProfile::builtin(&args.profile)?),
    }
}

/// One processed file, kept for the JSON report.
struct Entry {
    path: PathBuf,
    result: Result<FileStatus, PatchError>,
}

fn entry_json(entry: &Entry) -> serde_json::Value {
    match &entry.result {
        Ok(status) => {
            let backup = match status {
                FileStatus::Updated { backup, .. } | FileStatus::Restored(backup) => {
                    Some(backup.display().to_string())
                }
                _ => None,
            };
            json!({
                "path": entry.path.display().to_string(),
                "ok": true,
                "status": status.kind(),
                "changes": status.changes().iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                "backup": backup,
                "error": null
            })
        }
        Err(err) => json!({
            "path": entry.path.display().to_string(),
            "ok": false,
            "status": "error",
            "changes": [],
            "backup": null,
            "error": { "kind": err.code.to_string(), "message": err.to_string() }
        }),
    }
}

fn run_batch(args: &Args, patcher: &Patcher, candidates: &[PathBuf]) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(candidates.len());
    for path in candidates {
        let result = if args.undo {
            patcher.restore_file(path)
        } else {
            patcher.process_file(path)
        };
        if let Err(err) = &result {
            warn!(file = %path.display(), kind = %err.code, "failed: {}", err);
        }
        if !args.json {
            println!("{}", report_line(path, &result));
        }
        entries.push(Entry {
            path: path.clone(),
            result,
        });
    }
    entries
}

fn header(args: &Args, root: &Path, count: usize) -> String {
    if args.undo {
        "Restoring from backups (if present)…".to_string()
    } else {
        format!("Scanning {} index.html files under {}…", count, root.display())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let profile = match resolve_profile(&args) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let candidates = match find_candidates(&args.root) {
        Ok(candidates) => candidates,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let patcher = Patcher::builder()
        .profile(profile)
        .engine(args.parser)
        .dry_run(args.dry_run)
        .build();

    if !args.json {
        println!("{}", header(&args, &args.root, candidates.len()));
    }

    let entries = run_batch(&args, &patcher, &candidates);
    let had_error = entries.iter().any(|e| e.result.is_err());

    if args.json {
        let report: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::from(1);
            }
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
