use crate::support::{EXIT_FAILURE, EXIT_USAGE, ensure_path_exists};
use specward_corpus::rename_corpus;
use std::path::PathBuf;

pub fn run(path: String, apply: bool, no_recursive: bool, json: bool) {
    let root = PathBuf::from(&path);
    ensure_path_exists(&root, "directory");
    if !root.is_dir() {
        eprintln!("error: path must be a directory: {}", root.display());
        std::process::exit(EXIT_USAGE);
    }

    let outcome = match rename_corpus(&root, !no_recursive, apply) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        }
    };

    if json {
        let rendered = serde_json::to_string_pretty(&outcome).unwrap_or_else(|err| {
            eprintln!("error: failed to render rename outcome: {err}");
            std::process::exit(EXIT_USAGE);
        });
        println!("{rendered}");
    } else {
        println!(
            "[rename] {} (files={}, conforming={}, planned={}, renamed={}, skipped={}, failed={})",
            if outcome.dry_run { "dry run" } else { "applied" },
            outcome.total,
            outcome.already_conforming,
            outcome.planned.len(),
            outcome.renamed,
            outcome.skipped.len(),
            outcome.failed.len(),
        );
        for plan in &outcome.planned {
            let verb = if outcome.dry_run {
                "would rename"
            } else {
                "renamed"
            };
            println!("  - {verb}: {} -> {}", plan.from.display(), plan.to.display());
        }
        for skipped in &outcome.skipped {
            println!("  - skipped: {skipped}");
        }
        for failed in &outcome.failed {
            println!("  - failed: {failed}");
        }
        if outcome.dry_run && !outcome.planned.is_empty() {
            println!("  run with --apply to perform the renames");
        }
    }

    if !outcome.clean() {
        std::process::exit(EXIT_FAILURE);
    }
}
