//! Shared CLI plumbing: path resolution and exit-code policy.

use specward_registry::{IntrospectOutcome, introspect_templates};
use std::path::{Path, PathBuf};

/// Exit code for usage errors (bad paths, bad arguments).
pub const EXIT_USAGE: i32 = 2;

/// Exit code for a failing run (validation errors, registry drift).
pub const EXIT_FAILURE: i32 = 1;

/// Candidate template directories under a corpus root, in probe order.
const TEMPLATE_DIR_CANDIDATES: [&str; 2] = ["templates", ".specward/templates"];

pub fn ensure_path_exists(path: &Path, label: &str) {
    if !path.exists() {
        eprintln!("error: {label} not found: {}", path.display());
        std::process::exit(EXIT_USAGE);
    }
}

/// Walk up from `start` to the nearest ancestor carrying a template
/// directory; fall back to `start` itself.
pub fn find_corpus_root(start: &Path) -> PathBuf {
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };
    let mut current = start;
    loop {
        if template_dir(current).is_some() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent,
            _ => return start.to_path_buf(),
        }
    }
}

/// The corpus root's template directory, if any.
pub fn template_dir(root: &Path) -> Option<PathBuf> {
    TEMPLATE_DIR_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_dir())
}

/// Introspect the corpus's templates, or exit on a fatal registry conflict.
///
/// A corpus without a template directory yields an empty registry: every
/// document then gets the unknown-type warning instead of a hard failure.
pub fn load_registry_or_exit(start: &Path, verbose: bool) -> IntrospectOutcome {
    let root = find_corpus_root(start);
    let Some(dir) = template_dir(&root) else {
        if verbose {
            eprintln!(
                "warning: no template directory found under {}; validating with an empty registry",
                root.display()
            );
        }
        return IntrospectOutcome {
            registry: specward_registry::TypeRegistry::new(),
            warnings: Vec::new(),
        };
    };

    match introspect_templates(&dir) {
        Ok(outcome) => {
            if verbose {
                for warning in &outcome.warnings {
                    eprintln!("warning: {warning}");
                }
            }
            outcome
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
