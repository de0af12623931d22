//! Filename fix-up: converge spec filenames to `PREFIX-NUM-name.ext`.
//!
//! Dry-run by default; apply mode is required to touch disk. Per-file
//! failures (unparseable documents, target collisions, rename errors) are
//! recorded and never abort the batch. The operation is convergent: a second
//! apply run over the same corpus plans zero further renames.

use crate::document::SpecDocument;
use crate::walk::collect_spec_files;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Maximum words carried into a generated filename.
const MAX_FILENAME_WORDS: usize = 4;

const PLACEHOLDER_MARKERS: [&str; 5] = ["placeholder", "example", "todo", "[", "xxx"];

fn conforming_stem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z]+-\d+-[a-z0-9_]+$").expect("conforming stem regex must compile")
    })
}

fn id_parts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+)-(\d+)$").expect("id parts regex must compile"))
}

/// One intended rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of one fix-up run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub dry_run: bool,
    pub total: usize,
    pub already_conforming: usize,
    /// Renames planned this run; in apply mode these were performed.
    pub planned: Vec<RenamePlan>,
    pub renamed: usize,
    /// Files needing manual attention (no derivable name).
    pub skipped: Vec<String>,
    /// Per-file failures: parse errors, collisions, rename I/O errors.
    pub failed: Vec<String>,
}

impl RenameOutcome {
    pub fn clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lowercase a raw name into filename words: `[a-z0-9_]` only, runs of other
/// characters collapsed to one `_`, at most four words.
pub fn sanitize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            cleaned.push(c);
        } else {
            cleaned.push('_');
        }
    }
    let words: Vec<&str> = cleaned
        .split('_')
        .filter(|w| !w.is_empty())
        .take(MAX_FILENAME_WORDS)
        .collect();
    words.join("_")
}

fn is_placeholder(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Derive a descriptive name from the document: its `name` field when usable,
/// otherwise the first words of its `purpose`.
pub fn suggest_name(doc: &SpecDocument) -> Option<String> {
    if let Some(name) = &doc.name
        && !is_placeholder(name)
    {
        let sanitized = sanitize_name(name);
        if !sanitized.is_empty() {
            return Some(sanitized);
        }
    }

    let purpose = doc
        .field("purpose")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or_default();
    if purpose.is_empty() || is_placeholder(purpose) {
        return None;
    }
    let sanitized = sanitize_name(purpose);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// The target filename for one document, or `None` when its identifier does
/// not split into prefix and number.
fn target_file_name(id: &str, name: &str, extension: &str) -> Option<String> {
    let caps = id_parts_re().captures(id)?;
    let prefix = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str();
    Some(format!("{prefix}-{number}-{name}.{extension}"))
}

/// Run the fix-up over every spec file under `root`.
pub fn rename_corpus(root: &Path, recursive: bool, apply: bool) -> Result<RenameOutcome, String> {
    let files = collect_spec_files(root, recursive)?;

    let mut outcome = RenameOutcome {
        dry_run: !apply,
        total: files.len(),
        already_conforming: 0,
        planned: Vec::new(),
        renamed: 0,
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    for path in &files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if conforming_stem_re().is_match(stem) {
            outcome.already_conforming += 1;
            continue;
        }

        let doc = match SpecDocument::load(path) {
            Ok(doc) => doc,
            Err(err) => {
                outcome.failed.push(format!("{}: {err}", path.display()));
                continue;
            }
        };
        let Some(id) = doc.id.clone() else {
            outcome
                .skipped
                .push(format!("{}: no identifier to rename from", path.display()));
            continue;
        };
        let Some(name) = suggest_name(&doc) else {
            outcome.skipped.push(format!(
                "{}: no usable name; manual intervention needed",
                path.display()
            ));
            continue;
        };
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(file_name) = target_file_name(&id, &name, extension) else {
            outcome.skipped.push(format!(
                "{}: identifier '{id}' does not split into prefix and number",
                path.display()
            ));
            continue;
        };

        let target = path.with_file_name(file_name);
        if target == *path {
            outcome.already_conforming += 1;
            continue;
        }
        if target.exists() {
            outcome.failed.push(format!(
                "{}: target already exists: {}",
                path.display(),
                target.display()
            ));
            continue;
        }

        if apply {
            if let Err(err) = fs::rename(path, &target) {
                outcome
                    .failed
                    .push(format!("{}: rename failed: {err}", path.display()));
                continue;
            }
            outcome.renamed += 1;
        }
        outcome.planned.push(RenamePlan {
            from: path.clone(),
            to: target,
        });
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "specward-rename-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("temp dir should be created");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn write_spec(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent should exist"))
            .expect("dirs should be created");
        fs::write(&path, content).expect("spec should be written");
        path
    }

    #[test]
    fn sanitize_lowercases_and_limits_words() {
        assert_eq!(sanitize_name("Login Flow"), "login_flow");
        assert_eq!(sanitize_name("a b c d e f"), "a_b_c_d");
        assert_eq!(sanitize_name("__weird--name__"), "weird_name");
        assert_eq!(sanitize_name("!!!"), "");
    }

    #[test]
    fn dry_run_plans_but_does_not_touch_disk() {
        let tmp = TempDirGuard::new("dry-run");
        let original = write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "id: TC-1\nname: login_flow\ntype: TestCase\n",
        );

        let outcome = rename_corpus(tmp.path(), true, false).expect("fix-up should run");
        assert!(outcome.dry_run);
        assert_eq!(outcome.planned.len(), 1);
        assert_eq!(outcome.renamed, 0);
        assert!(outcome.planned[0].to.ends_with("TC-1-login_flow.yaml"));
        assert!(original.exists());
    }

    #[test]
    fn apply_renames_and_second_run_is_idempotent() {
        let tmp = TempDirGuard::new("apply");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "id: TC-1\nname: login_flow\ntype: TestCase\n",
        );

        let first = rename_corpus(tmp.path(), true, true).expect("apply should run");
        assert_eq!(first.renamed, 1);
        assert!(first.clean());
        assert!(
            tmp.path()
                .join("specs/test-cases/TC-1-login_flow.yaml")
                .exists()
        );

        let second = rename_corpus(tmp.path(), true, true).expect("second apply should run");
        assert_eq!(second.renamed, 0);
        assert_eq!(second.planned.len(), 0);
        assert_eq!(second.already_conforming, 1);
    }

    #[test]
    fn placeholder_name_falls_back_to_purpose() {
        let tmp = TempDirGuard::new("purpose");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-2.yaml",
            "id: TC-2\nname: \"[descriptive_name]\"\ntype: TestCase\npurpose: Verify password reset email delivery works\n",
        );

        let outcome = rename_corpus(tmp.path(), true, false).expect("fix-up should run");
        assert_eq!(outcome.planned.len(), 1);
        assert!(
            outcome.planned[0]
                .to
                .ends_with("TC-2-verify_password_reset_email.yaml")
        );
    }

    #[test]
    fn target_collision_is_recorded_not_fatal() {
        let tmp = TempDirGuard::new("collision");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-3.yaml",
            "id: TC-3\nname: login_flow\ntype: TestCase\n",
        );
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-3-login_flow.yaml",
            "id: TC-3\nname: login_flow\ntype: TestCase\n",
        );

        let outcome = rename_corpus(tmp.path(), true, true).expect("fix-up should run");
        assert!(!outcome.clean());
        assert!(outcome.failed[0].contains("target already exists"));
    }

    #[test]
    fn document_without_usable_name_is_skipped() {
        let tmp = TempDirGuard::new("skip");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-4.yaml",
            "id: TC-4\nname: \"[placeholder]\"\ntype: TestCase\n",
        );

        let outcome = rename_corpus(tmp.path(), true, false).expect("fix-up should run");
        assert!(outcome.planned.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].contains("manual intervention"));
    }
}
