//! Corpus walking: find the eligible spec files under a root.
//!
//! Eligible files live under a declared spec root (`specs/` or `plans/`
//! path component), carry a recognized extension, and are neither templates
//! nor READMEs. Results are sorted for deterministic validation order.

use std::fs;
use std::path::{Path, PathBuf};

/// Path components that mark a directory tree as spec content.
pub const SPEC_ROOTS: [&str; 2] = ["specs", "plans"];

const RECOGNIZED_EXTENSIONS: [&str; 3] = ["yaml", "yml", "md"];

/// Collect eligible spec files under `root` in sorted order.
///
/// A `root` that is itself a file is returned as-is (single-file validation
/// skips the corpus-root filters).
pub fn collect_spec_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, String> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk_dir(root, recursive, &mut files)?;
    files.retain(|path| is_eligible(path));
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("failed reading {}: {e}", dir.display()))?;
    let mut entries = entries
        .map(|entry| entry.map_err(|e| format!("failed reading directory entry: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if recursive && !is_excluded_dir(&path) {
                walk_dir(&path, recursive, out)?;
            }
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn is_excluded_dir(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|n| n.to_str()),
        Some("templates") | Some(".git")
    )
}

fn is_eligible(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !RECOGNIZED_EXTENSIONS.contains(&extension) {
        return false;
    }
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if file_name.starts_with("README") {
        return false;
    }
    let mut under_spec_root = false;
    for component in path.components() {
        let Some(name) = component.as_os_str().to_str() else {
            continue;
        };
        if name == "templates" {
            return false;
        }
        if SPEC_ROOTS.contains(&name) {
            under_spec_root = true;
        }
    }
    under_spec_root
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
                "specward-walk-{prefix}-{}-{unique}",
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

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent should exist"))
            .expect("dirs should be created");
        fs::write(path, "type: TestCase\n").expect("file should be written");
    }

    #[test]
    fn walk_keeps_spec_files_and_skips_templates_and_readmes() {
        let tmp = TempDirGuard::new("filters");
        touch(&tmp.path().join("specs/test-cases/TC-1.yaml"));
        touch(&tmp.path().join("specs/README.md"));
        touch(&tmp.path().join("templates/spec-test-case.yaml"));
        touch(&tmp.path().join("notes/scratch.yaml"));
        touch(&tmp.path().join("plans/W-1-rollout.md"));

        let files = collect_spec_files(tmp.path(), true).expect("walk should succeed");
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(tmp.path())
                    .expect("path should be under root")
                    .display()
                    .to_string()
            })
            .collect();
        assert_eq!(
            names,
            vec!["plans/W-1-rollout.md", "specs/test-cases/TC-1.yaml"]
        );
    }

    #[test]
    fn non_recursive_walk_stays_at_top_level() {
        let tmp = TempDirGuard::new("non-recursive");
        let specs = tmp.path().join("specs");
        touch(&specs.join("W-1.md"));
        touch(&specs.join("test-cases/TC-1.yaml"));

        let files = collect_spec_files(&specs, false).expect("walk should succeed");
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("specs/W-1.md"));
    }

    #[test]
    fn single_file_root_is_returned_directly() {
        let tmp = TempDirGuard::new("single-file");
        let file = tmp.path().join("anywhere.yaml");
        touch(&file);

        let files = collect_spec_files(&file, true).expect("walk should succeed");
        assert_eq!(files, vec![file]);
    }
}
