//! Implementation-tree scanning and staleness correlation.

use crate::markers::{extract_markers, parse_iso_utc};
use crate::report::{StalenessRecord, StalenessReport};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Source extensions scanned for markers.
pub const IMPL_EXTENSIONS: [&str; 10] =
    ["py", "js", "ts", "java", "go", "rb", "cs", "cpp", "c", "rs"];

/// Directories never descended into.
pub const EXCLUDED_DIRS: [&str; 7] = [
    ".git",
    "node_modules",
    "venv",
    "__pycache__",
    "target",
    "build",
    "dist",
];

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed reading {path}: {detail}")]
    Io { path: PathBuf, detail: String },
}

/// Collect implementation source files under `root` in sorted order.
pub fn collect_impl_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::Io {
        path: dir.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mut entries = entries
        .map(|entry| {
            entry.map_err(|e| ScanError::Io {
                path: dir.to_path_buf(),
                detail: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| EXCLUDED_DIRS.contains(&name));
            if !excluded {
                walk(&path, out)?;
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| IMPL_EXTENSIONS.contains(&ext))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Read a specification's own timestamp with a line scan.
///
/// The staleness pipeline deliberately does not pull in the document parser;
/// the first `timestamp:` line wins.
pub fn spec_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let text = fs::read_to_string(path).ok()?;
    for line in text.lines() {
        if let Some(raw) = line.strip_prefix("timestamp:") {
            return parse_iso_utc(raw.trim().trim_matches('"'));
        }
    }
    None
}

/// Analyze one tree: correlate every marker pair against the referenced
/// specification's timestamp and classify the drift.
pub fn analyze_tree(root: &Path) -> Result<StalenessReport, ScanError> {
    let mut report = StalenessReport::new();

    for impl_path in collect_impl_files(root)? {
        // Files that cannot be read as text carry no markers.
        let Ok(text) = fs::read_to_string(&impl_path) else {
            continue;
        };
        for pair in extract_markers(&text) {
            let spec_file = root.join(pair.spec_path.trim_start_matches('/'));
            let Some(spec_ts) = spec_timestamp(&spec_file) else {
                report.warnings.push(format!(
                    "cannot read timestamp from {}",
                    spec_file.display()
                ));
                continue;
            };
            report.push(StalenessRecord::new(
                impl_path.clone(),
                spec_file,
                spec_ts,
                pair.timestamp,
            ));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::StalenessTier;
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
                "specward-staleness-{prefix}-{}-{unique}",
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

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent should exist"))
            .expect("dirs should be created");
        fs::write(path, content).expect("file should be written");
    }

    fn write_spec(root: &Path, rel: &str, timestamp: &str) {
        write(
            root,
            rel,
            &format!("id: TC-1\ntype: TestCase\ntimestamp: \"{timestamp}\"\n"),
        );
    }

    #[test]
    fn stale_implementation_is_classified_critical() {
        let tmp = TempDirGuard::new("critical");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "2024-02-05T00:00:00Z",
        );
        write(
            tmp.path(),
            "src/login.rs",
            "// Implements: /specs/test-cases/TC-1.yaml\n// Case Timestamp: 2024-01-01T00:00:00Z\n",
        );

        let report = analyze_tree(tmp.path()).expect("analysis should run");
        assert_eq!(report.critical.len(), 1);
        assert_eq!(report.critical[0].days_stale, 35);
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn newer_implementation_is_up_to_date() {
        let tmp = TempDirGuard::new("fresh");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "2024-01-01T00:00:00Z",
        );
        write(
            tmp.path(),
            "src/login.rs",
            "// Implements: /specs/test-cases/TC-1.yaml\n// Case Timestamp: 2024-02-05T00:00:00Z\n",
        );

        let report = analyze_tree(tmp.path()).expect("analysis should run");
        assert_eq!(report.stale_count(), 0);
        assert_eq!(report.up_to_date.len(), 1);
        assert_eq!(report.up_to_date[0].tier, StalenessTier::UpToDate);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn missing_spec_timestamp_becomes_a_warning() {
        let tmp = TempDirGuard::new("missing-spec");
        write(
            tmp.path(),
            "src/login.rs",
            "// Implements: /specs/test-cases/TC-9.yaml\n// Case Timestamp: 2024-01-01T00:00:00Z\n",
        );

        let report = analyze_tree(tmp.path()).expect("analysis should run");
        assert_eq!(report.total(), 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("TC-9.yaml"));
    }

    #[test]
    fn excluded_directories_are_not_scanned() {
        let tmp = TempDirGuard::new("excluded");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "2024-02-05T00:00:00Z",
        );
        write(
            tmp.path(),
            "target/generated.rs",
            "// Implements: /specs/test-cases/TC-1.yaml\n// Case Timestamp: 2024-01-01T00:00:00Z\n",
        );

        let report = analyze_tree(tmp.path()).expect("analysis should run");
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn quoted_spec_timestamps_parse() {
        let tmp = TempDirGuard::new("quoted");
        write_spec(
            tmp.path(),
            "specs/test-cases/TC-1.yaml",
            "2024-06-15T12:30:00Z",
        );
        let ts = spec_timestamp(&tmp.path().join("specs/test-cases/TC-1.yaml"))
            .expect("timestamp should read");
        assert_eq!(ts.to_rfc3339(), "2024-06-15T12:30:00+00:00");
    }
}
