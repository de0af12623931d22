//! Registry persistence: one YAML artifact with content-stable caching.
//!
//! The rendered file carries a `# Last generated:` stamp that is excluded
//! from every content comparison, so regenerating from unchanged templates
//! reports "unchanged" and leaves the file untouched unless forced. Writes
//! replace the file atomically (temp file + rename).

use crate::spec_type::TypeRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Header line prefix excluded from content-equality comparisons.
pub const REGISTRY_STAMP_PREFIX: &str = "# Last generated:";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("registry cache I/O error: {path}: {detail}")]
    Io { path: PathBuf, detail: String },

    #[error("registry render error: {0}")]
    Render(String),
}

/// Whether an on-disk registry artifact matches the in-memory registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    UpToDate,
    Stale,
    Missing,
}

/// Result of a write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Unchanged,
    Written,
}

#[derive(Serialize)]
struct RegistryFile<'a> {
    types: BTreeMap<&'a str, &'a crate::spec_type::SpecType>,
}

/// Render the registry artifact. Types are emitted alphabetically so the
/// output is deterministic for a given registry.
pub fn render_registry(
    registry: &TypeRegistry,
    generated_at: DateTime<Utc>,
) -> Result<String, CacheError> {
    let file = RegistryFile {
        types: registry.iter().map(|t| (t.name.as_str(), t)).collect(),
    };
    let body = serde_yaml::to_string(&file).map_err(|e| CacheError::Render(e.to_string()))?;

    let mut out = String::new();
    out.push_str("# AUTO-GENERATED FILE - DO NOT EDIT\n");
    out.push_str("# Regenerate: specward registry --templates <dir> --out <this file>\n");
    out.push_str(&format!(
        "{REGISTRY_STAMP_PREFIX} {}\n\n",
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    ));
    out.push_str(&body);
    Ok(out)
}

/// The artifact content with the volatile stamp line removed.
pub fn semantic_content(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(REGISTRY_STAMP_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hex digest of the stamp-stripped content.
pub fn content_digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(semantic_content(text)))
}

/// Answer whether a rewrite would be needed, without writing anything.
pub fn check_registry_file(
    path: &Path,
    registry: &TypeRegistry,
) -> Result<CacheStatus, CacheError> {
    if !path.exists() {
        return Ok(CacheStatus::Missing);
    }
    let existing = fs::read_to_string(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let fresh = render_registry(registry, Utc::now())?;
    if content_digest(&existing) == content_digest(&fresh) {
        Ok(CacheStatus::UpToDate)
    } else {
        Ok(CacheStatus::Stale)
    }
}

/// Write the artifact unless its semantic content already matches.
pub fn write_registry_file(
    path: &Path,
    registry: &TypeRegistry,
    generated_at: DateTime<Utc>,
    force: bool,
) -> Result<WriteOutcome, CacheError> {
    if !force && check_registry_file(path, registry)? == CacheStatus::UpToDate {
        return Ok(WriteOutcome::Unchanged);
    }

    let content = render_registry(registry, generated_at)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| CacheError::Io {
            path: parent.to_path_buf(),
            detail: e.to_string(),
        })?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), CacheError> {
        let mut file = File::create(&tmp_path).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            detail: e.to_string(),
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| CacheError::Io {
                path: tmp_path.clone(),
                detail: e.to_string(),
            })?;
        file.sync_all().map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            detail: e.to_string(),
        })?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CacheError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;

    Ok(WriteOutcome::Written)
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
