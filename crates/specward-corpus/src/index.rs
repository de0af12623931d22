//! Corpus index: per-run uniqueness and reference-resolution maps.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Two first-wins maps built in discovery (pass 1) and consulted in
/// validation (pass 2).
///
/// First-wins insertion gives duplicate attribution for free: a document
/// whose identifier resolves to a different path than its own is the
/// second-processed duplicate, and the stored path names the original.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    ids: BTreeMap<String, PathBuf>,
    names: BTreeMap<(String, String), PathBuf>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier; the first occurrence wins.
    pub fn record_id(&mut self, id: &str, path: &Path) {
        self.ids
            .entry(id.to_string())
            .or_insert_with(|| path.to_path_buf());
    }

    /// Record a (type, name) pair; the first occurrence wins.
    pub fn record_name(&mut self, spec_type: &str, name: &str, path: &Path) {
        self.names
            .entry((spec_type.to_string(), name.to_string()))
            .or_insert_with(|| path.to_path_buf());
    }

    pub fn first_path_for_id(&self, id: &str) -> Option<&Path> {
        self.ids.get(id).map(PathBuf::as_path)
    }

    pub fn first_path_for_name(&self, spec_type: &str, name: &str) -> Option<&Path> {
        self.names
            .get(&(spec_type.to_string(), name.to_string()))
            .map(PathBuf::as_path)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn id_count(&self) -> usize {
        self.ids.len()
    }
}
