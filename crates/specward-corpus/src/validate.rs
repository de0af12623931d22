//! The two-pass integrity validator.
//!
//! Pass 1 (discovery) walks the corpus once, tolerating parse failures, and
//! fills the `CorpusIndex`. Pass 2 re-parses each document and applies the
//! ordered rule checks, accumulating diagnostics; validation of one document
//! never aborts validation of the corpus.

use crate::diagnostic::{DiagnosticSink, Severity, ValidationReport};
use crate::document::{ParseError, SpecDocument, Status};
use crate::index::CorpusIndex;
use crate::phase::{CaseRef, CaseRefKind, extract_phases};
use crate::walk::collect_spec_files;
use regex::Regex;
use specward_registry::{SpecType, TypeRegistry};
use std::path::Path;
use std::sync::OnceLock;

/// Maximum number of words in a document name.
pub const MAX_NAME_WORDS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    pub recursive: bool,
    pub check_filenames: bool,
    /// Reference resolution is feature-flagged and off by default: it costs a
    /// full extra lookup per `related` entry on large corpora.
    pub check_refs: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            check_filenames: true,
            check_refs: false,
        }
    }
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$")
            .expect("timestamp regex must compile")
    })
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("name regex must compile"))
}

fn name_word_count(name: &str) -> usize {
    name.split(['_', '-']).filter(|w| !w.is_empty()).count()
}

/// Validator for one corpus against one registry.
pub struct Validator<'a> {
    registry: &'a TypeRegistry,
    options: ValidateOptions,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a TypeRegistry, options: ValidateOptions) -> Self {
        Self { registry, options }
    }

    /// Run both passes over the files under `root` (a directory or a single
    /// file) and produce the run report.
    pub fn validate_corpus(&self, root: &Path) -> Result<ValidationReport, String> {
        let files = collect_spec_files(root, self.options.recursive)?;
        Ok(self.validate_files(&files))
    }

    /// Run both passes over an explicit file list.
    pub fn validate_files(&self, files: &[std::path::PathBuf]) -> ValidationReport {
        // Pass 1: discovery. Parse failures are tolerated silently here; the
        // same files are re-parsed and reported properly in pass 2.
        let mut index = CorpusIndex::new();
        for path in files {
            if let Ok(doc) = SpecDocument::load(path) {
                if let Some(id) = &doc.id {
                    index.record_id(id, path);
                }
                if let Some(name) = &doc.name {
                    index.record_name(&doc.spec_type, name, path);
                }
            }
        }

        // Pass 2: validation.
        let mut sink = DiagnosticSink::new();
        let mut passed = 0;
        for path in files {
            let errors_before = sink.count(Severity::Error);
            self.validate_file(path, &index, &mut sink);
            if sink.count(Severity::Error) == errors_before {
                passed += 1;
            }
        }

        ValidationReport::from_sink(sink, files.len(), passed)
    }

    /// Validate a single document against the registry and the index.
    pub fn validate_file(&self, path: &Path, index: &CorpusIndex, sink: &mut DiagnosticSink) {
        if path.extension().and_then(|e| e.to_str()) == Some("yml") {
            sink.error(
                path,
                "invalid file extension '.yml': must use '.yaml' extension",
            );
            return;
        }

        let doc = match SpecDocument::load(path) {
            Ok(doc) => doc,
            Err(ParseError::Io { path: _, detail }) => {
                sink.error(path, format!("failed reading file: {detail}"));
                return;
            }
            Err(err) => {
                sink.error(path, err.to_string());
                return;
            }
        };

        self.check_required_fields(&doc, sink);
        self.check_id_format(&doc, sink);
        self.check_name(&doc, sink);
        if self.options.check_filenames {
            self.check_filename(&doc, sink);
        }
        self.check_timestamp(&doc, sink);
        self.check_status(&doc, sink);
        self.check_duplicates(&doc, index, sink);
        self.check_phases(&doc, sink);
        if self.options.check_refs {
            self.check_related(&doc, index, sink);
        }
        self.check_prose_sections(&doc, sink);
    }

    fn type_info(&self, doc: &SpecDocument) -> Option<&SpecType> {
        self.registry.get(&doc.spec_type)
    }

    fn check_required_fields(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        let Some(info) = self.type_info(doc) else {
            return;
        };
        for field in &info.required_fields {
            if !doc.has_field(field) {
                sink.error(&doc.path, format!("missing required field: '{field}'"));
            }
        }
    }

    fn check_id_format(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        let Some(id) = &doc.id else {
            return;
        };
        let Some(info) = self.type_info(doc) else {
            sink.warning(
                &doc.path,
                format!(
                    "unknown spec type: '{}' (no template registered)",
                    doc.spec_type
                ),
            );
            return;
        };
        let pattern = format!("^{}-[0-9]+$", regex::escape(&info.prefix));
        let re = Regex::new(&pattern).expect("prefix pattern must compile");
        if !re.is_match(id) {
            sink.error(
                &doc.path,
                format!(
                    "invalid identifier '{id}': must match '{}-<digits>' for type '{}'",
                    info.prefix, doc.spec_type
                ),
            );
        }
    }

    fn check_name(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        if doc.has_field("name") && doc.name.is_none() {
            sink.error(&doc.path, "'name' must be a string");
            return;
        }
        let Some(name) = &doc.name else {
            return;
        };
        if !name_re().is_match(name) {
            sink.error(
                &doc.path,
                format!(
                    "invalid name '{name}': must be lowercase words joined by '_' or '-'"
                ),
            );
            return;
        }
        let words = name_word_count(name);
        if words > MAX_NAME_WORDS {
            sink.error(
                &doc.path,
                format!(
                    "name '{name}' has {words} words; at most {MAX_NAME_WORDS} are allowed"
                ),
            );
        }
    }

    fn check_filename(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        let Some(id) = &doc.id else {
            return;
        };
        let Some(info) = self.type_info(doc) else {
            return;
        };
        let Some(stem) = doc.path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };

        let descriptive = doc.name.as_ref().map(|name| format!("{id}-{name}"));
        let stem_matches = stem == id || descriptive.as_deref() == Some(stem);
        if !stem_matches {
            sink.warning(
                &doc.path,
                format!(
                    "filename '{stem}' does not encode identifier '{id}': expected '{id}.{ext}' or '{id}-<name>.{ext}'",
                    ext = info.extension
                ),
            );
        }

        let Some(extension) = doc.path.extension().and_then(|e| e.to_str()) else {
            return;
        };
        if extension != info.extension {
            let kind = if info.is_case_type() {
                "case"
            } else {
                "non-case"
            };
            sink.error(
                &doc.path,
                format!(
                    "'.{extension}' extension used for {kind} type '{}': expected '.{}'",
                    doc.spec_type, info.extension
                ),
            );
        }
    }

    fn check_timestamp(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        if !doc.has_field("timestamp") {
            return;
        }
        let Some(timestamp) = &doc.timestamp else {
            sink.error(&doc.path, "'timestamp' must be a string");
            return;
        };
        if !timestamp_re().is_match(timestamp) {
            sink.error(
                &doc.path,
                format!(
                    "invalid timestamp format: '{timestamp}': must be YYYY-MM-DDTHH:MM:SSZ"
                ),
            );
            return;
        }
        if chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ").is_err() {
            sink.error(
                &doc.path,
                format!("invalid timestamp value: '{timestamp}': not a real calendar date"),
            );
        }
    }

    fn check_status(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        if !doc.has_field("status") {
            return;
        }
        let parsed = doc.status.as_deref().map(str::parse::<Status>);
        if !matches!(parsed, Some(Ok(_))) {
            let raw = doc.status.as_deref().unwrap_or("<non-string>");
            sink.warning(
                &doc.path,
                format!(
                    "invalid status: '{raw}': valid values: draft, ready, active, deprecated"
                ),
            );
        }
    }

    fn check_duplicates(&self, doc: &SpecDocument, index: &CorpusIndex, sink: &mut DiagnosticSink) {
        if let Some(id) = &doc.id
            && let Some(first) = index.first_path_for_id(id)
            && first != doc.path
        {
            sink.error(
                &doc.path,
                format!(
                    "duplicate identifier '{id}': first declared in {}",
                    first.display()
                ),
            );
        }
        if let Some(name) = &doc.name
            && let Some(first) = index.first_path_for_name(&doc.spec_type, name)
            && first != doc.path
        {
            sink.error(
                &doc.path,
                format!(
                    "duplicate (type, name) pair ('{}', '{name}'): first declared in {}",
                    doc.spec_type,
                    first.display()
                ),
            );
        }
    }

    fn check_phases(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        let Some(value) = doc.field("phases") else {
            return;
        };
        let (phases, issues) = extract_phases(value);
        for issue in issues {
            sink.push(&doc.path, issue.severity, issue.message);
        }
        for phase in &phases {
            for case_ref in &phase.preconditions {
                self.check_case_path(doc, case_ref, CaseRefKind::Precondition, sink);
            }
            for case_ref in &phase.test_cases {
                self.check_case_path(doc, case_ref, CaseRefKind::TestCase, sink);
            }
        }
    }

    fn check_case_path(
        &self,
        doc: &SpecDocument,
        case_ref: &CaseRef,
        kind: CaseRefKind,
        sink: &mut DiagnosticSink,
    ) {
        let path = &case_ref.path;
        if !path.starts_with("/specs/") {
            sink.error(
                &doc.path,
                format!("invalid case path '{path}': must be rooted at '/specs/'"),
            );
            return;
        }
        if !path.starts_with(kind.expected_dir()) {
            sink.warning(
                &doc.path,
                format!(
                    "{} path should live under '{}': '{path}'",
                    kind.label(),
                    kind.expected_dir()
                ),
            );
        }
        if !path.ends_with(".yaml") {
            sink.error(
                &doc.path,
                format!("case path must end with .yaml: '{path}'"),
            );
        }
    }

    fn check_related(&self, doc: &SpecDocument, index: &CorpusIndex, sink: &mut DiagnosticSink) {
        for id in doc.related_ids() {
            if !index.contains_id(&id) {
                sink.warning(
                    &doc.path,
                    format!("referenced identifier '{id}' not found in corpus"),
                );
            }
        }
    }

    fn check_prose_sections(&self, doc: &SpecDocument, sink: &mut DiagnosticSink) {
        let Some(body) = &doc.body else {
            return;
        };
        for section in ["## Validation Cases", "## Implementation References"] {
            if !body.contains(section) {
                sink.info(
                    &doc.path,
                    format!("missing recommended section: '{section}'"),
                );
            }
        }
    }
}
