//! Diagnostics: severities, the per-run sink, and the validation report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const VALIDATE_CHECK_KIND: &str = "specward.corpus_validate.v1";

/// Severity of a diagnostic. Ordered so the worst severity of a run can be
/// taken with `max()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity.as_str().to_uppercase(),
            self.path.display(),
            self.message
        )
    }
}

/// Accumulator for one validation run.
///
/// Owned by the run and threaded through every check; never a process-wide
/// singleton, so independent corpora can be validated in one process.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &Path, severity: Severity, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            path: path.to_path_buf(),
            severity,
            message: message.into(),
        });
    }

    pub fn error(&mut self, path: &Path, message: impl Into<String>) {
        self.push(path, Severity::Error, message);
    }

    pub fn warning(&mut self, path: &Path, message: impl Into<String>) {
        self.push(path, Severity::Warning, message);
    }

    pub fn info(&mut self, path: &Path, message: impl Into<String>) {
        self.push(path, Severity::Info, message);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.diagnostics.iter().map(|d| d.severity).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub check_kind: String,
    pub result: String,
    pub summary: ValidationSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn from_sink(sink: DiagnosticSink, total: usize, passed: usize) -> Self {
        let summary = ValidationSummary {
            total,
            passed,
            errors: sink.count(Severity::Error),
            warnings: sink.count(Severity::Warning),
            info: sink.count(Severity::Info),
        };
        let result = if summary.errors == 0 {
            "accepted".to_string()
        } else {
            "rejected".to_string()
        };
        Self {
            check_kind: VALIDATE_CHECK_KIND.to_string(),
            result,
            summary,
            diagnostics: sink.into_vec(),
        }
    }

    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}
