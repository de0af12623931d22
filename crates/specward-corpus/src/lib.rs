//! # specward-corpus
//!
//! Corpus layer for spec documents.
//!
//! This crate provides:
//! - `SpecDocument` parsing (data-only YAML and prose-with-header Markdown)
//! - `CorpusIndex` (per-run identifier and name uniqueness maps)
//! - the two-pass `Validator` and its diagnostics
//! - the filename fix-up (rename) engine
//!
//! ## Data flow
//!
//! ```text
//! walk (eligible files)
//!     → pass 1: parse + index (tolerates failures)
//!     → pass 2: parse + ordered rule checks → diagnostics
//! ```
//!
//! Both the index and the diagnostic sink are owned by one validation run;
//! nothing here is process-global, so independent corpora can be validated
//! side by side.

pub mod diagnostic;
pub mod document;
pub mod index;
pub mod phase;
pub mod rename;
pub mod validate;
pub mod walk;

pub use diagnostic::{
    Diagnostic, DiagnosticSink, Severity, VALIDATE_CHECK_KIND, ValidationReport,
    ValidationSummary,
};
pub use document::{ParseError, STATUS_VALUES, SpecDocument, Status};
pub use index::CorpusIndex;
pub use phase::{CaseRef, CaseRefKind, Phase, PhaseIssue, extract_phases};
pub use rename::{RenameOutcome, RenamePlan, rename_corpus};
pub use validate::{ValidateOptions, Validator};
pub use walk::collect_spec_files;
