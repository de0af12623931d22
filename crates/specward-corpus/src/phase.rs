//! Phase extraction for composite (scenario) documents.
//!
//! Extraction is structural and total: it walks the raw `phases` value,
//! collects every field-level issue, and still returns whatever well-formed
//! phases it found, so path-convention checks can run on partial data.

use crate::diagnostic::Severity;
use serde_yaml::Value;
use std::collections::BTreeSet;

/// Reference kinds a phase can carry, with their directory conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRefKind {
    TestCase,
    Precondition,
}

impl CaseRefKind {
    pub fn expected_dir(&self) -> &'static str {
        match self {
            CaseRefKind::TestCase => "/specs/test-cases/",
            CaseRefKind::Precondition => "/specs/precondition-cases/",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseRefKind::TestCase => "test_case",
            CaseRefKind::Precondition => "precondition",
        }
    }
}

/// A reference to another case document: a corpus-rooted path plus an
/// optional free-form description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRef {
    pub path: String,
    pub description: Option<String>,
}

/// One ordered sub-unit of a scenario document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phase {
    pub phase_id: String,
    pub phase_name: String,
    pub description: String,
    pub preconditions: Vec<CaseRef>,
    pub test_cases: Vec<CaseRef>,
}

/// A structural finding raised during phase extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseIssue {
    pub severity: Severity,
    pub message: String,
}

impl PhaseIssue {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

const REQUIRED_PHASE_FIELDS: [&str; 5] = [
    "phase_id",
    "phase_name",
    "description",
    "preconditions",
    "test_cases",
];

/// Extract phases from the raw `phases` value, collecting issues instead of
/// failing fast.
pub fn extract_phases(value: &Value) -> (Vec<Phase>, Vec<PhaseIssue>) {
    let mut phases = Vec::new();
    let mut issues = Vec::new();

    let Some(rows) = value.as_sequence() else {
        issues.push(PhaseIssue::error("'phases' must be a list".to_string()));
        return (phases, issues);
    };
    if rows.is_empty() {
        issues.push(PhaseIssue::warning("'phases' list is empty".to_string()));
        return (phases, issues);
    }

    let mut seen_ids = BTreeSet::new();
    for (idx, row) in rows.iter().enumerate() {
        let ordinal = idx + 1;
        let Some(mapping) = row.as_mapping() else {
            issues.push(PhaseIssue::error(format!(
                "phase {ordinal} must be a key/value mapping"
            )));
            continue;
        };

        for field in REQUIRED_PHASE_FIELDS {
            if !mapping.contains_key(field) {
                issues.push(PhaseIssue::error(format!(
                    "phase {ordinal} missing required field: '{field}'"
                )));
            }
        }

        let phase_id = str_field(row, "phase_id").unwrap_or_default();
        if mapping.contains_key("phase_id") && phase_id.is_empty() {
            issues.push(PhaseIssue::error(format!(
                "phase {ordinal} has an empty 'phase_id'"
            )));
        }
        if !phase_id.is_empty() && !seen_ids.insert(phase_id.clone()) {
            issues.push(PhaseIssue::error(format!(
                "duplicate phase_id: '{phase_id}'"
            )));
        }

        let display_id = if phase_id.is_empty() {
            format!("#{ordinal}")
        } else {
            phase_id.clone()
        };
        let preconditions = extract_refs(
            row.get("preconditions"),
            &display_id,
            CaseRefKind::Precondition,
            &mut issues,
        );
        let test_cases = extract_refs(
            row.get("test_cases"),
            &display_id,
            CaseRefKind::TestCase,
            &mut issues,
        );

        phases.push(Phase {
            phase_id,
            phase_name: str_field(row, "phase_name").unwrap_or_default(),
            description: str_field(row, "description").unwrap_or_default(),
            preconditions,
            test_cases,
        });
    }

    (phases, issues)
}

fn extract_refs(
    value: Option<&Value>,
    phase_id: &str,
    kind: CaseRefKind,
    issues: &mut Vec<PhaseIssue>,
) -> Vec<CaseRef> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(rows) = value.as_sequence() else {
        issues.push(PhaseIssue::error(format!(
            "phase '{phase_id}' {}s must be a list",
            kind.label()
        )));
        return Vec::new();
    };
    if rows.is_empty() {
        issues.push(PhaseIssue::error(format!(
            "phase '{phase_id}' has an empty {} list",
            kind.label()
        )));
        return Vec::new();
    }

    let mut refs = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let ordinal = idx + 1;
        let Some(_) = row.as_mapping() else {
            issues.push(PhaseIssue::error(format!(
                "phase '{phase_id}' {} {ordinal} must be a key/value mapping",
                kind.label()
            )));
            continue;
        };
        let Some(path) = str_field(row, "path") else {
            issues.push(PhaseIssue::error(format!(
                "phase '{phase_id}' {} {ordinal} missing 'path' field",
                kind.label()
            )));
            continue;
        };
        refs.push(CaseRef {
            path,
            description: str_field(row, "description"),
        });
    }
    refs
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
