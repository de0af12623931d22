//! Spec document parsing.
//!
//! Two document shapes share one record type: data-only documents (the whole
//! file is a YAML mapping) and prose documents (a YAML header bounded by a
//! `---` delimiter pair at the top of the file, followed by free text).
//!
//! The header grammar is strict and its failures are distinguishable: a
//! missing opening delimiter, an unterminated header, and YAML-invalid header
//! content are different errors. Malformed input is never swallowed as
//! "no metadata".

use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The four admissible document statuses.
pub const STATUS_VALUES: [&str; 4] = ["draft", "ready", "active", "deprecated"];

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Draft,
    Ready,
    Active,
    Deprecated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Ready => "ready",
            Status::Active => "active",
            Status::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "ready" => Ok(Status::Ready),
            "active" => Ok(Status::Active),
            "deprecated" => Ok(Status::Deprecated),
            other => Err(format!(
                "invalid status '{other}'; valid values: {}",
                STATUS_VALUES.join(", ")
            )),
        }
    }
}

/// A parsed spec document: fixed common header plus the open field map.
///
/// Header fields are kept as raw strings; the validator owns every format
/// rule. `fields` holds the complete record (common header included), so
/// required-field checks see exactly what the author wrote.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    pub path: PathBuf,
    pub id: Option<String>,
    pub spec_type: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub fields: Mapping,
    /// Prose body; `None` for data-only documents.
    pub body: Option<String>,
}

impl SpecDocument {
    /// Load a document from disk, dispatching on extension.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let text = fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("md") => Self::from_prose_str(&text, path),
            _ => Self::from_data_str(&text, path),
        }
    }

    /// Parse a data-only document: the whole file is one YAML mapping.
    pub fn from_data_str(text: &str, path: &Path) -> Result<Self, ParseError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| ParseError::InvalidYaml(e.to_string()))?;
        if value.is_null() {
            return Err(ParseError::EmptyDocument);
        }
        let mapping = value
            .as_mapping()
            .cloned()
            .ok_or(ParseError::NotAMapping)?;
        Self::from_mapping(mapping, path, None)
    }

    /// Parse a prose document: strict delimiter-pair header, then body.
    pub fn from_prose_str(text: &str, path: &Path) -> Result<Self, ParseError> {
        let (header, body) = split_header(text)?;
        let value: Value =
            serde_yaml::from_str(header).map_err(|e| ParseError::InvalidHeader(e.to_string()))?;
        let mapping = value
            .as_mapping()
            .cloned()
            .ok_or(ParseError::NotAMapping)?;
        Self::from_mapping(mapping, path, Some(body.to_string()))
    }

    fn from_mapping(
        mapping: Mapping,
        path: &Path,
        body: Option<String>,
    ) -> Result<Self, ParseError> {
        let spec_type = str_value(&mapping, "type").ok_or(ParseError::MissingType)?;
        Ok(Self {
            path: path.to_path_buf(),
            id: str_value(&mapping, "id"),
            spec_type,
            name: str_value(&mapping, "name"),
            status: str_value(&mapping, "status"),
            timestamp: str_value(&mapping, "timestamp"),
            fields: mapping,
            body,
        })
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Identifiers listed under `related`: plain strings, or mappings with an
    /// `id` key.
    pub fn related_ids(&self) -> Vec<String> {
        let Some(rows) = self.field("related").and_then(Value::as_sequence) else {
            return Vec::new();
        };
        rows.iter()
            .filter_map(|row| match row {
                Value::String(id) => Some(id.clone()),
                Value::Mapping(map) => map.get("id").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect()
    }
}

/// Split a prose document into (header, body) at the `---` delimiter pair.
pub fn split_header(text: &str) -> Result<(&str, &str), ParseError> {
    let Some(after_open) = text.strip_prefix("---\n").or_else(|| {
        text.strip_prefix("---\r\n")
    }) else {
        return Err(ParseError::MissingHeader);
    };
    let Some(close) = after_open.find("\n---") else {
        return Err(ParseError::UnterminatedHeader);
    };
    let header = &after_open[..close];
    let tail = &after_open[close + "\n---".len()..];
    let body = tail.strip_prefix('\n').unwrap_or(tail);
    Ok((header, body))
}

fn str_value(mapping: &Mapping, key: &str) -> Option<String> {
    mapping.get(key).and_then(Value::as_str).map(String::from)
}

/// Per-document parse failures. Recorded as error diagnostics; a parse
/// failure in one document never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed reading {path}: {detail}")]
    Io { path: PathBuf, detail: String },

    #[error("missing header block: file must start with a '---' delimiter line")]
    MissingHeader,

    #[error("unterminated header block: closing '---' delimiter not found")]
    UnterminatedHeader,

    #[error("malformed header content: {0}")]
    InvalidHeader(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("document is not a key/value mapping")]
    NotAMapping,

    #[error("empty document")]
    EmptyDocument,

    #[error("missing 'type' field")]
    MissingType,
}
