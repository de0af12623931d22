//! Template introspection: derive `SpecType` rules from template documents.
//!
//! Two extraction strategies per template. The primary strategy reads an
//! embedded `_meta` block (a top-level mapping in YAML templates, a YAML
//! block inside an HTML comment in Markdown templates). The legacy fallback
//! infers the identifier prefix from a placeholder identifier such as
//! `TC-[XXX]`. Templates that parse but declare no type are skipped;
//! templates that fail to parse are skipped with a non-fatal warning.

use crate::spec_type::{DEFAULT_REQUIRED_FIELDS, RegistryError, SpecType, TypeRegistry};
use regex::Regex;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A successfully built registry plus non-fatal per-template warnings.
#[derive(Debug, Clone)]
pub struct IntrospectOutcome {
    pub registry: TypeRegistry,
    pub warnings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    #[error("template directory not readable: {path}: {detail}")]
    Io { path: PathBuf, detail: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One extracted template, tagged with which strategy produced it.
#[derive(Debug, Clone)]
pub(crate) struct ExtractedTemplate {
    pub spec_type: SpecType,
    pub via_meta: bool,
}

fn placeholder_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+)-\[").expect("placeholder prefix regex must compile"))
}

fn html_meta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?_meta:\s*\n(.*?)-->").expect("html meta regex must compile")
    })
}

fn frontmatter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)---\s*\n(.*?)\n---").expect("frontmatter regex must compile")
    })
}

/// Scan a template directory and build the type registry.
///
/// Duplicate type names or prefixes abort construction entirely; the rest of
/// the system cannot operate on an ambiguous registry.
pub fn introspect_templates(template_dir: &Path) -> Result<IntrospectOutcome, IntrospectError> {
    let mut registry = TypeRegistry::new();
    let mut warnings = Vec::new();

    for path in template_files(template_dir)? {
        match extract_template(&path) {
            Ok(Some(extracted)) => registry.insert(extracted.spec_type)?,
            Ok(None) => {}
            Err(warning) => warnings.push(warning),
        }
    }

    Ok(IntrospectOutcome { registry, warnings })
}

/// Candidate template files (`spec-*.yaml`, `spec-*.md`) in sorted order.
pub(crate) fn template_files(template_dir: &Path) -> Result<Vec<PathBuf>, IntrospectError> {
    let entries = fs::read_dir(template_dir).map_err(|e| IntrospectError::Io {
        path: template_dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IntrospectError::Io {
            path: template_dir.to_path_buf(),
            detail: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_template = name.starts_with("spec-")
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("md")
            );
        if is_template {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Extract one template's type rules.
///
/// `Ok(None)` means the template declares no type and is skipped silently;
/// `Err` carries a non-fatal warning message.
pub(crate) fn extract_template(path: &Path) -> Result<Option<ExtractedTemplate>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("could not read template {}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") => extract_yaml_template(&text, &file_name),
        Some("md") => extract_markdown_template(&text, &file_name),
        _ => Ok(None),
    }
}

fn extract_yaml_template(
    text: &str,
    file_name: &str,
) -> Result<Option<ExtractedTemplate>, String> {
    let value: Value = serde_yaml::from_str(text)
        .map_err(|e| format!("could not parse template {file_name}: {e}"))?;
    let Some(type_name) = str_field(&value, "type") else {
        return Ok(None);
    };

    if let Some(meta) = value.get("_meta") {
        return Ok(build_from_meta(meta, &type_name, "yaml", file_name));
    }

    // Legacy fallback: infer the prefix from a placeholder identifier.
    let Some(prefix) = str_field(&value, "id").and_then(|id| placeholder_prefix(&id)) else {
        return Ok(None);
    };
    Ok(Some(legacy_template(&type_name, &prefix, "yaml", file_name)))
}

fn extract_markdown_template(
    text: &str,
    file_name: &str,
) -> Result<Option<ExtractedTemplate>, String> {
    let frontmatter: Option<Value> = frontmatter_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| serde_yaml::from_str(m.as_str()).ok());

    if let Some(meta_text) = html_meta_re().captures(text).and_then(|c| c.get(1)) {
        let meta: Value = serde_yaml::from_str(meta_text.as_str())
            .map_err(|e| format!("could not parse _meta block in {file_name}: {e}"))?;
        let type_name = frontmatter
            .as_ref()
            .and_then(|fm| str_field(fm, "type"))
            .or_else(|| str_field(&meta, "type"));
        let Some(type_name) = type_name else {
            return Ok(None);
        };
        return Ok(build_from_meta(&meta, &type_name, "md", file_name));
    }

    // Legacy fallback: frontmatter only.
    let Some(frontmatter) = frontmatter else {
        return Ok(None);
    };
    let Some(type_name) = str_field(&frontmatter, "type") else {
        return Ok(None);
    };
    let Some(prefix) = str_field(&frontmatter, "id").and_then(|id| placeholder_prefix(&id)) else {
        return Ok(None);
    };
    Ok(Some(legacy_template(&type_name, &prefix, "md", file_name)))
}

fn build_from_meta(
    meta: &Value,
    type_name: &str,
    default_extension: &str,
    file_name: &str,
) -> Option<ExtractedTemplate> {
    let prefix = str_field(meta, "id_prefix")?;
    let extension =
        str_field(meta, "file_extension").unwrap_or_else(|| default_extension.to_string());
    let required_fields = string_list(meta.get("required_fields"))
        .unwrap_or_else(|| DEFAULT_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect());
    let name_guidelines = str_field(meta, "name_guidelines").unwrap_or_default();
    let name_examples = string_list(meta.get("name_examples")).unwrap_or_default();

    Some(ExtractedTemplate {
        spec_type: SpecType {
            name: type_name.to_string(),
            prefix,
            required_fields,
            extension,
            name_guidelines,
            name_examples,
            template: file_name.to_string(),
        },
        via_meta: true,
    })
}

fn legacy_template(
    type_name: &str,
    prefix: &str,
    extension: &str,
    file_name: &str,
) -> ExtractedTemplate {
    ExtractedTemplate {
        spec_type: SpecType {
            name: type_name.to_string(),
            prefix: prefix.to_string(),
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            extension: extension.to_string(),
            name_guidelines: String::new(),
            name_examples: Vec::new(),
            template: file_name.to_string(),
        },
        via_meta: false,
    }
}

fn placeholder_prefix(id: &str) -> Option<String> {
    placeholder_prefix_re()
        .captures(id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let rows = value?.as_sequence()?;
    Some(
        rows.iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect(),
    )
}
