//! Template metadata completeness checking.
//!
//! Unlike registry construction, this surface reports conflicts instead of
//! aborting on them: it exists to tell a maintainer everything wrong with the
//! template set in one pass.

use crate::cache::{CacheError, CacheStatus, check_registry_file};
use crate::introspect::{self, IntrospectError};
use crate::spec_type::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub const TEMPLATE_CHECK_KIND: &str = "specward.template_check.v1";

pub const FAILURE_CLASS_META_MISSING: &str = "template_check.meta.missing";
pub const FAILURE_CLASS_DUPLICATE_TYPE: &str = "template_check.type.duplicate";
pub const FAILURE_CLASS_DUPLICATE_PREFIX: &str = "template_check.prefix.duplicate";
pub const FAILURE_CLASS_REGISTRY_STALE: &str = "template_check.registry.stale";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCheckSummary {
    pub templates: usize,
    pub types: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCheckReport {
    pub check_kind: String,
    pub result: String,
    pub failure_classes: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: TemplateCheckSummary,
}

impl TemplateCheckReport {
    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}

/// Check every template's metadata and, when a registry artifact path is
/// given, whether that artifact is current.
pub fn check_templates(
    template_dir: &Path,
    registry_path: Option<&Path>,
) -> Result<TemplateCheckReport, IntrospectError> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut failure_classes = BTreeSet::new();

    let mut types: BTreeMap<String, String> = BTreeMap::new();
    let mut prefixes: BTreeMap<String, String> = BTreeMap::new();
    let mut checkable = TypeRegistry::new();
    let files = introspect::template_files(template_dir)?;
    let template_count = files.len();

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extracted = match introspect::extract_template(path) {
            Ok(Some(extracted)) => extracted,
            Ok(None) => {
                errors.push(format!(
                    "{file_name}: no type declared or metadata incomplete"
                ));
                failure_classes.insert(FAILURE_CLASS_META_MISSING.to_string());
                continue;
            }
            Err(warning) => {
                errors.push(warning);
                failure_classes.insert(FAILURE_CLASS_META_MISSING.to_string());
                continue;
            }
        };

        if !extracted.via_meta {
            errors.push(format!(
                "{file_name}: missing '_meta' metadata block (legacy placeholder extraction only)"
            ));
            failure_classes.insert(FAILURE_CLASS_META_MISSING.to_string());
        }

        let spec_type = extracted.spec_type;
        if spec_type.name_guidelines.is_empty() {
            warnings.push(format!("{file_name}: no name guidelines provided"));
        }
        if spec_type.name_examples.is_empty() {
            warnings.push(format!("{file_name}: no name examples provided"));
        }

        if let Some(first) = types.get(&spec_type.name) {
            errors.push(format!(
                "duplicate type '{}' in {file_name} and {first}",
                spec_type.name
            ));
            failure_classes.insert(FAILURE_CLASS_DUPLICATE_TYPE.to_string());
            continue;
        }
        types.insert(spec_type.name.clone(), file_name.clone());

        if let Some(first) = prefixes.get(&spec_type.prefix) {
            errors.push(format!(
                "duplicate prefix '{}' used by '{}' and '{first}'",
                spec_type.prefix, spec_type.name
            ));
            failure_classes.insert(FAILURE_CLASS_DUPLICATE_PREFIX.to_string());
            continue;
        }
        prefixes.insert(spec_type.prefix.clone(), spec_type.name.clone());

        // Conflicts were handled above, so this insert cannot fail.
        let _ = checkable.insert(spec_type);
    }

    if let Some(registry_path) = registry_path {
        match check_registry_file(registry_path, &checkable) {
            Ok(CacheStatus::UpToDate) => {}
            Ok(CacheStatus::Stale) => {
                errors.push(format!(
                    "registry artifact is stale: {} (regenerate with 'specward registry')",
                    registry_path.display()
                ));
                failure_classes.insert(FAILURE_CLASS_REGISTRY_STALE.to_string());
            }
            Ok(CacheStatus::Missing) => {
                errors.push(format!(
                    "registry artifact not found: {} (generate with 'specward registry')",
                    registry_path.display()
                ));
                failure_classes.insert(FAILURE_CLASS_REGISTRY_STALE.to_string());
            }
            Err(CacheError::Io { path, detail }) => {
                errors.push(format!(
                    "registry artifact unreadable: {}: {detail}",
                    path.display()
                ));
                failure_classes.insert(FAILURE_CLASS_REGISTRY_STALE.to_string());
            }
            Err(CacheError::Render(detail)) => {
                errors.push(format!("registry render failed: {detail}"));
                failure_classes.insert(FAILURE_CLASS_REGISTRY_STALE.to_string());
            }
        }
    }

    let result = if errors.is_empty() {
        "accepted".to_string()
    } else {
        "rejected".to_string()
    };
    let summary = TemplateCheckSummary {
        templates: template_count,
        types: types.len(),
        error_count: errors.len(),
        warning_count: warnings.len(),
    };

    Ok(TemplateCheckReport {
        check_kind: TEMPLATE_CHECK_KIND.to_string(),
        result,
        failure_classes: failure_classes.into_iter().collect(),
        errors,
        warnings,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
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
                "specward-template-check-{prefix}-{}-{unique}",
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

    const COMPLETE_TEMPLATE: &str = "\
type: TestCase
_meta:
  id_prefix: TC
  file_extension: yaml
  required_fields: [id, name, type, timestamp]
  name_guidelines: \"lowercase words\"
  name_examples: [login_flow]
";

    #[test]
    fn complete_template_set_is_accepted() {
        let tmp = TempDirGuard::new("accepted");
        fs::write(tmp.path().join("spec-test-case.yaml"), COMPLETE_TEMPLATE)
            .expect("template should write");

        let report = check_templates(tmp.path(), None).expect("check should run");
        assert!(report.accepted());
        assert_eq!(report.summary.types, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn legacy_only_template_is_an_error() {
        let tmp = TempDirGuard::new("legacy-error");
        fs::write(
            tmp.path().join("spec-legacy.yaml"),
            "type: Legacy\nid: LG-[XXX]\n",
        )
        .expect("template should write");

        let report = check_templates(tmp.path(), None).expect("check should run");
        assert!(!report.accepted());
        assert!(
            report
                .failure_classes
                .iter()
                .any(|c| c == FAILURE_CLASS_META_MISSING)
        );
    }

    #[test]
    fn duplicate_prefix_is_reported_not_fatal() {
        let tmp = TempDirGuard::new("dup-prefix");
        fs::write(tmp.path().join("spec-test-case.yaml"), COMPLETE_TEMPLATE)
            .expect("template should write");
        fs::write(
            tmp.path().join("spec-trace-check.yaml"),
            "type: TraceCheck\n_meta:\n  id_prefix: TC\n  file_extension: yaml\n  name_guidelines: \"x\"\n  name_examples: [a]\n",
        )
        .expect("template should write");

        let report = check_templates(tmp.path(), None).expect("check should run, not abort");
        assert!(!report.accepted());
        assert!(
            report
                .failure_classes
                .iter()
                .any(|c| c == FAILURE_CLASS_DUPLICATE_PREFIX)
        );
    }

    #[test]
    fn missing_registry_artifact_is_reported() {
        let tmp = TempDirGuard::new("registry-missing");
        fs::write(tmp.path().join("spec-test-case.yaml"), COMPLETE_TEMPLATE)
            .expect("template should write");

        let registry_path = tmp.path().join("type-registry.yaml");
        let report =
            check_templates(tmp.path(), Some(&registry_path)).expect("check should run");
        assert!(!report.accepted());
        assert!(
            report
                .failure_classes
                .iter()
                .any(|c| c == FAILURE_CLASS_REGISTRY_STALE)
        );
    }
}
