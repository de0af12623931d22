use crate::support::{EXIT_FAILURE, EXIT_USAGE, ensure_path_exists};
use specward_registry::check_templates;
use std::path::PathBuf;

pub fn run(templates: String, registry: Option<String>, json: bool) {
    let template_dir = PathBuf::from(&templates);
    ensure_path_exists(&template_dir, "template directory");
    let registry_path = registry.map(PathBuf::from);

    let report = match check_templates(&template_dir, registry_path.as_deref()) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        }
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|err| {
            eprintln!("error: failed to render template-check report: {err}");
            std::process::exit(EXIT_USAGE);
        });
        println!("{rendered}");
    } else if report.accepted() {
        println!(
            "[template-check] OK (templates={}, types={}, warnings={})",
            report.summary.templates, report.summary.types, report.summary.warning_count
        );
        for warning in &report.warnings {
            println!("  - warning: {warning}");
        }
    } else {
        println!(
            "[template-check] FAIL (templates={}, errors={}, warnings={})",
            report.summary.templates, report.summary.error_count, report.summary.warning_count
        );
        for error in &report.errors {
            println!("  - error: {error}");
        }
        for warning in &report.warnings {
            println!("  - warning: {warning}");
        }
    }

    if !report.accepted() {
        std::process::exit(EXIT_FAILURE);
    }
}
