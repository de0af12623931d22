use crate::support::{EXIT_FAILURE, EXIT_USAGE, ensure_path_exists};
use chrono::Utc;
use serde_json::json;
use specward_registry::{
    CacheStatus, WriteOutcome, cache, introspect_templates,
};
use std::path::PathBuf;

fn render_json(payload: &serde_json::Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render registry payload: {err}");
        std::process::exit(EXIT_USAGE);
    })
}

pub fn run(templates: String, out: String, check: bool, force: bool, json: bool) {
    let template_dir = PathBuf::from(&templates);
    ensure_path_exists(&template_dir, "template directory");
    let out_path = PathBuf::from(&out);

    let outcome = match introspect_templates(&template_dir) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    };
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    let registry = outcome.registry;

    if check {
        let status = cache::check_registry_file(&out_path, &registry).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        });
        let up_to_date = status == CacheStatus::UpToDate;
        if json {
            let payload = json!({
                "checkKind": "specward.registry_check.v1",
                "result": if up_to_date { "up_to_date" } else { "stale" },
                "path": out_path.display().to_string(),
                "types": registry.len(),
            });
            println!("{}", render_json(&payload));
        } else if up_to_date {
            println!("[registry] up to date (types={})", registry.len());
        } else {
            println!(
                "[registry] stale: {} needs regeneration (types={})",
                out_path.display(),
                registry.len()
            );
        }
        if !up_to_date {
            std::process::exit(EXIT_FAILURE);
        }
        return;
    }

    let written = cache::write_registry_file(&out_path, &registry, Utc::now(), force)
        .unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        });

    if json {
        let payload = json!({
            "checkKind": "specward.registry_write.v1",
            "result": match written {
                WriteOutcome::Written => "written",
                WriteOutcome::Unchanged => "unchanged",
            },
            "path": out_path.display().to_string(),
            "types": registry.len(),
        });
        println!("{}", render_json(&payload));
    } else {
        match written {
            WriteOutcome::Written => println!(
                "[registry] wrote {} (types={})",
                out_path.display(),
                registry.len()
            ),
            WriteOutcome::Unchanged => {
                println!("[registry] unchanged (types={})", registry.len())
            }
        }
    }
}
