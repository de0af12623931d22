use crate::support::{EXIT_USAGE, ensure_path_exists};
use specward_staleness::{StalenessRecord, StalenessReport, analyze_tree};
use std::path::PathBuf;

pub fn run(root: String, verbose: bool, json: bool) {
    let root = PathBuf::from(&root);
    ensure_path_exists(&root, "directory");

    let report = match analyze_tree(&root) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        }
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|err| {
            eprintln!("error: failed to render staleness report: {err}");
            std::process::exit(EXIT_USAGE);
        });
        println!("{rendered}");
    } else {
        print_human(&report, verbose);
    }

    std::process::exit(report.exit_code());
}

fn print_entries(label: &str, entries: &[StalenessRecord]) {
    if entries.is_empty() {
        return;
    }
    println!("{label}:");
    for entry in entries {
        println!(
            "  {} -> {} (spec={}, impl={}, stale={} days)",
            entry.impl_path.display(),
            entry.spec_path.display(),
            entry.spec_timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            entry.impl_timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            entry.days_stale,
        );
    }
}

fn print_human(report: &StalenessReport, verbose: bool) {
    if report.stale_count() == 0 {
        println!(
            "[staleness] OK (implementations={}, up_to_date={})",
            report.total(),
            report.up_to_date.len()
        );
    } else {
        println!(
            "[staleness] FAIL (implementations={}, stale={}, up_to_date={})",
            report.total(),
            report.stale_count(),
            report.up_to_date.len()
        );
    }

    print_entries("CRITICAL (>30 days stale)", &report.critical);
    print_entries("HIGH (7-30 days stale)", &report.high);
    print_entries("MEDIUM (1-7 days stale)", &report.medium);
    print_entries("LOW (<1 day stale)", &report.low);
    if verbose {
        print_entries("UP-TO-DATE", &report.up_to_date);
    }

    for warning in &report.warnings {
        println!("  - warning: {warning}");
    }
}
