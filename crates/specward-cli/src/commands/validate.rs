use crate::support::{EXIT_FAILURE, EXIT_USAGE, ensure_path_exists, load_registry_or_exit};
use specward_corpus::{Severity, ValidateOptions, ValidationReport, Validator};
use std::path::PathBuf;

pub struct Args {
    pub path: String,
    pub no_recursive: bool,
    pub no_check_filenames: bool,
    pub check_refs: bool,
    pub verbose: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let path = PathBuf::from(&args.path);
    ensure_path_exists(&path, "path");

    let outcome = load_registry_or_exit(&path, args.verbose);
    let options = ValidateOptions {
        recursive: !args.no_recursive,
        check_filenames: !args.no_check_filenames,
        check_refs: args.check_refs,
    };
    let validator = Validator::new(&outcome.registry, options);
    let report = match validator.validate_corpus(&path) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_USAGE);
        }
    };

    if args.json {
        print_json(&report);
    } else {
        print_human(&report, args.verbose);
    }

    if !report.accepted() {
        std::process::exit(EXIT_FAILURE);
    }
}

fn print_json(report: &ValidationReport) {
    let rendered = serde_json::to_string_pretty(report).unwrap_or_else(|err| {
        eprintln!("error: failed to render validation report: {err}");
        std::process::exit(EXIT_USAGE);
    });
    println!("{rendered}");
}

fn print_human(report: &ValidationReport, verbose: bool) {
    let summary = &report.summary;
    if report.accepted() && summary.warnings == 0 {
        println!(
            "[validate] OK (files={}, passed={}, info={})",
            summary.total, summary.passed, summary.info
        );
    } else if report.accepted() {
        println!(
            "[validate] OK with warnings (files={}, passed={}, warnings={}, info={})",
            summary.total, summary.passed, summary.warnings, summary.info
        );
    } else {
        println!(
            "[validate] FAIL (files={}, passed={}, errors={}, warnings={})",
            summary.total, summary.passed, summary.errors, summary.warnings
        );
    }

    for diagnostic in &report.diagnostics {
        if diagnostic.severity == Severity::Info && !verbose {
            continue;
        }
        println!("  - {diagnostic}");
    }
}
