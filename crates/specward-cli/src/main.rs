//! Specward CLI: the `specward` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            path,
            no_recursive,
            no_check_filenames,
            check_refs,
            verbose,
            json,
        } => commands::validate::run(commands::validate::Args {
            path,
            no_recursive,
            no_check_filenames,
            check_refs,
            verbose,
            json,
        }),

        Commands::Registry {
            templates,
            out,
            check,
            force,
            json,
        } => commands::registry::run(templates, out, check, force, json),

        Commands::TemplateCheck {
            templates,
            registry,
            json,
        } => commands::template_check::run(templates, registry, json),

        Commands::Staleness {
            root,
            verbose,
            json,
        } => commands::staleness::run(root, verbose, json),

        Commands::Rename {
            path,
            apply,
            no_recursive,
            json,
        } => commands::rename::run(path, apply, no_recursive, json),
    }
}
