use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "specward",
    about = "Specward: integrity checks over a corpus of structured spec documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a spec file or directory against the template-derived rules
    Validate {
        /// Path to a spec file or directory
        path: String,

        /// Don't recurse into subdirectories
        #[arg(long)]
        no_recursive: bool,

        /// Skip filename correspondence checks
        #[arg(long)]
        no_check_filenames: bool,

        /// Resolve `related` references against the corpus index
        #[arg(long)]
        check_refs: bool,

        /// Show informational diagnostics and introspection warnings
        #[arg(long)]
        verbose: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Regenerate the type registry artifact from the template directory
    Registry {
        /// Template directory
        #[arg(long)]
        templates: String,

        /// Registry artifact path
        #[arg(long, default_value = ".specward/type-registry.yaml")]
        out: String,

        /// Report whether regeneration would change the artifact, write nothing
        #[arg(long)]
        check: bool,

        /// Rewrite even when the semantic content is unchanged
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check template metadata completeness and registry drift
    TemplateCheck {
        /// Template directory
        #[arg(long)]
        templates: String,

        /// Registry artifact to check for drift
        #[arg(long)]
        registry: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report implementations that are stale against their specifications
    Staleness {
        /// Repository root to scan
        #[arg(default_value = ".")]
        root: String,

        /// Also list up-to-date implementations
        #[arg(long, short)]
        verbose: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Converge spec filenames to the descriptive convention (dry-run by default)
    Rename {
        /// Spec directory
        path: String,

        /// Perform the renames instead of previewing them
        #[arg(long)]
        apply: bool,

        /// Don't recurse into subdirectories
        #[arg(long)]
        no_recursive: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
