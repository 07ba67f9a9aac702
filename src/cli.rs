//! CLI argument definitions for swagcheck.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use swagcheck::config::OutputFormat;
use swagcheck::SpecVersion;

#[derive(Parser)]
#[command(name = "swagcheck")]
#[command(version)]
#[command(about = "Validate OpenAPI and Swagger specifications", long_about = None)]
#[command(
    after_help = "EXAMPLES:\n    swagcheck check api/openapi.yaml      Check one specification\n    swagcheck check --format json         Check the files listed in .swagcheck.yaml\n    swagcheck schema 3.0                  Print the bundled OpenAPI 3.0 schema"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging (overridden by SWAGCHECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one or more specification files
    ///
    /// With no paths, the `specs` globs from the configuration are checked.
    /// Exits with status 1 when any file fails.
    Check {
        /// Specification files (YAML or JSON)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Output format: text or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Skip `$ref` resolution
        #[arg(long)]
        no_references: bool,
        /// Skip semantic rules (operation IDs, path parameters, defaults)
        #[arg(long)]
        no_rules: bool,
        /// Report remote references as violations instead of skipping them
        #[arg(long)]
        reject_remote_refs: bool,
        /// Maximum number of schema violations reported per file
        #[arg(long, value_name = "N")]
        max_errors: Option<usize>,
        /// Project config file to use instead of .swagcheck.yaml
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the bundled meta-schema for a specification version
    Schema {
        /// Specification version (2.0, 3.0 or 3.1)
        version: SpecVersion,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate man page
    Man {
        /// Output directory for the man page (default: current directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}
