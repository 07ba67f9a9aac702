//! CLI entry point for swagcheck.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    swagcheck::logging::init(cli.verbose);
    swagcheck::ui::configure_colors();
    let quiet = cli.quiet || swagcheck::ui::is_quiet();

    match cli.command {
        Commands::Check {
            paths,
            format,
            no_references,
            no_rules,
            reject_remote_refs,
            max_errors,
            config,
        } => {
            let args = cmd::check::CheckArgs {
                paths,
                format,
                no_references,
                no_rules,
                reject_remote_refs,
                max_errors,
                config,
                quiet,
            };
            if !cmd::check::cmd_check(&args)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Schema { version } => cmd::util::cmd_schema(version),
        Commands::Completion { shell } => cmd::util::cmd_completion(shell),
        Commands::Man { out_dir } => cmd::util::cmd_man(out_dir.as_ref()),
    }
}
