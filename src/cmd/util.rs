//! Utility commands (schema printing, man page generation, completion).

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use swagcheck::schema::meta_schema_source;
use swagcheck::SpecVersion;

use crate::cli::Cli;

/// Print the bundled meta-schema for a version
pub fn cmd_schema(version: SpecVersion) -> Result<()> {
    println!("{}", meta_schema_source(version).trim_end());
    Ok(())
}

/// Generate man page
pub fn cmd_man(out_dir: Option<&PathBuf>) -> Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    let output_dir = out_dir.cloned().unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&output_dir)?;
    let man_path = output_dir.join("swagcheck.1");
    std::fs::write(&man_path, buffer)?;

    println!("Man page written to: {}", man_path.display());
    Ok(())
}

/// Generate shell completion script
pub fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "swagcheck", &mut io::stdout());
    Ok(())
}
