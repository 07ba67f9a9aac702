//! Configuration management for swagcheck.
//!
//! Configuration is plain YAML. Two layers are merged, later overriding
//! earlier field by field:
//! 1. Global config (`<config dir>/swagcheck/config.yaml`)
//! 2. Project config (`.swagcheck.yaml`, or the file given with `--config`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::check::CheckOptions;
use crate::paths::PROJECT_CONFIG;
use crate::refs::RemoteRefPolicy;

pub mod defaults;
pub mod validation;

pub use defaults::*;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Glob patterns of files checked when no paths are given
    #[serde(default)]
    pub specs: Vec<String>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default = "defaults::default_max_errors")]
    pub max_errors: usize,
}

impl Default for Config {
    fn default() -> Self {
        PartialConfig::default().merge_with(PartialConfig::default())
    }
}

impl Config {
    /// Load the global config merged with `.swagcheck.yaml` in the current
    /// directory. Either file may be absent.
    pub fn load() -> Result<Self> {
        Self::load_merged_from(global_config_path().as_deref(), Some(Path::new(PROJECT_CONFIG)))
    }

    /// Load the global config merged with an explicitly named project config,
    /// which must exist.
    pub fn load_with(project_path: &Path) -> Result<Self> {
        if !project_path.exists() {
            anyhow::bail!("Config file not found: {}", project_path.display());
        }
        Self::load_merged_from(global_config_path().as_deref(), Some(project_path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config = PartialConfig::parse(content)?.merge_with(PartialConfig::default());
        config.validate()?;
        Ok(config)
    }

    /// Load merged configuration from specified global and project paths.
    /// Missing files are skipped.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: Option<&Path>) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = project_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let config = global_config.merge_with(project_config);
        config.validate()?;
        Ok(config)
    }

    /// Options for the validator derived from this configuration.
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            references: self.checks.references,
            rules: self.checks.rules,
            remote_refs: self.checks.remote_refs,
            max_errors: self.max_errors,
        }
    }

    /// Expand the `specs` globs into a sorted, de-duplicated file list.
    pub fn resolve_specs(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for pattern in &self.specs {
            let mut matches = Vec::new();
            for entry in glob::glob(pattern)
                .with_context(|| format!("Invalid glob pattern '{}'", pattern))?
            {
                match entry {
                    Ok(path) if path.is_file() => matches.push(path),
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping {}: {}", e.path().display(), e.error()),
                }
            }

            if matches.is_empty() {
                log::warn!("specs pattern '{}' matched no files", pattern);
            }
            files.extend(matches);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Returns the path to the global config file, e.g. `~/.config/swagcheck/config.yaml`
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("swagcheck").join("config.yaml"))
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub specs: Option<Vec<String>>,
    pub format: Option<OutputFormat>,
    pub checks: Option<PartialChecksConfig>,
    pub max_errors: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialChecksConfig {
    pub references: Option<bool>,
    pub rules: Option<bool>,
    pub remote_refs: Option<RemoteRefPolicy>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid, empty configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_checks = self.checks.unwrap_or_default();
        let project_checks = project.checks.unwrap_or_default();

        Config {
            specs: project.specs.or(self.specs).unwrap_or_default(),
            format: project.format.or(self.format).unwrap_or_default(),
            checks: ChecksConfig {
                references: project_checks
                    .references
                    .or(global_checks.references)
                    .unwrap_or_else(defaults::default_true),
                rules: project_checks
                    .rules
                    .or(global_checks.rules)
                    .unwrap_or_else(defaults::default_true),
                remote_refs: project_checks
                    .remote_refs
                    .or(global_checks.remote_refs)
                    .unwrap_or_default(),
            },
            max_errors: project
                .max_errors
                .or(self.max_errors)
                .unwrap_or_else(defaults::default_max_errors),
        }
    }
}

#[cfg(test)]
mod tests;
