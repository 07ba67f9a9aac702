//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::check::DEFAULT_MAX_ERRORS;
use crate::refs::RemoteRefPolicy;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

default_fn!(default_true, bool, true);
default_fn!(default_max_errors, usize, DEFAULT_MAX_ERRORS);

/// How check results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable lines
    #[default]
    Text,
    /// One JSON document with every report
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected text or json)",
                other
            )),
        }
    }
}

/// Toggles for the stages after meta-schema validation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChecksConfig {
    /// Resolve every `$ref` (default: true)
    #[serde(default = "default_true")]
    pub references: bool,
    /// Apply semantic rules (default: true)
    #[serde(default = "default_true")]
    pub rules: bool,
    /// Handling of remote references (default: skip)
    #[serde(default)]
    pub remote_refs: RemoteRefPolicy,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            references: default_true(),
            rules: default_true(),
            remote_refs: RemoteRefPolicy::default(),
        }
    }
}
