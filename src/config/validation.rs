//! Validation of loaded configuration values.

use anyhow::Result;

use super::Config;

impl Config {
    /// Validate configuration values that serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.max_errors == 0 {
            anyhow::bail!("max_errors must be greater than 0");
        }

        for pattern in &self.specs {
            if let Err(e) = glob::Pattern::new(pattern) {
                anyhow::bail!("specs entry '{}' is not a valid glob pattern: {}", pattern, e);
            }
        }

        Ok(())
    }
}
