use crate::error::{Result, ResolverError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub crunchbase: CrunchbaseConfig,
}

#[derive(Debug, Deserialize)]
pub struct CrunchbaseConfig {
    /// Milliseconds to wait between identifier lookups.
    pub delay_ms: u64,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crunchbase: CrunchbaseConfig {
                delay_ms: 1000,
                timeout_seconds: 30,
            },
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ResolverError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
