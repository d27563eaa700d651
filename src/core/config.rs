use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_base_url() -> String {
    "https://api.fiscaldata.treasury.gov/services/api/fiscal_service".to_string()
}

fn default_max_connection_attempts() -> u32 {
    3
}

fn default_timeout_between_attempts_in_millis() -> u64 {
    1000
}

fn default_refresh_interval_in_millis() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_request_timeout_in_millis() -> u64 {
    30_000
}

fn default_enable_caching() -> bool {
    true
}

/// Settings for the Treasury fiscal data gateway.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FiscalDataConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_connection_attempts")]
    pub max_connection_attempts: u32,
    #[serde(default = "default_timeout_between_attempts_in_millis")]
    pub timeout_between_attempts_in_millis: u64,
    /// Delay between the end of one scheduled refresh and the start of the next.
    #[serde(default = "default_refresh_interval_in_millis")]
    pub refresh_interval_in_millis: u64,
    #[serde(default = "default_request_timeout_in_millis")]
    pub request_timeout_in_millis: u64,
    #[serde(default = "default_enable_caching")]
    pub enable_caching: bool,
}

impl Default for FiscalDataConfig {
    fn default() -> Self {
        FiscalDataConfig {
            base_url: default_base_url(),
            max_connection_attempts: default_max_connection_attempts(),
            timeout_between_attempts_in_millis: default_timeout_between_attempts_in_millis(),
            refresh_interval_in_millis: default_refresh_interval_in_millis(),
            request_timeout_in_millis: default_request_timeout_in_millis(),
            enable_caching: default_enable_caching(),
        }
    }
}

impl FiscalDataConfig {
    pub fn delay_between_attempts(&self) -> Duration {
        Duration::from_millis(self.timeout_between_attempts_in_millis)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_in_millis)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_in_millis)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub fiscal_data: FiscalDataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("gov", "fiscaldata", "treasury-fx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
