pub mod cli;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, ScoutError};

pub use cli::CliArgs;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_OUTPUT_PATH: &str = "property_data.csv";
pub const CRM_TOKEN_ENV: &str = "REMINE_CRM_TOKEN";

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_wait_timeout_secs() -> u64 {
    15
}

fn default_settle_delay_secs() -> u64 {
    3
}

/// CRM endpoint that receives the assembled record
#[derive(Debug, Clone, Deserialize)]
pub struct CrmConfig {
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
}

/// Contents of `config.json`. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub login_url: String,
    /// Remine search page URL
    #[serde(default)]
    pub remine_search: String,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
    #[serde(default)]
    pub headless: bool,
    #[serde(default)]
    pub crm: Option<CrmConfig>,
}

impl Config {
    /// Read and validate the config file. A CRM token in the environment
    /// takes precedence over the one in the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|source| ScoutError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&raw)?;

        if let Ok(token) = std::env::var(CRM_TOKEN_ENV) {
            if let Some(crm) = config.crm.as_mut() {
                crm.token = token;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("login_url", &self.login_url),
            ("remine_search", &self.remine_search),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ScoutError::MissingField { field });
            }
        }

        if self.wait_timeout_secs == 0 {
            return Err(ScoutError::config("wait_timeout_secs must be at least 1"));
        }

        if let Some(crm) = &self.crm {
            if crm.endpoint.trim().is_empty() {
                return Err(ScoutError::config("crm.endpoint cannot be empty"));
            }
            if crm.token.trim().is_empty() {
                return Err(ScoutError::config(format!(
                    "crm.token is empty; set it in the config file or {}",
                    CRM_TOKEN_ENV
                )));
            }
        }

        Ok(())
    }

    /// Apply command line overrides.
    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(output) = &args.output {
            self.output_path = output.clone();
        }
        if args.headless {
            self.headless = true;
        }
        if args.no_forward {
            self.crm = None;
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}
