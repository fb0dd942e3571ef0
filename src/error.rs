use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::scrapers::selectors::Role;

/// Problems with the scraped label/value sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("scraped field list has odd length {len}; unpaired trailing element {dangling:?}")]
    OddFieldCount { len: usize, dangling: String },

    #[error("header has {labels} columns but data row has {values}")]
    RowLengthMismatch { labels: usize, values: usize },
}

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Config file is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Could not read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("Timed out after {waited:?} waiting for {role}")]
    Timeout { role: Role, waited: Duration },

    #[error("Element not found: {role}")]
    ElementNotFound { role: Role },

    #[error("Browser window {index} is not open")]
    NoSuchWindow { index: usize },

    #[error("Malformed scraped data: {0}")]
    Record(#[from] RecordError),

    #[error(transparent)]
    Browser(#[from] anyhow::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoutError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
