use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use iframist_engine::{scrape_endpoint, ClientSettings};
use serde::{Deserialize, Serialize};

const CONFIG_ENV: &str = "IFRAMIST_CONFIG";
const ENDPOINT_ENV: &str = "IFRAMIST_ENDPOINT";
const LOG_LEVEL_ENV: &str = "IFRAMIST_LOG_LEVEL";
const CONFIG_DIR: &str = "iframist";
const CONFIG_FILENAME: &str = "config.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid endpoint {endpoint:?}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the extraction service; `/scrape` is appended.
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    /// argv of the copy command used when the system clipboard fails.
    pub fallback_command: Option<Vec<String>>,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            endpoint: "https://iframist-backend.onrender.com".to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_response_bytes,
            fallback_command: None,
            log_file: PathBuf::from("./iframist.log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Loads the config file (if any), applies environment overrides and validates.
///
/// Also returns the file that was consulted. Nothing is logged here because
/// logging is configured from the result.
pub fn load() -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    load_with(config_path(), |key| std::env::var(key).ok())
}

fn load_with(
    path: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    let mut config = match &path {
        Some(path) => load_from(path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut config, lookup);
    validate(&config)?;
    Ok((config, path))
}

/// Reads a RON config. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|value| !value.trim().is_empty()) {
        config.endpoint = endpoint;
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
        config.log_level = level;
    }
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    scrape_endpoint(&config.endpoint)
        .map(|_| ())
        .map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            message: err.message,
        })
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}
