use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ConfigError;
use super::checker_config::FileConfig;
use crate::checker::{CheckerConfig, DEFAULT_USER_AGENT};
use crate::http_probe::tls::EMBEDDED_CA_PEM;

const CONFIG_FILE_VAR: &str = "CONFIG_FILE";
const TIMEOUT_VAR: &str = "CHECK_TIMEOUT_SECONDS";
const USER_AGENT_VAR: &str = "CHECK_USER_AGENT";
const DEFAULT_CONFIG_FILE: &str = "config.yml";

pub struct AppConfig {
    pub config: FileConfig,
    pub config_file: Option<PathBuf>,
}

fn read_file_config(path: &Path, required: bool) -> Result<Option<FileConfig>, ConfigError> {
    if !path.exists() {
        if required {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        log::debug!("No configuration file at {}, using defaults", path.display());
        return Ok(None);
    }

    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml::from_str(&config_str).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

/// Load the application configuration from a YAML file and environment variables.
///
/// `explicit_path` wins over the `CONFIG_FILE` environment variable, which wins
/// over `config.yml` in the working directory. Only an explicitly named file
/// has to exist. `CHECK_TIMEOUT_SECONDS` and `CHECK_USER_AGENT` override the
/// corresponding file values.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit_path {
        Some(path) => (path.to_path_buf(), true),
        None => match env::var(CONFIG_FILE_VAR) {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        },
    };

    let loaded = read_file_config(&path, required)?;
    let config_file = loaded.is_some().then(|| path.clone());
    let mut config = loaded.unwrap_or_default();

    if let Ok(raw) = env::var(TIMEOUT_VAR) {
        let seconds = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
            name: TIMEOUT_VAR,
            value: raw.clone(),
        })?;
        config.timeout_seconds = Some(seconds);
    }

    if let Ok(user_agent) = env::var(USER_AGENT_VAR) {
        config.user_agent = Some(user_agent);
    }

    if let Some(path) = &config_file {
        log::info!("Using configuration from {}", path.display());
    }

    Ok(AppConfig {
        config,
        config_file,
    })
}

impl AppConfig {
    /// Resolves file references and builds the settings for a checker.
    pub fn checker_config(&self) -> Result<CheckerConfig, ConfigError> {
        let mut trust_anchors = Vec::new();
        if self.config.include_embedded_ca {
            trust_anchors.push(EMBEDDED_CA_PEM.as_bytes().to_vec());
        }
        for path in &self.config.trusted_ca_files {
            let pem = std::fs::read(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            log::info!("Trusting additional CA from {}", path.display());
            trust_anchors.push(pem);
        }

        Ok(CheckerConfig {
            trust_anchors,
            timeout: self.config.timeout_seconds.map(Duration::from_secs),
            user_agent: self
                .config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
