use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file at {0} (create one with a [remote] base_url)")]
    NotFound(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    /// Where snapshots are stored (default: the platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the backend, e.g. `https://api.example.com/v1`
    pub base_url: String,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("taskdeck")
        })
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }

    pub fn projects_path(&self) -> PathBuf {
        self.data_dir().join("projects.json")
    }
}

/// The default config location: `<config dir>/taskdeck/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("taskdeck").join("config.toml"))
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}
