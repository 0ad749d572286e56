use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file the course book is kept in.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Start from sample persons when there is no data file yet.
    #[serde(default = "default_true")]
    pub load_sample_data: bool,
    /// Preferred output mode: `pretty`, `text` or `json`.
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            load_sample_data: default_true(),
            output: None,
        }
    }
}

/// `<config dir>/coursebook/config.toml`, when the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("coursebook").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// and a missing file yields [`Config::default`].
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => {
            let Some(default) = default_config_path().filter(|p| p.exists()) else {
                debug!("no config file, using defaults");
                return Ok(Config::default());
            };
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("coursebook.json")
}

const fn default_true() -> bool {
    true
}
