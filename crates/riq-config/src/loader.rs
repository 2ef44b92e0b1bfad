//! File and environment backed API configuration.
//!
//! # Design
//! - Values merge in order: defaults, then the JSON config file, then environment overrides.
//! - A missing config file is not an error; missing credentials after the merge are.
//! - Environment access goes through a lookup function so callers and tests choose the source.

use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::defaults::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_SERVER, DEFAULT_API_VERSION,
    ENV_API_PRIVATE_KEY, ENV_API_SERVER, ENV_API_TOKEN, ENV_API_VERSION, ENV_CONFIG_PATH,
};
use crate::error::{ConfigError, ConfigResult};

/// Credentials and endpoint settings for the blacklist API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API token.
    pub api_token: String,
    /// API private key paired with the token.
    pub api_private_key: String,
    /// API server host (or origin).
    pub api_server: String,
    /// API version path segment.
    pub api_version: String,
}

impl Debug for ApiConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("api_token", &self.api_token)
            .field("api_private_key", &"<redacted>")
            .field("api_server", &self.api_server)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_token: Option<String>,
    #[serde(default)]
    api_private_key: Option<String>,
    #[serde(default)]
    api_server: Option<String>,
    #[serde(default)]
    api_version: Option<String>,
}

impl ApiConfig {
    /// Load configuration from the default file location and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file exists but cannot be read or
    /// parsed, or when the token or private key is missing.
    pub fn load() -> ConfigResult<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = env(ENV_CONFIG_PATH)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_config_path);
        Self::from_sources(path.as_deref(), env)
    }

    /// Merge an optional config file with values returned by `env`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiConfig::load`].
    pub fn from_sources<F>(path: Option<&Path>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };

        let pick = |file_value: Option<String>, key: &str| {
            non_empty(env(key)).or_else(|| non_empty(file_value))
        };

        let api_token = pick(file.api_token, ENV_API_TOKEN).ok_or(ConfigError::MissingField {
            field: "api_token",
            env: ENV_API_TOKEN,
        })?;
        let api_private_key =
            pick(file.api_private_key, ENV_API_PRIVATE_KEY).ok_or(ConfigError::MissingField {
                field: "api_private_key",
                env: ENV_API_PRIVATE_KEY,
            })?;
        let api_server = pick(file.api_server, ENV_API_SERVER)
            .unwrap_or_else(|| DEFAULT_API_SERVER.to_string());
        let api_version = pick(file.api_version, ENV_API_VERSION)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self {
            api_token,
            api_private_key,
            api_server,
            api_version,
        })
    }
}

/// Platform default location of the config file, when a config directory exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn read_config_file(path: &Path) -> ConfigResult<ConfigFile> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found; using environment only");
            return Ok(ConfigFile::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    debug!(path = %path.display(), "loaded config file");
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
