//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The config file was not valid JSON for the expected shape.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// A required value was absent from both the file and the environment.
    #[error("missing configuration value `{field}` (set {env} or add it to the config file)")]
    MissingField {
        /// Config file key.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
}
