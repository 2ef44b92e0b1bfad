//! Default values and environment keys for API configuration.

/// Server used when neither the file nor the environment names one.
pub const DEFAULT_API_SERVER: &str = "ws.riskiq.net";
/// API version used when neither the file nor the environment names one.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Directory under the platform config directory holding the config file.
pub const CONFIG_DIR_NAME: &str = "riskiq";
/// Config file name.
pub const CONFIG_FILE_NAME: &str = "api_config.json";

/// Overrides the config file location.
pub const ENV_CONFIG_PATH: &str = "RIQ_CONFIG";
/// Overrides `api_token`.
pub const ENV_API_TOKEN: &str = "RIQ_API_TOKEN";
/// Overrides `api_private_key`.
pub const ENV_API_PRIVATE_KEY: &str = "RIQ_API_PRIVATE_KEY";
/// Overrides `api_server`.
pub const ENV_API_SERVER: &str = "RIQ_API_SERVER";
/// Overrides `api_version`.
pub const ENV_API_VERSION: &str = "RIQ_API_VERSION";
