//! Shared client wiring, error types, and argument parsers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use chrono::NaiveDateTime;
use riq_api::{Client, ClientConfig, DATETIME_FORMAT};
use riq_config::ApiConfig;
use tracing::debug;

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Both kinds exit with status 1; clap reserves 2 for usage errors.
    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Failure(_) => 1,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Dependencies constructed from configuration and CLI options.
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
}

impl CliDependencies {
    /// Load API configuration and build the HTTP client.
    pub(crate) fn from_env(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let config = ApiConfig::load().map_err(CliError::failure)?;
        debug!(
            server = %config.api_server,
            version = %config.api_version,
            "loaded API configuration"
        );

        let client = Client::new(ClientConfig {
            token: config.api_token,
            private_key: config.api_private_key,
            server: config.api_server,
            version: config.api_version,
            timeout: Duration::from_secs(cli.timeout),
            request_id: Some(trace_id.to_string()),
        })
        .map_err(CliError::failure)?;

        Ok(Self { client })
    }
}

/// Parse a `yyyy-mm-dd HH:MM:SS` datetime argument.
pub(crate) fn parse_datetime(input: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT)
        .map_err(|err| format!("invalid datetime '{input}' (expected yyyy-mm-dd HH:MM:SS): {err}"))
}
