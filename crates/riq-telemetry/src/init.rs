//! Subscriber installation and logging configuration.
//!
//! # Design
//! - Single entry point that installs a fmt subscriber (pretty or JSON).
//! - Logs always go to stderr; stdout belongs to command output.
//! - Records the build identifier once so every module reports the same value.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Default filter directive when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Configure and install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`LoggingConfig::level`] when it is set
/// and parses.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive
/// or if a global subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    // First caller wins; later installs keep reporting the original id.
    let build = BUILD_SHA.get_or_init(|| config.build_sha.to_string());

    let filter = build_env_filter(config.level)?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init(),
    };

    installed.map_err(|source| TelemetryError::SubscriberInstall { source })?;
    tracing::debug!(build_sha = %build, "logging initialised");
    Ok(())
}

/// Access the build identifier recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive (e.g., `warn`, `riq_api=debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Build identifier recorded in structured logs.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable log lines.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidLevel {
        level: level.to_string(),
        source,
    })
}
