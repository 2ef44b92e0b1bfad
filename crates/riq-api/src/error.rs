//! Error types for blacklist API calls.

use thiserror::Error;

/// Result alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the blacklist API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured server and version did not form a valid base URL.
    #[error("invalid API base URL '{value}'")]
    InvalidBaseUrl {
        /// Candidate URL assembled from the server and version.
        value: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// A default header value contained characters HTTP does not allow.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    HttpClient {
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The requested time window does not fit the calendar range.
    #[error("time window of {days} days is out of range")]
    WindowOutOfRange {
        /// Window length requested by the caller.
        days: u32,
    },
    /// The request could not be sent or the response body could not be read.
    #[error("request to {endpoint} failed")]
    Request {
        /// Endpoint path relative to the API base URL.
        endpoint: &'static str,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The API answered with a non-success status code.
    #[error("request to {endpoint} returned status {status}{}", body_suffix(.body))]
    Status {
        /// Endpoint path relative to the API base URL.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },
    /// The response body was not valid JSON.
    #[error("failed to decode response from {endpoint}")]
    Decode {
        /// Endpoint path relative to the API base URL.
        endpoint: &'static str,
        /// Source serde error.
        source: serde_json::Error,
    },
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}
