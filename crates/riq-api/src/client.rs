//! Blacklist API client.
//!
//! # Design
//! - `BlacklistApi` is the seam the CLI dispatches through; `Client` is the HTTP implementation.
//! - Every call is a single authenticated `GET`; payloads stay opaque `serde_json::Value`s.
//! - No retries: transport and status failures are returned to the caller as-is.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::query::{BlacklistListQuery, IncidentListQuery, MalwareQuery};

/// Request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const HEADER_REQUEST_ID: &str = "x-request-id";

const ENDPOINT_LOOKUP: &str = "blacklist/lookup";
const ENDPOINT_INCIDENT: &str = "blacklist/incident";
const ENDPOINT_INCIDENT_LIST: &str = "blacklist/incident/list";
const ENDPOINT_LIST: &str = "blacklist/list";
const ENDPOINT_MALWARE: &str = "blacklist/malware";

#[async_trait]
/// Remote blacklist operations consumed by the command-line dispatcher.
pub trait BlacklistApi: Send + Sync {
    /// Query whether a URL is blacklisted.
    async fn get_blacklist_lookup(&self, url: &str) -> ApiResult<Value>;
    /// Fetch the incident recorded for a URL.
    async fn get_blacklist_incident(&self, url: &str) -> ApiResult<Value>;
    /// List incidents within a time window.
    async fn get_blacklist_incident_list(&self, query: &IncidentListQuery) -> ApiResult<Value>;
    /// List blacklisted resources within a time window.
    async fn get_blacklist_list(&self, query: &BlacklistListQuery) -> ApiResult<Value>;
    /// List malware resources discovered within a time window.
    async fn get_blacklist_malware(&self, query: &MalwareQuery) -> ApiResult<Value>;
}

/// Connection settings for [`Client`].
#[derive(Clone)]
pub struct ClientConfig {
    /// API token, sent as the basic-auth user name.
    pub token: String,
    /// API private key, sent as the basic-auth password.
    pub private_key: String,
    /// Host name, or a full origin when it already carries a scheme.
    pub server: String,
    /// API version path segment (for example `v1`).
    pub version: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Identifier attached to every request as `x-request-id`.
    pub request_id: Option<String>,
}

/// HTTP implementation of [`BlacklistApi`].
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    private_key: String,
}

impl Client {
    /// Build a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid, the request id is not a
    /// valid header value, or the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base_url = build_base_url(&config.server, &config.version)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| ApiError::InvalidHeader {
                name: HEADER_REQUEST_ID,
            })?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| ApiError::HttpClient { source })?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
            private_key: config.private_key,
        })
    }

    /// Base URL every endpoint is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(&self, endpoint: &'static str, pairs: &[(&str, String)]) -> ApiResult<Value> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|source| ApiError::InvalidBaseUrl {
                value: format!("{}{endpoint}", self.base_url),
                source,
            })?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }

        debug!(endpoint, params = pairs.len(), "issuing blacklist request");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.token, Some(&self.private_key))
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;
        debug!(endpoint, status = status.as_u16(), bytes = bytes.len(), "received response");

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).trim().to_string(),
            });
        }
        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl BlacklistApi for Client {
    async fn get_blacklist_lookup(&self, url: &str) -> ApiResult<Value> {
        self.get(ENDPOINT_LOOKUP, &[("url", url.to_string())]).await
    }

    async fn get_blacklist_incident(&self, url: &str) -> ApiResult<Value> {
        self.get(ENDPOINT_INCIDENT, &[("url", url.to_string())])
            .await
    }

    async fn get_blacklist_incident_list(&self, query: &IncidentListQuery) -> ApiResult<Value> {
        let pairs = query.query_pairs(now())?;
        self.get(ENDPOINT_INCIDENT_LIST, &pairs).await
    }

    async fn get_blacklist_list(&self, query: &BlacklistListQuery) -> ApiResult<Value> {
        let pairs = query.query_pairs(now())?;
        self.get(ENDPOINT_LIST, &pairs).await
    }

    async fn get_blacklist_malware(&self, query: &MalwareQuery) -> ApiResult<Value> {
        let pairs = query.query_pairs(now())?;
        self.get(ENDPOINT_MALWARE, &pairs).await
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Assemble `https://{server}/{version}/`, keeping an explicit scheme when given.
fn build_base_url(server: &str, version: &str) -> ApiResult<Url> {
    let server = server.trim().trim_end_matches('/');
    let version = version.trim().trim_matches('/');
    let origin = if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{server}")
    };
    let value = if version.is_empty() {
        format!("{origin}/")
    } else {
        format!("{origin}/{version}/")
    };
    value
        .parse::<Url>()
        .map_err(|source| ApiError::InvalidBaseUrl { value, source })
}
