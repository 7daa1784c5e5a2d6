//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use estuary_core::constants::{
    DEFAULT_PRIMARY_ENDPOINT, DEFAULT_TIMEOUT_SECONDS, DEFAULT_UPLOAD_ENDPOINT, ENV_API_TOKEN,
    ENV_API_URL, ENV_SHUTTLE_URL, ENV_TIMEOUT_SECS,
};
use estuary_core::error::{EstuaryError, Result};

use crate::retry::RetryPolicy;

/// Pinning client configuration.
///
/// Read-only once handed to the client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Primary API host, used for lookups (e.g. "https://api.estuary.tech")
    pub primary_endpoint: String,
    /// Shuttle host, used for uploads and collection writes
    pub upload_endpoint: String,
    /// Bearer token sent with every request
    pub auth_token: String,
    /// Default per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a config from the two endpoints and a token.
    pub fn new(
        primary_endpoint: impl Into<String>,
        upload_endpoint: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            primary_endpoint: primary_endpoint.into(),
            upload_endpoint: upload_endpoint.into(),
            auth_token: auth_token.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry: RetryPolicy::default(),
        }
    }

    /// Creates a config for the public Estuary hosts.
    pub fn with_token(auth_token: impl Into<String>) -> Self {
        Self::new(DEFAULT_PRIMARY_ENDPOINT, DEFAULT_UPLOAD_ENDPOINT, auth_token)
    }

    /// Loads config from the environment (and `.env`, if present).
    ///
    /// Endpoints fall back to the public hosts; the token is required.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_API_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| EstuaryError::ConfigError(format!("{} is not set", ENV_API_TOKEN)))?;

        let mut config = Self::new(
            lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_PRIMARY_ENDPOINT.into()),
            lookup(ENV_SHUTTLE_URL).unwrap_or_else(|| DEFAULT_UPLOAD_ENDPOINT.into()),
            token,
        );

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_seconds = raw.trim().parse().map_err(|_| {
                EstuaryError::ConfigError(format!("{} must be a number, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }

        Ok(config)
    }

    /// Sets the default per-request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checks the config and returns the parsed (primary, upload) endpoints.
    pub(crate) fn validate(&self) -> Result<(Url, Url)> {
        if self.auth_token.trim().is_empty() {
            return Err(EstuaryError::ConfigError("auth token not configured".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(EstuaryError::ConfigError("timeout must be at least one second".into()));
        }
        let primary = parse_endpoint(&self.primary_endpoint)?;
        let upload = parse_endpoint(&self.upload_endpoint)?;
        Ok((primary, upload))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("primary_endpoint", &self.primary_endpoint)
            .field("upload_endpoint", &self.upload_endpoint)
            .field("auth_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry", &self.retry)
            .finish()
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let invalid = |reason: String| EstuaryError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("endpoint must be an absolute URL with a host".into()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("endpoint must not carry a query or fragment".into()));
    }

    Ok(url)
}
