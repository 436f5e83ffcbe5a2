//! Configuration for the console gateway client.

use crate::error::{ConsoleError, Result};

/// Environment variable for the service base URL.
pub const BASE_URL_ENV: &str = "COSIGN_API_BASE_URL";
/// Environment variable for the per-request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "COSIGN_REQUEST_TIMEOUT_MS";

/// Configuration for the console gateway client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto.
    pub base_url: String,
    /// Overall request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Log each request and response at debug level.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 30000,
            user_agent: concat!("cosign-console/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `COSIGN_API_BASE_URL` and `COSIGN_REQUEST_TIMEOUT_MS`.
    /// An unparsable timeout keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        if let Some(ms) = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            config.request_timeout_ms = ms;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Absolute URL for `path` plus `query`.
    ///
    /// `path` is appended to whatever path the base URL carries, so a base of
    /// `http://host/cosign` sends `/api/login` to `http://host/cosign/api/login`.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| ConsoleError::Config(format!("invalid base URL {}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ConsoleError::Config(format!(
                "base URL {} cannot carry a path",
                self.base_url
            )));
        }

        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}
