//! Client configuration.

use std::time::Duration;

use url::Url;

use super::error::{ApiError, ApiResult};

/// Configuration shared by the anonymous and authenticated HTTP clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the given backend base URL.
    ///
    /// Defaults: 30 second request timeout, `Bazaar/<version>` user agent.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        // Endpoint paths are joined relative to the base, which only works
        // when the base path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            user_agent: concat!("Bazaar/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Parses the base URL from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not an absolute URL.
    pub fn parse(base_url: &str) -> ApiResult<Self> {
        let url = Url::parse(base_url).map_err(|error| ApiError::Url {
            message: error.to_string(),
        })?;
        Ok(Self::new(url))
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The backend base URL (always slash-terminated).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The user agent sent on every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|error| ApiError::Url {
            message: error.to_string(),
        })
    }
}
