//! Unauthenticated token endpoints.
//!
//! This is the anonymous counterpart of `StorefrontClient`: it never
//! attaches a bearer header and never consults the refresh coordinator.
//! The separation matters — if the refresh call itself went through the
//! authenticated pipeline, an expired token would make refresh recurse
//! into refresh.

use async_trait::async_trait;
use bazaar_application::ports::TokenExchange;
use bazaar_domain::{AuthError, Credentials, Registration, RegisterReceipt, TokenPair};
use serde::Serialize;

use super::config::ClientConfig;
use super::error::{ApiError, ApiResult, map_transport_error, rejection_message};

const LOGIN_PATH: &str = "api/token/";
const REFRESH_PATH: &str = "api/token/refresh/";
const REGISTER_PATH: &str = "api/register/";

/// Refresh request body.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Reqwest-backed implementation of the token exchange port.
pub struct HttpTokenExchange {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTokenExchange {
    /// Creates an exchange client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|error| ApiError::Network {
                message: error.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Creates an exchange client over a caller-supplied reqwest client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's validation detail
    /// when registration is rejected.
    pub async fn register(&self, registration: &Registration) -> ApiResult<RegisterReceipt> {
        let url = self.config.endpoint(REGISTER_PATH)?;
        let response = self
            .client
            .post(url)
            .json(registration)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        response.json().await.map_err(map_transport_error)
    }

    /// Posts a JSON body to a token endpoint and parses the new pair,
    /// mapping a non-success status through `reject`.
    async fn exchange_for_pair<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        reject: impl FnOnce(String) -> AuthError + Send,
    ) -> Result<TokenPair, AuthError> {
        let url = self.config.endpoint(path).map_err(|error| AuthError::Network {
            message: error.to_string(),
        })?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| AuthError::Network {
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(reject(rejection_message(&body)));
        }

        response.json().await.map_err(|error| AuthError::Network {
            message: error.to_string(),
        })
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        tracing::debug!(username = %credentials.username, "exchanging credentials for tokens");
        self.exchange_for_pair(LOGIN_PATH, credentials, |message| {
            AuthError::CredentialsRejected { message }
        })
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!("exchanging refresh token");
        let body = RefreshRequest {
            refresh: refresh_token,
        };
        self.exchange_for_pair(REFRESH_PATH, &body, |message| AuthError::RefreshRejected {
            message,
        })
        .await
    }
}

impl std::fmt::Debug for HttpTokenExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTokenExchange")
            .field("base_url", self.config.base_url())
            .finish_non_exhaustive()
    }
}
