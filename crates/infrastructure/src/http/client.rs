//! Authenticated request pipeline and typed storefront endpoints.
//!
//! Every outbound call follows the same path: read the stored access
//! token, refresh proactively through the coordinator when it is expired,
//! attach the bearer header, and send. If the backend still answers 401,
//! the request refreshes once more and resends exactly once; a second 401
//! is surfaced as an authentication failure.

use std::sync::Arc;

use async_trait::async_trait;
use bazaar_application::auth::{RefreshCoordinator, TokenStore};
use bazaar_application::ports::{IdentityError, IdentitySource};
use bazaar_domain::{
    Comment, CommentUpdate, Favorite, FavoriteDetail, FavoriteToggle, NewComment, Page, Product,
    ProductSummary, User, is_expired,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::config::ClientConfig;
use super::error::{ApiError, ApiResult, map_transport_error, rejection_message};

const PRODUCTS_PATH: &str = "api/products/";
const FAVORITES_PATH: &str = "api/favorites/";
const MY_FAVORITES_PATH: &str = "api/favorites/my_favorites/";
const COMMENTS_PATH: &str = "api/comments/";
const CURRENT_USER_PATH: &str = "api/users/me/";

/// Reqwest-backed storefront client with the authenticated pipeline.
pub struct StorefrontClient {
    client: reqwest::Client,
    config: ClientConfig,
    store: TokenStore,
    coordinator: Arc<RefreshCoordinator>,
}

impl StorefrontClient {
    /// Creates a client from the given configuration and auth collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        store: TokenStore,
        coordinator: Arc<RefreshCoordinator>,
    ) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|error| ApiError::Network {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            config,
            store,
            coordinator,
        })
    }

    /// Creates a client over a caller-supplied reqwest client.
    #[must_use]
    pub const fn with_client(
        client: reqwest::Client,
        config: ClientConfig,
        store: TokenStore,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            client,
            config,
            store,
            coordinator,
        }
    }

    // --- pipeline ---

    /// Resolves the bearer token for an outbound request.
    ///
    /// No stored pair means the request proceeds anonymously — the
    /// endpoint decides whether that is acceptable. An expired access
    /// token is refreshed through the coordinator before the request is
    /// allowed out; a failed refresh aborts the request entirely.
    async fn bearer_for_request(&self) -> ApiResult<Option<String>> {
        let Some(pair) = self.store.get().await? else {
            return Ok(None);
        };
        if is_expired(&pair.access) {
            tracing::debug!("access token expired, refreshing before request");
            let fresh = self.coordinator.acquire_fresh_token().await?;
            return Ok(Some(fresh));
        }
        Ok(Some(pair.access))
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> ApiResult<reqwest::Response> {
        let mut builder = self.client.request(method, url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.map_err(map_transport_error)
    }

    /// Sends a request through the full pipeline, including the one-shot
    /// reactive 401 retry.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<reqwest::Response> {
        let url = self.config.endpoint(path)?;
        let bearer = self.bearer_for_request().await?;
        let anonymous = bearer.is_none();

        let response = self
            .send_once(method.clone(), url.clone(), body.as_ref(), bearer.as_deref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if anonymous {
            // Nothing to refresh; the endpoint simply requires identity.
            return Err(ApiError::Unauthenticated);
        }

        tracing::debug!(%url, "401 with a believed-valid token, refreshing and retrying once");
        let fresh = self.coordinator.acquire_fresh_token().await?;
        let retried = self
            .send_once(method, url, body.as_ref(), Some(&fresh))
            .await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("still unauthorized after refresh retry");
            return Err(ApiError::Unauthenticated);
        }
        Ok(retried)
    }

    /// Checks the status and decodes a JSON body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
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

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> ApiResult<T> {
        let response = self.execute(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// Sends a request and discards the body, expecting a success status.
    async fn expect_success(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<()> {
        let response = self.execute(method, path, body).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        Ok(())
    }

    // --- products ---

    /// Lists products (first page).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_products(&self) -> ApiResult<Page<Product>> {
        self.get_json(PRODUCTS_PATH).await
    }

    /// Fetches one product by id.
    ///
    /// When authenticated, the record includes the caller's favorite flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product is unknown.
    pub async fn get_product(&self, id: u64) -> ApiResult<Product> {
        self.get_json(&format!("{PRODUCTS_PATH}{id}/")).await
    }

    /// Toggles the product-scoped favorite flag for the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn toggle_favorite(&self, product_id: u64) -> ApiResult<FavoriteToggle> {
        let path = format!("{PRODUCTS_PATH}{product_id}/favorite/");
        let response = self.execute(Method::POST, &path, None).await?;
        let status = response.status();
        match status {
            StatusCode::CREATED => Ok(FavoriteToggle::Added),
            StatusCode::NO_CONTENT => Ok(FavoriteToggle::Removed),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: rejection_message(&body),
                })
            }
        }
    }

    // --- favorites ---

    /// Lists the current user's favorite entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn list_favorites(&self) -> ApiResult<Page<Favorite>> {
        self.get_json(FAVORITES_PATH).await
    }

    /// Lists favorites with each one's full product record joined in.
    ///
    /// A favorite whose product lookup fails is kept with `product: None`
    /// so stale entries remain visible (and removable).
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites listing itself fails.
    pub async fn favorites_with_products(&self) -> ApiResult<Page<FavoriteDetail>> {
        let page = self.list_favorites().await?;
        let mut details = Vec::with_capacity(page.results.len());
        for favorite in &page.results {
            let product = match self.get_product(favorite.product).await {
                Ok(product) => Some(product),
                Err(error) => {
                    tracing::warn!(product_id = favorite.product, %error, "favorite product lookup failed");
                    None
                }
            };
            details.push(FavoriteDetail {
                id: favorite.id,
                product_id: favorite.product,
                product,
                created_at: favorite.created_at,
            });
        }
        Ok(Page {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: details,
        })
    }

    /// Adds a product to the current user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn add_favorite(&self, product_id: u64) -> ApiResult<Favorite> {
        self.post_json(FAVORITES_PATH, serde_json::json!({ "product": product_id }))
            .await
    }

    /// Removes a favorite entry by its own id (not the product id).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the entry is unknown.
    pub async fn remove_favorite(&self, favorite_id: u64) -> ApiResult<()> {
        self.expect_success(Method::DELETE, &format!("{FAVORITES_PATH}{favorite_id}/"), None)
            .await
    }

    /// Lists compact product records for the current user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn my_favorite_products(&self) -> ApiResult<Vec<ProductSummary>> {
        self.get_json(MY_FAVORITES_PATH).await
    }

    // --- comments ---

    /// Lists comments for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn product_comments(&self, product_id: u64) -> ApiResult<Page<Comment>> {
        self.get_json(&format!("{COMMENTS_PATH}?product_id={product_id}"))
            .await
    }

    /// Lists the current user's own comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn my_comments(&self) -> ApiResult<Page<Comment>> {
        self.get_json(COMMENTS_PATH).await
    }

    /// Posts a new comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; backend validation errors
    /// come back as `ApiError::Status` with the detail verbatim.
    pub async fn add_comment(&self, comment: &NewComment) -> ApiResult<Comment> {
        let body = serde_json::to_value(comment).map_err(|error| ApiError::Decode {
            message: error.to_string(),
        })?;
        self.post_json(COMMENTS_PATH, body).await
    }

    /// Partially updates one of the current user's comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the comment is not the
    /// caller's own.
    pub async fn update_comment(&self, id: u64, update: &CommentUpdate) -> ApiResult<Comment> {
        let body = serde_json::to_value(update).map_err(|error| ApiError::Decode {
            message: error.to_string(),
        })?;
        let response = self
            .execute(Method::PATCH, &format!("{COMMENTS_PATH}{id}/"), Some(body))
            .await?;
        Self::decode(response).await
    }

    /// Deletes one of the current user's comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the comment is not the
    /// caller's own.
    pub async fn delete_comment(&self, id: u64) -> ApiResult<()> {
        self.expect_success(Method::DELETE, &format!("{COMMENTS_PATH}{id}/"), None)
            .await
    }

    // --- users ---

    /// Fetches the profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is anonymous.
    pub async fn fetch_current_user(&self) -> ApiResult<User> {
        self.get_json(CURRENT_USER_PATH).await
    }
}

#[async_trait]
impl IdentitySource for StorefrontClient {
    async fn current_user(&self) -> Result<User, IdentityError> {
        self.fetch_current_user()
            .await
            .map_err(|error| IdentityError::new(error.to_string()))
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", self.config.base_url())
            .finish_non_exhaustive()
    }
}
