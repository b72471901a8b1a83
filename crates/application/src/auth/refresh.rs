//! Single-flight refresh coordinator.
//!
//! Many requests can discover an expired access token within the same
//! scheduling turn. Refresh tokens are single-use, so letting each of them
//! run its own exchange would invalidate the stored refresh token for
//! everyone but the winner. The coordinator guarantees at most one
//! outstanding exchange: the first caller becomes the leader and performs
//! it, every later caller is queued and resumed with the leader's outcome.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bazaar_domain::{AuthError, TokenPair};
use tokio::sync::oneshot;

use super::TokenStore;
use crate::ports::TokenExchange;

/// Default bound on a single refresh exchange. A hung exchange would
/// otherwise stall every queued waiter indefinitely.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

type Outcome = Result<String, AuthError>;

/// Coordinator state. The mutex is only ever held for a synchronous
/// check-and-set, never across an await point.
#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
}

/// Ensures at most one in-flight token-refresh exchange per session.
pub struct RefreshCoordinator {
    store: TokenStore,
    exchange: Arc<dyn TokenExchange>,
    state: Mutex<RefreshState>,
    exchange_timeout: Duration,
}

impl RefreshCoordinator {
    /// Creates a coordinator over the given store and exchange adapter.
    #[must_use]
    pub fn new(store: TokenStore, exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            store,
            exchange,
            state: Mutex::new(RefreshState::default()),
            exchange_timeout: DEFAULT_EXCHANGE_TIMEOUT,
        }
    }

    /// Overrides the bound on a single exchange call.
    #[must_use]
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Returns a fresh access token, refreshing through the backend if
    /// necessary.
    ///
    /// If an exchange is already in flight, this call suspends until that
    /// exchange settles and shares its outcome; it never starts a second
    /// exchange. Waiters are settled in arrival order by the one settle
    /// event.
    ///
    /// # Errors
    ///
    /// Returns the exchange's error. On failure the stored pair has been
    /// cleared, so the session is terminally unauthenticated until the
    /// next login.
    pub async fn acquire_fresh_token(&self) -> Outcome {
        let waiter = {
            let mut state = self.lock_state();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            tracing::debug!("refresh already in flight, queuing as waiter");
            return match rx.await {
                Ok(outcome) => outcome,
                // The leader can only drop the sender if it was cancelled
                // mid-exchange; surface that as a failed refresh.
                Err(_) => Err(AuthError::Network {
                    message: "refresh exchange was cancelled".to_string(),
                }),
            };
        }

        let outcome = self.run_exchange().await;

        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        tracing::debug!(waiters = waiters.len(), "settling refresh waiters");
        for tx in waiters {
            // A waiter that gave up waiting is allowed to be gone.
            let _ = tx.send(outcome.clone());
        }

        outcome
    }

    /// Performs the actual exchange: read the refresh token, call the
    /// backend under a timeout, persist the new pair or clear on failure.
    async fn run_exchange(&self) -> Outcome {
        let pair = match self.store.get().await {
            Ok(Some(pair)) => pair,
            Ok(None) => return Err(AuthError::MissingRefreshToken),
            Err(error) => return Err(error),
        };

        let seconds = self.exchange_timeout.as_secs();
        let exchanged =
            match tokio::time::timeout(self.exchange_timeout, self.exchange.refresh(&pair.refresh))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(AuthError::Timeout { seconds }),
            };

        match exchanged {
            Ok(new_pair) => {
                self.store.set(&new_pair).await?;
                tracing::info!("token refresh succeeded");
                Ok(new_pair.access)
            }
            Err(error) => {
                tracing::warn!(%error, "token refresh failed, clearing stored tokens");
                if let Err(clear_error) = self.store.clear().await {
                    tracing::warn!(%clear_error, "could not clear tokens after failed refresh");
                }
                Err(error)
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("exchange_timeout", &self.exchange_timeout)
            .finish_non_exhaustive()
    }
}
