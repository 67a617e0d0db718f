//! The authentication session store.
//!
//! Holds the `anonymous`/`authenticated` state and the bearer token. The `jwt_token` entry
//! in durable storage is the source of truth across process restarts; the in-memory state
//! is computed from it once at construction. State lives in a `watch` channel so consumers
//! can either read the current value or subscribe to transitions; `send_replace` makes each
//! transition a single atomic, synchronous replacement.

use crate::api::Backend;
use crate::error::ApiError;
use crate::storage::{Storage, JWT_TOKEN};
use crate::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// A snapshot of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub token: Option<String>,
}

impl SessionState {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            token: None,
        }
    }
}

/// The session store.
pub struct Session {
    backend: Arc<dyn Backend>,
    storage: Storage,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Computes the initial state from durable storage: a stored token means
    /// `authenticated`, anything else means `anonymous`.
    pub fn new(backend: Arc<dyn Backend>, storage: Storage) -> Self {
        let token = storage.get(JWT_TOKEN);
        let initial = SessionState {
            authenticated: token.is_some(),
            token,
        };
        let (state, _) = watch::channel(initial);
        Self {
            backend,
            storage,
            state,
        }
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Submits form-encoded credentials to the login endpoint.
    ///
    /// On a response carrying a non-empty access token, the token is persisted to durable
    /// storage and the state transitions to `authenticated`. On any failure, including a
    /// 2xx response without a usable token, the error propagates and neither storage nor
    /// state is touched.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self.backend.login(username, password).await?;
        if response.access_token.is_empty() {
            return Err(
                ApiError::decode("login response did not contain an access token").into(),
            );
        }

        // Persist first: a storage failure must not leave an authenticated state whose
        // token would vanish on restart.
        self.storage.set(JWT_TOKEN, &response.access_token)?;
        self.state.send_replace(SessionState {
            authenticated: true,
            token: Some(response.access_token),
        });
        debug!("session authenticated");
        Ok(())
    }

    /// Clears the token from durable storage and transitions to `anonymous`, regardless of
    /// the prior state.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(JWT_TOKEN)?;
        self.state.send_replace(SessionState::anonymous());
        debug!("session cleared");
        Ok(())
    }
}
