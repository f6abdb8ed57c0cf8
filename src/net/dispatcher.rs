//! Request dispatcher: bearer attachment and response normalization.
//!
//! ARCHITECTURE
//! ============
//! Every API call goes through [`Dispatcher::send`]. Before the call the
//! current token (if any) is attached; after it, 2xx bodies are unwrapped
//! to the payload and everything else becomes an [`ApiError`].
//!
//! SESSION EXPIRY
//! ==============
//! A 401 always clears the token store. The session-expired hook fires only
//! when no login or logout is in flight and no token remains. A failed login
//! submission is reported to its caller instead of redirecting, and a logout
//! does its own navigation.

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod dispatcher_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::transport::{ApiRequest, Transport};
use crate::state::token_store::TokenStore;

type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Shared dispatcher handle. Clones share transport, token store, login
/// flag and hook.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    login_in_progress: Arc<AtomicBool>,
    logout_in_progress: Arc<AtomicBool>,
    on_session_expired: Arc<RwLock<Option<SessionExpiredHook>>>,
}

/// Marks a login or logout as in flight until dropped.
#[must_use = "the in-flight flag is cleared as soon as the guard is dropped"]
pub struct SessionTransition {
    flag: Arc<AtomicBool>,
}

impl Drop for SessionTransition {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore) -> Self {
        Self {
            transport,
            tokens,
            login_in_progress: Arc::new(AtomicBool::new(false)),
            logout_in_progress: Arc::new(AtomicBool::new(false)),
            on_session_expired: Arc::new(RwLock::new(None)),
        }
    }

    /// Register the callback fired when a 401 ends the session outside of a
    /// login attempt. Replaces any previous hook.
    pub fn on_session_expired<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self.on_session_expired.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(hook));
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Flag a login attempt as in flight for the lifetime of the guard.
    pub fn begin_login(&self) -> SessionTransition {
        self.login_in_progress.store(true, Ordering::SeqCst);
        SessionTransition { flag: Arc::clone(&self.login_in_progress) }
    }

    /// Flag a logout as in flight. A 401 on the logout call then clears the
    /// token without firing the hook.
    pub fn begin_logout(&self) -> SessionTransition {
        self.logout_in_progress.store(true, Ordering::SeqCst);
        SessionTransition { flag: Arc::clone(&self.logout_in_progress) }
    }

    #[must_use]
    pub fn login_in_progress(&self) -> bool {
        self.login_in_progress.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn logout_in_progress(&self) -> bool {
        self.logout_in_progress.load(Ordering::SeqCst)
    }

    /// Send a request and decode the 2xx payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for transport failures and
    /// non-2xx responses, or [`ApiError::Decode`] when the payload does not
    /// match `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.send_value(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode { message: e.to_string() })
    }

    /// Send a request and return the raw 2xx payload.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::send`].
    pub async fn send_value(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        request.bearer = self.tokens.get();
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, authenticated = request.bearer.is_some(), "dispatching request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed without a response");
            ApiError::transport(e.0)
        })?;

        if response.is_success() {
            return Ok(response.body);
        }

        let status = response.status;
        let error = ApiError::from_response(status, response.body);
        tracing::debug!(%method, %path, status, error = %error, "request rejected");
        if status == 401 {
            self.handle_unauthorized();
        }
        Err(error)
    }

    fn handle_unauthorized(&self) {
        self.tokens.clear();
        if self.login_in_progress() || self.logout_in_progress() || self.tokens.is_present() {
            tracing::debug!("401 during login or logout; leaving redirect to the caller");
            return;
        }
        let hook = self.on_session_expired.read().unwrap_or_else(PoisonError::into_inner).clone();
        tracing::info!("session expired; token cleared");
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tokens", &self.tokens)
            .field("login_in_progress", &self.login_in_progress())
            .field("logout_in_progress", &self.logout_in_progress())
            .finish_non_exhaustive()
    }
}
