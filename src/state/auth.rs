//! Session state machine for the current client user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host application builds one [`SessionContext`], calls
//! [`SessionContext::restore`] at startup, and routes every login, signup
//! and logout through it. Navigation is delegated to the host's
//! [`Navigator`].
//!
//! STATES
//! ======
//! `Unauthenticated -> Authenticating -> Authenticated(user)` on login;
//! any failure while authenticating falls back to `Unauthenticated` with no
//! token kept. Logout always ends `Unauthenticated`, even when the server
//! call fails.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::forms::validation::{self, SignupForm};
use crate::forms::{FormErrors, SubmitError};
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, SignupRequest, User, UserUpdate};
use crate::state::token_store::TokenStore;

/// Navigation targets the session can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Login entry point.
    Login,
    /// Protected area shown after login.
    Dashboard,
    Home,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Dashboard => "/dashboard",
            Self::Home => "/",
        }
    }
}

/// Host-provided navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Authentication phase of the session.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(User),
}

/// Orchestrates login, logout and current-user sequencing.
#[derive(Clone)]
pub struct SessionContext {
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
    phase: Arc<RwLock<AuthPhase>>,
}

impl SessionContext {
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator, phase: Arc::new(RwLock::new(AuthPhase::Unauthenticated)) }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn tokens(&self) -> &TokenStore {
        self.api.dispatcher().tokens()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.phase.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_phase(&self, phase: AuthPhase) {
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Token presence; no expiry check.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_present()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        match self.phase() {
            AuthPhase::Authenticated(user) => Some(user),
            AuthPhase::Unauthenticated | AuthPhase::Authenticating => None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    /// Reconstruct the session from a persisted token, if there is one.
    ///
    /// Issues no request when no token is present. A failed fetch clears the
    /// token and leaves the session unauthenticated.
    pub async fn restore(&self) -> AuthPhase {
        if !self.tokens().is_present() {
            self.set_phase(AuthPhase::Unauthenticated);
            return AuthPhase::Unauthenticated;
        }

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "restored session from persisted token");
                self.set_phase(AuthPhase::Authenticated(user));
            }
            Err(e) => {
                tracing::info!(error = %e, "persisted token rejected; starting signed out");
                self.tokens().clear();
                self.set_phase(AuthPhase::Unauthenticated);
            }
        }
        self.phase()
    }

    /// Exchange credentials for a token, then fetch the current user.
    ///
    /// On success the token is kept, the session is `Authenticated` and the
    /// navigator is sent to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the failing call's [`ApiError`]. The session is left
    /// `Unauthenticated` and any token obtained during the attempt is cleared.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.set_phase(AuthPhase::Authenticating);
        let attempt = self.api.dispatcher().begin_login();
        let outcome = self.exchange_and_fetch(credentials).await;
        drop(attempt);

        match outcome {
            Ok(user) => {
                tracing::info!(user_id = user.id, "login succeeded");
                self.set_phase(AuthPhase::Authenticated(user.clone()));
                self.navigator.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                self.tokens().clear();
                self.set_phase(AuthPhase::Unauthenticated);
                Err(e)
            }
        }
    }

    async fn exchange_and_fetch(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let token = self.api.login(credentials).await?;
        let Some(access_token) = token.access_token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(ApiError::Decode { message: "login response carried no access token".to_owned() });
        };
        self.tokens().set(Some(access_token));
        self.api.current_user().await
    }

    /// Validate a signup form locally, create the account, then log in.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] when local validation fails (nothing is
    /// sent), otherwise [`SubmitError::Api`] with the failing call's error.
    pub async fn signup(&self, form: &SignupForm) -> Result<User, SubmitError> {
        let errors = validation::validate_signup(form);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let email = form.email.trim().to_lowercase();
        let request = SignupRequest {
            email: email.clone(),
            full_name: form.full_name.trim().to_owned(),
            password: form.password.clone(),
        };
        self.api.signup(&request).await?;
        tracing::info!("account created; logging in");

        let user = self.login(&Credentials::new(email, form.password.clone())).await?;
        Ok(user)
    }

    /// Update the signed-in user's own record and refresh the cached copy.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; the cached user is unchanged.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let user = self.api.update_current_user(update).await?;
        if matches!(self.phase(), AuthPhase::Authenticated(_)) {
            self.set_phase(AuthPhase::Authenticated(user.clone()));
        }
        Ok(user)
    }

    /// End the session: best-effort server logout, then local teardown.
    ///
    /// The token is cleared and the navigator sent to the login page whether
    /// or not the server call succeeds.
    ///
    /// # Errors
    ///
    /// Returns the server call's [`ApiError`] after local state has already
    /// been cleared, so the caller can report it.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let outcome = if self.tokens().is_present() {
            let _teardown = self.api.dispatcher().begin_logout();
            self.api.logout().await.map(|_| ())
        } else {
            Ok(())
        };
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
        }

        self.tokens().clear();
        self.set_phase(AuthPhase::Unauthenticated);
        self.navigator.navigate(Route::Login);
        tracing::info!("logged out");
        outcome
    }

    /// Ensure the session belongs to a privileged user.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] with a banner describing why access is denied.
    pub fn require_admin(&self) -> Result<User, FormErrors> {
        match self.current_user() {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(FormErrors::banner("Administrator access required")),
            None => Err(FormErrors::banner("Please log in to continue")),
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").field("phase", &self.phase()).finish_non_exhaustive()
    }
}
