//! Typed calls for every backend endpoint.
//!
//! Each method builds one [`ApiRequest`] and hands it to the dispatcher, so
//! bearer attachment and error normalization are identical everywhere.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::json;

use super::dispatcher::Dispatcher;
use super::error::ApiError;
use super::transport::ApiRequest;
use super::types::{Credentials, MessageResponse, SignupRequest, TokenResponse, User, UserUpdate};

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";
pub const USERS_PATH: &str = "/users";
pub const CURRENT_USER_PATH: &str = "/users/me";

fn user_endpoint(user_id: i64) -> String {
    format!("{USERS_PATH}/{user_id}")
}

fn users_list_endpoint(skip: Option<u32>, limit: Option<u32>) -> String {
    let mut params = Vec::new();
    if let Some(skip) = skip {
        params.push(format!("skip={skip}"));
    }
    if let Some(limit) = limit {
        params.push(format!("limit={limit}"));
    }
    if params.is_empty() {
        USERS_PATH.to_owned()
    } else {
        format!("{USERS_PATH}?{}", params.join("&"))
    }
}

/// Typed endpoint client. Cheap to clone; clones share the dispatcher.
#[derive(Clone, Debug)]
pub struct ApiClient {
    dispatcher: Dispatcher,
}

impl ApiClient {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Exchange credentials for a token via `POST /auth/login` (form-encoded).
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; a 401 here means bad credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).form(credentials.form_fields());
        self.dispatcher.send(request).await
    }

    /// Invalidate the server-side session via `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.dispatcher.send(ApiRequest::post(LOGOUT_PATH)).await
    }

    /// Create an account via `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; duplicate emails come back as 400.
    pub async fn signup(&self, request: &SignupRequest) -> Result<User, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode { message: e.to_string() })?;
        self.dispatcher.send(ApiRequest::post(SIGNUP_PATH).json(body)).await
    }

    /// Request a password reset email via `POST /auth/forgot-password`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let request = ApiRequest::post(FORGOT_PASSWORD_PATH).json(json!({ "email": email }));
        self.dispatcher.send(request).await
    }

    /// Set a new password with a reset token via `POST /auth/reset-password`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<MessageResponse, ApiError> {
        let request = ApiRequest::post(RESET_PASSWORD_PATH).json(json!({ "token": token, "password": password }));
        self.dispatcher.send(request).await
    }

    /// List users (privileged) via `GET /users`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; non-admins get 403.
    pub async fn list_users(&self, skip: Option<u32>, limit: Option<u32>) -> Result<Vec<User>, ApiError> {
        self.dispatcher.send(ApiRequest::get(users_list_endpoint(skip, limit))).await
    }

    /// Fetch the signed-in user via `GET /users/me`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.dispatcher.send(ApiRequest::get(CURRENT_USER_PATH)).await
    }

    /// Update the signed-in user via `PUT /users/me`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Decode { message: e.to_string() })?;
        self.dispatcher.send(ApiRequest::put(CURRENT_USER_PATH).json(body)).await
    }

    /// Fetch one user via `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.dispatcher.send(ApiRequest::get(user_endpoint(user_id))).await
    }

    /// Update one user via `PUT /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Decode { message: e.to_string() })?;
        self.dispatcher.send(ApiRequest::put(user_endpoint(user_id)).json(body)).await
    }

    /// Delete one user via `DELETE /users/{id}`, returning the server's
    /// acknowledgement payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn delete_user(&self, user_id: i64) -> Result<serde_json::Value, ApiError> {
        self.dispatcher.send_value(ApiRequest::delete(user_endpoint(user_id))).await
    }
}
