//! Wire DTOs for the account backend.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON exactly (`full_name`,
//! `is_superuser`) so serde needs no renames. Optional request fields are
//! skipped when absent so partial updates only touch what the caller set.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A user record as returned by `/users` endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned numeric identifier.
    pub id: i64,
    pub email: String,
    /// Display name, if the user provided one.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Privileged (administrative) capability.
    #[serde(default)]
    pub is_superuser: bool,
    /// Server creation timestamp, passed through verbatim.
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Whether the user may access admin-only operations.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_superuser
    }

    /// Name to show in listings: full name when set, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Email/password pair submitted to `/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Form fields in the OAuth2 password-flow shape the backend expects.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_owned(), self.email.clone()),
            ("password".to_owned(), self.password.clone()),
        ]
    }
}

/// Successful `/auth/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Absent or empty when the backend declined to issue a token.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `POST /auth/signup`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Partial user update for `PUT /users/{id}` and `PUT /users/me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdate {
    /// True when no field would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.is_active.is_none() && self.password.is_none()
    }
}

/// Generic `{ "message": ... }` acknowledgement used by logout and the
/// password endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
