//! Form validation and API-error-to-form mapping.
//!
//! SYSTEM CONTEXT
//! ==============
//! Forms never reach the backend with input that fails `validation`. When
//! the backend does reject a submission, [`FormErrors::from_api_error`]
//! decides whether the message belongs to a field or to the banner.


pub mod validation;

use std::collections::BTreeMap;

use crate::net::error::ApiError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email already exists";
pub const CHECK_INPUT_MESSAGE: &str = "Please check your input values and try again.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Input fields a message can attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Token,
}

impl Field {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::Token => "token",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-level messages plus an optional banner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<Field, String>,
    pub banner: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn banner(message: impl Into<String>) -> Self {
        Self { fields: BTreeMap::new(), banner: Some(message.into()) }
    }

    /// Record a field message. The first message for a field wins.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.banner.is_none()
    }

    /// Classify a backend rejection of a form submission.
    ///
    /// Email-related 400s (and a login's 401 naming the email) attach to
    /// the email field; 422 gets a generic "check your input" banner;
    /// everything else becomes a banner with the normalized message.
    #[must_use]
    pub fn from_api_error(error: &ApiError) -> Self {
        let message = error.to_string();
        let mut errors = Self::new();

        if message.to_lowercase().contains("email already exists") {
            errors.insert(Field::Email, DUPLICATE_EMAIL_MESSAGE);
            return errors;
        }

        match error.status() {
            Some(400 | 401) if mentions_email(error, &message) => {
                errors.insert(Field::Email, message);
            }
            Some(422) => errors.banner = Some(CHECK_INPUT_MESSAGE.to_owned()),
            _ if message.trim().is_empty() => errors.banner = Some(UNEXPECTED_ERROR_MESSAGE.to_owned()),
            _ => errors.banner = Some(message),
        }
        errors
    }
}

fn mentions_email(error: &ApiError, message: &str) -> bool {
    error.detail_text().unwrap_or(message).to_lowercase().contains("email")
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        if let Some(banner) = &self.banner {
            f.write_str(banner)?;
            first = false;
        }
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of a failed form submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Invalid(FormErrors),
    /// The backend rejected the submission.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Form-level view of the failure.
    #[must_use]
    pub fn form_errors(&self) -> FormErrors {
        match self {
            Self::Invalid(errors) => errors.clone(),
            Self::Api(error) => FormErrors::from_api_error(error),
        }
    }
}
