//! Local input rules for the auth forms.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::sync::LazyLock;

use regex::Regex;

use super::{Field, FormErrors};

/// Backend-enforced minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;
/// Characters accepted as the required special character.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Message for the first email rule `email` breaks.
#[must_use]
pub fn email_error(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        Some("Email is required")
    } else if !is_valid_email(email) {
        Some("Email address is invalid")
    } else {
        None
    }
}

#[must_use]
pub fn name_error(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        Some("Full name is required")
    } else if name.chars().count() < MIN_NAME_LEN {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

/// Message for the first strength rule `password` breaks.
#[must_use]
pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("Password is required");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters");
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !(has_lower && has_upper && has_digit && has_special) {
        return Some("Password must include uppercase, lowercase, number, and special character");
    }
    None
}

fn check_confirmation(errors: &mut FormErrors, password: &str, confirm: &str) {
    if errors.get(Field::Password).is_none() && password != confirm {
        errors.insert(Field::ConfirmPassword, "Passwords do not match");
    }
}

#[must_use]
pub fn validate_signup(form: &SignupForm) -> FormErrors {
    let mut errors = FormErrors::new();

    if let Some(message) = name_error(&form.full_name) {
        errors.insert(Field::FullName, message);
    }
    if let Some(message) = email_error(&form.email) {
        errors.insert(Field::Email, message);
    }
    if let Some(message) = password_error(&form.password) {
        errors.insert(Field::Password, message);
    }
    check_confirmation(&mut errors, &form.password, &form.confirm_password);
    errors
}

#[must_use]
pub fn validate_login(form: &LoginForm) -> FormErrors {
    let mut errors = FormErrors::new();
    if let Some(message) = email_error(&form.email) {
        errors.insert(Field::Email, message);
    }
    if form.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    }
    errors
}

#[must_use]
pub fn validate_forgot_password(form: &ForgotPasswordForm) -> FormErrors {
    let mut errors = FormErrors::new();
    if let Some(message) = email_error(&form.email) {
        errors.insert(Field::Email, message);
    }
    errors
}

#[must_use]
pub fn validate_reset_password(form: &ResetPasswordForm) -> FormErrors {
    let mut errors = FormErrors::new();
    if form.token.trim().is_empty() {
        errors.insert(Field::Token, "Reset token is required");
    }
    if let Some(message) = password_error(&form.password) {
        errors.insert(Field::Password, message);
    }
    check_confirmation(&mut errors, &form.password, &form.confirm_password);
    errors
}
