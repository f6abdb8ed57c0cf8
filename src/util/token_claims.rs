//! Unverified JWT payload decoding, for display only.
//!
//! Nothing here checks a signature or expiry, and nothing in the session
//! logic consults it: the backend's 401 stays the only expiry signal.

#[cfg(test)]
#[path = "token_claims_test.rs"]
mod token_claims_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

/// Claims the account backend puts in its access tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims {
    /// Subject (user id), as the backend encoded it.
    pub subject: Option<String>,
    /// Expiry in seconds since the Unix epoch.
    pub expires_at: Option<i64>,
    /// The full decoded payload.
    pub raw: Value,
}

/// Decode the payload segment of a JWT without verifying it.
///
/// Returns `None` for anything that is not a three-segment token with a
/// base64url JSON-object payload.
#[must_use]
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let raw: Value = serde_json::from_slice(&bytes).ok()?;
    if !raw.is_object() {
        return None;
    }

    let subject = match raw.get("sub") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let expires_at = raw.get("exp").and_then(Value::as_i64);
    Some(TokenClaims { subject, expires_at, raw })
}
