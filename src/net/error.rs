//! Normalized API error shape.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaving the dispatcher is one of these variants. The
//! display string is always the human-readable message, so callers can show
//! `err.to_string()` directly; `status()` and `payload()` are there for
//! callers that want to special-case a response.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Fallback when neither the server nor the transport supplied a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Error surfaced by every API call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("{message}")]
    Transport { message: String },

    /// Non-2xx response other than 401 and 422.
    #[error("{detail}")]
    Server { status: u16, detail: String, payload: Value },

    /// 422 request validation failure.
    #[error("{detail}")]
    Validation { detail: String, payload: Value },

    /// 401: the token was rejected (or the login credentials were).
    #[error("{detail}")]
    AuthExpired { detail: String, payload: Value },

    /// A 2xx payload did not match the expected shape.
    #[error("unexpected response payload: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Build the normalized error for a non-2xx response.
    #[must_use]
    pub fn from_response(status: u16, payload: Value) -> Self {
        let detail = server_message(&payload).unwrap_or_else(|| format!("request failed with status {status}"));
        match status {
            401 => Self::AuthExpired { detail, payload },
            422 => Self::Validation { detail, payload },
            _ => Self::Server { status, detail, payload },
        }
    }

    /// Build a transport failure, falling back to a generic message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Transport { message: GENERIC_FAILURE_MESSAGE.to_owned() };
        }
        Self::Transport { message }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Validation { .. } => Some(422),
            Self::AuthExpired { .. } => Some(401),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Raw server payload, when a response was received.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Server { payload, .. } | Self::Validation { payload, .. } | Self::AuthExpired { payload, .. } => {
                Some(payload)
            }
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// The raw `detail` string from the server payload, if it was a string.
    #[must_use]
    pub fn detail_text(&self) -> Option<&str> {
        self.payload()?.get("detail")?.as_str()
    }

    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

/// Extract the human-readable message from a server payload.
///
/// Prefers `detail`, then `message`. A FastAPI validation `detail` is a list
/// of `{loc, msg, type}` objects; their `msg` values are joined.
#[must_use]
pub fn server_message(payload: &Value) -> Option<String> {
    if let Some(detail) = payload.get("detail") {
        match detail {
            Value::String(text) if !text.trim().is_empty() => return Some(text.clone()),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str).or_else(|| item.as_str()))
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }
    payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(ToOwned::to_owned)
}
