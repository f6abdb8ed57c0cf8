//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("could not determine a state directory; set USERGATE_STATE_DIR")]
    MissingStateDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Name of the persisted token entry.
    pub token_key: String,
    /// Directory holding persisted client state.
    pub state_dir: PathBuf,
    pub timeouts: ClientTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `USERGATE_API_URL`: default `http://127.0.0.1:8000`
    /// - `USERGATE_TOKEN_KEY`: default `accessToken`
    /// - `USERGATE_STATE_DIR`: default is the platform data directory
    /// - `USERGATE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `USERGATE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error for a non-HTTP base URL, a non-numeric timeout, or
    /// when no state directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("USERGATE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = normalize_base_url(&api_url)?;

        let token_key = lookup("USERGATE_TOKEN_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_owned());

        let state_dir = match lookup("USERGATE_STATE_DIR").filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir().ok_or(ConfigError::MissingStateDir)?,
        };

        let timeouts = ClientTimeouts {
            request_secs: parse_u64(&lookup, "USERGATE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "USERGATE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_url, token_key, state_dir, timeouts })
    }

    /// Replace the base URL, applying the same normalization as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-HTTP URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_base_url(api_url)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_u64<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

fn default_state_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "usergate").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
