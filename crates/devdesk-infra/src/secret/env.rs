//! Environment variable secret lookup.
//!
//! Unset, empty and non-Unicode variables all count as "not set".

use secrecy::SecretString;
use tracing::debug;

use devdesk_types::error::ConfigError;

/// Load `.env` from the working directory (or a parent) into the process
/// environment. Variables already set are left alone.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env: {e}"),
    }
}

/// Read a secret from the environment variable `var`.
pub fn read_secret(var: &str) -> Option<SecretString> {
    read_secret_with(var, |name| std::env::var(name).ok())
}

/// Like [`read_secret`] with an injectable lookup.
pub fn read_secret_with(
    var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// The API key held in `var`, or [`ConfigError::MissingApiKey`].
pub fn require_api_key(var: &str) -> Result<SecretString, ConfigError> {
    read_secret(var).ok_or_else(|| ConfigError::MissingApiKey(var.to_string()))
}
