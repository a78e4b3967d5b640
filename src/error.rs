//! Error handling for the DrinkRate client

use reqwest::StatusCode;
use thiserror::Error;

/// Number of characters of a raw payload kept in [`Error::Decode`].
const DECODE_PREFIX_LEN: usize = 120;

/// Unified error type for the DrinkRate client
///
/// Nothing here is fatal: every failure is recoverable by retrying the user
/// action. [`Error::Validation`] and [`Error::AuthRequired`] are raised before
/// any network call is issued and never touch the cache.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure: unreachable host, connection reset, timeout
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("HTTP error: status {0}")]
    Http(StatusCode),

    /// Response body was not valid JSON. Carries a bounded prefix of the raw
    /// payload, typically markup from a misconfigured gateway.
    #[error("expected JSON, got: {0}")]
    Decode(String),

    /// Payload rejected locally before any network call
    #[error("validation error: {0}")]
    Validation(&'static str),

    /// A review replace deleted the old record and then failed to save the
    /// new one. The previous content is gone on the remote side and the new
    /// content was never persisted. Never retried automatically; the caller
    /// should prompt the user to re-enter the lost content.
    #[error("review replace interrupted: previous review deleted, new one not saved")]
    PartialUpsert(#[source] Box<Error>),

    /// Owner-scoped operation attempted without a signed-in session
    #[error("authentication required")]
    AuthRequired,

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a `Decode` error from a raw response body, keeping a bounded prefix
    pub fn decode(raw: &str) -> Self {
        let mut prefix: String = raw.chars().take(DECODE_PREFIX_LEN).collect();
        if raw.chars().count() > DECODE_PREFIX_LEN {
            prefix.push_str("...");
        }
        Error::Decode(prefix)
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
