//! Error types for rate acquisition, conversion and persistence.

use thiserror::Error;

/// Failure to obtain a fresh rate table from the upstream source.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("API key not found: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Request error: {0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("Failed to parse rate response: {0}")]
    Decode(String),

    #[error("API error: {0}")]
    Upstream(String),

    #[error("Rate response is missing requested symbols: {}", .0.join(","))]
    MissingSymbols(Vec<String>),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Errors surfaced by [`crate::service::ExchangeRateService`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Exchange rate not found for {0}")]
    RateNotFound(String),
}

impl RateError {
    /// True when the fetch could not be attempted because no credential is configured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RateError::Fetch(FetchError::MissingCredential(_)))
    }
}

/// Read/write failure against a [`crate::core::cache::KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<fjall::Error> for StoreError {
    fn from(err: fjall::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}
