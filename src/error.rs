//! Error types for the volume API bindings.
//!
//! Nothing in this crate recovers from an error. Transport failures and
//! non-2xx responses come out of [`crate::api::http`]; envelope mismatches
//! come out of response unwrapping. All of them reach the caller unchanged.

use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("underlying HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status}")]
    Api { status: StatusCode, message: String },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing expected key `{key}`")]
    MissingKey { key: String },

    #[error("provided URL wasn't valid: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("no {collection} matching the given filters")]
    NotFound { collection: &'static str },

    #[error("{count} {collection} match the given filters, expected one")]
    NoUniqueMatch {
        collection: &'static str,
        count: usize,
    },
}

impl Error {
    pub(crate) fn missing_key(key: impl Into<String>) -> Self {
        Error::MissingKey { key: key.into() }
    }

    /// HTTP status of a failed request, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}
