//! Error types for the accounts API client.
//!
//! # Design
//! Each failure stage gets its own variant so callers can branch on where a
//! call went wrong: before the network (`InvalidArgument`), on the network
//! (`Transport`), in JSON handling (`Encoding` / `Decoding`), or at the
//! server (`Api`). `ApiError` keeps the status code and server message as
//! separate fields; its `Display` is the only place they are joined.

use std::fmt;

use thiserror::Error;
use ureq::http::StatusCode;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `AccountClient` and the account codec.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an input that can be rejected without a request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An account could not be encoded as JSON.
    #[error("failed to encode account: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The server answered with a status other than the one expected.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn transport(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(cause.into())
    }

    /// HTTP status code, if the server was reached and rejected the call.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status),
            _ => None,
        }
    }
}

/// A response whose status did not match the operation's expected code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// The `error_message` field of the response body, when present.
    pub message: Option<String>,
}

impl ApiError {
    /// Status code followed by its canonical reason, e.g. `409 Conflict`.
    pub fn status_line(&self) -> String {
        match StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
        {
            Some(reason) => format!("{} {reason}", self.status),
            None => self.status.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.status_line()),
            None => write!(f, "{}", self.status_line()),
        }
    }
}

impl std::error::Error for ApiError {}
