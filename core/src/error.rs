//! Error types for the character API client.
//!
//! # Design
//! Two failure kinds come out of a completed round trip: the server answered
//! with a non-2xx status (`Network`) or the body did not decode into the
//! expected envelope (`Decode`). A host that could not complete the round
//! trip at all reports `Transport`. The screen controller collapses all three
//! into the same observable outcome; the distinction lives on in
//! `LoadOutcome::Failed` for the host and tests.

use thiserror::Error;

/// Errors returned by `CharacterClient` and `Transport` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a status outside `200..=299`.
    #[error("HTTP error! status: {status}")]
    Network { status: u16 },

    /// The response body is not a `{"data": [...]}` character envelope.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The host could not complete the round trip (DNS, connect, TLS, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network { status } => Some(*status),
            ApiError::Decode(_) | ApiError::Transport(_) => None,
        }
    }
}
