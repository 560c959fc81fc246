//! Assistant error types

use thiserror::Error;

/// A record that could not be turned into a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record field `{field}`: {reason}")]
pub struct DecodeError {
    pub field: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "missing")
    }

    pub fn wrong_shape(field: impl Into<String>, expected: &str) -> Self {
        Self::new(field, format!("expected {expected}"))
    }
}

/// Failure of a whole call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network(message.into()),
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            kind: TransportErrorKind::NonSuccessStatus(code),
        }
    }

    pub fn envelope(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::EnvelopeParse(message.into()),
        }
    }
}

/// Error classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportErrorKind {
    /// Connection, TLS or body read failure
    #[error("network error: {0}")]
    Network(String),
    /// Anything other than 200
    #[error("received non-200 status code: {0}")]
    NonSuccessStatus(u16),
    /// Body is not a valid envelope
    #[error("malformed response: {0}")]
    EnvelopeParse(String),
}
