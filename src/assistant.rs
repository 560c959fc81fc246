//! Virtual assistant service abstraction
//!
//! Turns a user `Turn` into a decoded `Exchange`. The HTTP implementation
//! lives in `http`; record decoding in `decode`.

mod decode;
mod error;
mod http;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{DecodeError, TransportError};
pub use http::HttpAssistant;
pub use types::{AnswerOption, Exchange, Message, Turn};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for assistant backends
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Send one turn and wait for the decoded reply
    async fn send(&self, turn: &Turn) -> Result<Exchange, TransportError>;

    /// Where turns are sent, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: AssistantService + ?Sized> AssistantService for Arc<T> {
    async fn send(&self, turn: &Turn) -> Result<Exchange, TransportError> {
        (**self).send(turn).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for assistant services
pub struct LoggingService {
    inner: Arc<dyn AssistantService>,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn AssistantService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AssistantService for LoggingService {
    async fn send(&self, turn: &Turn) -> Result<Exchange, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(turn).await;
        let duration = start.elapsed();

        match &result {
            Ok(exchange) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    session_id = %exchange.session_id,
                    messages = exchange.messages.len(),
                    skipped = exchange.skipped.len(),
                    "Assistant exchange completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Assistant exchange failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
