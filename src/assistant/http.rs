//! HTTP transport for the virtual assistant talk endpoint

use super::decode::decode;
use super::types::{ResponseEnvelope, TalkRequest};
use super::{AssistantService, Exchange, TransportError, Turn};
use crate::config::{Config, DebugConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

/// Header carrying the pre-shared identity token
pub const IDENTITY_HEADER: &str = "x-rh-identity";

/// Assistant reached over HTTP
pub struct HttpAssistant {
    client: Client,
    endpoint: Url,
    identity: String,
    debug: DebugConfig,
}

impl HttpAssistant {
    pub fn new(endpoint: Url, identity: impl Into<String>, debug: DebugConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            identity: identity.into(),
            debug,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoint.clone(), &config.identity, config.debug)
    }

    fn include_debug(&self) -> Option<bool> {
        self.debug.enabled.then_some(self.debug.include_assistant)
    }

    fn parse_body(&self, body: &str) -> Result<Exchange, TransportError> {
        let envelope: ResponseEnvelope = serde_json::from_str(body)
            .map_err(|e| TransportError::envelope(format!("{e}")))?;

        let records = envelope.response.unwrap_or_default();
        let mut messages = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match decode(record) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::debug!(index, error = %e, record = %record, "Dropping undecodable record");
                    skipped.push(e);
                }
            }
        }

        let debug = if self.debug.enabled {
            debug_projection(body, &self.debug)
        } else {
            None
        };

        Ok(Exchange {
            session_id: envelope.session_id,
            messages,
            skipped,
            debug,
        })
    }
}

#[async_trait]
impl AssistantService for HttpAssistant {
    async fn send(&self, turn: &Turn) -> Result<Exchange, TransportError> {
        let request = TalkRequest::new(turn, self.include_debug());

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", "application/json")
            .header(IDENTITY_HEADER, &self.identity)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::network(format!("connection failed: {e}"))
                } else {
                    TransportError::network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("failed to read response: {e}")))?;

        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), body = %body, "Assistant returned an error status");
            return Err(TransportError::status(status.as_u16()));
        }

        self.parse_body(&body)
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

/// Pretty-printed copy of the raw envelope with the heavy keys elided
/// according to the debug flags. Presentation only.
pub fn debug_projection(body: &str, flags: &DebugConfig) -> Option<String> {
    let mut data = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };

    if !flags.include_response {
        data.remove("response");
    }
    if !flags.include_assistant {
        data.remove("assistant");
    }

    serde_json::to_string_pretty(&data).ok()
}
