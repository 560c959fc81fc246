//! Common types for assistant exchanges

use super::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One user contribution, sent as a single outbound call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Turn {
    pub text: String,
    pub option_id: Option<String>,
    pub session_id: Option<String>,
}

impl Turn {
    pub fn text(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            option_id: None,
            session_id,
        }
    }

    /// Turn for a picked option. The option's value is sent as text; an
    /// empty identifier is treated as absent.
    pub fn choice(option: &AnswerOption, session_id: Option<String>) -> Self {
        Self {
            text: option.value.clone(),
            option_id: option.id.clone().filter(|id| !id.is_empty()),
            session_id,
        }
    }
}

/// One entry of an options message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: String,
    pub value: String,
    pub id: Option<String>,
}

#[cfg(test)]
impl AnswerOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Decoded assistant message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text {
        body: String,
    },
    Options {
        prompt: Option<String>,
        options: Vec<AnswerOption>,
    },
    /// Rendering hint only; the duration is never awaited
    Pause {
        duration_ms: u64,
    },
    Command {
        name: String,
    },
}

#[cfg(test)]
impl Message {
    pub fn text(body: impl Into<String>) -> Self {
        Message::Text { body: body.into() }
    }

}

/// Successful result of one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub session_id: String,
    pub messages: Vec<Message>,
    /// Records that failed to decode and were dropped
    pub skipped: Vec<DecodeError>,
    /// Pretty-printed envelope projection, present only in debug mode
    pub debug: Option<String>,
}

#[cfg(test)]
impl Exchange {
    pub fn new(session_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            session_id: session_id.into(),
            messages,
            skipped: vec![],
            debug: None,
        }
    }
}

// Wire types

#[derive(Debug, Serialize)]
pub(crate) struct TalkRequest<'a> {
    pub input: TalkInput<'a>,
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_debug: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TalkInput<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_id: Option<&'a str>,
}

impl<'a> TalkRequest<'a> {
    pub fn new(turn: &'a Turn, include_debug: Option<bool>) -> Self {
        Self {
            input: TalkInput {
                text: &turn.text,
                option_id: turn.option_id.as_deref().filter(|id| !id.is_empty()),
            },
            session_id: turn.session_id.as_deref(),
            include_debug,
        }
    }
}

/// Top-level response body
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope {
    pub session_id: String,
    /// Absent and `null` both mean an empty batch
    #[serde(default)]
    pub response: Option<Vec<Value>>,
}
