//! Record decoding
//!
//! Each response record is a loosely typed JSON object discriminated by
//! `type`. Decoding matches the discriminator exhaustively and validates the
//! fields each variant requires.

use super::{AnswerOption, DecodeError, Message};
use serde_json::{Map, Value};

/// Discriminator values understood by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordType {
    Text,
    Options,
    Pause,
    Command,
}

impl RecordType {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "TEXT" => Some(Self::Text),
            "OPTIONS" => Some(Self::Options),
            "PAUSE" => Some(Self::Pause),
            "COMMAND" => Some(Self::Command),
            _ => None,
        }
    }
}

/// Decode one raw record into a message
pub fn decode(record: &Value) -> Result<Message, DecodeError> {
    let Some(fields) = record.as_object() else {
        return Err(DecodeError::wrong_shape("record", "object"));
    };

    let discriminator = match fields.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(DecodeError::wrong_shape("type", "string")),
        None => return Err(DecodeError::missing("type")),
    };

    let Some(record_type) = RecordType::parse(discriminator) else {
        return Err(DecodeError::new(
            "type",
            format!("unknown variant `{discriminator}`"),
        ));
    };

    match record_type {
        RecordType::Text => Ok(Message::Text {
            body: required_str(fields, "text", "text")?,
        }),
        RecordType::Options => decode_options(fields),
        RecordType::Pause => {
            let duration_ms = match fields.get("time") {
                // Negative durations clamp to zero
                Some(value) => value
                    .as_u64()
                    .or_else(|| value.as_i64().map(|_| 0))
                    .ok_or_else(|| DecodeError::wrong_shape("time", "integer"))?,
                None => return Err(DecodeError::missing("time")),
            };
            Ok(Message::Pause { duration_ms })
        }
        RecordType::Command => Ok(Message::Command {
            name: required_str(fields, "command", "command")?,
        }),
    }
}

fn decode_options(fields: &Map<String, Value>) -> Result<Message, DecodeError> {
    let prompt = optional_str(fields, "text", "text")?;

    let entries = match fields.get("options") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(DecodeError::wrong_shape("options", "array")),
        None => return Err(DecodeError::missing("options")),
    };

    let options = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let path = format!("options[{index}]");
            let Some(entry) = entry.as_object() else {
                return Err(DecodeError::wrong_shape(path, "object"));
            };
            Ok(AnswerOption {
                label: required_str(entry, "text", &format!("{path}.text"))?,
                value: required_str(entry, "value", &format!("{path}.value"))?,
                id: optional_str(entry, "option_id", &format!("{path}.option_id"))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Message::Options { prompt, options })
}

fn required_str(fields: &Map<String, Value>, key: &str, path: &str) -> Result<String, DecodeError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DecodeError::wrong_shape(path, "string")),
        None => Err(DecodeError::missing(path)),
    }
}

/// Absent and `null` both mean "not provided"
fn optional_str(
    fields: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(DecodeError::wrong_shape(path, "string")),
    }
}
