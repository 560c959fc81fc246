//! Property-based tests for record decoding

use super::decode::decode;
use super::{AnswerOption, Message};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.!?,]{0,60}"
}

fn arb_option_entry() -> impl Strategy<Value = Value> {
    (arb_text(), arb_text(), proptest::option::of("[a-z0-9-]{1,12}")).prop_map(
        |(text, value, id)| match id {
            Some(id) => json!({ "text": text, "value": value, "option_id": id }),
            None => json!({ "text": text, "value": value }),
        },
    )
}

fn arb_options_record() -> impl Strategy<Value = Value> {
    (
        proptest::option::of(arb_text()),
        proptest::collection::vec(arb_option_entry(), 0..6),
    )
        .prop_map(|(prompt, options)| match prompt {
            Some(prompt) => json!({ "type": "OPTIONS", "text": prompt, "options": options }),
            None => json!({ "type": "OPTIONS", "options": options }),
        })
}

/// Any record the decoder accepts
fn arb_valid_record() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_text().prop_map(|text| json!({ "type": "TEXT", "text": text })),
        arb_options_record(),
        any::<u32>().prop_map(|time| json!({ "type": "PAUSE", "time": time })),
        "[a-z_]{1,20}".prop_map(|command| json!({ "type": "COMMAND", "command": command })),
    ]
}

/// Records with anything at all as the discriminator
fn arb_any_record() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_valid_record(),
        ("[A-Z]{1,10}", arb_text()).prop_map(|(kind, text)| json!({ "type": kind, "text": text })),
        arb_text().prop_map(|text| json!({ "text": text })),
        any::<i64>().prop_map(|n| json!({ "type": n })),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn text_records_decode_to_text(text in arb_text()) {
        let message = decode(&json!({ "type": "TEXT", "text": text.clone() })).unwrap();
        prop_assert_eq!(message, Message::Text { body: text });
    }

    #[test]
    fn option_missing_value_is_rejected(
        mut entries in proptest::collection::vec(arb_option_entry(), 1..6),
        victim in any::<prop::sample::Index>(),
    ) {
        let index = victim.index(entries.len());
        entries[index].as_object_mut().unwrap().remove("value");
        let record = json!({ "type": "OPTIONS", "options": entries });

        let err = decode(&record).unwrap_err();
        prop_assert!(err.field.ends_with(".value"));
    }

    #[test]
    fn decoding_is_idempotent(record in arb_any_record()) {
        prop_assert_eq!(decode(&record), decode(&record));
    }

    #[test]
    fn valid_records_always_decode(record in arb_valid_record()) {
        prop_assert!(decode(&record).is_ok());
    }

    #[test]
    fn options_preserve_order_and_count(record in arb_options_record()) {
        let expected: Vec<AnswerOption> = record["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| AnswerOption {
                label: entry["text"].as_str().unwrap().to_string(),
                value: entry["value"].as_str().unwrap().to_string(),
                id: entry.get("option_id").and_then(Value::as_str).map(String::from),
            })
            .collect();

        match decode(&record).unwrap() {
            Message::Options { prompt, options } => {
                prop_assert_eq!(prompt.as_deref(), record.get("text").and_then(Value::as_str));
                prop_assert_eq!(options, expected);
            }
            other => prop_assert!(false, "expected options, got {:?}", other),
        }
    }

    #[test]
    fn unknown_discriminators_are_rejected(kind in "[A-Z]{1,10}") {
        prop_assume!(!matches!(kind.as_str(), "TEXT" | "OPTIONS" | "PAUSE" | "COMMAND"));
        let err = decode(&json!({ "type": kind, "text": "x" })).unwrap_err();
        prop_assert_eq!(err.field, "type");
    }
}
