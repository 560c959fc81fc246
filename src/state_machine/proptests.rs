//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::reduce::reduce;
use super::state::UserTurn;
use super::*;
use crate::assistant::{AnswerOption, Exchange, Message, Turn};
use super::state::PendingTurn;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_option() -> impl Strategy<Value = AnswerOption> {
    (
        "[A-Za-z ]{1,12}",
        "[a-z0-9]{1,6}",
        proptest::option::of("[a-z0-9-]{1,8}"),
    )
        .prop_map(|(label, value, id)| AnswerOption { label, value, id })
}

fn arb_options_message() -> impl Strategy<Value = Message> {
    (
        proptest::option::of("[A-Za-z ?]{1,20}"),
        proptest::collection::vec(arb_option(), 0..6),
    )
        .prop_map(|(prompt, options)| Message::Options { prompt, options })
}

/// Any message except options
fn arb_plain_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        "[A-Za-z !?]{0,30}".prop_map(|body| Message::Text { body }),
        (0u64..10_000).prop_map(|duration_ms| Message::Pause { duration_ms }),
        "[a-z_]{1,12}".prop_map(|name| Message::Command { name }),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    prop_oneof![3 => arb_plain_message(), 1 => arb_options_message()]
}

fn arb_affordance() -> impl Strategy<Value = Affordance> {
    prop_oneof![
        Just(Affordance::FreeText),
        (
            proptest::option::of("[A-Za-z ]{1,10}"),
            proptest::collection::vec(arb_option(), 1..5),
        )
            .prop_map(|(prompt, options)| Affordance::SinglePick(Picker::new(prompt, options))),
    ]
}

fn arb_awaiting_state() -> impl Strategy<Value = ConvState> {
    (arb_affordance(), "[a-z ]{0,12}").prop_map(|(affordance, text)| ConvState::AwaitingResponse {
        affordance,
        pending: PendingTurn {
            turn: Turn::text(text.clone(), None),
            shown: UserTurn::Typed(text),
        },
    })
}

/// What the server does with one submitted turn
#[derive(Debug, Clone)]
enum Outcome {
    Success(String),
    Failure,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        "s[0-9]{1,4}".prop_map(Outcome::Success),
        Just(Outcome::Failure),
    ]
}

fn expected_option_lines(message: &Message) -> usize {
    match message {
        Message::Options { prompt, options } => options.len() + usize::from(prompt.is_some()),
        _ => 1,
    }
}

// ============================================================================
// Reducer properties
// ============================================================================

proptest! {
    #[test]
    fn single_options_message_opens_matching_picker(
        before in proptest::collection::vec(arb_plain_message(), 0..4),
        options in proptest::collection::vec(arb_option(), 0..8),
        after in proptest::collection::vec(arb_plain_message(), 0..4),
        prior in arb_affordance(),
    ) {
        let mut batch = before;
        batch.push(Message::Options { prompt: None, options: options.clone() });
        batch.extend(after);

        let reduction = reduce(&prior, &UserTurn::Typed("x".to_string()), &batch);

        let picker = reduction.affordance.picker().expect("options message opens a picker");
        prop_assert_eq!(picker.options.len(), options.len());
        prop_assert_eq!(picker.entry_count(), options.len() + 1);
    }

    #[test]
    fn batch_without_options_resets_to_free_text(
        batch in proptest::collection::vec(arb_plain_message(), 0..8),
        prior in arb_affordance(),
    ) {
        let reduction = reduce(&prior, &UserTurn::Typed("x".to_string()), &batch);
        prop_assert_eq!(reduction.affordance, Affordance::FreeText);
    }

    #[test]
    fn one_user_line_then_message_lines(
        batch in proptest::collection::vec(arb_message(), 0..8),
    ) {
        let reduction = reduce(&Affordance::FreeText, &UserTurn::Typed("x".to_string()), &batch);

        let expected: usize = 1 + batch.iter().map(expected_option_lines).sum::<usize>();
        prop_assert_eq!(reduction.lines.len(), expected);
        prop_assert_eq!(reduction.lines[0].kind, LineKind::User);
        prop_assert!(reduction.lines[1..].iter().all(|l| l.kind != LineKind::User));
    }

    #[test]
    fn reduce_is_deterministic(
        batch in proptest::collection::vec(arb_message(), 0..8),
        prior in arb_affordance(),
    ) {
        let outgoing = UserTurn::Typed("x".to_string());
        prop_assert_eq!(reduce(&prior, &outgoing, &batch), reduce(&prior, &outgoing, &batch));
    }
}

// ============================================================================
// Transition properties
// ============================================================================

proptest! {
    #[test]
    fn submit_while_awaiting_is_rejected(state in arb_awaiting_state(), draft in "[a-z]{0,8}") {
        let result = transition(&state, &ConvContext::default(), Event::submit_text(draft));
        prop_assert_eq!(result.err(), Some(TransitionError::AwaitingResponse));
    }

    #[test]
    fn failure_restores_prior_affordance(state in arb_awaiting_state()) {
        let prior = state.affordance().cloned();
        let result = transition(
            &state,
            &ConvContext::default(),
            Event::ExchangeFailed { message: "boom".to_string() },
        )
        .unwrap();

        prop_assert_eq!(result.new_state.affordance().cloned(), prior);
        prop_assert!(result.effects.iter().all(|e| matches!(e, Effect::ShowError(_))));
    }

    #[test]
    fn session_is_overwritten_and_never_cleared(
        outcomes in proptest::collection::vec(arb_outcome(), 1..10),
    ) {
        let mut state = ConvState::default();
        let mut context = ConvContext::default();
        let mut expected: Option<String> = None;

        for outcome in outcomes {
            let submitted = transition(&state, &context, Event::submit_text("hi")).unwrap();
            let sent = submitted.effects.iter().find_map(|e| match e {
                Effect::SendTurn(turn) => Some(turn.clone()),
                _ => None,
            });
            prop_assert_eq!(sent.map(|t| t.session_id), Some(expected.clone()));
            state = submitted.new_state;

            let event = match &outcome {
                Outcome::Success(id) => {
                    Event::ExchangeSucceeded(Exchange::new(id.clone(), vec![Message::text("ok")]))
                }
                Outcome::Failure => Event::ExchangeFailed { message: "down".to_string() },
            };
            let completed = transition(&state, &context, event).unwrap();
            for effect in &completed.effects {
                if let Effect::StoreSession(id) = effect {
                    context.session_id = Some(id.clone());
                }
            }
            state = completed.new_state;

            if let Outcome::Success(id) = outcome {
                expected = Some(id);
            }
            prop_assert_eq!(&context.session_id, &expected);
        }
    }
}
