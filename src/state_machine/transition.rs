//! Pure state transition function

use super::reduce::reduce;
use super::state::{Affordance, PendingTurn, PickerEntry, TranscriptLine, UserTurn};
use super::{ConvContext, ConvState, Effect, Event};
use crate::assistant::{Exchange, Turn};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A message is already being sent")]
    AwaitingResponse,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// expressed as effects.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Quit wins from anywhere
        (_, Event::Quit) => Ok(TransitionResult::new(ConvState::Exited).with_effect(Effect::Exit)),

        (ConvState::Exited, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} after exit"
        ))),

        // ============================================================
        // Submit
        // ============================================================
        (
            ConvState::Idle {
                affordance: Affordance::FreeText,
            },
            Event::Submit { draft, .. },
        ) => {
            let turn = Turn::text(draft.clone(), context.session_id.clone());
            Ok(dispatch(Affordance::FreeText, turn, UserTurn::Typed(draft)))
        }

        (
            ConvState::Idle {
                affordance: affordance @ Affordance::SinglePick(picker),
            },
            Event::Submit { selected, .. },
        ) => match picker.entry(selected) {
            // Escape entry: drop the picker, no call
            Some(PickerEntry::Escape) => Ok(TransitionResult::new(ConvState::Idle {
                affordance: Affordance::FreeText,
            })
            .with_effect(Effect::ClearError)),
            Some(PickerEntry::Option(option)) => {
                let turn = Turn::choice(option, context.session_id.clone());
                Ok(dispatch(
                    affordance.clone(),
                    turn,
                    UserTurn::Picked { index: selected },
                ))
            }
            None => Err(TransitionError::InvalidTransition(format!(
                "picker has no entry {selected}"
            ))),
        },

        (ConvState::AwaitingResponse { .. }, Event::Submit { .. }) => {
            Err(TransitionError::AwaitingResponse)
        }

        // ============================================================
        // Exchange completion
        // ============================================================
        (ConvState::AwaitingResponse { affordance, pending }, Event::ExchangeSucceeded(exchange)) => {
            let reduction = reduce(affordance, &pending.shown, &exchange.messages);
            let opened_picker = !reduction.affordance.is_free_text();

            let mut lines = reduction.lines;
            lines.extend(debug_lines(&exchange));

            let mut result = TransitionResult::new(ConvState::Idle {
                affordance: reduction.affordance,
            })
            .with_effects([
                Effect::AppendTranscript(lines),
                Effect::ClearDraft,
                Effect::StoreSession(exchange.session_id),
            ]);
            if opened_picker {
                result = result.with_effect(Effect::ResetPicker);
            }
            Ok(result)
        }

        // Roll back to the affordance active before the call
        (ConvState::AwaitingResponse { affordance, .. }, Event::ExchangeFailed { message }) => {
            Ok(TransitionResult::new(ConvState::Idle {
                affordance: affordance.clone(),
            })
            .with_effect(Effect::show_send_failure(&message)))
        }

        (ConvState::Idle { .. }, event @ (Event::ExchangeSucceeded(_) | Event::ExchangeFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{event:?} with no exchange outstanding"
            )))
        }
    }
}

fn dispatch(affordance: Affordance, turn: Turn, shown: UserTurn) -> TransitionResult {
    TransitionResult::new(ConvState::AwaitingResponse {
        affordance,
        pending: PendingTurn {
            turn: turn.clone(),
            shown,
        },
    })
    .with_effect(Effect::ClearError)
    .with_effect(Effect::SendTurn(turn))
}

/// Skipped records and the envelope projection, only in debug mode
fn debug_lines(exchange: &Exchange) -> Vec<TranscriptLine> {
    let Some(projection) = &exchange.debug else {
        return vec![];
    };

    exchange
        .skipped
        .iter()
        .map(|e| TranscriptLine::debug(format!("skipped {e}")))
        .chain(projection.lines().map(TranscriptLine::debug))
        .collect()
}
