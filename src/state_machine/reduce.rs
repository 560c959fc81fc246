//! Conversation reducer
//!
//! Folds one completed exchange into transcript lines and the next input
//! affordance. Pure; never fails.

use super::state::{Affordance, LineKind, Picker, PickerEntry, TranscriptLine, UserTurn};
use crate::assistant::{AnswerOption, Message};

/// Marker line appended for every pause record
pub const PAUSE_MARKER: &str = "<pause>";

/// Output of one reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub lines: Vec<TranscriptLine>,
    pub affordance: Affordance,
}

/// Fold the user's turn and the assistant's reply batch
///
/// `prior` is the affordance the turn was made under; a picked turn is
/// rendered from its options.
pub fn reduce(prior: &Affordance, outgoing: &UserTurn, batch: &[Message]) -> Reduction {
    let mut lines = Vec::with_capacity(batch.len() + 1);
    lines.push(render_user_turn(prior, outgoing));

    let mut affordance = Affordance::FreeText;

    for message in batch {
        match message {
            Message::Text { body } => lines.push(TranscriptLine::assistant(body.clone())),
            Message::Options { prompt, options } => {
                if let Some(prompt) = prompt {
                    lines.push(TranscriptLine::assistant(prompt.clone()));
                }
                lines.extend(options.iter().map(|option| {
                    TranscriptLine::new(
                        LineKind::OptionItem,
                        format!("{}({})", option.label, option.value),
                    )
                }));
                // Only one picker can be pending; the last options message wins
                affordance = Affordance::SinglePick(Picker::new(prompt.clone(), options.clone()));
            }
            Message::Pause { .. } => lines.push(TranscriptLine::new(LineKind::Marker, PAUSE_MARKER)),
            Message::Command { name } => lines.push(TranscriptLine::new(LineKind::Command, name.clone())),
        }
    }

    Reduction { lines, affordance }
}

fn render_user_turn(prior: &Affordance, outgoing: &UserTurn) -> TranscriptLine {
    match outgoing {
        UserTurn::Typed(text) => TranscriptLine::user(text.clone()),
        UserTurn::Picked { index } => {
            match prior.picker().and_then(|picker| picker.entry(*index)) {
                Some(PickerEntry::Option(option)) => TranscriptLine::user(render_choice(option)),
                Some(PickerEntry::Escape) | None => {
                    tracing::warn!(index, "Picked turn does not match the prior picker");
                    TranscriptLine::user(String::new())
                }
            }
        }
    }
}

/// `label(value)`, followed by `[id=…]` when the option carries one
fn render_choice(option: &AnswerOption) -> String {
    match &option.id {
        Some(id) => format!("{}({})[id={id}]", option.label, option.value),
        None => format!("{}({})", option.label, option.value),
    }
}
