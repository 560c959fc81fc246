//! Interaction controller state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `reduce` folds one exchange into the transcript, `transition` maps an
//! event on the current state to a new state plus effects.

mod effect;
pub mod event;
mod reduce;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{
    Affordance, ConvContext, ConvState, LineKind, Picker, PickerEntry, TranscriptLine,
    ESCAPE_LABEL,
};
pub use transition::{transition, TransitionError};
