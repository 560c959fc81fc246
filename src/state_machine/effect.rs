//! Effects produced by state transitions

use super::state::TranscriptLine;
use crate::assistant::Turn;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch the single outstanding exchange
    SendTurn(Turn),

    /// Append lines to the transcript
    AppendTranscript(Vec<TranscriptLine>),

    /// Replace the session handle
    StoreSession(String),

    /// Empty the free-text editor
    ClearDraft,

    /// Move the picker cursor back to the first entry
    ResetPicker,

    /// Show a human-readable error under the input
    ShowError(String),

    ClearError,

    /// Leave the event loop
    Exit,
}

impl Effect {
    pub fn show_send_failure(message: &str) -> Self {
        Effect::ShowError(format!(
            "Failed to send the message - please try again. ({message})"
        ))
    }
}
