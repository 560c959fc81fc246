//! Conversation state types

use crate::assistant::{AnswerOption, Turn};
use std::fmt;

/// Label of the extra picker entry that returns to free-text input
pub const ESCAPE_LABEL: &str = "Type something";

/// Picker title used when the options message carries no prompt
pub const DEFAULT_PICKER_TITLE: &str = "Pick one";

// ============================================================================
// Affordance
// ============================================================================

/// The currently active input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Affordance {
    #[default]
    FreeText,
    SinglePick(Picker),
}

impl Affordance {
    pub fn picker(&self) -> Option<&Picker> {
        match self {
            Affordance::FreeText => None,
            Affordance::SinglePick(picker) => Some(picker),
        }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, Affordance::FreeText)
    }
}

/// A pending single-select choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub prompt: Option<String>,
    /// Domain options only; the escape entry is not stored here
    pub options: Vec<AnswerOption>,
    pub includes_freeform_escape: bool,
}

/// One row of the rendered picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEntry<'a> {
    Option(&'a AnswerOption),
    Escape,
}

impl Picker {
    pub fn new(prompt: Option<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            prompt,
            options,
            includes_freeform_escape: true,
        }
    }

    pub fn title(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PICKER_TITLE)
    }

    /// Number of rendered rows, escape entry included
    pub fn entry_count(&self) -> usize {
        self.options.len() + usize::from(self.includes_freeform_escape)
    }

    pub fn entry(&self, index: usize) -> Option<PickerEntry<'_>> {
        match self.options.get(index) {
            Some(option) => Some(PickerEntry::Option(option)),
            None if self.includes_freeform_escape && index == self.options.len() => {
                Some(PickerEntry::Escape)
            }
            None => None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = PickerEntry<'_>> {
        (0..self.entry_count()).filter_map(|i| self.entry(i))
    }
}

// ============================================================================
// Outgoing turn
// ============================================================================

/// What the user contributed, as shown in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserTurn {
    Typed(String),
    /// Index into the options of the picker active when the turn was sent
    Picked { index: usize },
}

/// A turn that has been dispatched and not yet answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub turn: Turn,
    pub shown: UserTurn,
}

// ============================================================================
// Transcript
// ============================================================================

/// Styling class of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    User,
    Assistant,
    OptionItem,
    Marker,
    Command,
    Debug,
}

/// One rendered transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub body: String,
}

impl TranscriptLine {
    pub fn new(kind: LineKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    pub fn user(body: impl Into<String>) -> Self {
        Self::new(LineKind::User, body)
    }

    pub fn assistant(body: impl Into<String>) -> Self {
        Self::new(LineKind::Assistant, body)
    }

    pub fn debug(body: impl Into<String>) -> Self {
        Self::new(LineKind::Debug, body)
    }

    /// Speaker label rendered ahead of the body, if any
    pub fn label(&self) -> Option<&'static str> {
        match self.kind {
            LineKind::User => Some("User:"),
            LineKind::Assistant => Some("Astro:"),
            _ => None,
        }
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LineKind::User | LineKind::Assistant => {
                write!(f, "{} {}", self.label().unwrap_or_default(), self.body)
            }
            LineKind::OptionItem => write!(f, "  - {}", self.body),
            LineKind::Command => write!(f, "/{}", self.body),
            LineKind::Marker | LineKind::Debug => f.write_str(&self.body),
        }
    }
}

// ============================================================================
// Controller state
// ============================================================================

/// Interaction controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvState {
    Idle {
        affordance: Affordance,
    },
    /// One call is outstanding; the affordance active before it is kept so a
    /// failure can fall back to it
    AwaitingResponse {
        affordance: Affordance,
        pending: PendingTurn,
    },
    Exited,
}

impl Default for ConvState {
    fn default() -> Self {
        ConvState::Idle {
            affordance: Affordance::FreeText,
        }
    }
}

impl ConvState {
    pub fn affordance(&self) -> Option<&Affordance> {
        match self {
            ConvState::Idle { affordance } | ConvState::AwaitingResponse { affordance, .. } => {
                Some(affordance)
            }
            ConvState::Exited => None,
        }
    }

    pub fn is_awaiting_response(&self) -> bool {
        matches!(self, ConvState::AwaitingResponse { .. })
    }

    pub fn is_exited(&self) -> bool {
        matches!(self, ConvState::Exited)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle {
                affordance: Affordance::FreeText,
            } => "idle/free_text",
            ConvState::Idle {
                affordance: Affordance::SinglePick(_),
            } => "idle/single_pick",
            ConvState::AwaitingResponse { .. } => "awaiting_response",
            ConvState::Exited => "exited",
        }
    }
}

/// Data the transition function reads but does not own
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvContext {
    /// Absent until the first successful exchange
    pub session_id: Option<String>,
}

#[cfg(test)]
impl ConvContext {
    pub fn new(session_id: Option<String>) -> Self {
        Self { session_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_entries_end_with_escape() {
        let picker = Picker::new(
            None,
            vec![AnswerOption::new("Yes", "y"), AnswerOption::new("No", "n")],
        );

        assert_eq!(picker.title(), "Pick one");
        assert_eq!(picker.entry_count(), 3);
        assert_eq!(picker.entry(2), Some(PickerEntry::Escape));
        assert_eq!(picker.entry(3), None);
        assert_eq!(picker.entries().count(), 3);
    }

    #[test]
    fn test_line_rendering() {
        assert_eq!(TranscriptLine::user("hello").to_string(), "User: hello");
        assert_eq!(TranscriptLine::assistant("hi").to_string(), "Astro: hi");
        assert_eq!(
            TranscriptLine::new(LineKind::OptionItem, "Yes(y)").to_string(),
            "  - Yes(y)"
        );
        assert_eq!(
            TranscriptLine::new(LineKind::Command, "redirect").to_string(),
            "/redirect"
        );
    }
}
