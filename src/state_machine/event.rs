//! Events that drive the interaction controller

use crate::assistant::Exchange;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// Submit key pressed with the current input widget contents
    Submit {
        draft: String,
        /// Picker cursor, meaningful only while a picker is active
        selected: usize,
    },
    Quit,

    // Exchange events
    ExchangeSucceeded(Exchange),
    ExchangeFailed {
        message: String,
    },
}

#[cfg(test)]
impl Event {
    pub fn submit_text(draft: impl Into<String>) -> Self {
        Event::Submit {
            draft: draft.into(),
            selected: 0,
        }
    }

    pub fn submit_choice(selected: usize) -> Self {
        Event::Submit {
            draft: String::new(),
            selected,
        }
    }
}
