//! Interaction controller runtime
//!
//! Owns everything the pure state machine does not: the transcript, the
//! session handle, the input widgets and the channel that brings finished
//! exchanges back into the event loop.

use super::input::{Focus, Key, ListCursor, Scroll, TextInput};
use crate::assistant::{AssistantService, Turn};
use crate::state_machine::{
    transition, Affordance, ConvContext, ConvState, Effect, Event, TransitionError, TranscriptLine,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Event-to-effect wrapper around the pure transition function
pub struct Controller<A>
where
    A: AssistantService + 'static,
{
    state: ConvState,
    context: ConvContext,
    assistant: Arc<A>,
    transcript: Vec<TranscriptLine>,
    input: TextInput,
    picker: ListCursor,
    scroll: Scroll,
    focus: Focus,
    error: Option<String>,
    event_tx: mpsc::UnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl<A> Controller<A>
where
    A: AssistantService + 'static,
{
    pub fn new(assistant: A) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            state: ConvState::default(),
            context: ConvContext::default(),
            assistant: Arc::new(assistant),
            transcript: Vec::new(),
            input: TextInput::default(),
            picker: ListCursor::default(),
            scroll: Scroll::default(),
            focus: Focus::default(),
            error: None,
            event_tx,
            event_rx,
        }
    }

    // ------------------------------------------------------------------
    // Accessors for rendering
    // ------------------------------------------------------------------

    #[cfg(test)]
    pub fn session_id(&self) -> Option<&str> {
        self.context.session_id.as_deref()
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    pub fn affordance(&self) -> &Affordance {
        static FREE_TEXT: Affordance = Affordance::FreeText;
        self.state.affordance().unwrap_or(&FREE_TEXT)
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn picker_selected(&self) -> usize {
        self.picker.selected()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub fn clamp_scroll(&mut self, max_from_bottom: usize) {
        self.scroll.clamp(max_from_bottom);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_awaiting_response()
    }

    pub fn is_exited(&self) -> bool {
        self.state.is_exited()
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route one key press
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Quit => self.process_event(Event::Quit),
            Key::Tab => self.focus = self.focus.toggled(),
            Key::Enter => {
                if self.focus == Focus::Input {
                    let event = Event::Submit {
                        draft: self.input.value().to_string(),
                        selected: self.picker.selected(),
                    };
                    self.process_event(event);
                }
            }
            _ => self.forward_key(key),
        }
    }

    /// Keys that only touch the active widget, never the state machine
    fn forward_key(&mut self, key: Key) {
        if self.focus == Focus::Transcript {
            self.scroll.handle(key);
            return;
        }

        match self.affordance().picker().map(|p| p.entry_count()) {
            Some(len) => {
                self.picker.handle(key, len);
            }
            None => {
                self.input.handle(key);
            }
        }
    }

    // ------------------------------------------------------------------
    // Event processing
    // ------------------------------------------------------------------

    /// Feed one event through the state machine and apply its effects
    pub fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(TransitionError::AwaitingResponse) => {
                tracing::debug!("Ignoring submit while a message is being sent");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, state = self.state.name(), "Rejected event");
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state.name() != self.state.name() {
            tracing::debug!(from = old_state.name(), to = self.state.name(), "State changed");
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SendTurn(turn) => self.dispatch(turn),
            Effect::AppendTranscript(lines) => {
                self.transcript.extend(lines);
                self.scroll.to_bottom();
            }
            Effect::StoreSession(session_id) => {
                self.context.session_id = Some(session_id);
            }
            Effect::ClearDraft => self.input.clear(),
            Effect::ResetPicker => self.picker.reset(),
            Effect::ShowError(message) => self.error = Some(message),
            Effect::ClearError => self.error = None,
            Effect::Exit => tracing::info!("Quit requested"),
        }
    }

    /// Run the exchange as a background task; its outcome comes back as an event
    fn dispatch(&self, turn: Turn) {
        let assistant = self.assistant.clone();
        let event_tx = self.event_tx.clone();

        tracing::debug!(
            has_session = turn.session_id.is_some(),
            has_option_id = turn.option_id.is_some(),
            "Sending turn (background)"
        );

        tokio::spawn(async move {
            let event = match assistant.send(&turn).await {
                Ok(exchange) => Event::ExchangeSucceeded(exchange),
                Err(e) => Event::ExchangeFailed {
                    message: e.to_string(),
                },
            };
            // Receiver only goes away when the controller is dropped
            let _ = event_tx.send(event);
        });
    }

    /// Apply any exchanges that finished since the last call, without waiting
    pub fn poll_completions(&mut self) -> bool {
        let mut handled = false;
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_event(event);
            handled = true;
        }
        handled
    }

    /// Wait for the outstanding exchange to finish and apply it
    #[cfg(test)]
    pub async fn wait_for_completion(&mut self) {
        if let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }
    }
}
