//! Mock implementations for testing
//!
//! These mocks enable controller testing without real I/O.

use crate::assistant::{AssistantService, Exchange, TransportError, Turn};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Assistant
// ============================================================================

/// Mock assistant that returns queued results
pub struct MockAssistant {
    results: Mutex<VecDeque<Result<Exchange, TransportError>>>,
    /// Record of all turns sent
    pub turns: Mutex<Vec<Turn>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            turns: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful exchange
    pub fn queue_exchange(&self, exchange: Exchange) {
        self.results.lock().unwrap().push_back(Ok(exchange));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: TransportError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded turns
    pub fn recorded_turns(&self) -> Vec<Turn> {
        self.turns.lock().unwrap().clone()
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantService for MockAssistant {
    async fn send(&self, turn: &Turn) -> Result<Exchange, TransportError> {
        self.turns.lock().unwrap().push(turn.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock exchange queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://assistant"
    }
}
