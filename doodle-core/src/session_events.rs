use doodle_types::{DrawingSnapshot, GameCompletion, ProcessedGuess, RoundOutcome, RoundState};

use crate::GameSummary;

/// What a session tells the presentation layer
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged {
        state: RoundState,
    },
    GuessProcessed {
        guess: ProcessedGuess,
    },
    RoundScored {
        outcome: RoundOutcome,
        state: RoundState,
    },
    DrawingChanged {
        drawing: Option<DrawingSnapshot>,
    },
    GameCompleted {
        summary: GameSummary,
        completion: Option<GameCompletion>,
    },
    /// Recoverable problem worth showing to the player
    Notice {
        message: String,
    },
}

/// Event handler trait for observing a session
pub trait SessionEventHandler: Send {
    fn handle_event(&mut self, event: &SessionEvent);
}

impl<F> SessionEventHandler for F
where
    F: FnMut(&SessionEvent) + Send,
{
    fn handle_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}

/// Fans session events out to every subscriber
#[derive(Default)]
pub struct SessionEventBus {
    handlers: Vec<Box<dyn SessionEventHandler>>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Box<dyn SessionEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: SessionEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }
}
