use doodle_types::{Difficulty, GameError, GamePhase};
use thiserror::Error;

use crate::Trigger;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no {difficulty} words left in the catalog, try another difficulty")]
    ExhaustedCatalog { difficulty: Difficulty },

    #[error("cannot apply {trigger:?} while in the {phase} phase")]
    InvalidTransition { phase: GamePhase, trigger: Trigger },

    #[error("no round is in progress")]
    NoActiveRound,
}

impl EngineError {
    /// Wire form sent to clients
    pub fn to_game_error(&self) -> GameError {
        match self {
            EngineError::ExhaustedCatalog { difficulty } => GameError::ExhaustedCatalog {
                difficulty: *difficulty,
            },
            EngineError::InvalidTransition { phase, trigger } => GameError::InvalidTransition {
                phase: *phase,
                trigger: format!("{:?}", trigger),
            },
            EngineError::NoActiveRound => GameError::NoActiveRound,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
