use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Difficulty, GamePhase};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    ExhaustedCatalog { difficulty: Difficulty },
    InvalidTransition { phase: GamePhase, trigger: String },
    NoActiveRound,
    SessionNotFound { session_id: String },
    RateLimitExceeded,
    InvalidMessage { reason: String },
}
