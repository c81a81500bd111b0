use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    Difficulty, DrawingSnapshot, GameError, PlayerProfile, ProcessedGuess, RoundOutcome,
    RoundState, SessionId, StrokePoint,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    StartRound { difficulty: Difficulty },
    AddStroke { points: Vec<StrokePoint>, color: String, size: u32 },
    Undo,
    Clear,
    NextRound,
    Reset,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    SessionStarted { session_id: SessionId, profile: PlayerProfile },
    StateUpdate { state: RoundState },
    GuessProcessed { guess: ProcessedGuess },
    RoundResult { outcome: RoundOutcome, state: RoundState },
    GameOver { total_score: u32, rounds_played: u32, is_new_high_score: bool },
    DrawingUpdate { drawing: Option<DrawingSnapshot> },
    ProfileUpdate { profile: PlayerProfile },
    Notice { message: String },
    Error { error: GameError },
    Pong,
}
