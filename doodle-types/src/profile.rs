use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type ProfileId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerProfile {
    pub id: ProfileId,
    pub total_coins: u32,
    pub high_score: u32,
    pub unlocked_brushes: Vec<String>,
    pub level: u32,
    pub experience: u32,
    pub games_played: u32,
    pub total_drawings: u32,
    pub best_streak: u32,
    pub created_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameCompletion {
    pub is_new_high_score: bool,
    pub leveled_up: bool,
    pub profile: PlayerProfile,
}
