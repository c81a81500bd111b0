use anyhow::Result;
use doodle_types::{GameCompletion, PlayerProfile, ProfileId};

pub const DEFAULT_BRUSH: &str = "default";
const UNLOCKABLE_BRUSHES: [&str; 5] = ["neon", "pixel", "watercolor", "crayon", "marker"];
const POINTS_PER_EXPERIENCE: u32 = 10;
const EXPERIENCE_PER_LEVEL: u32 = 1000;
const LEVELS_PER_UNLOCK: u32 = 3;

/// The player-profile collaborator. The engine reports results and never
/// waits on persistence; an `Err` is surfaced as a notice only.
pub trait ProfileStore: Send {
    fn record_round_result(&mut self, coins_earned: u32) -> Result<()>;
    fn record_streak(&mut self, streak: u32) -> Result<()>;
    fn record_game_completion(&mut self, total_score: u32, rounds_played: u32)
    -> Result<GameCompletion>;
    fn profile(&self) -> Result<PlayerProfile>;
}

pub fn new_profile(id: ProfileId) -> PlayerProfile {
    PlayerProfile {
        id,
        total_coins: 0,
        high_score: 0,
        unlocked_brushes: vec![DEFAULT_BRUSH.to_string()],
        level: 1,
        experience: 0,
        games_played: 0,
        total_drawings: 0,
        best_streak: 0,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

pub fn credit_coins(profile: &mut PlayerProfile, coins: u32) {
    profile.total_coins = profile.total_coins.saturating_add(coins);
}

/// Returns true when `streak` is a new personal best
pub fn record_best_streak(profile: &mut PlayerProfile, streak: u32) -> bool {
    if streak > profile.best_streak {
        profile.best_streak = streak;
        true
    } else {
        false
    }
}

/// Returns true on level up. A brush is unlocked every third level.
pub fn add_experience(profile: &mut PlayerProfile, amount: u32) -> bool {
    profile.experience = profile.experience.saturating_add(amount);

    let new_level = profile.experience / EXPERIENCE_PER_LEVEL + 1;
    if new_level <= profile.level {
        return false;
    }

    profile.level = new_level;
    if new_level % LEVELS_PER_UNLOCK == 0 {
        let next = UNLOCKABLE_BRUSHES
            .iter()
            .find(|brush| !profile.unlocked_brushes.iter().any(|b| b == *brush));
        if let Some(brush) = next {
            profile.unlocked_brushes.push(brush.to_string());
        }
    }
    true
}

pub fn complete_game(
    profile: &mut PlayerProfile,
    total_score: u32,
    rounds_played: u32,
) -> GameCompletion {
    profile.games_played += 1;
    profile.total_drawings = profile.total_drawings.saturating_add(rounds_played);

    let is_new_high_score = total_score > profile.high_score;
    if is_new_high_score {
        profile.high_score = total_score;
    }
    let leveled_up = add_experience(profile, total_score / POINTS_PER_EXPERIENCE);

    GameCompletion {
        is_new_high_score,
        leveled_up,
        profile: profile.clone(),
    }
}

/// Profile kept for the lifetime of the process
#[derive(Debug, Clone)]
pub struct InMemoryProfile {
    profile: PlayerProfile,
}

impl InMemoryProfile {
    pub fn new(id: ProfileId) -> Self {
        Self {
            profile: new_profile(id),
        }
    }

    pub fn from_profile(profile: PlayerProfile) -> Self {
        Self { profile }
    }
}

impl ProfileStore for InMemoryProfile {
    fn record_round_result(&mut self, coins_earned: u32) -> Result<()> {
        credit_coins(&mut self.profile, coins_earned);
        Ok(())
    }

    fn record_streak(&mut self, streak: u32) -> Result<()> {
        record_best_streak(&mut self.profile, streak);
        Ok(())
    }

    fn record_game_completion(
        &mut self,
        total_score: u32,
        rounds_played: u32,
    ) -> Result<GameCompletion> {
        Ok(complete_game(&mut self.profile, total_score, rounds_played))
    }

    fn profile(&self) -> Result<PlayerProfile> {
        Ok(self.profile.clone())
    }
}
