use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

pub type SessionId = Uuid;
pub type WordId = u32;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Numeric tier, 1 (easy) through 3 (hard)
    pub fn tier(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub hints: Vec<String>,
}

impl Word {
    /// Case-insensitive, whitespace-trimmed comparison against a guess
    pub fn matches(&self, guess: &str) -> bool {
        guess.trim().to_lowercase() == self.text.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GamePhase {
    Menu,
    Countdown,
    Drawing,
    Guessing,
    Results,
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GamePhase::Menu => "menu",
            GamePhase::Countdown => "countdown",
            GamePhase::Drawing => "drawing",
            GamePhase::Guessing => "guessing",
            GamePhase::Results => "results",
            GamePhase::GameOver => "gameOver",
        };
        f.write_str(label)
    }
}

/// Result of one finished round, kept on the state for the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundOutcome {
    pub was_correct: bool,
    pub points: u32,
    pub coins: u32,
    pub elapsed_seconds: u32,
}

/// Snapshot of a game session. Handed out by value after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundState {
    pub round_number: u32,
    pub max_rounds: u32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub word: Option<Word>,
    pub time_remaining_seconds: u32,
    /// Points earned in the current round
    pub score: u32,
    pub total_score: u32,
    pub coins: u32,
    pub streak: u32,
    pub last_outcome: Option<RoundOutcome>,
}

impl RoundState {
    pub fn new(max_rounds: u32, drawing_seconds: u32) -> Self {
        Self {
            round_number: 1,
            max_rounds,
            phase: GamePhase::Menu,
            difficulty: Difficulty::default(),
            word: None,
            time_remaining_seconds: drawing_seconds,
            score: 0,
            total_score: 0,
            coins: 0,
            streak: 0,
            last_outcome: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessEvent {
    pub guess_text: String,
    pub confidence: f64,
    pub scheduled_delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcessedGuess {
    pub guess_text: String,
    pub confidence: f64,
    /// Milliseconds since the guessing phase began
    pub timestamp_ms: u32,
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_tiers() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_tier(difficulty.tier()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_tier(0), None);
        assert_eq!(Difficulty::from_tier(4), None);
    }

    #[test]
    fn test_word_matching_ignores_case_and_whitespace() {
        let word = Word {
            id: 1,
            text: "Cat".to_string(),
            category: "animals".to_string(),
            difficulty: Difficulty::Easy,
            hints: vec![],
        };

        assert!(word.matches("cat"));
        assert!(word.matches("  CAT "));
        assert!(!word.matches("cats"));
        assert!(!word.matches(""));
    }
}
