const BASE_POINTS: u32 = 500;
const POINTS_LOST_PER_SECOND: u32 = 10;
const MIN_POINTS: u32 = 100;
const POINTS_PER_COIN: u32 = 50;
const STREAK_BONUS_THRESHOLD: u32 = 2;
const STREAK_BONUS_PER_ROUND: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundScore {
    pub points: u32,
    pub coins: u32,
    pub new_streak: u32,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score a finished round. Faster correct guesses earn more, floored at
    /// 100 points; a streak above two adds a bonus linear in the streak.
    pub fn score(correct: bool, elapsed_seconds: u32, current_streak: u32) -> RoundScore {
        if !correct {
            return RoundScore {
                points: 0,
                coins: 0,
                new_streak: 0,
            };
        }

        let decayed =
            BASE_POINTS.saturating_sub(elapsed_seconds.saturating_mul(POINTS_LOST_PER_SECOND));
        let mut points = decayed.max(MIN_POINTS);
        let mut coins = points / POINTS_PER_COIN;
        let new_streak = current_streak + 1;

        if new_streak > STREAK_BONUS_THRESHOLD {
            let bonus = new_streak * STREAK_BONUS_PER_ROUND;
            points += bonus;
            coins += bonus / POINTS_PER_COIN;
        }

        RoundScore {
            points,
            coins,
            new_streak,
        }
    }
}
