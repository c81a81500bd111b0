use doodle_types::RoundState;

/// Final numbers handed to the profile collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub total_score: u32,
    pub rounds_played: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    NextRound { round_number: u32 },
    Finished(GameSummary),
}

/// Decides what follows a results screen
#[derive(Debug, Clone, Copy)]
pub struct RoundSequencer {
    max_rounds: u32,
}

impl RoundSequencer {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn has_more_rounds(&self, state: &RoundState) -> bool {
        state.round_number < self.max_rounds
    }

    pub fn advance(&self, state: &RoundState) -> Progression {
        if self.has_more_rounds(state) {
            Progression::NextRound {
                round_number: state.round_number + 1,
            }
        } else {
            Progression::Finished(GameSummary {
                total_score: state.total_score,
                rounds_played: state.round_number,
            })
        }
    }

    /// Blank state for a new game
    pub fn fresh_state(&self, drawing_seconds: u32) -> RoundState {
        RoundState::new(self.max_rounds, drawing_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_until_max_rounds() {
        let sequencer = RoundSequencer::new(3);
        let mut state = sequencer.fresh_state(30);

        for expected in 2..=3 {
            match sequencer.advance(&state) {
                Progression::NextRound { round_number } => {
                    assert_eq!(round_number, expected);
                    state.round_number = round_number;
                }
                other => panic!("expected another round, got {:?}", other),
            }
        }

        state.total_score = 1250;
        assert_eq!(
            sequencer.advance(&state),
            Progression::Finished(GameSummary {
                total_score: 1250,
                rounds_played: 3
            })
        );
    }

    #[test]
    fn test_single_round_game() {
        let sequencer = RoundSequencer::new(1);
        let state = sequencer.fresh_state(30);
        assert!(!sequencer.has_more_rounds(&state));
        assert!(matches!(sequencer.advance(&state), Progression::Finished(_)));
    }

    #[test]
    fn test_zero_rounds_is_clamped() {
        let sequencer = RoundSequencer::new(0);
        assert_eq!(sequencer.max_rounds(), 1);
        assert_eq!(sequencer.fresh_state(30).max_rounds, 1);
    }
}
