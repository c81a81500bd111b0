use doodle_types::GamePhase;

use crate::{EngineError, EngineResult};

/// Signals that can move a session between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    StartRound,
    CountdownElapsed,
    TimerExpired,
    /// A correct guess was shown, or the script ran out
    GuessingFinished,
    Advance,
    Reset,
}

/// The phase transition table. `more_rounds` is only consulted for
/// [`Trigger::Advance`] out of the results screen.
pub fn transition(from: GamePhase, trigger: Trigger, more_rounds: bool) -> EngineResult<GamePhase> {
    use GamePhase::*;

    let to = match (from, trigger) {
        (Menu, Trigger::StartRound) => Countdown,
        (Countdown, Trigger::CountdownElapsed) => Drawing,
        (Drawing, Trigger::TimerExpired) => Guessing,
        (Guessing, Trigger::GuessingFinished) => Results,
        (Results, Trigger::Advance) if more_rounds => Countdown,
        (Results, Trigger::Advance) => GameOver,
        (GameOver, Trigger::Reset) => Menu,
        (phase, trigger) => return Err(EngineError::InvalidTransition { phase, trigger }),
    };

    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [GamePhase; 6] = [
        GamePhase::Menu,
        GamePhase::Countdown,
        GamePhase::Drawing,
        GamePhase::Guessing,
        GamePhase::Results,
        GamePhase::GameOver,
    ];

    const ALL_TRIGGERS: [Trigger; 6] = [
        Trigger::StartRound,
        Trigger::CountdownElapsed,
        Trigger::TimerExpired,
        Trigger::GuessingFinished,
        Trigger::Advance,
        Trigger::Reset,
    ];

    #[test]
    fn test_happy_path() {
        let mut phase = GamePhase::Menu;
        for trigger in [
            Trigger::StartRound,
            Trigger::CountdownElapsed,
            Trigger::TimerExpired,
            Trigger::GuessingFinished,
        ] {
            phase = transition(phase, trigger, true).unwrap();
        }
        assert_eq!(phase, GamePhase::Results);

        assert_eq!(
            transition(phase, Trigger::Advance, true),
            Ok(GamePhase::Countdown)
        );
        assert_eq!(
            transition(phase, Trigger::Advance, false),
            Ok(GamePhase::GameOver)
        );
        assert_eq!(
            transition(GamePhase::GameOver, Trigger::Reset, false),
            Ok(GamePhase::Menu)
        );
    }

    #[test]
    fn test_drawing_only_accepts_timer_expiry() {
        for trigger in ALL_TRIGGERS {
            let result = transition(GamePhase::Drawing, trigger, true);
            if trigger == Trigger::TimerExpired {
                assert_eq!(result, Ok(GamePhase::Guessing));
            } else {
                assert_eq!(
                    result,
                    Err(EngineError::InvalidTransition {
                        phase: GamePhase::Drawing,
                        trigger
                    })
                );
            }
        }
    }

    #[test]
    fn test_exactly_one_trigger_per_phase() {
        for phase in ALL_PHASES {
            let accepted = ALL_TRIGGERS
                .iter()
                .filter(|trigger| transition(phase, **trigger, true).is_ok())
                .count();
            assert_eq!(accepted, 1, "{} accepts {} triggers", phase, accepted);
        }
    }

    #[test]
    fn test_game_over_is_terminal_until_reset() {
        for trigger in ALL_TRIGGERS {
            if trigger != Trigger::Reset {
                assert!(transition(GamePhase::GameOver, trigger, true).is_err());
            }
        }
    }
}
