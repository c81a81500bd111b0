#![allow(dead_code)]

use doodle_core::{
    EngineConfig, GameSession, GuessScript, GuessSource, ScheduledTimer, SessionEvent,
    SessionEventHandler, TimerKind, WordCatalog,
};
use doodle_types::{Difficulty, GamePhase, GuessEvent};
use rand::RngCore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Two easy words, one medium, no hard ones
pub const SMALL_CATALOG: &str = r#"[
    {"id": 1, "word": "cat", "category": "animals", "difficulty": 1, "hints": ["It purrs"]},
    {"id": 2, "word": "sun", "category": "nature", "difficulty": 1},
    {"id": 3, "word": "rocket", "category": "objects", "difficulty": 2}
]"#;

pub fn create_small_catalog() -> WordCatalog {
    WordCatalog::from_json(SMALL_CATALOG).unwrap()
}

/// A round the guesser should play: wrong guesses at each delay, with the
/// last one replaced by the target when `correct` is set.
#[derive(Debug, Clone)]
pub struct PlannedRound {
    pub correct: bool,
    pub delays_ms: Vec<u32>,
}

pub fn hit_after(delays_ms: &[u32]) -> PlannedRound {
    PlannedRound {
        correct: true,
        delays_ms: delays_ms.to_vec(),
    }
}

pub fn miss_after(delays_ms: &[u32]) -> PlannedRound {
    PlannedRound {
        correct: false,
        delays_ms: delays_ms.to_vec(),
    }
}

pub struct PlannedGuesser {
    rounds: VecDeque<PlannedRound>,
}

impl PlannedGuesser {
    pub fn new(rounds: Vec<PlannedRound>) -> Self {
        Self {
            rounds: rounds.into(),
        }
    }
}

impl GuessSource for PlannedGuesser {
    fn script_for(&mut self, target: &str, _rng: &mut dyn RngCore) -> GuessScript {
        let round = self.rounds.pop_front().unwrap_or_else(|| miss_after(&[1000]));
        let last = round.delays_ms.len().saturating_sub(1);
        let events = round
            .delays_ms
            .iter()
            .enumerate()
            .map(|(i, delay)| GuessEvent {
                guess_text: if round.correct && i == last {
                    target.to_uppercase()
                } else {
                    "scribble".to_string()
                },
                confidence: 0.5,
                scheduled_delay_ms: *delay,
            })
            .collect();

        GuessScript {
            events,
            success: round.correct,
        }
    }
}

/// Plays the same fixed guesses every round, one second apart. `None`
/// stands for the round's target word.
pub struct SequenceGuesser {
    guesses: Vec<Option<&'static str>>,
}

impl SequenceGuesser {
    pub fn new(guesses: Vec<Option<&'static str>>) -> Self {
        Self { guesses }
    }
}

impl GuessSource for SequenceGuesser {
    fn script_for(&mut self, target: &str, _rng: &mut dyn RngCore) -> GuessScript {
        let events: Vec<GuessEvent> = self
            .guesses
            .iter()
            .map(|guess| GuessEvent {
                guess_text: guess.map_or_else(|| target.to_string(), str::to_string),
                confidence: 0.5,
                scheduled_delay_ms: 1000,
            })
            .collect();
        let success = self.guesses.last().is_some_and(Option::is_none);

        GuessScript { events, success }
    }
}

/// Small-catalog session driven by a fixed guess sequence
pub fn create_sequence_session(guesses: Vec<Option<&'static str>>) -> GameSession {
    GameSession::new(EngineConfig::default(), create_small_catalog())
        .with_seed(7)
        .with_guesser(Box::new(SequenceGuesser::new(guesses)))
}

/// Session over the builtin catalog with a fixed seed
pub fn create_seeded_session(seed: u64) -> GameSession {
    GameSession::new(EngineConfig::default(), WordCatalog::builtin().unwrap()).with_seed(seed)
}

/// Session whose guesser follows `plan`, one entry per round
pub fn create_planned_session(plan: Vec<PlannedRound>) -> GameSession {
    create_seeded_session(42).with_guesser(Box::new(PlannedGuesser::new(plan)))
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, session: &mut GameSession) {
        session.subscribe(Box::new(self.clone()));
    }

    pub fn get_events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&SessionEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }

    pub fn phases(&self) -> Vec<GamePhase> {
        let mut phases: Vec<GamePhase> = Vec::new();
        for event in self.events.lock().unwrap().iter() {
            if let SessionEvent::StateChanged { state } = event {
                if phases.last() != Some(&state.phase) {
                    phases.push(state.phase);
                }
            }
        }
        phases
    }
}

impl SessionEventHandler for EventCollector {
    fn handle_event(&mut self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Deterministic stand-in for the async driver. Timers are kept with their
/// due time and fired in order; stale handles are still handed back so the
/// session gets the chance to reject them.
#[derive(Default)]
pub struct VirtualClock {
    now: Duration,
    pending: Vec<(Duration, ScheduledTimer)>,
    rejected: usize,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Fires that the session ignored or refused
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn collect(&mut self, session: &mut GameSession) {
        for timer in session.take_scheduled() {
            self.pending.push((self.now + timer.delay, timer));
        }
    }

    /// Fire the earliest timer. `None` once nothing is pending.
    pub fn step(&mut self, session: &mut GameSession) -> Option<TimerKind> {
        self.collect(session);

        let next = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (due, _))| *due)
            .map(|(index, _)| index)?;
        let (due, timer) = self.pending.remove(next);
        self.now = due;

        if session.fire(timer.handle) != Ok(true) {
            self.rejected += 1;
        }
        self.collect(session);
        Some(timer.kind)
    }

    pub fn run_until(&mut self, session: &mut GameSession, phase: GamePhase) -> bool {
        while session.phase() != phase {
            if self.step(session).is_none() {
                return false;
            }
        }
        true
    }
}

/// Play one round from the menu or a results screen through to results
pub fn play_round(clock: &mut VirtualClock, session: &mut GameSession, difficulty: Difficulty) {
    match session.phase() {
        GamePhase::Menu => {
            session.start_round(difficulty).unwrap();
        }
        GamePhase::Results => {
            session.advance().unwrap();
        }
        other => panic!("cannot start a round from {}", other),
    }
    assert!(clock.run_until(session, GamePhase::Results));
}
