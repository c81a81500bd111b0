use anyhow::Result;
use doodle_types::{
    Difficulty, DrawingSnapshot, GamePhase, PlayerProfile, ProcessedGuess, RoundOutcome,
    RoundState, StrokePoint, Word,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    DrawingSurface, EngineConfig, EngineError, EngineResult, GameSummary, GuessScript,
    GuessScripter, GuessSource, InMemoryProfile, ProfileStore, Progression, RoundSequencer,
    RoundTimer, Schedule, ScheduledTimer, ScoringEngine, SessionEvent, SessionEventBus,
    SessionEventHandler, Sketchpad, TimerHandle, TimerKind, TimerTick, Trigger, WordCatalog,
    transition,
};

/// Where the guesser is in its script for the current round
#[derive(Debug)]
struct Playback {
    script: GuessScript,
    next_index: usize,
    /// Sum of the delays played so far
    elapsed_ms: u32,
    correct: bool,
}

/// One player's game: the phase machine plus everything it drives.
///
/// The session is single-threaded and never sleeps. Every delayed step is
/// requested through [`GameSession::take_scheduled`] and applied when the
/// driver hands the handle back to [`GameSession::fire`].
pub struct GameSession {
    config: EngineConfig,
    sequencer: RoundSequencer,
    state: RoundState,
    catalog: WordCatalog,
    guesser: Box<dyn GuessSource>,
    drawing: Box<dyn DrawingSurface>,
    profile: Box<dyn ProfileStore>,
    rng: Box<dyn RngCore + Send>,
    timer: RoundTimer,
    schedule: Schedule,
    playback: Option<Playback>,
    guess_log: Vec<ProcessedGuess>,
    events: SessionEventBus,
}

impl GameSession {
    pub fn new(config: EngineConfig, catalog: WordCatalog) -> Self {
        let config = EngineConfig {
            drawing_seconds: config.drawing_seconds.max(1),
            ..config
        };
        let sequencer = RoundSequencer::new(config.max_rounds);

        Self {
            state: sequencer.fresh_state(config.drawing_seconds),
            sequencer,
            config,
            catalog,
            guesser: Box::new(GuessScripter::default()),
            drawing: Box::new(Sketchpad::new()),
            profile: Box::new(InMemoryProfile::new(Uuid::new_v4())),
            rng: Box::new(StdRng::from_os_rng()),
            timer: RoundTimer::new(),
            schedule: Schedule::new(),
            playback: None,
            guess_log: Vec::new(),
            events: SessionEventBus::new(),
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_guesser(mut self, guesser: Box<dyn GuessSource>) -> Self {
        self.guesser = guesser;
        self
    }

    pub fn with_drawing(mut self, drawing: Box<dyn DrawingSurface>) -> Self {
        self.drawing = drawing;
        self
    }

    pub fn with_profile(mut self, profile: Box<dyn ProfileStore>) -> Self {
        self.profile = profile;
        self
    }

    pub fn subscribe(&mut self, handler: Box<dyn SessionEventHandler>) {
        self.events.add_handler(handler);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Guesses shown so far this round, oldest first
    pub fn guess_log(&self) -> &[ProcessedGuess] {
        &self.guess_log
    }

    pub fn drawing(&self) -> Option<DrawingSnapshot> {
        self.drawing.snapshot()
    }

    pub fn profile(&self) -> Result<PlayerProfile> {
        self.profile.profile()
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    pub fn pending_timers(&self) -> usize {
        self.schedule.pending_count()
    }

    /// Timers requested since the last call. The driver must call
    /// [`GameSession::fire`] with each handle once its delay has passed.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTimer> {
        self.schedule.take_scheduled()
    }

    /// Leave the menu and start the first round at `difficulty`
    pub fn start_round(&mut self, difficulty: Difficulty) -> EngineResult<RoundState> {
        let next = transition(self.state.phase, Trigger::StartRound, false)?;
        let word = self.catalog.next_word(difficulty, self.rng.as_mut())?;

        self.state.difficulty = difficulty;
        self.begin_countdown(word, next);
        Ok(self.state.clone())
    }

    /// Move on from the results screen: either the next round at the same
    /// difficulty or the end of the game.
    pub fn advance(&mut self) -> EngineResult<RoundState> {
        let more_rounds = self.sequencer.has_more_rounds(&self.state);
        let next = transition(self.state.phase, Trigger::Advance, more_rounds)?;

        match self.sequencer.advance(&self.state) {
            Progression::NextRound { round_number } => {
                let word = self
                    .catalog
                    .next_word(self.state.difficulty, self.rng.as_mut())?;
                self.state.round_number = round_number;
                self.begin_countdown(word, next);
            }
            Progression::Finished(summary) => self.finish_game(next, summary),
        }

        Ok(self.state.clone())
    }

    /// Back to the menu with a blank game. Allowed from any phase; whatever
    /// was pending for the abandoned round is invalidated.
    pub fn reset(&mut self) -> RoundState {
        let phase = self.state.phase;
        match transition(phase, Trigger::Reset, false) {
            Ok(_) => info!("Starting a new game"),
            Err(_) => info!("Abandoning game during {} phase", phase),
        }

        self.schedule.begin_round();
        self.timer.stop();
        self.playback = None;
        self.guess_log.clear();
        self.drawing.discard();
        self.state = self.sequencer.fresh_state(self.config.drawing_seconds);

        self.events.publish(SessionEvent::DrawingChanged { drawing: None });
        self.publish_state();
        self.state.clone()
    }

    /// Apply a due timer. Returns `Ok(false)` for a stale handle, which is
    /// dropped without touching the session.
    pub fn fire(&mut self, handle: TimerHandle) -> EngineResult<bool> {
        let Some(kind) = self.schedule.fire(handle) else {
            debug!("Ignoring stale timer from round {}", handle.round());
            return Ok(false);
        };

        let result = match kind {
            TimerKind::CountdownElapsed => self.finish_countdown(),
            TimerKind::DrawingTick => self.tick(),
            TimerKind::GuessDue { index } => self.process_guess(index),
            TimerKind::RevealElapsed => self.finish_guessing(),
        };

        if let Err(e) = &result {
            warn!("Timer {:?} rejected: {}", kind, e);
        }
        result.map(|_| true)
    }

    pub fn add_stroke(
        &mut self,
        points: Vec<StrokePoint>,
        color: Option<String>,
        size: Option<u32>,
    ) -> EngineResult<DrawingSnapshot> {
        self.ensure_drawing()?;
        let snapshot = self.drawing.add_stroke(points, color, size)?;
        self.publish_drawing(&snapshot);
        Ok(snapshot)
    }

    pub fn undo(&mut self) -> EngineResult<DrawingSnapshot> {
        self.ensure_drawing()?;
        let snapshot = self.drawing.undo()?;
        self.publish_drawing(&snapshot);
        Ok(snapshot)
    }

    pub fn clear(&mut self) -> EngineResult<DrawingSnapshot> {
        self.ensure_drawing()?;
        let snapshot = self.drawing.clear()?;
        self.publish_drawing(&snapshot);
        Ok(snapshot)
    }

    fn begin_countdown(&mut self, word: Word, phase: GamePhase) {
        let round = self.schedule.begin_round();
        self.timer.stop();
        self.playback = None;
        self.guess_log.clear();
        self.drawing.discard();

        info!(
            "Round {}/{} ({}) starting with word {} [{}]",
            self.state.round_number, self.state.max_rounds, self.state.difficulty, word.id, round
        );

        self.state.word = Some(word);
        self.state.phase = phase;
        self.state.time_remaining_seconds = self.config.drawing_seconds;
        self.state.score = 0;
        self.state.last_outcome = None;

        self.schedule
            .schedule(TimerKind::CountdownElapsed, self.config.countdown());
        self.publish_state();
    }

    fn finish_countdown(&mut self) -> EngineResult<()> {
        let next = transition(self.state.phase, Trigger::CountdownElapsed, false)?;
        let word_id = self.current_word()?.id;

        self.state.phase = next;
        self.state.time_remaining_seconds = self.config.drawing_seconds;
        self.timer.start(self.config.drawing_seconds);
        self.drawing.start(word_id);
        self.schedule
            .schedule(TimerKind::DrawingTick, self.config.tick_interval);

        debug!("Drawing started for round {}", self.state.round_number);
        self.events.publish(SessionEvent::DrawingChanged {
            drawing: self.drawing.snapshot(),
        });
        self.publish_state();
        Ok(())
    }

    fn tick(&mut self) -> EngineResult<()> {
        if self.state.phase != GamePhase::Drawing {
            return Err(EngineError::InvalidTransition {
                phase: self.state.phase,
                trigger: Trigger::TimerExpired,
            });
        }

        match self.timer.tick() {
            TimerTick::Running { remaining } => {
                self.state.time_remaining_seconds = remaining;
                self.schedule
                    .schedule(TimerKind::DrawingTick, self.config.tick_interval);
                self.publish_state();
                Ok(())
            }
            TimerTick::Expired => {
                self.state.time_remaining_seconds = 0;
                self.begin_guessing()
            }
            TimerTick::Idle { remaining } => {
                debug!("Tick on an idle clock ({}s left)", remaining);
                Ok(())
            }
        }
    }

    fn begin_guessing(&mut self) -> EngineResult<()> {
        let next = transition(self.state.phase, Trigger::TimerExpired, false)?;
        let target = self.current_word()?.text.clone();

        self.state.phase = next;
        let drawing = match self.drawing.complete() {
            Ok(drawing) => Some(drawing),
            Err(e) => {
                debug!("No drawing to hand in: {}", e);
                None
            }
        };

        let script = self.guesser.script_for(&target, self.rng.as_mut());
        debug!(
            "Guesser scripted {} guesses (success: {})",
            script.len(),
            script.success
        );
        let first_delay = script.events.first().map(|e| e.scheduled_delay_ms);
        self.playback = Some(Playback {
            script,
            next_index: 0,
            elapsed_ms: 0,
            correct: false,
        });

        self.events.publish(SessionEvent::DrawingChanged { drawing });
        self.publish_state();

        match first_delay {
            Some(delay) => {
                self.schedule
                    .schedule(TimerKind::GuessDue { index: 0 }, millis(delay));
                Ok(())
            }
            None => self.finish_guessing(),
        }
    }

    fn process_guess(&mut self, index: usize) -> EngineResult<()> {
        if self.state.phase != GamePhase::Guessing {
            return Err(EngineError::NoActiveRound);
        }

        let guess = {
            let word = self.state.word.as_ref().ok_or(EngineError::NoActiveRound)?;
            let playback = self.playback.as_mut().ok_or(EngineError::NoActiveRound)?;
            if index != playback.next_index {
                return Err(EngineError::NoActiveRound);
            }
            let event = playback
                .script
                .events
                .get(index)
                .cloned()
                .ok_or(EngineError::NoActiveRound)?;

            playback.next_index += 1;
            playback.elapsed_ms = playback.elapsed_ms.saturating_add(event.scheduled_delay_ms);
            let is_correct = word.matches(&event.guess_text);
            if is_correct {
                playback.correct = true;
            }

            ProcessedGuess {
                guess_text: event.guess_text,
                confidence: event.confidence,
                timestamp_ms: playback.elapsed_ms,
                is_correct,
            }
        };

        debug!(
            "Guess {} at {}ms: {} ({:.2})",
            index + 1,
            guess.timestamp_ms,
            guess.guess_text,
            guess.confidence
        );
        let correct = guess.is_correct;
        self.guess_log.push(guess.clone());
        self.events.publish(SessionEvent::GuessProcessed { guess });

        if correct {
            // Later guesses are never scheduled; hold the reveal briefly.
            if self.config.reveal_delay.is_zero() {
                return self.finish_guessing();
            }
            self.schedule
                .schedule(TimerKind::RevealElapsed, self.config.reveal_delay);
            return Ok(());
        }

        let next_delay = self
            .playback
            .as_ref()
            .and_then(|p| p.script.events.get(index + 1))
            .map(|e| e.scheduled_delay_ms);
        match next_delay {
            Some(delay) => {
                self.schedule
                    .schedule(TimerKind::GuessDue { index: index + 1 }, millis(delay));
                Ok(())
            }
            None => self.finish_guessing(),
        }
    }

    fn finish_guessing(&mut self) -> EngineResult<()> {
        let (correct, elapsed_ms) = self
            .playback
            .as_ref()
            .map(|p| (p.correct, p.elapsed_ms))
            .ok_or(EngineError::NoActiveRound)?;
        let next = transition(self.state.phase, Trigger::GuessingFinished, false)?;
        self.playback = None;

        let elapsed_seconds = if correct {
            elapsed_ms / 1000
        } else {
            self.config.drawing_seconds
        };
        let score = ScoringEngine::score(correct, elapsed_seconds, self.state.streak);
        let outcome = RoundOutcome {
            was_correct: correct,
            points: score.points,
            coins: score.coins,
            elapsed_seconds,
        };

        self.state.phase = next;
        self.state.score = score.points;
        self.state.total_score = self.state.total_score.saturating_add(score.points);
        self.state.coins = self.state.coins.saturating_add(score.coins);
        self.state.streak = score.new_streak;
        self.state.last_outcome = Some(outcome.clone());

        info!(
            "Round {} scored: correct={} points={} coins={} streak={}",
            self.state.round_number, correct, score.points, score.coins, score.new_streak
        );

        if let Err(e) = self.profile.record_round_result(outcome.coins) {
            self.report_profile_failure("coins", e);
        }
        if let Err(e) = self.profile.record_streak(self.state.streak) {
            self.report_profile_failure("streak", e);
        }

        self.events.publish(SessionEvent::RoundScored {
            outcome,
            state: self.state.clone(),
        });
        self.publish_state();
        Ok(())
    }

    fn finish_game(&mut self, phase: GamePhase, summary: GameSummary) {
        self.schedule.cancel_all();
        self.timer.stop();
        self.drawing.discard();
        self.state.phase = phase;

        info!(
            "Game over after {} rounds with {} points",
            summary.rounds_played, summary.total_score
        );

        let completion = match self
            .profile
            .record_game_completion(summary.total_score, summary.rounds_played)
        {
            Ok(completion) => Some(completion),
            Err(e) => {
                self.report_profile_failure("game result", e);
                None
            }
        };

        self.events
            .publish(SessionEvent::GameCompleted { summary, completion });
        self.publish_state();
    }

    fn ensure_drawing(&self) -> EngineResult<()> {
        if self.state.phase == GamePhase::Drawing {
            Ok(())
        } else {
            Err(EngineError::NoActiveRound)
        }
    }

    fn current_word(&self) -> EngineResult<&Word> {
        self.state.word.as_ref().ok_or(EngineError::NoActiveRound)
    }

    fn report_profile_failure(&mut self, what: &str, error: anyhow::Error) {
        warn!("Failed to record {}: {:#}", what, error);
        self.events.publish(SessionEvent::Notice {
            message: format!("Your {} could not be saved", what),
        });
    }

    fn publish_drawing(&mut self, snapshot: &DrawingSnapshot) {
        self.events.publish(SessionEvent::DrawingChanged {
            drawing: Some(snapshot.clone()),
        });
    }

    fn publish_state(&mut self) {
        let state = self.state.clone();
        self.events.publish(SessionEvent::StateChanged { state });
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(ms as u64)
}
