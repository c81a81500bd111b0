/// Outcome of a single clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting down
    Running { remaining: u32 },
    /// This tick reached zero. Reported exactly once per run.
    Expired,
    /// The clock is not running; nothing changed
    Idle { remaining: u32 },
}

/// Countdown clock for the drawing phase.
#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    remaining: u32,
    running: bool,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = seconds > 0;
    }

    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Idle {
                remaining: self.remaining,
            };
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerTick::Expired
        } else {
            TimerTick::Running {
                remaining: self.remaining,
            }
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
