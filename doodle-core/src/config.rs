use std::time::Duration;

/// Tunables for one game session
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_rounds: u32,
    pub drawing_seconds: u32,
    pub countdown_seconds: u32,
    /// Cadence of the drawing clock. One real second in play.
    pub tick_interval: Duration,
    /// Pause between a correct guess and the results screen
    pub reveal_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            drawing_seconds: 30,
            countdown_seconds: 3,
            tick_interval: Duration::from_secs(1),
            reveal_delay: Duration::from_millis(1500),
        }
    }
}

impl EngineConfig {
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_seconds as u64)
    }
}
