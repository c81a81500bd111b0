use doodle_types::GuessEvent;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use std::collections::HashMap;

const RELATED_GUESS_CHANCE: f64 = 0.4;
const SUCCESS_CHANCE: f64 = 0.7;

const DEFAULT_ASSOCIATIONS: &[(&str, &[&str])] = &[
    ("cat", &["dog", "animal", "pet", "kitten", "mouse"]),
    ("house", &["home", "building", "roof", "door", "window"]),
    ("car", &["vehicle", "truck", "bike", "wheel", "road"]),
    ("tree", &["plant", "leaf", "branch", "forest", "flower"]),
    ("sun", &["star", "moon", "light", "sky", "bright"]),
    ("fish", &["water", "ocean", "swimming", "whale", "shark"]),
    ("pizza", &["food", "cheese", "bread", "slice", "italian"]),
    ("guitar", &["music", "instrument", "string", "sound", "band"]),
    ("rainbow", &["colors", "sky", "rain", "arc", "bright"]),
    ("butterfly", &["insect", "wings", "flower", "colorful", "flying"]),
];

const DEFAULT_DECOYS: &[&str] = &[
    "circle", "square", "line", "shape", "blob", "scribble", "drawing", "art", "sketch", "doodle",
    "mark", "curve", "pattern", "design", "abstract", "random", "messy", "unclear",
];

/// A scripted run of guesses for one round
#[derive(Debug, Clone, PartialEq)]
pub struct GuessScript {
    pub events: Vec<GuessEvent>,
    /// Whether the final event names the target word
    pub success: bool,
}

impl GuessScript {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Anything that can play the guesser for a round
pub trait GuessSource: Send {
    fn script_for(&mut self, target: &str, rng: &mut dyn RngCore) -> GuessScript;
}

/// Produces the simulated guesser's output. No inference happens here: the
/// sequence is drawn from decoy tables and paced to look like thinking.
#[derive(Debug, Clone)]
pub struct GuessScripter {
    associations: HashMap<String, Vec<String>>,
    decoys: Vec<String>,
}

impl Default for GuessScripter {
    fn default() -> Self {
        let associations = DEFAULT_ASSOCIATIONS
            .iter()
            .map(|(word, related)| {
                (
                    word.to_string(),
                    related.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect();
        let decoys = DEFAULT_DECOYS.iter().map(|d| d.to_string()).collect();

        Self {
            associations,
            decoys,
        }
    }
}

impl GuessSource for GuessScripter {
    fn script_for(&mut self, target: &str, rng: &mut dyn RngCore) -> GuessScript {
        self.build_sequence(target, rng)
    }
}

impl GuessScripter {
    pub fn new(associations: HashMap<String, Vec<String>>, decoys: Vec<String>) -> Self {
        Self {
            associations,
            decoys,
        }
    }

    /// Build the guess sequence for `target`. Deterministic for a given `rng` state.
    pub fn build_sequence<R: Rng + ?Sized>(&self, target: &str, rng: &mut R) -> GuessScript {
        let target_key = target.trim().to_lowercase();
        let related = self.related_pool(&target_key);
        let generic = self.generic_pool(&target_key);

        let total = rng.random_range(3..=6);
        let mut events = Vec::with_capacity(total);

        for _ in 0..total - 1 {
            let use_related = rng.random_bool(RELATED_GUESS_CHANCE);
            let pool = if use_related && !related.is_empty() {
                &related
            } else {
                &generic
            };

            events.push(GuessEvent {
                guess_text: pick(pool, rng),
                confidence: rng.random_range(0.2..0.6),
                scheduled_delay_ms: rng.random_range(1000..3000),
            });
        }

        let success = rng.random_bool(SUCCESS_CHANCE);
        let last = if success {
            GuessEvent {
                guess_text: target.trim().to_string(),
                confidence: rng.random_range(0.7..1.0),
                scheduled_delay_ms: rng.random_range(1500..3500),
            }
        } else {
            GuessEvent {
                guess_text: pick(&generic, rng),
                confidence: rng.random_range(0.3..0.7),
                scheduled_delay_ms: rng.random_range(1500..3500),
            }
        };
        events.push(last);

        GuessScript { events, success }
    }

    // Decoys equal to the target are dropped so only the final slot of a
    // success run can ever match.
    fn related_pool(&self, target_key: &str) -> Vec<&str> {
        self.associations
            .get(target_key)
            .map(|words| {
                words
                    .iter()
                    .map(String::as_str)
                    .filter(|w| w.to_lowercase() != target_key)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn generic_pool(&self, target_key: &str) -> Vec<&str> {
        self.decoys
            .iter()
            .map(String::as_str)
            .filter(|w| w.to_lowercase() != target_key)
            .collect()
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool.choose(rng)
        .map(|w| w.to_string())
        .unwrap_or_else(|| "scribble".to_string())
}
