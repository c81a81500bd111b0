use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use doodle_types::{Difficulty, Word, WordId};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::{EngineError, EngineResult};

const BUILTIN_WORDS: &str = include_str!("../data/words.json");

/// On-disk shape of a catalog entry
#[derive(Debug, Deserialize)]
struct WordRecord {
    id: WordId,
    word: String,
    category: String,
    difficulty: u8,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WordCatalog {
    words: Vec<Word>,
    used: HashSet<WordId>,
}

impl WordCatalog {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            used: HashSet::new(),
        }
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_WORDS)
    }

    /// Parse a JSON array of `{id, word, category, difficulty, hints}` records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<WordRecord> =
            serde_json::from_str(json).context("Failed to parse word catalog")?;

        let mut seen = HashSet::new();
        let mut words = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                return Err(anyhow!("Duplicate word id {}", record.id));
            }
            let difficulty = Difficulty::from_tier(record.difficulty).ok_or_else(|| {
                anyhow!(
                    "Word '{}' has unknown difficulty {}",
                    record.word,
                    record.difficulty
                )
            })?;
            let text = record.word.trim().to_string();
            if text.is_empty() {
                return Err(anyhow!("Word {} is blank", record.id));
            }

            words.push(Word {
                id: record.id,
                text,
                category: record.category,
                difficulty,
                hints: record.hints,
            });
        }

        Ok(Self::new(words))
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)?;
        info!("Loaded {} words from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Hand out a random word of the given tier that has not been dispensed yet.
    /// Once a tier runs dry the used set is cleared and selection cycles.
    pub fn next_word<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> EngineResult<Word> {
        for attempt in 0..2 {
            let picked = {
                let available: Vec<&Word> = self
                    .words
                    .iter()
                    .filter(|w| w.difficulty == difficulty && !self.used.contains(&w.id))
                    .collect();
                available.choose(rng).map(|word| (*word).clone())
            };

            if let Some(word) = picked {
                self.used.insert(word.id);
                debug!("Dispensed word {} ({})", word.id, difficulty);
                return Ok(word);
            }

            if attempt == 0 {
                debug!("All {} words used, resetting used words", difficulty);
                self.used.clear();
            }
        }

        Err(EngineError::ExhaustedCatalog { difficulty })
    }

    pub fn words_by_difficulty(&self, difficulty: Difficulty) -> Vec<&Word> {
        self.words
            .iter()
            .filter(|w| w.difficulty == difficulty)
            .collect()
    }

    pub fn word_count(&self, difficulty: Difficulty) -> usize {
        self.words
            .iter()
            .filter(|w| w.difficulty == difficulty)
            .count()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn mark_used(&mut self, id: WordId) {
        self.used.insert(id);
    }

    pub fn reset_used(&mut self) {
        self.used.clear();
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Same word for everyone on a given calendar day
    pub fn daily_challenge(&self, date: NaiveDate) -> Option<&Word> {
        if self.words.is_empty() {
            return None;
        }

        let seed: usize = date
            .format("%a %b %d %Y")
            .to_string()
            .chars()
            .map(|c| c as usize)
            .sum();
        self.words.get(seed % self.words.len())
    }
}
