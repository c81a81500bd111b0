use anyhow::{Context, Result};
use doodle_core::EngineConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub engine: EngineConfig,
    pub session_timeout_minutes: u64,
    /// JSON catalog to load instead of the built-in words
    pub words_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults; values
    /// that fail to parse are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let reveal_delay_ms = parse_or(
            &lookup,
            "REVEAL_DELAY_MS",
            defaults.reveal_delay.as_millis() as u64,
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            engine: EngineConfig {
                max_rounds: parse_or(&lookup, "MAX_ROUNDS", defaults.max_rounds)?,
                drawing_seconds: parse_or(&lookup, "DRAWING_SECONDS", defaults.drawing_seconds)?,
                countdown_seconds: parse_or(
                    &lookup,
                    "COUNTDOWN_SECONDS",
                    defaults.countdown_seconds,
                )?,
                reveal_delay: Duration::from_millis(reveal_delay_ms),
                ..defaults
            },
            session_timeout_minutes: parse_or(&lookup, "SESSION_TIMEOUT_MINUTES", 30)?,
            words_file: lookup("WORDS_FILE").filter(|path| !path.trim().is_empty()),
        })
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes.saturating_mul(60))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            engine: EngineConfig::default(),
            session_timeout_minutes: 30,
            words_file: None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.session_timeout(), Duration::from_secs(1800));
        assert!(config.words_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("MAX_ROUNDS", "3"),
            ("DRAWING_SECONDS", "45"),
            ("REVEAL_DELAY_MS", "0"),
            ("WORDS_FILE", "words.json"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.engine.max_rounds, 3);
        assert_eq!(config.engine.drawing_seconds, 45);
        assert_eq!(config.engine.countdown_seconds, 3);
        assert!(config.engine.reveal_delay.is_zero());
        assert_eq!(config.words_file.as_deref(), Some("words.json"));
    }

    #[test]
    fn test_huge_session_timeout_saturates() {
        let config = Config::from_lookup(lookup_from(&[(
            "SESSION_TIMEOUT_MINUTES",
            "18446744073709551615",
        )]))
        .unwrap();
        assert_eq!(config.session_timeout(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
