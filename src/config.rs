use clap::Parser;
use std::time::Duration;

use crate::scoreboard::ScoreboardRules;
use crate::storage::MemoryCacheStorage;

/// Well-known storage key the scoreboard snapshot lives under.
pub const DEFAULT_STORAGE_KEY: &str = "FootballScoreBoard";

/// Live football scoreboard settings
#[derive(Parser, Debug, Clone)]
#[command(name = "live-scoreboard", version, about)]
pub struct Config {
    /// Regular match duration in minutes
    #[arg(long, env = "MATCH_DURATION_MINS", default_value = "90")]
    pub match_duration_mins: u16,

    /// Grace period in minutes added to the regular duration before a match may be finished
    #[arg(long, env = "MATCH_OVERDUE_MINS", default_value = "30")]
    pub overdue_mins: u16,

    /// Highest score a single side may reach
    #[arg(long, env = "MAX_SCORE", default_value = "99")]
    pub max_score: u16,

    /// Storage key the serialized match collection is kept under
    #[arg(long, env = "SCOREBOARD_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Maximum number of entries in the in-memory cache (unbounded when unset)
    #[arg(long, env = "CACHE_CAPACITY")]
    pub cache_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            match_duration_mins: 90,
            overdue_mins: 30,
            max_score: 99,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            cache_capacity: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage_key.trim().is_empty() {
            anyhow::bail!("storage_key must be a non-empty string");
        }
        if self.match_duration_mins == 0 {
            anyhow::bail!("match_duration_mins must be positive");
        }
        if self.max_score == 0 {
            anyhow::bail!("max_score must be positive");
        }
        if self.cache_capacity == Some(0) {
            anyhow::bail!("cache_capacity must be positive when set");
        }
        Ok(())
    }

    /// Business rules the scoreboard enforces, derived from this config.
    pub fn rules(&self) -> ScoreboardRules {
        ScoreboardRules {
            match_duration: Duration::from_secs(u64::from(self.match_duration_mins) * 60),
            overdue_allowance: Duration::from_secs(u64::from(self.overdue_mins) * 60),
            max_score: self.max_score,
            storage_key: self.storage_key.clone(),
        }
    }

    /// In-memory cache sized by `cache_capacity`.
    pub fn memory_cache(&self) -> MemoryCacheStorage {
        match self.cache_capacity {
            Some(capacity) => MemoryCacheStorage::with_capacity(capacity),
            None => MemoryCacheStorage::new(),
        }
    }
}
