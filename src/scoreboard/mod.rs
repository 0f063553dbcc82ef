pub mod models;
pub mod service;

pub use models::{LiveMatch, MatchCollection, MatchId, Score};
pub use service::ScoreboardService;

use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Business rules the scoreboard enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardRules {
    /// Regular playing time
    pub match_duration: Duration,
    /// Extra time allowed on top of `match_duration` before a match may be finished
    pub overdue_allowance: Duration,
    /// Highest score a single side may reach
    pub max_score: u16,
    /// Storage key the serialized collection is kept under
    pub storage_key: String,
}

impl ScoreboardRules {
    /// Time that must have strictly passed since kick-off before a match can finish.
    pub fn minimum_elapsed(&self) -> Duration {
        self.match_duration.saturating_add(self.overdue_allowance)
    }
}

impl Default for ScoreboardRules {
    fn default() -> Self {
        Config::default().rules()
    }
}

/// Why a scoreboard operation was rejected.
///
/// Validation variants carry stable, human-readable messages; `Internal`
/// wraps anything unexpected that was caught at the operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    #[error("Team name should be non empty string")]
    TeamCannotBeEmpty,

    #[error("Teams should have different names")]
    TeamCannotCompeteAgainstThemselves,

    #[error("Match is going on for at least one of the teams")]
    TeamAlreadyPlaying,

    #[error("Match scores cannot be decreased")]
    MatchScoresCanBeOnlyAugmented,

    #[error("Match scores cannot exceed the settled threshold")]
    ScoresCannotExceedSettledThreshold,

    #[error("Match with specified id not found")]
    MatchNotFound(MatchId),

    #[error("Match cannot be finished before its regular time and overdue allowance have elapsed")]
    MatchCannotBeInterrupted,

    #[error("Unexpected scoreboard failure: {0}")]
    Internal(String),
}
