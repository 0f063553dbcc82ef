//! In-memory live football scoreboard.
//!
//! [`ScoreboardService`] tracks in-progress matches, enforces the match
//! lifecycle rules and snapshots the whole board as JSON into a pluggable
//! [`StorageService`] after every change.

pub mod config;
pub mod scoreboard;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use scoreboard::{
    LiveMatch, MatchId, Score, ScoreboardError, ScoreboardRules, ScoreboardService,
};
pub use storage::{MemoryCacheStorage, StorageError, StorageService};
