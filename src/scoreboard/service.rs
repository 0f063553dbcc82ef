//! The scoreboard rule engine.
//!
//! Holds every in-progress match in memory behind a single lock. Each mutating
//! operation validates, mutates and then writes the whole collection back to
//! the storage port while still holding the write lock, so concurrent callers
//! never interleave between a check and its update.
//!
//! Writes to storage are best-effort: a failed write is logged and the
//! operation still reports its domain outcome.

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{
    decode_collection, encode_collection, same_team, LiveMatch, MatchCollection, MatchId, Score,
};
use super::{ScoreboardError, ScoreboardRules};
use crate::storage::StorageService;

struct BoardState {
    matches: MatchCollection,
    /// Highest id handed out or loaded so far
    last_id: MatchId,
}

/// Thread-safe live scoreboard backed by a key-value storage port.
#[derive(Clone)]
pub struct ScoreboardService {
    storage: Arc<dyn StorageService<String>>,
    rules: ScoreboardRules,
    state: Arc<RwLock<BoardState>>,
}

impl ScoreboardService {
    /// Build a scoreboard, restoring any snapshot stored under the rules' key.
    ///
    /// Never fails: a missing, unreadable or malformed snapshot is logged and
    /// the board starts empty.
    pub async fn new(storage: Arc<dyn StorageService<String>>, rules: ScoreboardRules) -> Self {
        let matches = load_snapshot(storage.as_ref(), &rules.storage_key).await;
        let last_id = matches.keys().max().copied().unwrap_or_default();
        info!(
            "Scoreboard ready with {} in-progress match(es) (key='{}')",
            matches.len(),
            rules.storage_key
        );

        ScoreboardService {
            storage,
            rules,
            state: Arc::new(RwLock::new(BoardState { matches, last_id })),
        }
    }

    pub fn rules(&self) -> &ScoreboardRules {
        &self.rules
    }

    /// Start a new match between two teams. Returns the new match id.
    pub async fn start_match(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<MatchId, ScoreboardError> {
        let home = home_team.trim();
        let away = away_team.trim();

        if home.is_empty() || away.is_empty() {
            return Err(ScoreboardError::TeamCannotBeEmpty);
        }
        if same_team(home, away) {
            return Err(ScoreboardError::TeamCannotCompeteAgainstThemselves);
        }

        let mut state = self.state.write().await;
        if state
            .matches
            .values()
            .any(|m| m.involves(home) || m.involves(away))
        {
            return Err(ScoreboardError::TeamAlreadyPlaying);
        }

        let now = Utc::now();
        let id = MatchId::next_after(state.last_id, now).ok_or_else(|| {
            internal("Match id space exhausted", format!("last id {}", state.last_id))
        })?;
        state.last_id = id;
        state
            .matches
            .insert(id, LiveMatch::new(id, home.to_string(), away.to_string(), now));
        info!("Match started: {} vs {} (id={})", home, away, id);

        self.persist(&state.matches).await;
        Ok(id)
    }

    /// Replace the score of a match. Neither side may go down or past the threshold.
    pub async fn update_match_score(
        &self,
        match_id: MatchId,
        home_score: u16,
        away_score: u16,
    ) -> Result<(), ScoreboardError> {
        let mut state = self.state.write().await;
        let live = state
            .matches
            .get_mut(&match_id)
            .ok_or(ScoreboardError::MatchNotFound(match_id))?;

        if home_score < live.score.home || away_score < live.score.away {
            return Err(ScoreboardError::MatchScoresCanBeOnlyAugmented);
        }
        if home_score > self.rules.max_score || away_score > self.rules.max_score {
            return Err(ScoreboardError::ScoresCannotExceedSettledThreshold);
        }

        live.score = Score::new(home_score, away_score);
        info!(
            "Score updated: {} {}-{} {} (id={})",
            live.home_team, home_score, away_score, live.away_team, match_id
        );

        self.persist(&state.matches).await;
        Ok(())
    }

    /// Remove a match from the board once its regular time plus overdue allowance has passed.
    pub async fn finish_match(&self, match_id: MatchId) -> Result<(), ScoreboardError> {
        let minimum = chrono::Duration::from_std(self.rules.minimum_elapsed())
            .map_err(|e| internal("Match duration out of range", e))?;

        let mut state = self.state.write().await;
        let live = state
            .matches
            .get(&match_id)
            .ok_or(ScoreboardError::MatchNotFound(match_id))?;

        let elapsed = Utc::now().signed_duration_since(live.start_time);
        if elapsed <= minimum {
            debug!(
                "Refusing to finish match {}: {}s elapsed, {}s required",
                match_id,
                elapsed.num_seconds(),
                minimum.num_seconds()
            );
            return Err(ScoreboardError::MatchCannotBeInterrupted);
        }

        if let Some(finished) = state.matches.remove(&match_id) {
            info!(
                "Match finished: {} {}-{} {} (id={})",
                finished.home_team,
                finished.score.home,
                finished.score.away,
                finished.away_team,
                match_id
            );
        }

        self.persist(&state.matches).await;
        Ok(())
    }

    /// In-progress matches, highest total score first.
    ///
    /// Ties go to the most recently started match, then to the newest id.
    pub async fn get_matches_score_summary(&self) -> Result<Vec<LiveMatch>, ScoreboardError> {
        let state = self.state.read().await;
        let mut summary: Vec<LiveMatch> = state.matches.values().cloned().collect();
        drop(state);

        summary.sort_by(|a, b| {
            b.score
                .total()
                .cmp(&a.score.total())
                .then_with(|| b.start_time.cmp(&a.start_time))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(summary)
    }

    /// Snapshot of a single in-progress match.
    pub async fn get_match(&self, match_id: MatchId) -> Option<LiveMatch> {
        self.state.read().await.matches.get(&match_id).cloned()
    }

    /// Number of in-progress matches.
    pub async fn len(&self) -> usize {
        self.state.read().await.matches.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.matches.is_empty()
    }

    async fn persist(&self, matches: &MatchCollection) {
        if let Err(e) = self.try_persist(matches).await {
            warn!("Scoreboard snapshot not persisted: {:#}", e);
        }
    }

    async fn try_persist(&self, matches: &MatchCollection) -> anyhow::Result<()> {
        let raw = encode_collection(matches).context("Failed to serialize match collection")?;
        self.storage
            .update_item(&self.rules.storage_key, raw)
            .await
            .with_context(|| format!("Failed to write '{}'", self.rules.storage_key))?;
        debug!("Persisted {} match(es)", matches.len());
        Ok(())
    }
}

async fn load_snapshot(storage: &dyn StorageService<String>, key: &str) -> MatchCollection {
    let raw = match storage.get_item(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No stored scoreboard under '{}', starting empty", key);
            return MatchCollection::new();
        }
        Err(e) => {
            warn!("Failed to read stored scoreboard '{}': {}", key, e);
            return MatchCollection::new();
        }
    };

    match decode_collection(&raw) {
        Ok(Some(matches)) => matches,
        Ok(None) => {
            warn!("Stored scoreboard '{}' is null, starting empty", key);
            MatchCollection::new()
        }
        Err(e) => {
            warn!("Stored scoreboard '{}' is not valid JSON: {}", key, e);
            MatchCollection::new()
        }
    }
}

fn internal(context: &str, err: impl std::fmt::Display) -> ScoreboardError {
    error!("{}: {}", context, err);
    ScoreboardError::Internal(format!("{}: {}", context, err))
}
