use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a live match, derived from its creation time in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl MatchId {
    /// Next id for a match created at `now`, strictly greater than `last`.
    ///
    /// Falls back to `last + 1` when the clock has not advanced since the
    /// previous id or is outside the nanosecond-representable range.
    /// `None` once `last` is already the largest representable id.
    pub fn next_after(last: MatchId, now: DateTime<Utc>) -> Option<MatchId> {
        let floor = last.0.checked_add(1)?;
        let stamp = now.timestamp_nanos_opt().unwrap_or(i64::MIN);
        Some(MatchId(stamp.max(floor)))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Goals scored by each side. Persisted as a `[home, away]` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u16, u16)", into = "(u16, u16)")]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    pub fn new(home: u16, away: u16) -> Self {
        Score { home, away }
    }

    pub fn total(&self) -> u32 {
        u32::from(self.home) + u32::from(self.away)
    }
}

impl From<(u16, u16)> for Score {
    fn from((home, away): (u16, u16)) -> Self {
        Score { home, away }
    }
}

impl From<Score> for (u16, u16) {
    fn from(score: Score) -> Self {
        (score.home, score.away)
    }
}

/// A match currently in progress on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    /// Key of the match in the collection; not repeated in the persisted value
    #[serde(skip)]
    pub id: MatchId,
    pub start_time: DateTime<Utc>,
    pub score: Score,
    pub home_team: String,
    pub away_team: String,
}

impl LiveMatch {
    pub fn new(
        id: MatchId,
        home_team: String,
        away_team: String,
        start_time: DateTime<Utc>,
    ) -> Self {
        LiveMatch {
            id,
            start_time,
            score: Score::default(),
            home_team,
            away_team,
        }
    }

    /// Whether `team` plays in this match on either side, ignoring case.
    pub fn involves(&self, team: &str) -> bool {
        same_team(&self.home_team, team) || same_team(&self.away_team, team)
    }
}

/// Team names are compared case-insensitively (Unicode-aware).
pub fn same_team(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// All in-progress matches, keyed by id.
pub type MatchCollection = HashMap<MatchId, LiveMatch>;

/// Serialize the collection into its stored JSON form.
pub fn encode_collection(matches: &MatchCollection) -> serde_json::Result<String> {
    serde_json::to_string(matches)
}

/// Parse a stored snapshot. JSON `null` yields `Ok(None)`.
///
/// Each match gets its id restored from the map key.
pub fn decode_collection(raw: &str) -> serde_json::Result<Option<MatchCollection>> {
    let decoded: Option<MatchCollection> = serde_json::from_str(raw)?;
    Ok(decoded.map(|mut matches| {
        for (id, live) in matches.iter_mut() {
            live.id = *id;
        }
        matches
    }))
}
