use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whole persisted session table: one record per conversation id.
///
/// Saved and loaded as a single blob document; insertion order is preserved so
/// repeated flushes of unchanged state produce identical documents.
pub type SessionTableEntity = IndexMap<String, PlayerEntity>;

/// Persisted record for one player, shared across storage backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Player-chosen display name.
    pub name: String,
    /// Person currently being asked about; empty when no pick is pending.
    pub pick: String,
    /// Names not yet resolved in the current game.
    pub progress: Vec<String>,
    /// Outcome counters and score bookkeeping.
    pub data: StatsEntity,
}

/// Persisted outcome counters and derived scores for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsEntity {
    /// Answers judged exact.
    pub exact: u32,
    /// Answers judged correct.
    pub correct: u32,
    /// Answers judged partial.
    pub partial: u32,
    /// Answers judged wrong.
    pub wrong: u32,
    /// Picks the player passed on.
    pub skipped: u32,
    /// Specific answers since the last flush.
    pub count: u32,
    /// Score for the current game.
    pub score: i32,
    /// Best score across all games.
    pub high_score: i32,
    /// Whether the player advances manually.
    pub manual: bool,
}
