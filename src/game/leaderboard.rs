//! Read-only ranked projection over the session registry.

use crate::game::conversation::id_denotes_group;

/// One player's input to the ranking: registry key plus standing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Conversation id the session is keyed by.
    pub conversation_id: String,
    /// Player-chosen display name.
    pub display_name: String,
    /// Best score across all of the player's games.
    pub high_score: i32,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position after sorting.
    pub rank: usize,
    /// Player-chosen display name.
    pub display_name: String,
    /// Best score across all of the player's games.
    pub high_score: i32,
    /// True when the conversation denotes a group or room.
    pub is_group: bool,
}

/// Rank the `n` best standings.
///
/// Sorted by `high_score` descending; ties break by `display_name` ascending,
/// then conversation id ascending, so the projection is deterministic.
pub fn top_n(entries: impl IntoIterator<Item = LeaderboardEntry>, n: usize) -> Vec<LeaderboardRow> {
    let mut entries: Vec<LeaderboardEntry> = entries.into_iter().collect();
    entries.sort_by(|a, b| {
        b.high_score
            .cmp(&a.high_score)
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.conversation_id.cmp(&b.conversation_id))
    });

    entries
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(index, entry)| LeaderboardRow {
            rank: index + 1,
            is_group: id_denotes_group(&entry.conversation_id),
            display_name: entry.display_name,
            high_score: entry.high_score,
        })
        .collect()
}
