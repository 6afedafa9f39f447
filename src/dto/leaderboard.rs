use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::format_system_time, game::leaderboard::LeaderboardRow};

/// Ranked high-score view returned by the leaderboard endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// When this projection was computed.
    pub generated_at: String,
    /// Ranked rows, best first.
    pub rows: Vec<LeaderboardRowDto>,
}

/// One ranked leaderboard row.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardRowDto {
    /// 1-based position.
    pub rank: usize,
    /// Player-chosen display name.
    pub display_name: String,
    /// Best score across all of the player's games.
    pub high_score: i32,
    /// True when the entry belongs to a group or room conversation.
    pub is_group: bool,
}

impl From<LeaderboardRow> for LeaderboardRowDto {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            display_name: row.display_name,
            high_score: row.high_score,
            is_group: row.is_group,
        }
    }
}

impl LeaderboardResponse {
    /// Wrap ranked rows with a generation timestamp.
    pub fn new(rows: Vec<LeaderboardRow>) -> Self {
        Self {
            generated_at: format_system_time(SystemTime::now()),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }
}
