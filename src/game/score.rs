//! Score derivation from per-outcome statistics.

use serde::{Deserialize, Serialize};

/// Fixed weights applied to the outcome counters when deriving a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Points per exact answer.
    pub exact: i32,
    /// Points per correct answer.
    pub correct: i32,
    /// Points per partial answer.
    pub partial: i32,
    /// Points per wrong answer (negative).
    pub wrong: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: 5,
            correct: 3,
            partial: 3,
            wrong: -1,
        }
    }
}

/// Per-player outcome counters and derived score bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
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
    /// Specific answers since the last persistence flush.
    pub count: u32,
    /// Score for the current game, derived from the counters above.
    pub score: i32,
    /// Best score across all of the player's games; never decreases.
    pub high_score: i32,
    /// Whether the player advances manually instead of auto-drawing.
    pub manual: bool,
}

impl Stats {
    /// Number of picks resolved this game, regardless of outcome.
    pub fn answered(&self) -> u32 {
        self.exact + self.correct + self.partial + self.wrong + self.skipped
    }

    /// Recompute `score` from scratch and raise `high_score` when beaten.
    ///
    /// The score is always rederived from the counters rather than adjusted
    /// incrementally, so the two can never drift apart.
    pub fn refresh_score(&mut self, weights: &ScoreWeights) {
        self.score = compute_score(self, weights);
        self.high_score = self.high_score.max(self.score);
    }

    /// Reset everything that belongs to a single game, keeping `high_score`
    /// and the progression mode.
    pub fn reset_game(&mut self) {
        let high_score = self.high_score;
        let manual = self.manual;
        *self = Stats {
            high_score,
            manual,
            ..Stats::default()
        };
    }
}

/// Pure score derivation: `5*exact + 3*correct + 3*partial - wrong` with the
/// default weights; skipped picks contribute nothing.
pub fn compute_score(stats: &Stats, weights: &ScoreWeights) -> i32 {
    weights.exact * stats.exact as i32
        + weights.correct * stats.correct as i32
        + weights.partial * stats.partial as i32
        + weights.wrong * stats.wrong as i32
}
