use std::time::Duration;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::helpers::FormatSeconds;

use super::Difficulty;

/// `max(1000 - moves*10 - seconds*2, 0)`; the penalty is computed in u64
/// so a long-abandoned round floors at zero instead of wrapping.
pub fn compute_score(moves: u32, elapsed_seconds: u64) -> u32 {
    let penalty = (moves as u64) * 10 + elapsed_seconds * 2;
    1000u64.saturating_sub(penalty) as u32
}

/// One finished round, as recorded on the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStats {
    pub score: u32,
    pub completion_time: Duration,
    pub moves: u32,
    pub difficulty: Difficulty,
    pub timestamp: i64,
    pub playthrough_id: Uuid,
}

impl std::fmt::Display for RoundStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let date = Local
            .timestamp_opt(self.timestamp, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        write!(
            f,
            "{} pts | {} | {} moves | {}",
            self.score,
            self.completion_time.format_mm_ss(),
            self.moves,
            date
        )
    }
}
