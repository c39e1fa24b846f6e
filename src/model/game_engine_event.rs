use super::{CardFace, Difficulty, RoundSnapshot, RoundStats};

/// Everything the presentation layer needs to render the game; the engine
/// never touches a rendering API.
#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    /// A fresh deck was dealt; all cards start hidden.
    BoardDealt {
        difficulty: Difficulty,
        card_count: usize,
        columns: usize,
    },
    /// A single card flipped; drives the per-card flip rendering.
    CardChanged { position: usize, face: CardFace },
    /// Score / move count / clock refresh.
    RoundStateChanged(RoundSnapshot),
    /// The last pair was matched; final stats for the end-of-round UI.
    RoundCompleted(RoundStats),
    /// The persisted top-5 changed (or was re-read for display).
    LeaderboardUpdated(Vec<RoundStats>),
}
