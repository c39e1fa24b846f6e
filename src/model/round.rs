use super::Difficulty;

/// A round is `Active` from the deal until the last pair is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Active,
    Won,
}

/// Display projection of the live round, emitted whenever score, moves, or
/// the clock change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub difficulty: Difficulty,
    pub phase: RoundPhase,
    pub moves: u32,
    pub elapsed_seconds: u64,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub score: u32,
}
