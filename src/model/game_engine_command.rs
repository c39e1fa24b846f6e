use super::Difficulty;

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    /// Deal a new round; difficulty defaults to the configured setting,
    /// seed to the SEED env var or entropy.
    NewGame(Option<Difficulty>, Option<u64>),
    /// New round with the current difficulty and the same seed.
    Restart,
    /// Flip the card at a deck position face-up.
    Reveal(usize),
    /// One-second clock pulse, delivered by the repeating timer.
    Tick,
    /// Return a mismatched pair face-down, delivered by the delay timer.
    ResolveMismatch,
    /// Re-emit the full display state for a late-attaching presenter.
    InitDisplay,
}
