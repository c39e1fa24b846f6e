mod card;
mod deck;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_stats;
mod round;
mod timer_state;

pub use card::{Card, CardFace};
pub use deck::Deck;
pub use difficulty::Difficulty;
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::GameEngineEvent;
pub use game_stats::{compute_score, RoundStats};
pub use round::{RoundPhase, RoundSnapshot};
pub use timer_state::TimerState;
