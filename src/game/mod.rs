pub mod game_engine;
pub mod leaderboard;
pub mod settings;
pub mod timers;
