use serde::{Deserialize, Serialize};

const EASY_ICONS: &[&str] = &["cat", "dog", "car", "smile"];

const MEDIUM_ICONS: &[&str] = &[
    "cat", "dog", "car", "plane", "smile", "hat", "star", "heart",
];

const HARD_ICONS: &[&str] = &[
    "cat", "dog", "car", "plane", "smile", "hat", "star", "heart", "book", "cup", "house", "light",
    "moon", "sun", "phone", "tv", "key", "globe",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl Difficulty {
    pub fn all() -> Vec<Difficulty> {
        vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// Distinct icons dealt at this level; the deck holds each one twice.
    pub fn icon_set(&self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => EASY_ICONS,
            Difficulty::Medium => MEDIUM_ICONS,
            Difficulty::Hard => HARD_ICONS,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.icon_set().len()
    }

    pub fn card_count(&self) -> usize {
        self.pair_count() * 2
    }

    /// Grid column count the presentation layer lays the deck out with.
    pub fn n_columns(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}
