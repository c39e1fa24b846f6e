use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use super::{Card, CardFace, Difficulty};

/// The dealt board: every icon of the difficulty's set appears on exactly
/// two cards, in a seeded uniform shuffle. A card's position is its index
/// in the sequence and never changes after the deal.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    difficulty: Difficulty,
    seed: u64,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: vec![],
            difficulty: Difficulty::default(),
            seed: 0,
        }
    }
}

impl Deck {
    pub fn deal(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut cards: Vec<Card> = difficulty
            .icon_set()
            .iter()
            .flat_map(|&icon| [Card::new(icon), Card::new(icon)])
            .collect();
        cards.shuffle(&mut rng);

        trace!(target: "deck", "Dealt {:?} deck, seed {}: {:?}", difficulty, seed, cards);

        Self {
            cards,
            difficulty,
            seed,
        }
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn set_face(&mut self, position: usize, face: CardFace) {
        if let Some(card) = self.cards.get_mut(position) {
            card.face = face;
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_deal_contains_every_icon_exactly_twice() {
        for difficulty in Difficulty::all() {
            let deck = Deck::deal(difficulty, Some(7));
            assert_eq!(deck.len(), difficulty.card_count());
            assert_eq!(deck.len() % 2, 0);

            let counts = deck.cards().iter().map(|card| card.icon).counts();
            assert_eq!(counts.len(), difficulty.pair_count());
            for (icon, count) in counts {
                assert_eq!(count, 2, "icon {} dealt {} times", icon, count);
            }
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation_of_the_icon_set() {
        let deck = Deck::deal(Difficulty::Medium, Some(11));
        let mut dealt: Vec<&str> = deck.cards().iter().map(|card| card.icon).collect();
        let mut source: Vec<&str> = Difficulty::Medium
            .icon_set()
            .iter()
            .flat_map(|&icon| [icon, icon])
            .collect();
        dealt.sort_unstable();
        source.sort_unstable();
        assert_eq!(dealt, source);
    }

    #[test]
    fn test_deal_is_deterministic_for_a_seed() {
        let first = Deck::deal(Difficulty::Hard, Some(42));
        let second = Deck::deal(Difficulty::Hard, Some(42));
        assert_eq!(first.cards(), second.cards());
        assert_eq!(first.seed(), 42);
    }

    #[test]
    fn test_distinct_seeds_shuffle_differently() {
        let first = Deck::deal(Difficulty::Hard, Some(1));
        let second = Deck::deal(Difficulty::Hard, Some(2));
        assert_ne!(first.cards(), second.cards());
    }

    #[test]
    fn test_all_cards_start_hidden() {
        let deck = Deck::deal(Difficulty::Easy, Some(3));
        assert!(deck.cards().iter().all(|card| card.is_hidden()));
    }

    #[test]
    fn test_set_face_out_of_range_is_ignored() {
        let mut deck = Deck::deal(Difficulty::Easy, Some(3));
        deck.set_face(999, CardFace::Revealed);
        assert!(deck.cards().iter().all(|card| card.is_hidden()));
    }
}
