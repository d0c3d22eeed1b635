//! Card codes and deck construction.
//!
//! A card is an opaque numeric code: 0–51 are the four suits times
//! thirteen ranks, 52 and 53 are the two jokers. The round machine only
//! builds and holds the deck; dealing and play rules live elsewhere.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Cards per physical deck, jokers included.
pub const CARDS_PER_DECK: usize = 54;

/// An opaque card code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(pub u8);

impl Card {
    /// `true` for the two joker codes.
    pub fn is_joker(self) -> bool {
        self.0 >= 52
    }
}

/// Builds `deck_count` physical decks as one ordered sequence.
pub fn build_deck(deck_count: usize) -> Vec<Card> {
    let mut cards = Vec::with_capacity(deck_count * CARDS_PER_DECK);
    for _ in 0..deck_count {
        cards.extend((0..CARDS_PER_DECK as u8).map(Card));
    }
    cards
}

/// Shuffles a deck in place.
pub fn shuffle_deck(cards: &mut [Card]) {
    cards.shuffle(&mut rand::rng());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_deck_single() {
        let deck = build_deck(1);
        assert_eq!(deck.len(), 54);
        assert_eq!(deck.first(), Some(&Card(0)));
        assert_eq!(deck.last(), Some(&Card(53)));
    }

    #[test]
    fn test_build_deck_multiple_repeats_codes() {
        let deck = build_deck(2);
        assert_eq!(deck.len(), 108);
        let aces = deck.iter().filter(|c| c.0 == 0).count();
        assert_eq!(aces, 2);
    }

    #[test]
    fn test_jokers() {
        assert!(Card(52).is_joker());
        assert!(Card(53).is_joker());
        assert!(!Card(51).is_joker());
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut deck = build_deck(2);
        shuffle_deck(&mut deck);

        let mut sorted: Vec<u8> = deck.iter().map(|c| c.0).collect();
        sorted.sort_unstable();
        let mut expected: Vec<u8> =
            build_deck(2).iter().map(|c| c.0).collect();
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }
}
