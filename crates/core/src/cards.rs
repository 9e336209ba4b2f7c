use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Spades,
    Hearts,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Hearts, Suit::Spades, Suit::Clubs];

    /// Tie-break rank, 4 for the strongest suit down to 1.
    pub fn rank(self) -> u8 {
        match self {
            Suit::Diamonds => 4,
            Suit::Hearts => 3,
            Suit::Spades => 2,
            Suit::Clubs => 1,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
            Suit::Clubs => "♣",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub value: u8,
    pub suit: Suit,
}

impl Card {
    pub const MIN_VALUE: u8 = 1;
    pub const MAX_VALUE: u8 = 9;

    /// Returns `None` for values outside `1..=9`.
    pub fn new(value: u8, suit: Suit) -> Option<Self> {
        (Self::MIN_VALUE..=Self::MAX_VALUE)
            .contains(&value)
            .then_some(Self { value, suit })
    }

    pub fn is_ace(&self) -> bool {
        self.value == 1
    }

    /// Rank inside a suit: the ace outranks every numeric value.
    pub fn value_rank(&self) -> u8 {
        if self.is_ace() {
            Self::MAX_VALUE + 1
        } else {
            self.value
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ace() {
            write!(f, "A{}", self.suit.glyph())
        } else {
            write!(f, "{}{}", self.value, self.suit.glyph())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suit_ranks_are_distinct_and_ordered() {
        let ranks: Vec<u8> = Suit::ALL.iter().map(|suit| suit.rank()).collect();
        assert_eq!(ranks, vec![4, 3, 2, 1]);
    }

    #[test]
    fn card_rejects_out_of_range_values() {
        assert!(Card::new(0, Suit::Clubs).is_none());
        assert!(Card::new(10, Suit::Clubs).is_none());
        assert_eq!(Card::new(9, Suit::Hearts).map(|c| c.value), Some(9));
    }

    #[test]
    fn ace_ranks_above_nine() {
        let ace = Card::new(1, Suit::Spades).unwrap();
        let nine = Card::new(9, Suit::Spades).unwrap();
        assert!(ace.value_rank() > nine.value_rank());
        assert_eq!(ace.to_string(), "A♠");
        assert_eq!(nine.to_string(), "9♠");
    }
}
