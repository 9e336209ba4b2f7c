use crate::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three cards dealt into one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand([Card; 3]);

/// Comparison key for a hand. Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub sum: u8,
    pub suit_rank: u8,
    pub value_rank: u8,
}

impl Hand {
    pub const SIZE: usize = 3;

    pub fn new(cards: [Card; 3]) -> Self {
        Self(cards)
    }

    pub fn cards(&self) -> &[Card; 3] {
        &self.0
    }

    pub fn sum(&self) -> u8 {
        hand_sum(&self.0)
    }

    pub fn highest_card(&self) -> Card {
        highest_card(&self.0).unwrap_or(self.0[0])
    }

    pub fn strength(&self) -> HandStrength {
        let top = self.highest_card();
        HandStrength {
            sum: self.sum(),
            suit_rank: top.suit.rank(),
            value_rank: top.value_rank(),
        }
    }

    pub fn shares_card_with(&self, other: &Hand) -> bool {
        self.0.iter().any(|card| other.0.contains(card))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a} {b} {c}")
    }
}

/// Sum of values wrapped into `1..=10`: multiples of ten count as 10.
pub fn hand_sum(cards: &[Card]) -> u8 {
    let total: u32 = cards.iter().map(|card| u32::from(card.value)).sum();
    match total % 10 {
        0 => 10,
        rest => rest as u8,
    }
}

/// Tie-break card: highest suit rank first, then ace-high value rank.
/// On a full tie the earlier card is kept.
pub fn highest_card(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().reduce(|best, card| {
        let best_key = (best.suit.rank(), best.value_rank());
        let card_key = (card.suit.rank(), card.value_rank());
        if card_key > best_key {
            card
        } else {
            best
        }
    })
}
