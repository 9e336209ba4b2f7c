use crate::{Card, Hand, RngState, Suit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DECK_SIZE: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck exhausted: requested {requested} cards, {remaining} remaining")]
    Exhausted { requested: usize, remaining: usize },
}

/// Draw pile for one round. Cards are dealt from the front.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub draw: Vec<Card>,
}

impl Deck {
    /// All 36 value/suit pairs, unshuffled.
    pub fn standard36() -> Self {
        let mut draw = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for value in Card::MIN_VALUE..=Card::MAX_VALUE {
                draw.push(Card { value, suit });
            }
        }
        Self { draw }
    }

    pub fn shuffled(rng: &mut RngState) -> Self {
        let mut deck = Self::standard36();
        deck.shuffle(rng);
        deck
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    /// Removes and returns the first `count` cards, or fails without
    /// touching the pile.
    pub fn draw_cards(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        if self.draw.len() < count {
            return Err(DeckError::Exhausted {
                requested: count,
                remaining: self.draw.len(),
            });
        }
        Ok(self.draw.drain(..count).collect())
    }

    pub fn draw_hand(&mut self) -> Result<Hand, DeckError> {
        if self.draw.len() < Hand::SIZE {
            return Err(DeckError::Exhausted {
                requested: Hand::SIZE,
                remaining: self.draw.len(),
            });
        }
        let cards = [self.draw[0], self.draw[1], self.draw[2]];
        self.draw.drain(..Hand::SIZE);
        Ok(Hand::new(cards))
    }
}
