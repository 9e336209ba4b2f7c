use crate::Hand;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Which comparison step decided a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonTag {
    Sum,
    Suit,
    Value,
}

impl ReasonTag {
    pub fn id(self) -> &'static str {
        match self {
            ReasonTag::Sum => "sum",
            ReasonTag::Suit => "suit",
            ReasonTag::Value => "value",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("hands tie on sum, suit and value; they must share a card")]
    IdenticalHands,
}

#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub name: &'a str,
    pub hand: &'a Hand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub winner_name: String,
    pub loser_name: String,
    pub is_p1_winner: bool,
    pub reason: ReasonTag,
}

/// Orders two hands by sum, then suit rank of the highest card, then its
/// ace-high value rank. Returns the step that separated them.
pub fn compare_hands(a: &Hand, b: &Hand) -> (Ordering, Option<ReasonTag>) {
    let (sa, sb) = (a.strength(), b.strength());
    if sa.sum != sb.sum {
        return (sa.sum.cmp(&sb.sum), Some(ReasonTag::Sum));
    }
    if sa.suit_rank != sb.suit_rank {
        return (sa.suit_rank.cmp(&sb.suit_rank), Some(ReasonTag::Suit));
    }
    if sa.value_rank != sb.value_rank {
        return (sa.value_rank.cmp(&sb.value_rank), Some(ReasonTag::Value));
    }
    (Ordering::Equal, None)
}

pub fn evaluate(p1: Contender<'_>, p2: Contender<'_>) -> Result<Verdict, EvalError> {
    let (ordering, reason) = compare_hands(p1.hand, p2.hand);
    let reason = reason.ok_or(EvalError::IdenticalHands)?;
    let is_p1_winner = ordering == Ordering::Greater;
    let (winner, loser) = if is_p1_winner { (p1, p2) } else { (p2, p1) };
    Ok(Verdict {
        winner_name: winner.name.to_string(),
        loser_name: loser.name.to_string(),
        is_p1_winner,
        reason,
    })
}
