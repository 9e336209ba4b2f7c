use crate::{PowerUpKind, ReasonTag, SlotKey, TeamKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub team1: u32,
    pub team2: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    RoundStarted {
        round: u32,
        starter: String,
        team: TeamKey,
    },
    SlotSelected {
        player: String,
        team: TeamKey,
        slot: SlotKey,
        sum: u8,
    },
    DuelResolved {
        winner: String,
        loser: String,
        winning_team: TeamKey,
        reason: ReasonTag,
        eliminated: bool,
        message: String,
        scores: Scores,
    },
    BoardRevealed {
        slots: Vec<SlotKey>,
    },
    PowerUpUsed {
        team: TeamKey,
        kind: PowerUpKind,
        remaining: u8,
    },
    SecondChanceRewound {
        team: TeamKey,
        player: String,
        step: u8,
        scores: Scores,
    },
    CardsPeeked {
        slots: Vec<SlotKey>,
    },
    SlotRemoved {
        slot: SlotKey,
    },
    MatchOver {
        winner: TeamKey,
        scores: Scores,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.queue.extend(events);
    }
}
