use crate::{
    ConfigError, DeckError, DuelState, EvalError, EventBus, GameConfig, Deck, PowerUpKind,
    RngState, SlotKey, TeamKey, TeamState,
};
use std::collections::HashMap;
use thiserror::Error;

mod powerups;
mod resolve;
mod round;
mod select;
mod setup;

pub use powerups::PowerUpSnapshot;
pub use round::RoundTransition;
pub use setup::validate_rosters;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("the duel is already resolved")]
    DuelResolved,
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: String, got: String },
    #[error("slot {0} was removed from play")]
    SlotRemoved(SlotKey),
    #[error("slot {0} is already taken")]
    SlotTaken(SlotKey),
    #[error("unknown player {0}")]
    UnknownPlayer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("{0} has no players")]
    EmptyTeam(TeamKey),
    #[error("player names must not be blank")]
    BlankName,
    #[error("player {0} appears more than once")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    #[error("{team} has no {kind} charges left")]
    InsufficientCharges { team: TeamKey, kind: PowerUpKind },
    #[error("{kind} is not usable by {team} right now")]
    PowerUpNotUsableNow { team: TeamKey, kind: PowerUpKind },
    #[error("{0}")]
    DeckExhausted(#[from] DeckError),
    #[error("deck integrity violated: {0}")]
    DeckIntegrity(#[from] EvalError),
    #[error("invalid roster: {0}")]
    InvalidRoster(#[from] RosterError),
    #[error("the current duel is still in progress")]
    RoundInProgress,
    #[error("the match is over")]
    MatchOver,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Single owner of a match: both teams, the round's deck and the live duel.
///
/// Every mutating call runs against a scratch copy and is committed only
/// if it succeeds, so a rejected call leaves the game untouched and emits
/// no events.
#[derive(Debug, Clone)]
pub struct Game {
    pub config: GameConfig,
    pub rng: RngState,
    pub deck: Deck,
    pub teams: [TeamState; 2],
    pub duel: DuelState,
    player_team: HashMap<String, TeamKey>,
    round: u32,
    starter: TeamKey,
    next_starter: Option<TeamKey>,
    finished: Option<TeamKey>,
}

impl Game {
    fn transact<T>(
        &mut self,
        events: &mut EventBus,
        op: impl FnOnce(&mut Game, &mut EventBus) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut next = self.clone();
        let mut staged = EventBus::default();
        let out = op(&mut next, &mut staged)?;
        *self = next;
        events.extend(staged.drain());
        Ok(out)
    }
}
