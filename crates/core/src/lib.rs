//! Rules engine for the two-team card duel. Keep this crate free of IO and
//! platform concerns; hosts drive it through [`Game`] and drain [`EventBus`].

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod game;
pub mod hand;
pub mod inventory;
pub mod rng;
pub mod rules;
pub mod state;
pub mod team;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use game::*;
pub use hand::*;
pub use inventory::*;
pub use rng::*;
pub use rules::*;
pub use state::*;
pub use team::*;
