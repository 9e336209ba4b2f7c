#![allow(dead_code)]

use cardduel_core::{
    Card, Deck, EventBus, Game, GameConfig, Loadouts, PowerUpInventory, Suit,
};

pub const SEED: u64 = 7;

pub fn card(value: u8, suit: Suit) -> Card {
    Card::new(value, suit).expect("valid card")
}

pub fn cards(entries: [(u8, Suit); 3]) -> [Card; 3] {
    entries.map(|(value, suit)| card(value, suit))
}

/// Sum 7: 1♣ 2♣ 4♣
pub fn seven() -> [Card; 3] {
    cards([(1, Suit::Clubs), (2, Suit::Clubs), (4, Suit::Clubs)])
}

/// Sum 5: 1♠ 2♠ 2♥
pub fn five() -> [Card; 3] {
    cards([(1, Suit::Spades), (2, Suit::Spades), (2, Suit::Hearts)])
}

/// Sum 9: 3♥ 4♥ 2♦
pub fn nine() -> [Card; 3] {
    cards([(3, Suit::Hearts), (4, Suit::Hearts), (2, Suit::Diamonds)])
}

/// Sum 2 (twelve wrapped): 3♦ 4♦ 5♦
pub fn two() -> [Card; 3] {
    cards([(3, Suit::Diamonds), (4, Suit::Diamonds), (5, Suit::Diamonds)])
}

pub fn loadout(entries: &[(&str, u8)]) -> PowerUpInventory {
    let mut inventory = PowerUpInventory::default();
    for (kind, count) in entries {
        match *kind {
            "second_chance" => inventory.second_chance = *count,
            "reveal_two" => inventory.reveal_two = *count,
            "life_shield" => inventory.life_shield = *count,
            "lock_all" => inventory.lock_all = *count,
            "remove_worst" => inventory.remove_worst = *count,
            other => panic!("unknown power-up {other}"),
        }
    }
    inventory
}

pub fn config_with(team1: PowerUpInventory, team2: PowerUpInventory) -> GameConfig {
    GameConfig {
        loadouts: Some(Loadouts { team1, team2 }),
        ..GameConfig::default()
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

/// Starts a match and hands the first turn to `first` regardless of the
/// random opening pick.
pub fn start(config: GameConfig, team1: &[&str], team2: &[&str], first: &str) -> Game {
    let mut events = EventBus::default();
    let mut game =
        Game::start(config, names(team1), names(team2), SEED, &mut events).expect("start game");
    game.duel.active_player = Some(first.to_string());
    game
}

/// Puts `hands` on top of the draw pile in order, followed by every other
/// card of a standard deck.
pub fn rig(game: &mut Game, hands: &[[Card; 3]]) {
    let mut draw: Vec<Card> = hands.iter().flatten().copied().collect();
    let rest: Vec<Card> = Deck::standard36()
        .draw
        .into_iter()
        .filter(|card| !draw.contains(card))
        .collect();
    draw.extend(rest);
    game.deck.draw = draw;
}
