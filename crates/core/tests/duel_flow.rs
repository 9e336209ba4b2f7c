mod common;

use cardduel_core::{
    Event, EventBus, Game, GameConfig, GameError, Occupant, ReasonTag, RosterError,
    RoundTransition, SelectionError, SlotKey, Suit, TeamKey, DECK_SIZE,
};
use common::*;

fn plain_config() -> GameConfig {
    config_with(
        loadout(&[("life_shield", 2), ("lock_all", 2)]),
        loadout(&[("reveal_two", 2), ("remove_worst", 2)]),
    )
}

#[test]
fn higher_sum_eliminates_last_opponent() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    rig(&mut game, &[seven(), five()]);
    let mut events = EventBus::default();

    let duel = game
        .select_slot("A", SlotKey::TopLeft, &mut events)
        .expect("first draw");
    assert_eq!(duel.step(), 1);
    assert_eq!(duel.active_player.as_deref(), Some("B"));
    assert_eq!(duel[SlotKey::TopLeft].sum(), Some(7));

    let duel = game
        .select_slot("B", SlotKey::TopRight, &mut events)
        .expect("second draw");
    assert!(duel.is_resolved());
    assert_eq!(duel.winning_team, Some(TeamKey::Team1));
    let verdict = duel.verdict.clone().expect("verdict");
    assert_eq!(verdict.winner_name, "A");
    assert_eq!(verdict.reason, ReasonTag::Sum);

    assert_eq!(game.team(TeamKey::Team1).score, 1);
    assert!(game.team(TeamKey::Team2).is_empty());
    assert_eq!(game.match_winner(), Some(TeamKey::Team1));
    assert!(!game.should_auto_advance());

    let resolved: Vec<Event> = events.drain().collect();
    assert!(resolved.iter().any(|event| matches!(
        event,
        Event::DuelResolved { message, eliminated: true, .. } if message.contains("A beats B by sum (7 vs 5)")
    )));

    let transition = game.next_round(&mut events).expect("next round");
    assert_eq!(transition, RoundTransition::MatchOver { winner: TeamKey::Team1 });
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::MatchOver { winner: TeamKey::Team1, .. })));
    assert_eq!(
        game.next_round(&mut events).expect("idempotent"),
        RoundTransition::MatchOver { winner: TeamKey::Team1 }
    );
    assert!(events.is_empty());
}

#[test]
fn equal_sums_fall_back_to_suit() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let diamond_top = cards([(3, Suit::Diamonds), (1, Suit::Spades), (2, Suit::Spades)]);
    let club_top = cards([(4, Suit::Clubs), (9, Suit::Clubs), (3, Suit::Clubs)]);
    rig(&mut game, &[diamond_top, club_top]);
    let mut events = EventBus::default();

    game.select_slot("A", SlotKey::BottomLeft, &mut events)
        .expect("first draw");
    let duel = game
        .select_slot("B", SlotKey::BottomRight, &mut events)
        .expect("second draw");
    let verdict = duel.verdict.clone().expect("verdict");
    assert_eq!(verdict.winner_name, "A");
    assert_eq!(verdict.reason, ReasonTag::Suit);
}

#[test]
fn resolution_reveals_untouched_slots() {
    let mut game = start(plain_config(), &["A"], &["B", "C"], "A");
    rig(&mut game, &[seven(), five()]);
    let mut events = EventBus::default();
    game.select_slot("A", SlotKey::TopLeft, &mut events).unwrap();
    game.select_slot("B", SlotKey::TopRight, &mut events).unwrap();

    let duel = game.duel();
    assert!(duel.board_revealed);
    for slot in SlotKey::ALL {
        assert!(duel[slot].revealed, "{slot} should be face-up");
        assert!(duel[slot].hand.is_some());
    }
    assert!(events.drain().any(|event| matches!(
        event,
        Event::BoardRevealed { slots } if slots == vec![SlotKey::BottomLeft, SlotKey::BottomRight]
    )));
}

#[test]
fn next_round_deals_fresh_board_for_losing_team() {
    let mut game = start(plain_config(), &["A"], &["B", "C"], "A");
    rig(&mut game, &[seven(), five()]);
    let mut events = EventBus::default();
    game.select_slot("A", SlotKey::TopLeft, &mut events).unwrap();
    game.select_slot("B", SlotKey::TopRight, &mut events).unwrap();
    assert!(game.should_auto_advance());
    assert_eq!(game.duel().active_player.as_deref(), Some("C"));

    let transition = game.next_round(&mut events).expect("next round");
    assert_eq!(
        transition,
        RoundTransition::Started {
            round: 1,
            starter: "C".to_string()
        }
    );
    assert_eq!(game.round(), 1);
    assert_eq!(game.deck.remaining(), DECK_SIZE);
    let duel = game.duel();
    assert_eq!(duel.step(), 0);
    assert!(!duel.is_resolved());
    assert!(duel.winning_team.is_none());
    for slot in SlotKey::ALL {
        assert_eq!(duel[slot].occupant, Occupant::Empty);
        assert!(duel[slot].hand.is_none());
    }
    assert_eq!(game.team(TeamKey::Team2).remaining, vec!["C"]);
    assert_eq!(game.team(TeamKey::Team1).score, 1);
}

#[test]
fn next_round_waits_for_second_draw() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let mut events = EventBus::default();
    game.select_slot("A", SlotKey::TopLeft, &mut events).unwrap();
    assert_eq!(game.next_round(&mut events), Err(GameError::RoundInProgress));
}

#[test]
fn next_round_before_any_draw_redeals() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let mut events = EventBus::default();
    let transition = game.next_round(&mut events).expect("redeal");
    assert!(matches!(transition, RoundTransition::Started { round: 1, .. }));
}

#[test]
fn wrong_turn_is_rejected_without_side_effects() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let before = game.duel().clone();
    let deck_before = game.deck.clone();
    let mut events = EventBus::default();

    let err = game
        .select_slot("B", SlotKey::TopLeft, &mut events)
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidSelection(SelectionError::NotYourTurn {
            expected: "A".to_string(),
            got: "B".to_string()
        })
    );
    assert_eq!(game.duel(), &before);
    assert_eq!(game.deck, deck_before);
    assert!(events.is_empty());
}

#[test]
fn occupied_slot_cannot_be_taken() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let mut events = EventBus::default();
    game.select_slot("A", SlotKey::TopLeft, &mut events).unwrap();
    let err = game
        .select_slot("B", SlotKey::TopLeft, &mut events)
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidSelection(SelectionError::SlotTaken(SlotKey::TopLeft))
    );
}

#[test]
fn resolved_duel_rejects_more_draws() {
    let mut game = start(plain_config(), &["A", "D"], &["B", "C"], "A");
    rig(&mut game, &[seven(), five()]);
    let mut events = EventBus::default();
    game.select_slot("A", SlotKey::TopLeft, &mut events).unwrap();
    game.select_slot("B", SlotKey::TopRight, &mut events).unwrap();
    let err = game
        .select_slot("C", SlotKey::BottomLeft, &mut events)
        .unwrap_err();
    assert_eq!(err, GameError::InvalidSelection(SelectionError::DuelResolved));
    assert!(game.legal_selections().is_empty());
}

#[test]
fn unknown_player_is_rejected() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    let err = game
        .select_slot("Z", SlotKey::TopLeft, &mut EventBus::default())
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidSelection(SelectionError::UnknownPlayer("Z".to_string()))
    );
}

#[test]
fn exhausted_deck_fails_the_draw_and_keeps_state() {
    let mut game = start(plain_config(), &["A"], &["B"], "A");
    game.deck.draw.truncate(2);
    let before = game.duel().clone();
    let err = game
        .select_slot("A", SlotKey::TopLeft, &mut EventBus::default())
        .unwrap_err();
    assert!(matches!(err, GameError::DeckExhausted(_)));
    assert_eq!(game.duel(), &before);
    assert_eq!(game.deck.remaining(), 2);
}

#[test]
fn opening_turn_belongs_to_a_rostered_player() {
    let mut events = EventBus::default();
    let game = Game::start(
        plain_config(),
        vec!["A".to_string(), "D".to_string()],
        vec!["B".to_string()],
        99,
        &mut events,
    )
    .expect("start");
    let active = game.duel().active_player.clone().expect("starter");
    assert!(["A", "B"].contains(&active.as_str()));
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::RoundStarted { round: 0, .. })));
    assert_eq!(game.legal_selections(), SlotKey::ALL.to_vec());
}

macro_rules! roster_case {
    ($name:ident, $team1:expr, $team2:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let team1: Vec<String> = $team1.iter().map(|n: &&str| n.to_string()).collect();
            let team2: Vec<String> = $team2.iter().map(|n: &&str| n.to_string()).collect();
            let err = Game::new(GameConfig::default(), team1, team2, SEED).unwrap_err();
            assert_eq!(err, GameError::InvalidRoster($expected));
        }
    };
}

roster_case!(roster_empty_team1, [] as [&str; 0], ["B"], RosterError::EmptyTeam(TeamKey::Team1));
roster_case!(roster_empty_team2, ["A"], [] as [&str; 0], RosterError::EmptyTeam(TeamKey::Team2));
roster_case!(roster_blank_name, ["A", "  "], ["B"], RosterError::BlankName);
roster_case!(
    roster_duplicate_across_teams,
    ["A", "B"],
    ["B"],
    RosterError::DuplicateName("B".to_string())
);
roster_case!(
    roster_duplicate_within_team,
    ["A", "A"],
    ["B"],
    RosterError::DuplicateName("A".to_string())
);
