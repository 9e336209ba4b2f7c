use cardduel_core::{Event, Game, Occupant, PowerUpKind, SlotKey, TeamKey};
use std::fmt::Write as _;

/// Two-by-two board as the players see it: hands face-up where revealed,
/// the peeked pair where Reveal Two showed one, `??` otherwise.
pub fn board(game: &Game) -> String {
    let duel = game.duel();
    let rows = [
        [SlotKey::TopLeft, SlotKey::TopRight],
        [SlotKey::BottomLeft, SlotKey::BottomRight],
    ];
    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(|slot| slot_cell(game, *slot)).collect();
        let _ = writeln!(out, "{:<34}{}", cells[0], cells[1]);
    }
    if let Some(player) = &duel.active_player {
        if !duel.is_resolved() {
            let _ = writeln!(out, "{player} to draw (step {})", duel.step());
        }
    }
    out
}

fn slot_cell(game: &Game, slot: SlotKey) -> String {
    let duel = game.duel();
    let state = &duel[slot];
    let owner = match &state.occupant {
        Occupant::Empty => "-".to_string(),
        Occupant::Pending => "?".to_string(),
        Occupant::Player { name, .. } => name.clone(),
    };
    let face = if duel.is_removed(slot) {
        "removed".to_string()
    } else if let (true, Some(hand)) = (state.revealed, state.hand) {
        format!("{hand} = {}", hand.sum())
    } else if let Some(partial) = duel.revealed_overlay.get(&slot) {
        let shown: Vec<String> = partial.visible().map(|card| card.to_string()).collect();
        format!("{} ??", shown.join(" "))
    } else {
        "?? ?? ??".to_string()
    };
    format!("[{slot}] {owner}: {face}")
}

pub fn status(game: &Game) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "round {}", game.round() + 1);
    for key in TeamKey::ALL {
        let team = game.team(key);
        let _ = writeln!(
            out,
            "{key}: score {} | players {} | {}",
            team.score,
            team.remaining.join(", "),
            inventory_line(game, key)
        );
    }
    if let Some(winner) = game.match_winner() {
        let _ = writeln!(out, "{winner} wins the match");
    } else if game.second_chance_pending() {
        let _ = writeln!(out, "the losing team may still use a second chance");
    }
    out
}

fn inventory_line(game: &Game, key: TeamKey) -> String {
    let inventory = &game.team(key).inventory;
    PowerUpKind::ALL
        .into_iter()
        .map(|kind| format!("{kind} x{}", inventory.count(kind)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Power-ups each team could spend right now.
pub fn powers(game: &Game) -> String {
    let mut out = String::new();
    for key in TeamKey::ALL {
        let usable = game.usable_power_ups(key);
        let names: Vec<&str> = usable.iter().map(|kind| kind.id()).collect();
        let listed = if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        };
        let _ = writeln!(out, "{key}: {listed}");
    }
    out
}

pub fn event_line(event: &Event) -> String {
    match event {
        Event::RoundStarted { round, starter, team } => {
            format!("round {} begins, {starter} ({team}) draws first", round + 1)
        }
        Event::SlotSelected {
            player, slot, sum, ..
        } => format!("{player} draws {slot} for a sum of {sum}"),
        Event::DuelResolved { message, scores, .. } => {
            format!("{message} [{} - {}]", scores.team1, scores.team2)
        }
        Event::BoardRevealed { slots } => format!("board revealed: {}", join_slots(slots)),
        Event::PowerUpUsed {
            team,
            kind,
            remaining,
        } => format!("{team} uses {kind} ({remaining} left)"),
        Event::SecondChanceRewound { team, player, .. } => {
            format!("{team} takes a second chance, {player} draws again")
        }
        Event::CardsPeeked { slots } => format!("cards peeked in {}", join_slots(slots)),
        Event::SlotRemoved { slot } => format!("{slot} is removed from play"),
        Event::MatchOver { winner, scores } => {
            format!("{winner} wins the match [{} - {}]", scores.team1, scores.team2)
        }
    }
}

fn join_slots(slots: &[SlotKey]) -> String {
    slots
        .iter()
        .map(|slot| slot.id())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardduel_core::{EventBus, GameConfig};

    fn game() -> Game {
        let mut events = EventBus::default();
        Game::start(
            GameConfig::default(),
            vec!["Ada".to_string()],
            vec!["Dev".to_string()],
            9,
            &mut events,
        )
        .expect("start")
    }

    #[test]
    fn fresh_board_is_face_down() {
        let text = board(&game());
        assert_eq!(text.matches("?? ?? ??").count(), 4);
        assert!(text.contains("to draw (step 0)"));
    }

    #[test]
    fn drawn_slot_shows_its_hand() {
        let mut game = game();
        let mut events = EventBus::default();
        let player = game.duel().active_player.clone().expect("active");
        game.select_slot(&player, SlotKey::TopLeft, &mut events)
            .expect("draw");
        let text = board(&game);
        assert!(text.contains(&format!("[top_left] {player}:")));
        assert_eq!(text.matches("?? ?? ??").count(), 3);
    }

    #[test]
    fn status_lists_both_teams() {
        let text = status(&game());
        assert!(text.contains("team1: score 0 | players Ada"));
        assert!(text.contains("team2: score 0 | players Dev"));
    }
}
