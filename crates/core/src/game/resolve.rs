use super::*;
use crate::{evaluate, AppliedOutcome, Contender, Event, Verdict};
use tracing::info;

impl Game {
    /// Settles a duel whose second draw just landed: scores the winner,
    /// eliminates the loser unless shielded, and turns the rest of the
    /// board face-up unless the loser can still answer with a Second Chance.
    pub(crate) fn resolve_duel(&mut self, events: &mut EventBus) -> Result<(), GameError> {
        let (Some(first), Some(second)) = (
            self.duel.first_drawer.clone(),
            self.duel.second_drawer.clone(),
        ) else {
            return Err(GameError::RoundInProgress);
        };
        let (Some(first_hand), Some(second_hand)) =
            (self.duel[first.slot].hand, self.duel[second.slot].hand)
        else {
            return Err(GameError::RoundInProgress);
        };

        let verdict = evaluate(
            Contender {
                name: &first.name,
                hand: &first_hand,
            },
            Contender {
                name: &second.name,
                hand: &second_hand,
            },
        )?;
        let (winner, loser, winner_sum, loser_sum) = if verdict.is_p1_winner {
            (&first, &second, first_hand.sum(), second_hand.sum())
        } else {
            (&second, &first, second_hand.sum(), first_hand.sum())
        };
        let winning_team = winner.team;
        let losing_team = loser.team;

        let shielded = self.duel.life_shield_used_by.contains(&losing_team);
        let loser_cursor = self.team(losing_team).cursor;
        let eliminated = if shielded {
            self.team_mut(losing_team).rotate_past(&loser.name);
            false
        } else {
            self.team_mut(winning_team).score += 1;
            let removed = self.team_mut(losing_team).eliminate(&loser.name);
            self.forget_player(&loser.name);
            removed
        };

        self.duel.outcome = Some(AppliedOutcome {
            winning_team,
            losing_team,
            loser: loser.name.clone(),
            scored: !shielded,
            eliminated,
            loser_cursor,
        });
        self.duel.winning_team = Some(winning_team);
        self.duel.verdict = Some(verdict.clone());
        self.duel.active_player = self
            .team(losing_team)
            .next_in_line()
            .map(str::to_string);
        self.next_starter = Some(losing_team);

        let message = outcome_message(&verdict, winner_sum, loser_sum, shielded);
        info!(
            winner = %winner.name,
            loser = %loser.name,
            reason = %verdict.reason,
            shielded,
            "duel resolved"
        );
        events.push(Event::DuelResolved {
            winner: winner.name.clone(),
            loser: loser.name.clone(),
            winning_team,
            reason: verdict.reason,
            eliminated,
            message,
            scores: self.scores(),
        });

        let defer_reveal = second.team == losing_team
            && self.can_use(losing_team, PowerUpKind::SecondChance);
        if !defer_reveal {
            self.reveal_board(events)?;
        }
        Ok(())
    }

    /// Deals and turns face-up every slot nobody drew into.
    pub(crate) fn reveal_board(&mut self, events: &mut EventBus) -> Result<(), GameError> {
        if self.duel.board_revealed {
            return Ok(());
        }
        let slots = self.duel.untouched_slots();
        for slot in &slots {
            self.deal_into(*slot)?;
            self.duel[*slot].revealed = true;
            self.duel.revealed_overlay.remove(slot);
        }
        self.duel.board_revealed = true;
        if !slots.is_empty() {
            events.push(Event::BoardRevealed { slots });
        }
        Ok(())
    }
}

fn outcome_message(verdict: &Verdict, winner_sum: u8, loser_sum: u8, shielded: bool) -> String {
    let mut message = format!(
        "{} beats {} by {} ({} vs {})",
        verdict.winner_name, verdict.loser_name, verdict.reason, winner_sum, loser_sum
    );
    if shielded {
        message.push_str(&format!(", {} is saved by a Life Shield", verdict.loser_name));
    } else {
        message.push_str(&format!(", {} is eliminated", verdict.loser_name));
    }
    message
}
