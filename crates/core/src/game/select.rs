use super::*;
use crate::{DuelPhase, Drawer, Event, Occupant};
use tracing::debug;

impl Game {
    /// Draws `player` into `slot`. The second draw of a duel resolves it.
    pub fn select_slot(
        &mut self,
        player: &str,
        slot: SlotKey,
        events: &mut EventBus,
    ) -> Result<&DuelState, GameError> {
        self.transact(events, |game, events| game.apply_selection(player, slot, events))
            .inspect_err(|err| debug!(player, %slot, %err, "selection rejected"))?;
        Ok(&self.duel)
    }

    /// Slots the active player may draw into right now.
    pub fn legal_selections(&self) -> Vec<SlotKey> {
        if self.finished.is_some() || self.duel.is_resolved() || self.duel.active_player.is_none()
        {
            return Vec::new();
        }
        self.duel.selectable_slots()
    }

    fn apply_selection(
        &mut self,
        player: &str,
        slot: SlotKey,
        events: &mut EventBus,
    ) -> Result<(), GameError> {
        if self.finished.is_some() {
            return Err(GameError::MatchOver);
        }
        if self.duel.is_resolved() {
            return Err(SelectionError::DuelResolved.into());
        }
        let team = self
            .team_of(player)
            .ok_or_else(|| SelectionError::UnknownPlayer(player.to_string()))?;
        match self.duel.active_player.as_deref() {
            Some(active) if active == player => {}
            other => {
                return Err(SelectionError::NotYourTurn {
                    expected: other.unwrap_or("nobody").to_string(),
                    got: player.to_string(),
                }
                .into())
            }
        }
        if self.duel.is_removed(slot) {
            return Err(SelectionError::SlotRemoved(slot).into());
        }
        if !self.duel[slot].occupant.is_claimable() {
            return Err(SelectionError::SlotTaken(slot).into());
        }

        let sum = self.deal_into(slot)?;
        let target = &mut self.duel[slot];
        target.occupant = Occupant::Player {
            name: player.to_string(),
            team,
        };
        target.revealed = true;
        self.duel.revealed_overlay.remove(&slot);
        events.push(Event::SlotSelected {
            player: player.to_string(),
            team,
            slot,
            sum,
        });

        let drawer = Drawer {
            name: player.to_string(),
            team,
            slot,
        };
        self.duel.last_selection = Some(drawer.clone());
        match self.duel.phase {
            DuelPhase::AwaitingFirstDraw => {
                let opponent = self
                    .team(team.opponent())
                    .next_in_line()
                    .ok_or(GameError::MatchOver)?
                    .to_string();
                debug!(player, %slot, sum, next = %opponent, "first draw");
                self.duel.first_drawer = Some(drawer);
                self.duel.phase = DuelPhase::AwaitingSecondDraw;
                self.duel.active_player = Some(opponent);
            }
            DuelPhase::AwaitingSecondDraw => {
                debug!(player, %slot, sum, "second draw");
                self.duel.second_drawer = Some(drawer);
                self.duel.phase = DuelPhase::Resolved;
                self.resolve_duel(events)?;
            }
            DuelPhase::Resolved => return Err(SelectionError::DuelResolved.into()),
        }
        Ok(())
    }

    /// Deals a hand into `slot` unless it already holds one; returns its sum.
    pub(crate) fn deal_into(&mut self, slot: SlotKey) -> Result<u8, GameError> {
        if let Some(hand) = &self.duel[slot].hand {
            return Ok(hand.sum());
        }
        let hand = self.deck.draw_hand()?;
        self.duel[slot].hand = Some(hand);
        Ok(hand.sum())
    }
}
