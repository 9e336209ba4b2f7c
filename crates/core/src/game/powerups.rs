use super::*;
use crate::{compare_hands, DuelPhase, Event, Occupant, PartialHand, RevealTwoScope};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Caster's team and the duel right after a power-up landed.
#[derive(Debug, Clone, Copy)]
pub struct PowerUpSnapshot<'a> {
    pub team: &'a TeamState,
    pub duel: &'a DuelState,
}

impl Game {
    /// Spends one charge of `kind` for `team` and applies its effect.
    pub fn activate_power_up(
        &mut self,
        team: TeamKey,
        kind: PowerUpKind,
        events: &mut EventBus,
    ) -> Result<PowerUpSnapshot<'_>, GameError> {
        self.transact(events, |game, events| {
            game.check_power_up(team, kind)?;
            let remaining = game
                .team_mut(team)
                .inventory
                .consume(kind)
                .map_err(|_| GameError::InsufficientCharges { team, kind })?;
            game.duel.mark_used(kind, team);
            info!(%team, %kind, remaining, "power-up used");
            events.push(Event::PowerUpUsed {
                team,
                kind,
                remaining,
            });
            match kind {
                PowerUpKind::SecondChance => game.apply_second_chance(team, events),
                PowerUpKind::RevealTwo => game.apply_reveal_two(events),
                PowerUpKind::LifeShield | PowerUpKind::LockAll => Ok(()),
                PowerUpKind::RemoveWorst => game.apply_remove_worst(events),
            }
        })
        .inspect_err(|err| debug!(%team, %kind, %err, "power-up rejected"))?;
        Ok(PowerUpSnapshot {
            team: self.team(team),
            duel: &self.duel,
        })
    }

    /// Charges first, then the kind's own legality rule.
    pub fn check_power_up(&self, team: TeamKey, kind: PowerUpKind) -> Result<(), GameError> {
        if self.finished.is_some() {
            return Err(GameError::MatchOver);
        }
        if self.team(team).inventory.count(kind) == 0 {
            return Err(GameError::InsufficientCharges { team, kind });
        }
        if !self.power_up_legal(team, kind) {
            return Err(GameError::PowerUpNotUsableNow { team, kind });
        }
        Ok(())
    }

    pub fn can_use(&self, team: TeamKey, kind: PowerUpKind) -> bool {
        self.check_power_up(team, kind).is_ok()
    }

    pub fn can_use_second_chance(&self, team: TeamKey) -> bool {
        self.can_use(team, PowerUpKind::SecondChance)
    }

    pub fn can_use_reveal_two(&self, team: TeamKey) -> bool {
        self.can_use(team, PowerUpKind::RevealTwo)
    }

    pub fn can_use_life_shield(&self, team: TeamKey) -> bool {
        self.can_use(team, PowerUpKind::LifeShield)
    }

    pub fn can_use_lock_all(&self, team: TeamKey) -> bool {
        self.can_use(team, PowerUpKind::LockAll)
    }

    pub fn can_use_remove_worst(&self, team: TeamKey) -> bool {
        self.can_use(team, PowerUpKind::RemoveWorst)
    }

    pub fn usable_power_ups(&self, team: TeamKey) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|kind| self.can_use(team, *kind))
            .collect()
    }

    fn power_up_legal(&self, team: TeamKey, kind: PowerUpKind) -> bool {
        let duel = &self.duel;
        let used = duel.used_by(kind).contains(&team);
        let on_turn = self.active_team() == Some(team) && !duel.is_resolved();
        match kind {
            PowerUpKind::SecondChance => self.second_chance_legal(team),
            PowerUpKind::RevealTwo => {
                let spent = match self.config.reveal_two_scope {
                    RevealTwoScope::PerDuel => !duel.reveal_two_used_by.is_empty(),
                    RevealTwoScope::PerTeam => used,
                };
                on_turn && !spent
            }
            PowerUpKind::LifeShield | PowerUpKind::LockAll => on_turn && !used,
            PowerUpKind::RemoveWorst => {
                on_turn && !used && duel.remove_worst_candidates().len() >= 2
            }
        }
    }

    fn second_chance_legal(&self, team: TeamKey) -> bool {
        let duel = &self.duel;
        if duel.second_chance_used_by.contains(&team) || duel.is_locked_out(team) {
            return false;
        }
        let Some(latest) = duel.latest_drawer() else {
            return false;
        };
        if latest.team != team {
            return false;
        }
        // Once the board is face-up the outcome is final.
        if duel.is_resolved() && duel.board_revealed {
            return false;
        }
        duel.has_redraw_target()
    }

    fn apply_second_chance(&mut self, team: TeamKey, events: &mut EventBus) -> Result<(), GameError> {
        let step = self.duel.step();
        self.duel.last_selection = None;
        match self.duel.phase {
            DuelPhase::AwaitingSecondDraw => {
                let drawer = self
                    .duel
                    .first_drawer
                    .take()
                    .ok_or(GameError::PowerUpNotUsableNow {
                        team,
                        kind: PowerUpKind::SecondChance,
                    })?;
                self.duel[drawer.slot].occupant = Occupant::Pending;
                self.duel.phase = DuelPhase::AwaitingFirstDraw;
                self.duel.active_player = Some(drawer.name.clone());
                events.push(Event::SecondChanceRewound {
                    team,
                    player: drawer.name,
                    step,
                    scores: self.scores(),
                });
            }
            DuelPhase::Resolved => {
                let drawer = self
                    .duel
                    .second_drawer
                    .take()
                    .ok_or(GameError::PowerUpNotUsableNow {
                        team,
                        kind: PowerUpKind::SecondChance,
                    })?;
                if let Some(outcome) = self.duel.outcome.take() {
                    if outcome.scored {
                        let winner = self.team_mut(outcome.winning_team);
                        winner.score = winner.score.saturating_sub(1);
                    }
                    if outcome.eliminated {
                        self.team_mut(outcome.losing_team)
                            .reinstate_front(&outcome.loser);
                        self.remember_player(&outcome.loser, outcome.losing_team);
                    } else {
                        self.team_mut(outcome.losing_team).cursor = outcome.loser_cursor;
                    }
                }
                self.duel[drawer.slot].occupant = Occupant::Pending;
                self.duel.phase = DuelPhase::AwaitingSecondDraw;
                self.duel.winning_team = None;
                self.duel.verdict = None;
                self.duel.active_player = Some(drawer.name.clone());
                self.next_starter = None;
                events.push(Event::SecondChanceRewound {
                    team,
                    player: drawer.name,
                    step,
                    scores: self.scores(),
                });
            }
            DuelPhase::AwaitingFirstDraw => {
                return Err(GameError::PowerUpNotUsableNow {
                    team,
                    kind: PowerUpKind::SecondChance,
                })
            }
        }
        Ok(())
    }

    fn apply_reveal_two(&mut self, events: &mut EventBus) -> Result<(), GameError> {
        let mut peeked = Vec::new();
        for slot in SlotKey::ALL {
            if self.duel.is_removed(slot) {
                continue;
            }
            self.deal_into(slot)?;
            let (revealed, hand) = (self.duel[slot].revealed, self.duel[slot].hand);
            if revealed {
                continue;
            }
            if let Some(hand) = hand {
                let partial = PartialHand::first_two(&hand);
                self.duel.revealed_overlay.insert(slot, partial);
                peeked.push(slot);
            }
        }
        events.push(Event::CardsPeeked { slots: peeked });
        Ok(())
    }

    fn apply_remove_worst(&mut self, events: &mut EventBus) -> Result<(), GameError> {
        let candidates = self.duel.remove_worst_candidates();
        for slot in &candidates {
            self.deal_into(*slot)?;
        }
        let worst = candidates
            .iter()
            .filter_map(|slot| self.duel[*slot].hand.map(|hand| (*slot, hand)))
            .reduce(|worst, candidate| {
                match compare_hands(&candidate.1, &worst.1).0 {
                    Ordering::Less => candidate,
                    _ => worst,
                }
            })
            .map(|(slot, _)| slot);
        let Some(slot) = worst else {
            return Ok(());
        };
        self.duel.removed_slots.insert(slot);
        self.duel.revealed_overlay.remove(&slot);
        info!(%slot, "slot removed");
        events.push(Event::SlotRemoved { slot });
        Ok(())
    }
}
