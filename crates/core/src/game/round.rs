use super::*;
use crate::Event;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundTransition {
    Started { round: u32, starter: String },
    MatchOver { winner: TeamKey },
}

impl Game {
    /// Discards the current duel and deals a fresh round, or reports the
    /// match winner once a roster is empty.
    pub fn next_round(&mut self, events: &mut EventBus) -> Result<RoundTransition, GameError> {
        if let Some(winner) = self.finished {
            return Ok(RoundTransition::MatchOver { winner });
        }
        self.transact(events, |game, events| {
            if game.duel.step() == 1 {
                return Err(GameError::RoundInProgress);
            }
            if game.duel.is_resolved() {
                game.reveal_board(events)?;
            }
            if let Some(winner) = game.roster_winner() {
                game.finished = Some(winner);
                info!(%winner, "match over");
                events.push(Event::MatchOver {
                    winner,
                    scores: game.scores(),
                });
                return Ok(RoundTransition::MatchOver { winner });
            }
            game.round += 1;
            game.open_round(events)
        })
    }

    /// Shuffles a fresh deck and clears the board for a new duel.
    pub(crate) fn open_round(&mut self, events: &mut EventBus) -> Result<RoundTransition, GameError> {
        if let Some(winner) = self.roster_winner() {
            return Ok(RoundTransition::MatchOver { winner });
        }
        let team = if self.round == 0 {
            TeamKey::ALL[self.rng.pick_index(TeamKey::ALL.len())]
        } else {
            self.next_starter.take().unwrap_or(self.starter)
        };
        let starter = self
            .team(team)
            .next_in_line()
            .ok_or(GameError::MatchOver)?
            .to_string();
        self.starter = team;
        self.deck = Deck::shuffled(&mut self.rng);
        self.duel = DuelState::new(Some(starter.clone()));
        info!(round = self.round, %starter, %team, "round started");
        events.push(Event::RoundStarted {
            round: self.round,
            starter: starter.clone(),
            team,
        });
        Ok(RoundTransition::Started {
            round: self.round,
            starter,
        })
    }

    /// Whether the team that just lost can still answer with a Second Chance.
    pub fn second_chance_pending(&self) -> bool {
        self.duel.is_resolved()
            && self
                .duel
                .outcome
                .as_ref()
                .is_some_and(|outcome| self.can_use_second_chance(outcome.losing_team))
    }

    /// True once a host timer may call [`Game::next_round`] on its own.
    pub fn should_auto_advance(&self) -> bool {
        self.finished.is_none()
            && self.duel.is_resolved()
            && TeamKey::ALL.iter().all(|team| !self.team(*team).is_empty())
            && !self.second_chance_pending()
    }

    /// The winning team once the match is decided and no undo is possible.
    pub fn match_winner(&self) -> Option<TeamKey> {
        if self.finished.is_some() {
            return self.finished;
        }
        if self.second_chance_pending() {
            return None;
        }
        self.roster_winner()
    }

    fn roster_winner(&self) -> Option<TeamKey> {
        TeamKey::ALL
            .into_iter()
            .find(|team| self.team(*team).is_empty())
            .map(TeamKey::opponent)
    }
}
