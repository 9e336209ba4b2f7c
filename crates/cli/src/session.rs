use anyhow::{bail, Context};
use cardduel_core::{
    Event, EventBus, Game, GameConfig, GameError, PowerUpKind, RoundTransition, SelectionError,
    SlotKey, TeamKey,
};
use cardduel_data::Rosters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SAVE_SCHEMA_VERSION: u32 = 1;

/// One accepted controller call, enough to replay a match from its seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SavedAction {
    Pick { player: String, slot: SlotKey },
    Use { team: TeamKey, kind: PowerUpKind },
    Next,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMatch {
    pub version: u32,
    pub seed: u64,
    #[serde(default)]
    pub config: GameConfig,
    pub rosters: Rosters,
    pub actions: Vec<SavedAction>,
}

/// The host's single controller plus the action log that backs its saves.
#[derive(Debug)]
pub struct Session {
    pub game: Game,
    pub seed: u64,
    pub rosters: Rosters,
    pub actions: Vec<SavedAction>,
    pub autosave: Option<PathBuf>,
    /// Bumped whenever a load replaces the match, so timers armed for the
    /// old match can tell they are stale.
    pub generation: u64,
}

impl Session {
    pub fn start(
        config: GameConfig,
        rosters: Rosters,
        seed: u64,
        events: &mut EventBus,
    ) -> Result<Self, GameError> {
        let game = Game::start(
            config,
            rosters.team1.clone(),
            rosters.team2.clone(),
            seed,
            events,
        )?;
        Ok(Self {
            game,
            seed,
            rosters,
            actions: Vec::new(),
            autosave: None,
            generation: 0,
        })
    }

    /// Draws for whoever is on turn.
    pub fn pick(&mut self, slot: SlotKey, events: &mut EventBus) -> Result<(), GameError> {
        let Some(player) = self.game.duel().active_player.clone() else {
            if self.game.match_winner().is_some() {
                return Err(GameError::MatchOver);
            }
            return Err(SelectionError::DuelResolved.into());
        };
        self.apply(SavedAction::Pick { player, slot }, events)
    }

    pub fn use_power_up(
        &mut self,
        team: TeamKey,
        kind: PowerUpKind,
        events: &mut EventBus,
    ) -> Result<(), GameError> {
        self.apply(SavedAction::Use { team, kind }, events)
    }

    pub fn next_round(&mut self, events: &mut EventBus) -> Result<RoundTransition, GameError> {
        let transition = self.game.next_round(events)?;
        self.actions.push(SavedAction::Next);
        self.persist();
        Ok(transition)
    }

    fn apply(&mut self, action: SavedAction, events: &mut EventBus) -> Result<(), GameError> {
        apply_saved_action(&mut self.game, &action, events)?;
        self.actions.push(action);
        Ok(())
    }

    pub fn snapshot(&self) -> SavedMatch {
        SavedMatch {
            version: SAVE_SCHEMA_VERSION,
            seed: self.seed,
            config: self.game.config.clone(),
            rosters: self.rosters.clone(),
            actions: self.actions.clone(),
        }
    }

    /// Fire-and-forget autosave after a round transition.
    fn persist(&self) {
        let Some(path) = &self.autosave else {
            return;
        };
        if let Err(err) = save_match(&self.snapshot(), path) {
            let reason = format!("{err:#}");
            warn!(path = %path.display(), %reason, "autosave failed");
        }
    }

    /// Rebuilds a session by replaying a save from its seed.
    pub fn replay(saved: SavedMatch, events: &mut EventBus) -> anyhow::Result<Self> {
        if saved.version != SAVE_SCHEMA_VERSION {
            bail!(
                "unsupported save version {} (expected {})",
                saved.version,
                SAVE_SCHEMA_VERSION
            );
        }
        let mut session = Self::start(saved.config, saved.rosters, saved.seed, events)
            .context("restart saved match")?;
        for (index, action) in saved.actions.iter().enumerate() {
            apply_saved_action(&mut session.game, action, events)
                .with_context(|| format!("replay action {index}"))?;
        }
        session.actions = saved.actions;
        info!(actions = session.actions.len(), "save replayed");
        Ok(session)
    }
}

pub fn apply_saved_action(
    game: &mut Game,
    action: &SavedAction,
    events: &mut EventBus,
) -> Result<(), GameError> {
    match action {
        SavedAction::Pick { player, slot } => {
            game.select_slot(player, *slot, events)?;
        }
        SavedAction::Use { team, kind } => {
            game.activate_power_up(*team, *kind, events)?;
        }
        SavedAction::Next => {
            game.next_round(events)?;
        }
    }
    Ok(())
}

pub fn save_match(saved: &SavedMatch, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(saved).context("encode save")?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

pub fn load_match(path: &Path) -> anyhow::Result<SavedMatch> {
    cardduel_data::load_json(path)
}

/// Deterministic self-play policy: the team on turn spends its first usable
/// power-up before drawing, and a beaten second drawer always retries.
pub fn auto_step(session: &mut Session, events: &mut EventBus) -> Result<Option<TeamKey>, GameError> {
    let duel = session.game.duel();
    if duel.is_resolved() {
        if let Some(outcome) = duel.outcome.clone() {
            if session.game.second_chance_pending() {
                session.use_power_up(outcome.losing_team, PowerUpKind::SecondChance, events)?;
                return Ok(None);
            }
        }
        if let RoundTransition::MatchOver { winner } = session.next_round(events)? {
            return Ok(Some(winner));
        }
        return Ok(None);
    }
    if let Some(team) = session.game.active_team() {
        let spendable = session
            .game
            .usable_power_ups(team)
            .into_iter()
            .find(|kind| *kind != PowerUpKind::SecondChance);
        if let Some(kind) = spendable {
            session.use_power_up(team, kind, events)?;
            return Ok(None);
        }
    }
    let slot = session
        .game
        .legal_selections()
        .first()
        .copied()
        .ok_or(GameError::RoundInProgress)?;
    session.pick(slot, events)?;
    Ok(None)
}

/// True when `events` contains a resolution the timer should follow up on.
pub fn resolved_in(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::DuelResolved { .. } | Event::BoardRevealed { .. }))
}
