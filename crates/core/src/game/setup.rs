use super::*;
use crate::{PowerUpInventory, Scores};
use std::collections::HashSet;
use tracing::info;

impl Game {
    /// Builds a match without opening a round. Use [`Game::start`] to also
    /// deal the first round.
    pub fn new(
        config: GameConfig,
        team1: Vec<String>,
        team2: Vec<String>,
        seed: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let (team1, team2) = validate_rosters(team1, team2)?;

        let mut rng = RngState::from_seed(seed);
        let (loadout1, loadout2) = match &config.loadouts {
            Some(loadouts) => (loadouts.team1, loadouts.team2),
            None => (
                PowerUpInventory::random(&mut rng, config.team_budget, config.category_cap),
                PowerUpInventory::random(&mut rng, config.team_budget, config.category_cap),
            ),
        };

        let mut player_team = HashMap::new();
        for name in &team1 {
            player_team.insert(name.clone(), TeamKey::Team1);
        }
        for name in &team2 {
            player_team.insert(name.clone(), TeamKey::Team2);
        }

        Ok(Self {
            config,
            rng,
            deck: Deck::default(),
            teams: [
                TeamState::new(TeamKey::Team1, team1, loadout1),
                TeamState::new(TeamKey::Team2, team2, loadout2),
            ],
            duel: DuelState::default(),
            player_team,
            round: 0,
            starter: TeamKey::Team1,
            next_starter: None,
            finished: None,
        })
    }

    /// Builds a match and opens its first round.
    pub fn start(
        config: GameConfig,
        team1: Vec<String>,
        team2: Vec<String>,
        seed: u64,
        events: &mut EventBus,
    ) -> Result<Self, GameError> {
        let mut game = Self::new(config, team1, team2, seed)?;
        game.open_round(events)?;
        info!(seed, "match started");
        Ok(game)
    }

    pub fn team(&self, key: TeamKey) -> &TeamState {
        &self.teams[team_index(key)]
    }

    pub(crate) fn team_mut(&mut self, key: TeamKey) -> &mut TeamState {
        &mut self.teams[team_index(key)]
    }

    pub fn duel(&self) -> &DuelState {
        &self.duel
    }

    /// Zero-based index of the round being played.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn team_of(&self, player: &str) -> Option<TeamKey> {
        self.player_team.get(player).copied()
    }

    pub fn active_team(&self) -> Option<TeamKey> {
        self.duel
            .active_player
            .as_deref()
            .and_then(|name| self.team_of(name))
    }

    pub fn scores(&self) -> Scores {
        Scores {
            team1: self.team(TeamKey::Team1).score,
            team2: self.team(TeamKey::Team2).score,
        }
    }

    pub(crate) fn forget_player(&mut self, name: &str) {
        self.player_team.remove(name);
    }

    pub(crate) fn remember_player(&mut self, name: &str, team: TeamKey) {
        self.player_team.insert(name.to_string(), team);
    }
}

fn team_index(key: TeamKey) -> usize {
    match key {
        TeamKey::Team1 => 0,
        TeamKey::Team2 => 1,
    }
}

/// Trims every name and rejects empty teams, blank names and names that
/// appear twice anywhere across both teams.
pub fn validate_rosters(
    team1: Vec<String>,
    team2: Vec<String>,
) -> Result<(Vec<String>, Vec<String>), RosterError> {
    let team1 = normalize_roster(TeamKey::Team1, team1)?;
    let team2 = normalize_roster(TeamKey::Team2, team2)?;
    let mut seen = HashSet::new();
    for name in team1.iter().chain(team2.iter()) {
        if !seen.insert(name.as_str()) {
            return Err(RosterError::DuplicateName(name.clone()));
        }
    }
    Ok((team1, team2))
}

fn normalize_roster(team: TeamKey, names: Vec<String>) -> Result<Vec<String>, RosterError> {
    if names.is_empty() {
        return Err(RosterError::EmptyTeam(team));
    }
    names
        .into_iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(RosterError::BlankName)
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
