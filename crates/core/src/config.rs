use crate::{InventoryError, PowerUpInventory, PowerUpKind, TeamKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many times Reveal Two may be used within one duel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealTwoScope {
    /// The first team to use it locks the other team out.
    #[default]
    PerDuel,
    PerTeam,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadouts {
    pub team1: PowerUpInventory,
    pub team2: PowerUpInventory,
}

impl Loadouts {
    pub fn get(&self, team: TeamKey) -> PowerUpInventory {
        match team {
            TeamKey::Team1 => self.team1,
            TeamKey::Team2 => self.team2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_team_budget")]
    pub team_budget: u8,
    #[serde(default = "default_category_cap")]
    pub category_cap: u8,
    #[serde(default)]
    pub reveal_two_scope: RevealTwoScope,
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    #[serde(default)]
    pub loadouts: Option<Loadouts>,
}

fn default_team_budget() -> u8 {
    4
}

fn default_category_cap() -> u8 {
    2
}

fn default_auto_advance_ms() -> u64 {
    3000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            team_budget: default_team_budget(),
            category_cap: default_category_cap(),
            reveal_two_scope: RevealTwoScope::default(),
            auto_advance_ms: default_auto_advance_ms(),
            loadouts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("team budget {budget} cannot fit under a cap of {cap} per power-up")]
    BudgetOverCapacity { budget: u8, cap: u8 },
    #[error("{team} loadout: {source}")]
    Loadout {
        team: TeamKey,
        #[source]
        source: InventoryError,
    },
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = u32::from(self.category_cap) * PowerUpKind::ALL.len() as u32;
        if u32::from(self.team_budget) > capacity {
            return Err(ConfigError::BudgetOverCapacity {
                budget: self.team_budget,
                cap: self.category_cap,
            });
        }
        if let Some(loadouts) = &self.loadouts {
            for team in TeamKey::ALL {
                loadouts
                    .get(team)
                    .validate(self.team_budget, self.category_cap)
                    .map_err(|source| ConfigError::Loadout { team, source })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = GameConfig::default();
        assert_eq!(config.team_budget, 4);
        assert_eq!(config.category_cap, 2);
        assert_eq!(config.reveal_two_scope, RevealTwoScope::PerDuel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn scope_parses_snake_case() {
        let config: GameConfig =
            serde_json::from_str(r#"{"reveal_two_scope":"per_team"}"#).expect("parse");
        assert_eq!(config.reveal_two_scope, RevealTwoScope::PerTeam);
    }

    #[test]
    fn oversized_budget_is_rejected() {
        let config = GameConfig {
            team_budget: 11,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BudgetOverCapacity { budget: 11, cap: 2 })
        ));
    }

    #[test]
    fn bad_loadout_names_its_team() {
        let config = GameConfig {
            loadouts: Some(Loadouts {
                team1: PowerUpInventory {
                    second_chance: 2,
                    lock_all: 2,
                    ..PowerUpInventory::default()
                },
                team2: PowerUpInventory {
                    second_chance: 4,
                    ..PowerUpInventory::default()
                },
            }),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Loadout { team: TeamKey::Team2, .. })
        ));
    }
}
