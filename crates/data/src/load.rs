use crate::schema::Rosters;
use anyhow::Context;
use cardduel_core::{validate_rosters, GameConfig};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const RULES_FILE: &str = "rules.json";
pub const ROSTERS_FILE: &str = "rosters.json";

/// Reads `rules.json` from `dir`. A missing file falls back to the
/// default rules; a present but invalid one is an error.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(RULES_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        GameConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Reads a rosters file and normalizes its names.
pub fn load_rosters(path: &Path) -> anyhow::Result<Rosters> {
    let raw: Rosters = load_json(path)?;
    let (team1, team2) = validate_rosters(raw.team1, raw.team2)
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(Rosters { team1, team2 })
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
