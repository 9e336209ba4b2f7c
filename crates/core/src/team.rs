use crate::PowerUpInventory;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamKey {
    Team1,
    Team2,
}

impl TeamKey {
    pub const ALL: [TeamKey; 2] = [TeamKey::Team1, TeamKey::Team2];

    pub fn opponent(self) -> Self {
        match self {
            TeamKey::Team1 => TeamKey::Team2,
            TeamKey::Team2 => TeamKey::Team1,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            TeamKey::Team1 => "team1",
            TeamKey::Team2 => "team2",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "team1" | "1" | "t1" => Some(TeamKey::Team1),
            "team2" | "2" | "t2" => Some(TeamKey::Team2),
            _ => None,
        }
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    pub key: TeamKey,
    pub score: u32,
    pub remaining: Vec<String>,
    /// Index into `remaining` of the player who draws next for this team.
    pub cursor: usize,
    pub inventory: PowerUpInventory,
}

impl TeamState {
    pub fn new(key: TeamKey, players: Vec<String>, inventory: PowerUpInventory) -> Self {
        Self {
            key,
            score: 0,
            remaining: players,
            cursor: 0,
            inventory,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn next_in_line(&self) -> Option<&str> {
        if self.remaining.is_empty() {
            return None;
        }
        self.remaining
            .get(self.cursor % self.remaining.len())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.remaining.iter().any(|player| player == name)
    }

    /// Removes the first occurrence of `name` and points the rotation back
    /// at the front of the roster.
    pub fn eliminate(&mut self, name: &str) -> bool {
        let Some(idx) = self.remaining.iter().position(|player| player == name) else {
            return false;
        };
        self.remaining.remove(idx);
        self.cursor = 0;
        true
    }

    pub fn reinstate_front(&mut self, name: &str) {
        self.remaining.insert(0, name.to_string());
        self.cursor = 0;
    }

    /// Moves the rotation to the player after `name`, wrapping around.
    pub fn rotate_past(&mut self, name: &str) {
        if let Some(idx) = self.remaining.iter().position(|player| player == name) {
            self.cursor = (idx + 1) % self.remaining.len();
        }
    }
}
