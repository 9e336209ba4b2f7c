use serde::{Deserialize, Serialize};

/// Player names for both teams, in turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rosters {
    pub team1: Vec<String>,
    pub team2: Vec<String>,
}

impl Rosters {
    pub fn player_count(&self) -> usize {
        self.team1.len() + self.team2.len()
    }
}
