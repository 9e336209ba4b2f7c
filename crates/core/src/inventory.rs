use crate::RngState;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    SecondChance,
    RevealTwo,
    LifeShield,
    LockAll,
    RemoveWorst,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::SecondChance,
        PowerUpKind::RevealTwo,
        PowerUpKind::LifeShield,
        PowerUpKind::LockAll,
        PowerUpKind::RemoveWorst,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PowerUpKind::SecondChance => "second_chance",
            PowerUpKind::RevealTwo => "reveal_two",
            PowerUpKind::LifeShield => "life_shield",
            PowerUpKind::LockAll => "lock_all",
            PowerUpKind::RemoveWorst => "remove_worst",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let normalized = keyword.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "second_chance" | "secondchance" | "retry" => Some(PowerUpKind::SecondChance),
            "reveal_two" | "revealtwo" | "peek" => Some(PowerUpKind::RevealTwo),
            "life_shield" | "lifeshield" | "shield" => Some(PowerUpKind::LifeShield),
            "lock_all" | "lockall" | "lock" => Some(PowerUpKind::LockAll),
            "remove_worst" | "removeworst" | "remove" => Some(PowerUpKind::RemoveWorst),
            _ => None,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("no {0} charges left")]
    Empty(PowerUpKind),
    #[error("{kind} holds {count} charges, cap is {cap}")]
    OverCap { kind: PowerUpKind, count: u8, cap: u8 },
    #[error("loadout holds {total} charges, budget is {budget}")]
    BudgetMismatch { total: u32, budget: u8 },
}

/// Charges a team holds for each power-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpInventory {
    #[serde(default)]
    pub second_chance: u8,
    #[serde(default)]
    pub reveal_two: u8,
    #[serde(default)]
    pub life_shield: u8,
    #[serde(default)]
    pub lock_all: u8,
    #[serde(default)]
    pub remove_worst: u8,
}

impl PowerUpInventory {
    /// Deals `budget` charges across the five kinds, never putting more
    /// than `cap` into one kind. Callers validate `budget <= 5 * cap`.
    pub fn random(rng: &mut RngState, budget: u8, cap: u8) -> Self {
        let mut inventory = Self::default();
        for _ in 0..budget {
            let open: Vec<PowerUpKind> = PowerUpKind::ALL
                .into_iter()
                .filter(|kind| inventory.count(*kind) < cap)
                .collect();
            if open.is_empty() {
                break;
            }
            let kind = open[rng.pick_index(open.len())];
            *inventory.slot_mut(kind) += 1;
        }
        inventory
    }

    pub fn count(&self, kind: PowerUpKind) -> u8 {
        match kind {
            PowerUpKind::SecondChance => self.second_chance,
            PowerUpKind::RevealTwo => self.reveal_two,
            PowerUpKind::LifeShield => self.life_shield,
            PowerUpKind::LockAll => self.lock_all,
            PowerUpKind::RemoveWorst => self.remove_worst,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut u8 {
        match kind {
            PowerUpKind::SecondChance => &mut self.second_chance,
            PowerUpKind::RevealTwo => &mut self.reveal_two,
            PowerUpKind::LifeShield => &mut self.life_shield,
            PowerUpKind::LockAll => &mut self.lock_all,
            PowerUpKind::RemoveWorst => &mut self.remove_worst,
        }
    }

    pub fn total(&self) -> u32 {
        PowerUpKind::ALL
            .iter()
            .map(|kind| u32::from(self.count(*kind)))
            .sum()
    }

    /// Spends one charge and returns what is left.
    pub fn consume(&mut self, kind: PowerUpKind) -> Result<u8, InventoryError> {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return Err(InventoryError::Empty(kind));
        }
        *slot -= 1;
        Ok(*slot)
    }

    pub fn validate(&self, budget: u8, cap: u8) -> Result<(), InventoryError> {
        for kind in PowerUpKind::ALL {
            let count = self.count(kind);
            if count > cap {
                return Err(InventoryError::OverCap { kind, count, cap });
            }
        }
        let total = self.total();
        if total != u32::from(budget) {
            return Err(InventoryError::BudgetMismatch { total, budget });
        }
        Ok(())
    }
}
