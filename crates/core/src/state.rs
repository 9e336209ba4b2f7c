use crate::{Card, Hand, PowerUpKind, TeamKey, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl SlotKey {
    pub const ALL: [SlotKey; 4] = [
        SlotKey::TopLeft,
        SlotKey::BottomLeft,
        SlotKey::TopRight,
        SlotKey::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            SlotKey::TopLeft => 0,
            SlotKey::BottomLeft => 1,
            SlotKey::TopRight => 2,
            SlotKey::BottomRight => 3,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            SlotKey::TopLeft => "top_left",
            SlotKey::BottomLeft => "bottom_left",
            SlotKey::TopRight => "top_right",
            SlotKey::BottomRight => "bottom_right",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let normalized = keyword.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "top_left" | "tl" | "topleft" => Some(SlotKey::TopLeft),
            "bottom_left" | "bl" | "bottomleft" => Some(SlotKey::BottomLeft),
            "top_right" | "tr" | "topright" => Some(SlotKey::TopRight),
            "bottom_right" | "br" | "bottomright" => Some(SlotKey::BottomRight),
            _ => None,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    /// Nobody has drawn into the slot this duel.
    #[default]
    Empty,
    /// A Second Chance released the slot; its hand stays and anyone may claim it.
    Pending,
    Player { name: String, team: TeamKey },
}

impl Occupant {
    pub fn is_claimable(&self) -> bool {
        matches!(self, Occupant::Empty | Occupant::Pending)
    }

    pub fn player(&self) -> Option<(&str, TeamKey)> {
        match self {
            Occupant::Player { name, team } => Some((name.as_str(), *team)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub occupant: Occupant,
    /// Cards dealt into the slot this duel, if any.
    pub hand: Option<Hand>,
    /// Whether the hand is shown face-up.
    pub revealed: bool,
}

impl Slot {
    pub fn sum(&self) -> Option<u8> {
        self.hand.as_ref().map(Hand::sum)
    }
}

/// A hand with some cards still face-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialHand(pub [Option<Card>; 3]);

impl PartialHand {
    pub fn first_two(hand: &Hand) -> Self {
        let [a, b, _] = *hand.cards();
        Self([Some(a), Some(b), None])
    }

    pub fn visible(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawer {
    pub name: String,
    pub team: TeamKey,
    pub slot: SlotKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelPhase {
    #[default]
    AwaitingFirstDraw,
    AwaitingSecondDraw,
    Resolved,
}

impl DuelPhase {
    /// Number of draws completed in the duel.
    pub fn step(self) -> u8 {
        match self {
            DuelPhase::AwaitingFirstDraw => 0,
            DuelPhase::AwaitingSecondDraw => 1,
            DuelPhase::Resolved => 2,
        }
    }
}

/// What resolution changed outside the duel, kept so a Second Chance can
/// undo exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOutcome {
    pub winning_team: TeamKey,
    pub losing_team: TeamKey,
    pub loser: String,
    pub scored: bool,
    pub eliminated: bool,
    /// Losing team's rotation cursor before resolution touched it.
    pub loser_cursor: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelState {
    pub phase: DuelPhase,
    pub active_player: Option<String>,
    pub first_drawer: Option<Drawer>,
    pub second_drawer: Option<Drawer>,
    /// The selection a Second Chance would rewind; cleared once rewound.
    pub last_selection: Option<Drawer>,
    pub slots: [Slot; 4],
    pub revealed_overlay: BTreeMap<SlotKey, PartialHand>,
    pub winning_team: Option<TeamKey>,
    pub verdict: Option<Verdict>,
    pub outcome: Option<AppliedOutcome>,
    /// Set once the untouched slots have been turned face-up.
    pub board_revealed: bool,
    pub second_chance_used_by: BTreeSet<TeamKey>,
    pub remove_worst_used_by: BTreeSet<TeamKey>,
    pub removed_slots: BTreeSet<SlotKey>,
    pub reveal_two_used_by: BTreeSet<TeamKey>,
    pub life_shield_used_by: BTreeSet<TeamKey>,
    pub lock_all_used_by: BTreeSet<TeamKey>,
}

impl Index<SlotKey> for DuelState {
    type Output = Slot;

    fn index(&self, key: SlotKey) -> &Slot {
        &self.slots[key.index()]
    }
}

impl IndexMut<SlotKey> for DuelState {
    fn index_mut(&mut self, key: SlotKey) -> &mut Slot {
        &mut self.slots[key.index()]
    }
}

impl DuelState {
    pub fn new(active_player: Option<String>) -> Self {
        Self {
            active_player,
            ..Self::default()
        }
    }

    pub fn step(&self) -> u8 {
        self.phase.step()
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == DuelPhase::Resolved
    }

    pub fn is_removed(&self, key: SlotKey) -> bool {
        self.removed_slots.contains(&key)
    }

    /// A slot a player could draw into right now, ignoring turn order.
    pub fn is_selectable(&self, key: SlotKey) -> bool {
        !self.is_removed(key) && self[key].occupant.is_claimable()
    }

    pub fn selectable_slots(&self) -> Vec<SlotKey> {
        SlotKey::ALL
            .into_iter()
            .filter(|key| self.is_selectable(*key))
            .collect()
    }

    pub fn has_redraw_target(&self) -> bool {
        SlotKey::ALL.into_iter().any(|key| self.is_selectable(key))
    }

    /// Slots nobody has drawn into and that are still in play.
    pub fn untouched_slots(&self) -> Vec<SlotKey> {
        SlotKey::ALL
            .into_iter()
            .filter(|key| !self.is_removed(*key) && self[*key].occupant == Occupant::Empty)
            .collect()
    }

    /// Slots Remove Worst may pick from: in play, unclaimed and face-down.
    pub fn remove_worst_candidates(&self) -> Vec<SlotKey> {
        SlotKey::ALL
            .into_iter()
            .filter(|key| {
                let slot = &self[*key];
                !self.is_removed(*key) && slot.occupant.is_claimable() && !slot.revealed
            })
            .collect()
    }

    /// The draw a Second Chance would rewind.
    pub fn latest_drawer(&self) -> Option<&Drawer> {
        self.last_selection.as_ref()
    }

    /// True when the other team has cast Lock All this duel.
    pub fn is_locked_out(&self, team: TeamKey) -> bool {
        self.lock_all_used_by.contains(&team.opponent())
    }

    pub fn used_by(&self, kind: PowerUpKind) -> &BTreeSet<TeamKey> {
        match kind {
            PowerUpKind::SecondChance => &self.second_chance_used_by,
            PowerUpKind::RevealTwo => &self.reveal_two_used_by,
            PowerUpKind::LifeShield => &self.life_shield_used_by,
            PowerUpKind::LockAll => &self.lock_all_used_by,
            PowerUpKind::RemoveWorst => &self.remove_worst_used_by,
        }
    }

    pub(crate) fn mark_used(&mut self, kind: PowerUpKind, team: TeamKey) {
        let set = match kind {
            PowerUpKind::SecondChance => &mut self.second_chance_used_by,
            PowerUpKind::RevealTwo => &mut self.reveal_two_used_by,
            PowerUpKind::LifeShield => &mut self.life_shield_used_by,
            PowerUpKind::LockAll => &mut self.lock_all_used_by,
            PowerUpKind::RemoveWorst => &mut self.remove_worst_used_by,
        };
        set.insert(team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_duel_offers_every_slot() {
        let duel = DuelState::new(Some("a".to_string()));
        assert_eq!(duel.step(), 0);
        assert_eq!(duel.selectable_slots(), SlotKey::ALL.to_vec());
        assert_eq!(duel.untouched_slots().len(), 4);
        assert!(duel.latest_drawer().is_none());
    }

    #[test]
    fn pending_slots_are_selectable_but_not_untouched() {
        let mut duel = DuelState::default();
        duel[SlotKey::TopLeft].occupant = Occupant::Pending;
        duel.removed_slots.insert(SlotKey::BottomRight);
        assert!(duel.is_selectable(SlotKey::TopLeft));
        assert!(!duel.is_selectable(SlotKey::BottomRight));
        assert_eq!(
            duel.untouched_slots(),
            vec![SlotKey::BottomLeft, SlotKey::TopRight]
        );
    }

    #[test]
    fn lock_applies_to_the_opponent_only() {
        let mut duel = DuelState::default();
        duel.lock_all_used_by.insert(TeamKey::Team1);
        assert!(duel.is_locked_out(TeamKey::Team2));
        assert!(!duel.is_locked_out(TeamKey::Team1));
    }

    #[test]
    fn slot_keywords_parse() {
        assert_eq!(SlotKey::from_keyword("TL"), Some(SlotKey::TopLeft));
        assert_eq!(SlotKey::from_keyword("bottom-right"), Some(SlotKey::BottomRight));
        assert_eq!(SlotKey::from_keyword("middle"), None);
    }
}
