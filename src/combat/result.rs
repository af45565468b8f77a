//! Terminal record of one combat.

use serde::{Deserialize, Serialize};

use crate::encounters::Encounter;

/// How a combat ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Death,
    /// Turn ceiling reached; counts as a loss.
    Timeout,
}

impl Outcome {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }
}

/// Result of one run. Produced exactly once per combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: Outcome,
    pub win: bool,
    pub turns: u32,
    pub damage_taken: i64,
    pub final_hp: i64,
    pub enemy_hp: i64,
    pub cards_played: u32,
    pub peak_strength: i64,
    pub peak_poison: i64,
    pub peak_orbs: u32,
    pub divinity_entries: u32,
    /// Scripted enemy fought, if any.
    pub encounter: Option<Encounter>,
}
