//! Combat configuration and enemy-intent calibration.
//!
//! Everything here is a calibration value tuned to keep win rates in a
//! useful band, not a rule of the game. All of it can be overridden from a
//! JSON file.

use serde::{Deserialize, Serialize};

use super::character::Character;
use crate::error::{Result, SimError};

/// What a debuff intent does to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebuffKind {
    /// Lose `amount` Dexterity.
    Dexterity,
    /// Gain `amount` Poison.
    Poison,
    /// Gain `amount` turns of Weak.
    Weak,
    /// Gain `amount` turns of Vulnerable.
    Vulnerable,
}

/// Per-turn enemy intent probabilities and magnitudes.
///
/// Turn 1 always attacks for `opener`. Later turns roll attack, buff,
/// debuff, then defend with whatever probability remains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentTable {
    /// Turn-1 attack damage.
    pub opener: i64,
    pub attack_chance: f64,
    pub attack_base: i64,
    /// Attack grows by `attack_step` every `attack_divisor` turns.
    pub attack_divisor: u32,
    pub attack_step: i64,
    pub buff_chance: f64,
    /// Strength gained on a buff.
    pub buff_amount: i64,
    pub debuff_chance: f64,
    pub debuff_amount: i64,
    pub debuff_kind: DebuffKind,
    /// Block gained on a defend.
    pub defend_amount: i64,
}

impl IntentTable {
    /// Attack magnitude on a given turn, before enemy Strength.
    #[must_use]
    pub fn attack_on(&self, turn: u32) -> i64 {
        self.attack_base + i64::from(turn / self.attack_divisor.max(1)) * self.attack_step
    }

    /// Chance of a defend: whatever remains after attack, buff and debuff.
    #[must_use]
    pub fn defend_chance(&self) -> f64 {
        (1.0 - self.attack_chance - self.buff_chance - self.debuff_chance).max(0.0)
    }

    fn validate(&self, character: Character) -> Result<()> {
        let chances = [self.attack_chance, self.buff_chance, self.debuff_chance];
        if chances.iter().any(|p| !(0.0..=1.0).contains(p)) || chances.iter().sum::<f64>() > 1.0 + 1e-9 {
            return Err(SimError::invalid(format!(
                "{character} intent probabilities must lie in [0, 1] and sum to at most 1"
            )));
        }
        if self.attack_divisor == 0 {
            return Err(SimError::invalid(format!("{character} attack divisor must be positive")));
        }
        Ok(())
    }

    fn ironclad() -> Self {
        Self {
            opener: 12,
            attack_chance: 0.60,
            attack_base: 8,
            attack_divisor: 3,
            attack_step: 2,
            buff_chance: 0.20,
            buff_amount: 2,
            debuff_chance: 0.0,
            debuff_amount: 0,
            debuff_kind: DebuffKind::Dexterity,
            defend_amount: 10,
        }
    }

    fn silent() -> Self {
        Self {
            opener: 16,
            attack_chance: 0.60,
            attack_base: 12,
            attack_divisor: 2,
            attack_step: 3,
            buff_chance: 0.15,
            buff_amount: 3,
            debuff_chance: 0.13,
            debuff_amount: 1,
            debuff_kind: DebuffKind::Dexterity,
            defend_amount: 10,
        }
    }

    fn defect() -> Self {
        Self {
            opener: 17,
            attack_chance: 0.65,
            attack_base: 13,
            attack_divisor: 2,
            attack_step: 3,
            buff_chance: 0.20,
            buff_amount: 3,
            debuff_chance: 0.0,
            debuff_amount: 0,
            debuff_kind: DebuffKind::Dexterity,
            defend_amount: 14,
        }
    }

    fn watcher() -> Self {
        Self {
            opener: 9,
            attack_chance: 0.50,
            attack_base: 7,
            attack_divisor: 3,
            attack_step: 2,
            buff_chance: 0.20,
            buff_amount: 2,
            debuff_chance: 0.0,
            debuff_amount: 0,
            debuff_kind: DebuffKind::Dexterity,
            defend_amount: 10,
        }
    }
}

/// One intent table per character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentTables {
    pub ironclad: IntentTable,
    pub silent: IntentTable,
    pub defect: IntentTable,
    pub watcher: IntentTable,
}

impl Default for IntentTables {
    fn default() -> Self {
        Self {
            ironclad: IntentTable::ironclad(),
            silent: IntentTable::silent(),
            defect: IntentTable::defect(),
            watcher: IntentTable::watcher(),
        }
    }
}

impl IntentTables {
    /// Table for one character.
    #[must_use]
    pub fn get(&self, character: Character) -> &IntentTable {
        match character {
            Character::Ironclad => &self.ironclad,
            Character::Silent => &self.silent,
            Character::Defect => &self.defect,
            Character::Watcher => &self.watcher,
        }
    }

    /// Mutable table for one character.
    pub fn get_mut(&mut self, character: Character) -> &mut IntentTable {
        match character {
            Character::Ironclad => &mut self.ironclad,
            Character::Silent => &mut self.silent,
            Character::Defect => &mut self.defect,
            Character::Watcher => &mut self.watcher,
        }
    }
}

/// Combat-wide configuration shared by every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Turn ceiling; reaching it is a timeout loss.
    pub max_turns: u32,

    /// Cards beyond this stay in the draw pile.
    pub hand_limit: usize,

    /// Cards drawn at the start of each turn.
    pub base_draw: usize,

    /// Energy at the start of each turn before bonuses.
    pub base_energy: i64,

    /// Card plays allowed in one turn; stops zero-cost draw loops.
    pub max_plays_per_turn: u32,

    /// Enemy behaviour per character.
    pub intents: IntentTables,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            hand_limit: 10,
            base_draw: 5,
            base_energy: 3,
            max_plays_per_turn: 60,
            intents: IntentTables::default(),
        }
    }
}

impl CombatConfig {
    /// Create the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the turn ceiling.
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Set the hand limit.
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Replace one character's intent table.
    pub fn with_intent_table(mut self, character: Character, table: IntentTable) -> Self {
        *self.intents.get_mut(character) = table;
        self
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(SimError::invalid("turn ceiling must be positive"));
        }
        if self.hand_limit == 0 {
            return Err(SimError::invalid("hand limit must be positive"));
        }
        for character in Character::ALL {
            self.intents.get(character).validate(character)?;
        }
        Ok(())
    }
}
