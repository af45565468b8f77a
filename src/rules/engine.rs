//! Character rules trait and the read-only context threaded through a run.
//!
//! The four characters share one turn state machine. What differs between
//! them lives behind [`CharacterRules`]:
//! - starting stats and the character's resource extension
//! - the enemy's intent roll
//! - turn-start and end-of-turn hooks (Divinity energy, orb passives)

use crate::cards::CardSource;
use crate::combat::{Combat, Extension, Intent, PlayerState};
use crate::core::{Character, CombatConfig, GameRng, IntentTable};

/// Read-only lookups shared by every step of a run.
#[derive(Clone, Copy)]
pub struct CombatContext<'a> {
    pub rules: &'a dyn CharacterRules,
    pub cards: &'a dyn CardSource,
    pub config: &'a CombatConfig,
}

impl<'a> CombatContext<'a> {
    #[must_use]
    pub fn new(rules: &'a dyn CharacterRules, cards: &'a dyn CardSource, config: &'a CombatConfig) -> Self {
        Self { rules, cards, config }
    }

    /// Intent table for the character being played.
    #[must_use]
    pub fn intent_table(&self) -> &'a IntentTable {
        self.config.intents.get(self.rules.character())
    }
}

/// Per-character strategy object.
///
/// ## Implementation Notes
///
/// - Hooks must be deterministic given the combat's RNG.
/// - `on_end_of_turn` runs before the hand is discarded.
pub trait CharacterRules: Send + Sync {
    /// Which character these rules describe.
    fn character(&self) -> Character;

    /// Starting and maximum HP.
    fn max_hp(&self) -> i64;

    /// Enemy HP when the setup does not override it.
    fn default_enemy_hp(&self) -> i64;

    /// Fresh resource extension for a new combat.
    fn extension(&self) -> Extension {
        Extension::None
    }

    /// Fresh player at the start of a combat.
    fn new_player(&self, config: &CombatConfig) -> PlayerState {
        PlayerState::new(self.max_hp(), config.base_energy, self.extension())
    }

    /// Roll the enemy's intent for `turn`.
    ///
    /// Turn 1 is always the opener. Later turns draw exactly one weighted
    /// choice from the table.
    fn roll_intent(&self, turn: u32, table: &IntentTable, rng: &mut GameRng) -> Intent {
        if turn <= 1 {
            return Intent::Attack(table.opener);
        }
        let weights = [
            table.attack_chance,
            table.buff_chance,
            table.debuff_chance,
            table.defend_chance(),
        ];
        match rng.choose_weighted(&weights) {
            Some(0) => Intent::Attack(table.attack_on(turn)),
            Some(1) => Intent::Buff(table.buff_amount),
            Some(2) => Intent::Debuff {
                kind: table.debuff_kind,
                amount: table.debuff_amount,
            },
            _ => Intent::Defend(table.defend_amount),
        }
    }

    /// Runs after energy is refilled and before the turn's draw.
    fn on_turn_start(&self, _combat: &mut Combat) {}

    /// Runs at end of turn, before the hand is discarded.
    fn on_end_of_turn(&self, _combat: &mut Combat, _ctx: &CombatContext<'_>) {}
}
