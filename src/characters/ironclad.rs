//! Ironclad: Strength scaling.

use super::stats;
use crate::core::Character;
use crate::rules::CharacterRules;

/// Strength archetype. No resource extension; Strength lives on the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ironclad;

impl CharacterRules for Ironclad {
    fn character(&self) -> Character {
        Character::Ironclad
    }

    fn max_hp(&self) -> i64 {
        stats::IRONCLAD_HP
    }

    fn default_enemy_hp(&self) -> i64 {
        stats::IRONCLAD_ENEMY_HP
    }
}

/// Raw damage for a Strength-multiplied attack, shaped so that the normal
/// single Strength add in damage resolution lands on `multiplier` × Strength.
#[must_use]
pub const fn strength_scaled_raw(amount: i64, strength: i64, multiplier: i64) -> i64 {
    amount + strength * (multiplier - 1)
}
