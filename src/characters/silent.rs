//! Silent: Poison, Shivs and discard.

use super::stats;
use crate::combat::Combat;
use crate::core::Character;
use crate::rules::CharacterRules;

/// Poison archetype. Poison itself ticks at the start of the enemy turn
/// for every character; this type only fixes the starting numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl CharacterRules for Silent {
    fn character(&self) -> Character {
        Character::Silent
    }

    fn max_hp(&self) -> i64 {
        stats::SILENT_HP
    }

    fn default_enemy_hp(&self) -> i64 {
        stats::SILENT_ENEMY_HP
    }
}

/// Which hand card a discard effect throws away.
///
/// Unplayable cards go first, then the most expensive card the player can
/// no longer afford, then the newest card in hand.
#[must_use]
pub fn choose_discard(combat: &Combat) -> Option<usize> {
    let hand = combat.deck.hand();
    if hand.is_empty() {
        return None;
    }
    let energy = combat.player.energy;

    hand.iter()
        .position(|c| !c.category.is_playable())
        .or_else(|| {
            hand.iter()
                .enumerate()
                .filter(|(_, c)| !c.can_play(energy))
                .max_by_key(|(_, c)| c.cost.to_pay(energy))
                .map(|(i, _)| i)
        })
        .or(Some(hand.len() - 1))
}
