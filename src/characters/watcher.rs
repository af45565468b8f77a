//! Watcher: stances and Mantra.

use super::stats;
use crate::combat::{Combat, Extension, StanceState};
use crate::core::Character;
use crate::effects::Stance;
use crate::rules::CharacterRules;

/// Mantra needed to enter Divinity.
pub const MANTRA_THRESHOLD: i64 = 10;

/// Energy refunded when leaving Calm.
pub const CALM_EXIT_ENERGY: i64 = 2;

/// Energy granted at the start of a turn spent in Divinity.
pub const DIVINITY_ENERGY: i64 = 3;

/// Stance archetype.
#[derive(Clone, Copy, Debug, Default)]
pub struct Watcher;

impl CharacterRules for Watcher {
    fn character(&self) -> Character {
        Character::Watcher
    }

    fn max_hp(&self) -> i64 {
        stats::WATCHER_HP
    }

    fn default_enemy_hp(&self) -> i64 {
        stats::WATCHER_ENEMY_HP
    }

    fn extension(&self) -> Extension {
        Extension::Stance(StanceState::default())
    }

    fn on_turn_start(&self, combat: &mut Combat) {
        if combat.player.ext.stance() == Stance::Divinity {
            combat.player.energy += DIVINITY_ENERGY;
            change_stance(combat, Stance::Neutral);
        }
    }
}

/// Switch stance. Re-entering the current stance does nothing.
pub fn change_stance(combat: &mut Combat, stance: Stance) {
    let Some(state) = combat.player.ext.stance_mut() else {
        return;
    };
    if state.stance == stance {
        return;
    }
    let previous = std::mem::replace(&mut state.stance, stance);
    let block = state.change_block;

    if previous == Stance::Calm {
        combat.player.energy += CALM_EXIT_ENERGY;
    }
    if stance == Stance::Divinity {
        combat.stats.divinity_entries += 1;
    }
    combat.player.block += block;
}

/// Add Mantra, entering Divinity each time it reaches the threshold.
pub fn gain_mantra(combat: &mut Combat, amount: i64) {
    let reached = match combat.player.ext.stance_mut() {
        Some(state) => {
            state.mantra += amount;
            if state.mantra >= MANTRA_THRESHOLD {
                state.mantra -= MANTRA_THRESHOLD;
                true
            } else {
                false
            }
        }
        None => return,
    };
    if reached {
        change_stance(combat, Stance::Divinity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{EnemyState, PlayerState};
    use crate::core::GameRng;
    use crate::zones::DeckState;

    fn watcher_combat() -> Combat {
        Combat::assemble(
            Character::Watcher,
            PlayerState::new(72, 3, Extension::Stance(StanceState::default())),
            EnemyState::new(105),
            DeckState::default(),
            GameRng::new(0),
        )
    }

    #[test]
    fn test_leaving_calm_refunds_energy() {
        let mut combat = watcher_combat();
        change_stance(&mut combat, Stance::Calm);
        assert_eq!(combat.player.energy, 3);

        change_stance(&mut combat, Stance::Wrath);
        assert_eq!(combat.player.energy, 5);
        assert_eq!(combat.player.ext.stance(), Stance::Wrath);
    }

    #[test]
    fn test_same_stance_is_noop() {
        let mut combat = watcher_combat();
        if let Some(state) = combat.player.ext.stance_mut() {
            state.change_block = 4;
        }
        change_stance(&mut combat, Stance::Wrath);
        change_stance(&mut combat, Stance::Wrath);
        assert_eq!(combat.player.block, 4);
    }

    #[test]
    fn test_mantra_enters_divinity() {
        let mut combat = watcher_combat();
        gain_mantra(&mut combat, 7);
        assert_eq!(combat.player.ext.stance(), Stance::Neutral);

        gain_mantra(&mut combat, 5);
        assert_eq!(combat.player.ext.stance(), Stance::Divinity);
        assert_eq!(combat.stats.divinity_entries, 1);
        let mantra = match &combat.player.ext {
            Extension::Stance(state) => state.mantra,
            _ => -1,
        };
        assert_eq!(mantra, 2);
    }

    #[test]
    fn test_divinity_pays_out_and_reverts() {
        let mut combat = watcher_combat();
        change_stance(&mut combat, Stance::Divinity);

        Watcher.on_turn_start(&mut combat);

        assert_eq!(combat.player.energy, 6);
        assert_eq!(combat.player.ext.stance(), Stance::Neutral);
    }
}
