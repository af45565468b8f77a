//! Defect: Focus and orbs.
//!
//! Orb damage ignores Strength and Vulnerable but still hits block. Frost
//! block ignores Dexterity. Passives fire at end of turn, once plus once per
//! Loop.

use super::stats;
use crate::combat::damage::absorb;
use crate::combat::{Combat, Extension, Orb, OrbState};
use crate::core::Character;
use crate::effects::OrbKind;
use crate::rules::{CharacterRules, CombatContext};

/// Orb archetype.
#[derive(Clone, Copy, Debug, Default)]
pub struct Defect;

impl CharacterRules for Defect {
    fn character(&self) -> Character {
        Character::Defect
    }

    fn max_hp(&self) -> i64 {
        stats::DEFECT_HP
    }

    fn default_enemy_hp(&self) -> i64 {
        stats::DEFECT_ENEMY_HP
    }

    fn extension(&self) -> Extension {
        Extension::Orbs(OrbState::new(stats::DEFECT_ORB_SLOTS))
    }

    fn on_end_of_turn(&self, combat: &mut Combat, _ctx: &CombatContext<'_>) {
        trigger_passives(combat);
    }
}

fn orb_damage(combat: &mut Combat, amount: i64) -> i64 {
    absorb(amount, &mut combat.enemy.block, &mut combat.enemy.hp)
}

/// Channel an orb, evoking the oldest one if every slot is full.
pub fn channel(combat: &mut Combat, kind: OrbKind) {
    let evicted = match combat.player.ext.orbs_mut() {
        Some(orbs) => orbs.channel(kind),
        None => return,
    };
    if let Some(orb) = evicted {
        evoke(combat, orb, 1);
    }
    combat.record_peaks();
}

/// Remove the oldest orb and evoke it `times` times.
pub fn evoke_oldest(combat: &mut Combat, times: u32) {
    let orb = match combat.player.ext.orbs_mut() {
        Some(orbs) if !orbs.orbs.is_empty() => orbs.orbs.remove(0),
        _ => return,
    };
    evoke(combat, orb, times);
}

fn evoke(combat: &mut Combat, orb: Orb, times: u32) {
    let value = combat
        .player
        .ext
        .orbs()
        .map_or(0, |orbs| orbs.evoke_value(&orb));
    for _ in 0..times {
        match orb.kind {
            OrbKind::Lightning | OrbKind::Dark => {
                orb_damage(combat, value);
            }
            OrbKind::Frost => combat.player.block += value,
            OrbKind::Plasma => combat.player.energy += value,
        }
    }
}

/// Fire every orb's passive, `1 + loops` rounds, oldest orb first.
pub fn trigger_passives(combat: &mut Combat) {
    let (rounds, count) = match combat.player.ext.orbs() {
        Some(orbs) => (1 + orbs.loops, orbs.orbs.len()),
        None => return,
    };
    for _ in 0..rounds {
        for i in 0..count {
            if combat.enemy.hp <= 0 {
                return;
            }
            let Some(orbs) = combat.player.ext.orbs_mut() else {
                return;
            };
            let Some(orb) = orbs.orbs.get(i).copied() else {
                break;
            };
            let value = orbs.passive_value(&orb);
            match orb.kind {
                OrbKind::Lightning => {
                    orb_damage(combat, value);
                }
                OrbKind::Frost => combat.player.block += value,
                OrbKind::Dark => orbs.orbs[i].charge += value,
                OrbKind::Plasma => combat.player.powers.energy_next_turn += value,
            }
        }
    }
}
