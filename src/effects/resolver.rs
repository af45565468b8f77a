//! Effect resolution: executing effects against a combat.
//!
//! `EffectResolver` is the only place effects change state. Card plays and
//! relic hooks both go through it.

use crate::characters::{defect, ironclad, silent, watcher};
use crate::combat::damage::{apply_debuff, damage_to_enemy, lose_hp};
use crate::combat::Combat;
use crate::rules::CombatContext;

use super::Effect;

/// Resolves effects on combat state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve a sequence of effects, stopping once the combat is decided.
    ///
    /// `repeat` is the X value of an X-cost card (1 otherwise); it multiplies
    /// attack hits only.
    pub fn resolve_all<'e>(
        combat: &mut Combat,
        effects: impl IntoIterator<Item = &'e Effect>,
        ctx: &CombatContext<'_>,
        repeat: u32,
    ) {
        for effect in effects {
            if combat.outcome().is_some() {
                break;
            }
            Self::resolve(combat, effect, ctx, repeat);
        }
    }

    /// Resolve one effect.
    pub fn resolve(combat: &mut Combat, effect: &Effect, ctx: &CombatContext<'_>, repeat: u32) {
        let hand_limit = ctx.config.hand_limit;

        match effect {
            Effect::Damage { amount, hits } => {
                for _ in 0..hits.saturating_mul(repeat) {
                    if combat.enemy.hp <= 0 {
                        break;
                    }
                    damage_to_enemy(*amount, &combat.player, &mut combat.enemy);
                }
            }
            Effect::HeavyDamage {
                amount,
                strength_multiplier,
            } => {
                let raw = ironclad::strength_scaled_raw(*amount, combat.player.strength, *strength_multiplier);
                for _ in 0..repeat {
                    damage_to_enemy(raw, &combat.player, &mut combat.enemy);
                }
            }
            Effect::Vulnerable(n) => {
                apply_debuff(&mut combat.enemy.artifact, &mut combat.enemy.vulnerable, *n);
            }
            Effect::Weak(n) => {
                apply_debuff(&mut combat.enemy.artifact, &mut combat.enemy.weak, *n);
            }
            Effect::Poison { amount, hits } => {
                for _ in 0..*hits {
                    apply_debuff(&mut combat.enemy.artifact, &mut combat.enemy.poison, *amount);
                }
            }
            Effect::MultiplyPoison(factor) => combat.enemy.poison *= factor,

            Effect::Block(n) => combat.player.block += (n + combat.player.dexterity).max(0),
            Effect::RetainBlock => combat.player.powers.retain_block = true,

            Effect::Strength(n) => combat.player.strength += n,
            Effect::DoubleStrength => combat.player.strength *= 2,
            Effect::Dexterity(n) => combat.player.dexterity += n,
            Effect::StrengthPerTurn(n) => combat.player.powers.strength_per_turn += n,
            Effect::PoisonPerTurn(n) => combat.player.powers.poison_per_turn += n,

            Effect::Draw(n) => {
                combat.deck.draw(*n, hand_limit, &mut combat.rng);
            }
            Effect::DrawNextTurn(n) => combat.player.powers.draw_next_turn += n,
            Effect::Energy(n) => combat.player.energy += n,
            Effect::LoseHp(n) => {
                lose_hp(*n, &mut combat.player.hp);
            }
            Effect::Heal(n) => {
                combat.player.hp = (combat.player.hp + n).min(combat.player.max_hp);
            }
            Effect::Discard(n) => {
                for _ in 0..*n {
                    match silent::choose_discard(combat) {
                        Some(index) => {
                            combat.deck.discard(index);
                        }
                        None => break,
                    }
                }
            }
            Effect::AddToHand { card, count } => match ctx.cards.card(card) {
                Some(template) => {
                    for _ in 0..*count {
                        combat.deck.add_to_hand(template.clone(), hand_limit);
                        combat.stats.cards_added += 1;
                    }
                }
                None => tracing::warn!(card = %card, "card to add is not registered"),
            },

            Effect::Channel { orb, count } => {
                for _ in 0..*count {
                    defect::channel(combat, *orb);
                }
            }
            Effect::Evoke { times } => defect::evoke_oldest(combat, *times),
            Effect::Focus(n) => {
                if let Some(orbs) = combat.player.ext.orbs_mut() {
                    orbs.focus += n;
                }
            }
            Effect::OrbSlots(n) => {
                if let Some(orbs) = combat.player.ext.orbs_mut() {
                    orbs.adjust_slots(*n);
                }
            }
            Effect::Loop => {
                if let Some(orbs) = combat.player.ext.orbs_mut() {
                    orbs.loops += 1;
                }
            }
            Effect::DrawPerOrbType => {
                let kinds = combat.player.ext.orbs().map_or(0, |orbs| orbs.distinct_kinds());
                combat.deck.draw(kinds, hand_limit, &mut combat.rng);
            }

            Effect::EnterStance(stance) => watcher::change_stance(combat, *stance),
            Effect::Mantra(n) => watcher::gain_mantra(combat, *n),
            Effect::StanceChangeBlock(n) => {
                if let Some(state) = combat.player.ext.stance_mut() {
                    state.change_block += n;
                }
            }
            Effect::EndTurn => combat.turn_over = true,
        }
    }
}
