//! Single-step card valuation.
//!
//! A card's value is the sum of independent per-effect terms, divided by
//! its energy cost and scaled by the play style. Every [`Effect`] variant is
//! valued here; the match is exhaustive so a new effect cannot be silently
//! ignored by the decision layer.
//!
//! ## Terms
//!
//! - damage: dealt damage, or a lethal bonus when it kills
//! - block: weighted by whether the enemy is attacking
//! - scaling (Strength, Dexterity, Focus, slots, powers): proportional to
//!   the cards and turns left to benefit
//! - debuffs and Poison: estimated amplification or triangular damage
//! - resources: flat per draw and energy, HP loss penalised harder at low HP

use super::config::HeuristicConfig;
use crate::cards::{Card, Cost};
use crate::characters::ironclad::strength_scaled_raw;
use crate::characters::watcher::MANTRA_THRESHOLD;
use crate::combat::damage::{player_hit, poison_increment, triangular};
use crate::combat::{Combat, Orb, PlayerState};
use crate::effects::{Effect, OrbKind, Stance};
use crate::rules::CombatContext;
use crate::zones::Pile;

/// Quantities shared by every term of one valuation.
#[derive(Clone, Copy, Debug)]
struct Outlook {
    /// Estimated turns left in the combat.
    turns: f64,
    /// Attack cards left to draw or play.
    attacks: f64,
    /// Block cards left to draw or play.
    blocks: f64,
    /// Damage the current intent deals before block.
    incoming: i64,
    attacking: bool,
    /// Energy left after paying for the card being valued.
    energy_left: i64,
    /// Free hand slots once the card being valued leaves hand.
    hand_room: usize,
}

impl Outlook {
    fn of(combat: &Combat, ctx: &CombatContext<'_>, config: &HeuristicConfig) -> Self {
        let deck = &combat.deck;
        let blocks = [Pile::Draw, Pile::Hand, Pile::Discard]
            .into_iter()
            .flat_map(|pile| deck.pile(pile).iter())
            .filter(|card| card.effects.iter().any(|e| matches!(e, Effect::Block(_))))
            .count();
        Self {
            turns: (combat.enemy.hp as f64 / config.damage_per_turn).max(config.min_turns),
            attacks: deck.attacks_remaining() as f64,
            blocks: blocks as f64,
            incoming: combat.incoming_damage(),
            attacking: combat.enemy_attacking(),
            energy_left: combat.player.energy,
            hand_room: (ctx.config.hand_limit + 1).saturating_sub(deck.len(Pile::Hand)),
        }
    }
}

/// Values cards against the current combat state.
#[derive(Clone, Copy, Debug)]
pub struct CardEvaluator<'a> {
    config: &'a HeuristicConfig,
}

impl<'a> CardEvaluator<'a> {
    #[must_use]
    pub fn new(config: &'a HeuristicConfig) -> Self {
        Self { config }
    }

    /// Value of playing `card` right now, per unit of energy spent.
    #[must_use]
    pub fn evaluate(&self, card: &Card, combat: &Combat, ctx: &CombatContext<'_>) -> f64 {
        let energy = combat.player.energy;
        let paid = card.cost.to_pay(energy);
        let (repeat, divisor) = match card.cost {
            Cost::X => (u32::try_from(paid).unwrap_or(0), energy.max(1)),
            Cost::Fixed(cost) => (1, cost.max(1)),
        };

        let mut outlook = Outlook::of(combat, ctx, self.config);
        outlook.energy_left = energy - paid;

        let mut value = self.effects_value(&card.effects, combat, ctx, &outlook, repeat, false);
        if card.exhaust {
            value -= self.config.exhaust_penalty;
        }
        value /= divisor as f64;
        if paid == 0 {
            value *= self.config.zero_cost_bonus;
        }
        value
    }

    fn effects_value(
        &self,
        effects: &[Effect],
        combat: &Combat,
        ctx: &CombatContext<'_>,
        outlook: &Outlook,
        repeat: u32,
        nested: bool,
    ) -> f64 {
        effects
            .iter()
            .map(|effect| self.effect_value(effect, combat, ctx, outlook, repeat, nested))
            .sum()
    }

    #[allow(clippy::too_many_lines)]
    fn effect_value(
        &self,
        effect: &Effect,
        combat: &Combat,
        ctx: &CombatContext<'_>,
        outlook: &Outlook,
        repeat: u32,
        nested: bool,
    ) -> f64 {
        let c = self.config;
        let w = c.weights();
        let player = &combat.player;
        let enemy = &combat.enemy;

        match effect {
            Effect::Damage { amount, hits } => {
                let per_hit = player_hit(*amount, player, enemy);
                let total = per_hit * i64::from(hits.saturating_mul(repeat));
                w.damage * self.damage_value(total, combat)
            }
            Effect::HeavyDamage {
                amount,
                strength_multiplier,
            } => {
                let raw = strength_scaled_raw(*amount, player.strength, *strength_multiplier);
                let per = player_hit(raw, player, enemy);
                w.damage * self.damage_value(per * i64::from(repeat), combat)
            }
            Effect::Vulnerable(n) => {
                if enemy.artifact > 0 {
                    return 0.0;
                }
                let per_attack = c.vulnerable_base + player.strength as f64;
                w.damage * *n as f64 * outlook.attacks * per_attack * c.debuff_weight
            }
            Effect::Weak(n) => {
                if enemy.artifact > 0 {
                    return 0.0;
                }
                w.block * *n as f64 * outlook.incoming as f64 * c.debuff_weight
            }
            Effect::Poison { amount, hits } => {
                let mut poison = enemy.poison;
                let mut artifact = enemy.artifact;
                let mut gain = 0;
                for _ in 0..*hits {
                    if artifact > 0 {
                        artifact -= 1;
                        continue;
                    }
                    gain += poison_increment(poison, *amount, enemy.hp);
                    poison += amount;
                }
                w.damage * self.poison_value(gain, combat)
            }
            Effect::MultiplyPoison(factor) => {
                let added = enemy.poison * (factor - 1);
                let gain = poison_increment(enemy.poison, added, enemy.hp);
                w.damage * self.poison_value(gain, combat)
            }

            Effect::Block(n) => w.block * self.block_value((n + player.dexterity).max(0), player, outlook),
            Effect::RetainBlock => {
                if player.powers.retain_block {
                    0.0
                } else {
                    w.scaling * outlook.turns * c.retain_block_per_turn
                }
            }

            Effect::Strength(n) => {
                w.scaling * *n as f64 * outlook.attacks * c.strength_weight * outlook.turns / c.scaling_turn_divisor
            }
            Effect::DoubleStrength => w.scaling * player.strength.max(0) as f64 * c.double_strength_weight,
            Effect::Dexterity(n) => {
                w.scaling * *n as f64 * outlook.blocks * c.strength_weight * outlook.turns / c.scaling_turn_divisor
            }
            Effect::StrengthPerTurn(n) => {
                let ramp = triangular(outlook.turns as i64) as f64;
                w.scaling * *n as f64 * ramp * outlook.attacks / c.scaling_turn_divisor
            }
            Effect::PoisonPerTurn(n) => {
                let per_turn = poison_increment(enemy.poison, *n, enemy.hp) as f64 * c.poison_weight;
                w.scaling * per_turn * outlook.turns
            }

            Effect::Draw(n) => (*n).min(self.drawable(combat, outlook)) as f64 * self.draw_value(combat),
            Effect::DrawNextTurn(n) => *n as f64 * c.draw_late,
            Effect::Energy(n) => *n as f64 * c.energy_value,
            Effect::LoseHp(n) => {
                if *n >= player.hp {
                    return -(player.max_hp as f64) * c.hp_critical_multiplier;
                }
                -(*n as f64) * self.hp_multiplier(player)
            }
            Effect::Heal(n) => {
                let healed = (*n).min(player.max_hp - player.hp).max(0);
                healed as f64 * self.hp_multiplier(player)
            }
            Effect::Discard(n) => {
                let junk = combat
                    .deck
                    .hand()
                    .iter()
                    .filter(|card| !card.category.is_playable() || !card.can_play(outlook.energy_left))
                    .count();
                -(n.saturating_sub(junk) as f64) * c.discard_penalty
            }
            Effect::AddToHand { card, count } => {
                if nested {
                    return 0.0;
                }
                let Some(template) = ctx.cards.card(card) else {
                    return 0.0;
                };
                let copies = (*count).min(outlook.hand_room);
                let mut per = self.effects_value(&template.effects, combat, ctx, outlook, 1, true);
                if template.cost.to_pay(0) == 0 {
                    per *= c.zero_cost_bonus;
                }
                per * copies as f64
            }

            Effect::Channel { orb, count } => match player.ext.orbs() {
                Some(orbs) if orbs.slots > 0 => {
                    let fresh = Orb::new(*orb);
                    let passive = orbs.passive_value(&fresh);
                    let evoke = orbs.evoke_value(&fresh);
                    let per = self.orb_worth(*orb, passive, player, outlook) * outlook.turns
                        + self.orb_worth(*orb, evoke, player, outlook);
                    per * f64::from(*count)
                }
                _ => 0.0,
            },
            Effect::Evoke { times } => {
                let Some(orbs) = player.ext.orbs() else {
                    return 0.0;
                };
                let Some(oldest) = orbs.orbs.first() else {
                    return 0.0;
                };
                let total = orbs.evoke_value(oldest) * i64::from(*times);
                self.orb_worth(oldest.kind, total, player, outlook)
            }
            Effect::Focus(n) => match player.ext.orbs() {
                Some(orbs) => w.scaling * *n as f64 * orbs.orbs.len().max(1) as f64 * outlook.turns,
                None => 0.0,
            },
            Effect::OrbSlots(n) => match player.ext.orbs() {
                Some(_) => w.scaling * *n as f64 * c.orb_slot_value,
                None => 0.0,
            },
            Effect::Loop => match player.ext.orbs() {
                Some(orbs) => {
                    let passives: i64 = orbs.orbs.iter().map(|orb| orbs.passive_value(orb)).sum();
                    w.scaling * passives as f64 * outlook.turns
                }
                None => 0.0,
            },
            Effect::DrawPerOrbType => {
                let kinds = player.ext.orbs().map_or(0, |orbs| orbs.distinct_kinds());
                kinds.min(self.drawable(combat, outlook)) as f64 * self.draw_value(combat)
            }

            Effect::EnterStance(target) => self.stance_value(*target, combat, outlook),
            Effect::Mantra(n) => match player.ext.stance_state() {
                Some(state) if state.mantra + n >= MANTRA_THRESHOLD => w.scaling * c.divinity_value,
                Some(_) => w.scaling * *n as f64 * c.mantra_point,
                None => 0.0,
            },
            Effect::StanceChangeBlock(n) => w.scaling * *n as f64 * c.stance_block_weight,
            Effect::EndTurn => {
                if outlook.energy_left > 0 {
                    -c.end_turn_penalty
                } else {
                    0.0
                }
            }
        }
    }

    /// Damage after the enemy's block, or the lethal bonus.
    fn damage_value(&self, total: i64, combat: &Combat) -> f64 {
        let enemy = &combat.enemy;
        let dealt = (total - enemy.block).max(0);
        if dealt >= enemy.hp {
            enemy.hp as f64 * self.config.lethal_multiplier
        } else {
            dealt as f64
        }
    }

    fn poison_value(&self, gain: i64, combat: &Combat) -> f64 {
        (gain as f64 * self.config.poison_weight).min(combat.enemy.hp.max(0) as f64)
    }

    fn block_value(&self, block: i64, player: &PlayerState, outlook: &Outlook) -> f64 {
        let c = self.config;
        let block = block.max(0);
        if outlook.attacking {
            let needed = (outlook.incoming - player.block).max(0);
            let useful = block.min(needed);
            let excess = block - useful;
            let excess_weight = c.block_excess_base + (outlook.turns * c.block_excess_per_turn).min(c.block_excess_cap);
            useful as f64 * c.block_needed_weight + excess as f64 * excess_weight
        } else {
            block as f64 * (c.block_idle_base + (outlook.turns * c.block_idle_per_turn).min(c.block_idle_cap))
        }
    }

    /// Value of `amount` of an orb's output.
    fn orb_worth(&self, kind: OrbKind, amount: i64, player: &PlayerState, outlook: &Outlook) -> f64 {
        let w = self.config.weights();
        match kind {
            OrbKind::Lightning | OrbKind::Dark => w.damage * amount as f64,
            OrbKind::Frost => w.block * self.block_value(amount, player, outlook),
            OrbKind::Plasma => amount as f64 * self.config.energy_value,
        }
    }

    fn stance_value(&self, target: Stance, combat: &Combat, outlook: &Outlook) -> f64 {
        let c = self.config;
        let player = &combat.player;
        let Some(state) = player.ext.stance_state() else {
            return 0.0;
        };
        let current = state.stance;
        if current == target {
            return 0.0;
        }

        let neutral_incoming = outlook.incoming / current.incoming();
        let wrath_safe = !outlook.attacking || player.block >= neutral_incoming * Stance::Wrath.incoming();

        let mut value = match target {
            Stance::Wrath if wrath_safe => c.wrath_safe,
            Stance::Wrath => c.wrath_unsafe,
            Stance::Calm => c.calm_value,
            Stance::Divinity => c.divinity_value,
            Stance::Neutral => 0.0,
        };
        match current {
            Stance::Calm => value += c.leave_calm_value,
            Stance::Wrath if !wrath_safe => value -= c.wrath_unsafe,
            _ => {}
        }
        value + c.weights().block * self.block_value(state.change_block, player, outlook)
    }

    fn draw_value(&self, combat: &Combat) -> f64 {
        if combat.turn <= self.config.early_turns {
            self.config.draw_early
        } else {
            self.config.draw_late
        }
    }

    fn drawable(&self, combat: &Combat, outlook: &Outlook) -> usize {
        let available = combat.deck.len(Pile::Draw) + combat.deck.len(Pile::Discard);
        available.min(outlook.hand_room)
    }

    fn hp_multiplier(&self, player: &PlayerState) -> f64 {
        let c = self.config;
        let fraction = player.hp_fraction();
        if fraction < c.hp_critical {
            c.hp_critical_multiplier
        } else if fraction < c.hp_low {
            c.hp_low_multiplier
        } else {
            1.0
        }
    }
}
