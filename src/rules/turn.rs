//! Turn phases as operations on [`Combat`].
//!
//! Each method is one phase of the shared turn state machine. The engine
//! calls them in order; lookahead rollouts call the very same methods on
//! cloned state.

use tracing::{error, trace};

use super::engine::CombatContext;
use crate::ai::{Decision, Policy};
use crate::cards::Cost;
use crate::combat::damage::{apply_debuff, damage_to_player, decay, poison_tick};
use crate::combat::{Combat, CombatResult, CombatSetup, EnemyState, Intent, Outcome};
use crate::core::{DebuffKind, GameRng};
use crate::effects::EffectResolver;
use crate::relics::RelicTiming;
use crate::zones::{DeckState, Pile};

impl Combat {
    /// Build a fresh combat and fire combat-start relics.
    #[must_use]
    pub fn start(setup: &CombatSetup, ctx: &CombatContext<'_>, mut rng: GameRng) -> Self {
        let rules = ctx.rules;

        let mut player = rules.new_player(ctx.config);
        player.relics.extend(setup.relic);

        // Setups built through `CombatSetup::resolve` are already checked
        let mut cards = ctx.cards.starter_deck(setup.character).unwrap_or_else(|error| {
            error!(character = %setup.character, %error, "starter deck unavailable");
            Vec::new()
        });
        cards.extend(setup.extra_cards.iter().cloned());
        let deck = DeckState::new(cards, &mut rng);

        let encounter = setup.encounter.resolve(&mut rng);
        let enemy_hp = match (setup.enemy_hp, encounter) {
            (Some(hp), _) => hp,
            (None, Some(encounter)) => rng.gen_range(encounter.hp_range()),
            (None, None) => rules.default_enemy_hp(),
        };
        let enemy = EnemyState::new(enemy_hp).with_artifact(setup.enemy_artifact);

        let mut combat = Self::assemble(setup.character, player, enemy, deck, rng);
        combat.encounter = encounter;
        combat.fire_relics(RelicTiming::CombatStart, ctx);
        combat.record_peaks();
        combat
    }

    /// Run every relic hook for `timing`.
    ///
    /// Unlike card plays these do not stop on a decided combat, so
    /// combat-won hooks still land.
    pub fn fire_relics(&mut self, timing: RelicTiming, ctx: &CombatContext<'_>) {
        let relics = self.player.relics.clone();
        for relic in relics {
            for effect in relic.effects_at(timing) {
                EffectResolver::resolve(self, &effect, ctx, 1);
            }
        }
    }

    /// TurnStart and Draw: player poison, block reset, energy, powers,
    /// draw, relics, then the enemy's new intent.
    pub fn begin_turn(&mut self, ctx: &CombatContext<'_>) {
        self.turn += 1;
        self.turn_over = false;
        self.stats.plays_this_turn = 0;
        trace!(turn = self.turn, hp = self.player.hp, enemy_hp = self.enemy.hp, "turn start");

        poison_tick(&mut self.player.poison, &mut self.player.hp);
        if self.outcome().is_some() {
            return;
        }

        let powers = &mut self.player.powers;
        if !powers.retain_block {
            self.player.block = 0;
        }
        self.player.energy = self.player.max_energy + std::mem::take(&mut powers.energy_next_turn);
        self.player.strength += powers.strength_per_turn;
        let draw_bonus = std::mem::take(&mut powers.draw_next_turn);
        let fumes = powers.poison_per_turn;
        if fumes > 0 {
            apply_debuff(&mut self.enemy.artifact, &mut self.enemy.poison, fumes);
        }

        ctx.rules.on_turn_start(self);

        self.deck
            .draw(ctx.config.base_draw + draw_bonus, ctx.config.hand_limit, &mut self.rng);
        self.fire_relics(RelicTiming::TurnStart(self.turn), ctx);

        self.enemy.intent = match self.encounter {
            Some(encounter) => encounter.intent(self.turn, &self.enemy),
            None => ctx.rules.roll_intent(self.turn, ctx.intent_table(), &mut self.rng),
        };
        self.record_peaks();
    }

    /// Play the card at `index` in hand. Returns false if it is not
    /// playable right now.
    pub fn play_card(&mut self, index: usize, ctx: &CombatContext<'_>) -> bool {
        let energy = self.player.energy;
        if !self.deck.hand().get(index).is_some_and(|card| card.can_play(energy)) {
            return false;
        }
        let Some(card) = self.deck.take_from_hand(index) else {
            return false;
        };

        let paid = card.cost.to_pay(energy);
        self.player.energy -= paid;
        let repeat = match card.cost {
            Cost::X => u32::try_from(paid).unwrap_or(0),
            Cost::Fixed(_) => 1,
        };
        trace!(card = %card.name, energy = self.player.energy, "play");

        EffectResolver::resolve_all(self, &card.effects, ctx, repeat);

        let pile = if card.exhausts_on_play() {
            Pile::Exhaust
        } else {
            Pile::Discard
        };
        self.deck.place(card, pile);

        self.stats.cards_played += 1;
        self.stats.plays_this_turn += 1;
        self.record_peaks();
        true
    }

    /// PlayerDecisionLoop: ask `policy` for cards until it ends the turn,
    /// the combat is decided, an end-turn effect fires, or the per-turn
    /// play cap is hit.
    ///
    /// Returns the summed value of the decisions taken.
    pub fn player_phase(&mut self, ctx: &CombatContext<'_>, policy: &dyn Policy, rng: &mut GameRng) -> f64 {
        let mut total = 0.0;
        while self.outcome().is_none()
            && !self.turn_over
            && self.stats.plays_this_turn < ctx.config.max_plays_per_turn
        {
            match policy.choose(self, ctx, rng) {
                Decision::Play { index, value } => {
                    if !self.play_card(index, ctx) {
                        break;
                    }
                    total += value;
                }
                Decision::EndTurn => break,
            }
        }
        total
    }

    /// EndOfTurnCleanup: character passives, then the hand leaves and the
    /// player's Weak and Vulnerable tick down.
    pub fn end_turn(&mut self, ctx: &CombatContext<'_>) {
        ctx.rules.on_end_of_turn(self, ctx);
        self.deck.end_of_turn();
        decay(&mut self.player.weak);
        decay(&mut self.player.vulnerable);
        self.record_peaks();
    }

    /// EnemyAction: block expires, poison ticks, then the intent resolves.
    pub fn enemy_turn(&mut self) {
        self.enemy.block = 0;

        poison_tick(&mut self.enemy.poison, &mut self.enemy.hp);
        if self.enemy.hp <= 0 {
            return;
        }

        match self.enemy.intent {
            Intent::Attack(raw) => {
                let lost = damage_to_player(raw, &self.enemy, &mut self.player);
                trace!(raw, lost, hp = self.player.hp, "enemy attack");
            }
            Intent::MultiAttack { damage, hits } => {
                for _ in 0..hits {
                    if self.player.hp <= 0 {
                        break;
                    }
                    damage_to_player(damage, &self.enemy, &mut self.player);
                }
                trace!(damage, hits, hp = self.player.hp, "enemy multi-attack");
            }
            Intent::Defend(n) => self.enemy.block += n,
            Intent::Buff(n) => self.enemy.strength += n,
            Intent::Debuff { kind, amount } => {
                let player = &mut self.player;
                match kind {
                    DebuffKind::Dexterity => {
                        apply_debuff(&mut player.artifact, &mut player.dexterity, -amount);
                    }
                    DebuffKind::Poison => {
                        apply_debuff(&mut player.artifact, &mut player.poison, amount);
                    }
                    DebuffKind::Weak => {
                        apply_debuff(&mut player.artifact, &mut player.weak, amount);
                    }
                    DebuffKind::Vulnerable => {
                        apply_debuff(&mut player.artifact, &mut player.vulnerable, amount);
                    }
                }
            }
            Intent::Unknown => {}
        }
    }

    /// DebuffDecay: enemy Vulnerable and Weak tick down.
    pub fn decay_debuffs(&mut self) {
        decay(&mut self.enemy.vulnerable);
        decay(&mut self.enemy.weak);
    }

    /// Close out the combat and build its result.
    pub fn finish(&mut self, outcome: Outcome, ctx: &CombatContext<'_>) -> CombatResult {
        if outcome.is_win() {
            self.fire_relics(RelicTiming::CombatWon, ctx);
        }
        self.result(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCategory, CardRegistry};
    use crate::characters::rules_for;
    use crate::core::{Character, CombatConfig};
    use crate::effects::Effect;
    use crate::encounters::{Encounter, EncounterChoice};
    use crate::relics::Relic;

    fn with_ctx<R>(character: Character, f: impl FnOnce(&CombatContext<'_>) -> R) -> R {
        let registry = CardRegistry::builtin();
        let config = CombatConfig::default();
        let ctx = CombatContext::new(rules_for(character), &registry, &config);
        f(&ctx)
    }

    #[test]
    fn test_start_builds_starter_deck() {
        with_ctx(Character::Silent, |ctx| {
            let combat = Combat::start(&CombatSetup::new(Character::Silent), ctx, GameRng::new(1));
            assert_eq!(combat.deck.total(), 12);
            assert_eq!(combat.deck.len(Pile::Draw), 12);
            assert_eq!(combat.enemy.hp, 100);
            assert_eq!(combat.player.hp, 70);
            assert_eq!(combat.turn, 0);
        });
    }

    #[test]
    fn test_begin_turn_draws_and_rolls_opener() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.player.block = 9;
            combat.player.energy = 0;

            combat.begin_turn(ctx);

            assert_eq!(combat.turn, 1);
            assert_eq!(combat.deck.len(Pile::Hand), 5);
            assert_eq!(combat.player.block, 0);
            assert_eq!(combat.player.energy, 3);
            assert_eq!(combat.enemy.intent, Intent::Attack(12));
        });
    }

    #[test]
    fn test_relic_hooks_fire() {
        with_ctx(Character::Silent, |ctx| {
            let setup = CombatSetup::new(Character::Silent).with_relic(Some(Relic::RingOfTheSnake));
            let mut combat = Combat::start(&setup, ctx, GameRng::new(1));
            combat.begin_turn(ctx);
            assert_eq!(combat.deck.len(Pile::Hand), 7);

            combat.end_turn(ctx);
            combat.begin_turn(ctx);
            assert_eq!(combat.deck.len(Pile::Hand), 5);
        });

        with_ctx(Character::Defect, |ctx| {
            let setup = CombatSetup::new(Character::Defect).with_relic(Some(Relic::CrackedCore));
            let combat = Combat::start(&setup, ctx, GameRng::new(1));
            assert_eq!(combat.player.ext.orbs().map(|o| o.orbs.len()), Some(1));
        });
    }

    #[test]
    fn test_play_card_pays_and_moves() {
        with_ctx(Character::Ironclad, |ctx| {
            let bash = Card::new("Bash", Cost::Fixed(2), CardCategory::Attack)
                .with_effect(Effect::damage(8))
                .with_effect(Effect::Vulnerable(2));
            let inflame = Card::new("Inflame", Cost::Fixed(1), CardCategory::Power)
                .with_effect(Effect::Strength(2));
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.deck = DeckState::from_draw_pile(vec![inflame, bash]);
            combat.deck.draw(2, 10, &mut combat.rng);

            assert!(combat.play_card(0, ctx));
            assert_eq!(combat.enemy.hp, 112);
            assert_eq!(combat.enemy.vulnerable, 2);
            assert_eq!(combat.player.energy, 1);

            assert!(combat.play_card(0, ctx));
            assert_eq!(combat.player.strength, 2);
            assert_eq!(combat.deck.len(Pile::Discard), 1);
            assert_eq!(combat.deck.len(Pile::Exhaust), 1);
            assert_eq!(combat.stats.cards_played, 2);
            assert_eq!(combat.stats.peak_strength, 2);

            assert!(!combat.play_card(0, ctx));
        });
    }

    #[test]
    fn test_unaffordable_card_is_refused() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.begin_turn(ctx);
            combat.player.energy = 0;
            let hand = combat.deck.len(Pile::Hand);
            assert!(!combat.play_card(0, ctx));
            assert_eq!(combat.deck.len(Pile::Hand), hand);
        });
    }

    #[test]
    fn test_enemy_turn_resolves_intents() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.player.block = 4;
            combat.enemy.intent = Intent::Attack(10);
            combat.enemy_turn();
            assert_eq!(combat.player.hp, 74);

            combat.enemy.intent = Intent::Defend(10);
            combat.enemy_turn();
            assert_eq!(combat.enemy.block, 10);

            combat.enemy.intent = Intent::Buff(3);
            combat.enemy_turn();
            assert_eq!(combat.enemy.block, 0);
            assert_eq!(combat.enemy.strength, 3);

            combat.player.artifact = 1;
            combat.enemy.intent = Intent::Debuff {
                kind: DebuffKind::Dexterity,
                amount: 1,
            };
            combat.enemy_turn();
            assert_eq!((combat.player.artifact, combat.player.dexterity), (0, 0));
            combat.enemy_turn();
            assert_eq!(combat.player.dexterity, -1);
        });
    }

    #[test]
    fn test_enemy_poison_ticks_before_acting() {
        with_ctx(Character::Silent, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Silent), ctx, GameRng::new(1));
            combat.enemy.hp = 3;
            combat.enemy.poison = 5;
            combat.enemy.intent = Intent::Attack(50);

            combat.enemy_turn();

            assert_eq!(combat.outcome(), Some(Outcome::Win));
            assert_eq!(combat.player.hp, 70);
        });
    }

    #[test]
    fn test_burning_blood_heals_on_win() {
        with_ctx(Character::Ironclad, |ctx| {
            let setup = CombatSetup::new(Character::Ironclad).with_relic(Some(Relic::BurningBlood));
            let mut combat = Combat::start(&setup, ctx, GameRng::new(1));
            combat.player.hp = 50;
            combat.enemy.hp = 0;

            let result = combat.finish(Outcome::Win, ctx);

            assert_eq!(result.final_hp, 56);
            assert_eq!(result.damage_taken, 24);
        });
    }

    #[test]
    fn test_debuffs_decay() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.enemy.vulnerable = 2;
            combat.enemy.weak = 1;
            combat.decay_debuffs();
            assert_eq!((combat.enemy.vulnerable, combat.enemy.weak), (1, 0));
        });
    }

    #[test]
    fn test_multi_attack_hits_each_time() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.player.block = 7;
            combat.enemy.strength = 1;
            combat.enemy.intent = Intent::MultiAttack { damage: 5, hits: 3 };
            combat.enemy_turn();
            // 6 × 3 against 7 block
            assert_eq!((combat.player.block, combat.player.hp), (0, 69));

            combat.player.hp = 8;
            combat.enemy.intent = Intent::MultiAttack { damage: 7, hits: 3 };
            combat.enemy_turn();
            assert_eq!(combat.player.hp, 0);
            assert_eq!(combat.outcome(), Some(Outcome::Death));
        });
    }

    #[test]
    fn test_player_debuffs_apply_and_decay() {
        with_ctx(Character::Ironclad, |ctx| {
            let mut combat = Combat::start(&CombatSetup::new(Character::Ironclad), ctx, GameRng::new(1));
            combat.enemy.intent = Intent::Debuff {
                kind: DebuffKind::Vulnerable,
                amount: 2,
            };
            combat.enemy_turn();
            assert_eq!(combat.player.vulnerable, 2);

            // Enemy-side decay leaves player debuffs alone
            combat.decay_debuffs();
            assert_eq!(combat.player.vulnerable, 2);

            combat.begin_turn(ctx);
            combat.end_turn(ctx);
            assert_eq!(combat.player.vulnerable, 1);

            combat.player.block = 0;
            combat.enemy.intent = Intent::Attack(10);
            combat.enemy_turn();
            assert_eq!(combat.player.hp, 80 - 15);

            combat.player.artifact = 1;
            combat.enemy.intent = Intent::Debuff {
                kind: DebuffKind::Weak,
                amount: 2,
            };
            combat.enemy_turn();
            assert_eq!((combat.player.artifact, combat.player.weak), (0, 0));
        });
    }

    #[test]
    fn test_scripted_encounter_drives_intents() {
        with_ctx(Character::Silent, |ctx| {
            let setup = CombatSetup::new(Character::Silent).with_encounter(EncounterChoice::Fixed(Encounter::Debuffer));
            let mut combat = Combat::start(&setup, ctx, GameRng::new(4));
            assert_eq!(combat.encounter, Some(Encounter::Debuffer));
            assert!(Encounter::Debuffer.hp_range().contains(&combat.enemy.hp));
            assert_eq!(combat.enemy.max_hp, combat.enemy.hp);

            combat.begin_turn(ctx);
            assert_eq!(
                combat.enemy.intent,
                Intent::Debuff {
                    kind: DebuffKind::Weak,
                    amount: 2
                }
            );
            combat.end_turn(ctx);
            combat.enemy_turn();
            assert_eq!(combat.player.weak, 2);

            combat.decay_debuffs();
            combat.begin_turn(ctx);
            assert_eq!(
                combat.enemy.intent,
                Intent::Debuff {
                    kind: DebuffKind::Vulnerable,
                    amount: 2
                }
            );
            assert_eq!(combat.finish(Outcome::Timeout, ctx).encounter, Some(Encounter::Debuffer));
        });
    }

    #[test]
    fn test_setup_hp_overrides_encounter_hp() {
        with_ctx(Character::Defect, |ctx| {
            let setup = CombatSetup::new(Character::Defect)
                .with_encounter(EncounterChoice::Fixed(Encounter::Boss))
                .with_enemy_hp(30);
            let combat = Combat::start(&setup, ctx, GameRng::new(4));
            assert_eq!(combat.enemy.hp, 30);
        });
    }
}
