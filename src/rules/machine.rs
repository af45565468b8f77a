//! Phase transitions and the engine that drives one combat to its end.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::engine::CombatContext;
use crate::ai::Policy;
use crate::cards::CardSource;
use crate::characters::rules_for;
use crate::combat::{Combat, CombatResult, CombatSetup, Outcome};
use crate::core::{CombatConfig, GameRng};

/// Where a combat currently is in its turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    TurnStart,
    PlayerDecision,
    EndOfTurn,
    EnemyAction,
    DebuffDecay,
    Terminal(Outcome),
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Terminal(_))
    }
}

/// Execute `phase` and return the next one.
///
/// A terminal phase maps to itself. Death and victory are checked after
/// every phase that can change HP; the turn cap is checked once the
/// enemy's debuffs have decayed.
pub fn advance(
    combat: &mut Combat,
    phase: Phase,
    ctx: &CombatContext<'_>,
    policy: &dyn Policy,
    rng: &mut GameRng,
) -> Phase {
    let next = match phase {
        Phase::Terminal(outcome) => return Phase::Terminal(outcome),
        Phase::TurnStart => {
            combat.begin_turn(ctx);
            Phase::PlayerDecision
        }
        Phase::PlayerDecision => {
            combat.player_phase(ctx, policy, rng);
            Phase::EndOfTurn
        }
        Phase::EndOfTurn => {
            combat.end_turn(ctx);
            Phase::EnemyAction
        }
        Phase::EnemyAction => {
            combat.enemy_turn();
            Phase::DebuffDecay
        }
        Phase::DebuffDecay => {
            combat.decay_debuffs();
            if combat.turn >= ctx.config.max_turns {
                return Phase::Terminal(Outcome::Timeout);
            }
            Phase::TurnStart
        }
    };

    match combat.outcome() {
        Some(outcome) => Phase::Terminal(outcome),
        None => next,
    }
}

/// Runs single combats under a fixed policy.
pub struct CombatEngine<'a> {
    cards: &'a dyn CardSource,
    config: &'a CombatConfig,
    policy: &'a dyn Policy,
}

impl<'a> CombatEngine<'a> {
    #[must_use]
    pub fn new(cards: &'a dyn CardSource, config: &'a CombatConfig, policy: &'a dyn Policy) -> Self {
        Self { cards, config, policy }
    }

    /// Play one combat to completion.
    ///
    /// `rng` is the run's derived stream. Shuffles and intent rolls consume
    /// it directly; the policy gets its own stream derived from it so that
    /// decision sampling never shifts the combat's draws.
    pub fn run(&self, setup: &CombatSetup, rng: GameRng) -> CombatResult {
        let ctx = CombatContext::new(rules_for(setup.character), self.cards, self.config);
        let mut decisions = rng.for_context("decisions");
        let mut combat = Combat::start(setup, &ctx, rng);

        let mut phase = match combat.outcome() {
            Some(outcome) => Phase::Terminal(outcome),
            None => Phase::TurnStart,
        };
        let outcome = loop {
            if let Phase::Terminal(outcome) = phase {
                break outcome;
            }
            phase = advance(&mut combat, phase, &ctx, self.policy, &mut decisions);
            trace!(turn = combat.turn, ?phase, "phase");
        };

        let result = combat.finish(outcome, &ctx);
        debug!(
            character = %setup.character,
            outcome = ?result.outcome,
            turns = result.turns,
            final_hp = result.final_hp,
            "combat finished"
        );
        result
    }
}
