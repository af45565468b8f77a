//! Monte Carlo lookahead over a few turns.
//!
//! For each distinct playable card the policy runs a handful of sampled
//! continuations on a cloned combat: play the card, finish the turn with
//! heuristic play, then simulate further full turns (enemy action plus a
//! heuristic player turn) with per-turn discounting. Reaching a win or loss
//! inside the horizon adds a large bonus or penalty.
//!
//! Candidates are scored against an "end the turn now" baseline computed
//! from the same samples, so the selection threshold keeps its meaning.
//!
//! ## Determinism
//!
//! Samples are forked from the caller's generator before any rollout runs,
//! and every candidate replays the same sample streams. Each rollout also
//! swaps in a fresh combat stream, so no plan can peek at the real draws.

use smallvec::SmallVec;

use super::config::{HeuristicConfig, LookaheadConfig};
use super::policy::{select, Decision, HeuristicPolicy, Policy};
use crate::combat::{Combat, Outcome};
use crate::core::GameRng;
use crate::rules::{advance, CombatContext, Phase};

/// Heuristic play refined by shallow rollouts.
#[derive(Clone, Debug)]
pub struct LookaheadPolicy {
    heuristic: HeuristicPolicy,
    config: LookaheadConfig,
}

impl LookaheadPolicy {
    #[must_use]
    pub fn new(heuristic: HeuristicConfig, config: LookaheadConfig) -> Self {
        Self {
            heuristic: HeuristicPolicy::new(heuristic),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LookaheadConfig {
        &self.config
    }

    /// Mean rollout value over all samples.
    fn estimate(&self, combat: &Combat, first: Option<(usize, f64)>, ctx: &CombatContext<'_>, samples: &[GameRng]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let total: f64 = samples
            .iter()
            .map(|sample| self.rollout(combat, first, ctx, sample.clone()))
            .sum();
        total / samples.len() as f64
    }

    /// One sampled continuation. `first` is the candidate card and its
    /// heuristic value; `None` ends the current turn immediately.
    fn rollout(&self, combat: &Combat, first: Option<(usize, f64)>, ctx: &CombatContext<'_>, mut rng: GameRng) -> f64 {
        let mut sim = combat.clone();
        sim.rng = rng.fork();

        let mut value = 0.0;
        if let Some((index, immediate)) = first {
            sim.play_card(index, ctx);
            value += immediate;
            if sim.outcome().is_none() {
                let rest = sim.player_phase(ctx, &self.heuristic, &mut rng);
                value += self.config.rest_of_turn_weight * rest;
            }
        }

        let mut discount = 1.0;
        let mut phase = Phase::EndOfTurn;
        for _ in 1..self.config.depth {
            if sim.outcome().is_some() {
                break;
            }
            discount *= self.config.discount;
            while !matches!(phase, Phase::PlayerDecision | Phase::Terminal(_)) {
                phase = advance(&mut sim, phase, ctx, &self.heuristic, &mut rng);
            }
            if phase.is_terminal() {
                break;
            }
            value += discount * sim.player_phase(ctx, &self.heuristic, &mut rng);
            phase = Phase::EndOfTurn;
        }

        match sim.outcome() {
            Some(Outcome::Win) => value + discount * self.config.win_bonus,
            Some(Outcome::Death) => value - discount * self.config.loss_penalty,
            _ => value,
        }
    }
}

impl Policy for LookaheadPolicy {
    fn choose(&self, combat: &Combat, ctx: &CombatContext<'_>, rng: &mut GameRng) -> Decision {
        let scores = self.heuristic.scores(combat, ctx);
        if scores.is_empty() {
            return Decision::EndTurn;
        }
        if !self.config.is_enabled() {
            return select(scores, combat, self.heuristic.config().end_turn_threshold);
        }

        // Identical cards lead to identical rollouts; keep the first copy.
        let hand = combat.deck.hand();
        let mut seen: SmallVec<[&str; 10]> = SmallVec::new();
        let mut candidates: SmallVec<[(usize, f64); 10]> = SmallVec::new();
        for (index, value) in scores {
            let Some(card) = hand.get(index) else {
                continue;
            };
            if !seen.contains(&card.name.as_str()) {
                seen.push(card.name.as_str());
                candidates.push((index, value));
            }
        }

        let samples: Vec<GameRng> = (0..self.config.samples).map(|_| rng.fork()).collect();
        let baseline = self.estimate(combat, None, ctx, &samples);
        let rated: Vec<(usize, f64)> = candidates
            .into_iter()
            .map(|(index, value)| (index, self.estimate(combat, Some((index, value)), ctx, &samples) - baseline))
            .collect();

        select(rated, combat, self.heuristic.config().end_turn_threshold)
    }
}
