//! Decision policies for the player's turn.
//!
//! A [`Policy`] looks at the combat and either picks a card from hand or
//! ends the turn. Both built-in policies share the same selection rule:
//! play the best playable card unless nothing is worth playing or the
//! best option is marginal and block already covers the incoming attack.

use super::config::HeuristicConfig;
use super::heuristic::CardEvaluator;
use crate::combat::Combat;
use crate::core::GameRng;
use crate::rules::CombatContext;

/// What the player does next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    /// Play the card at `index` in hand.
    Play { index: usize, value: f64 },
    EndTurn,
}

/// Chooses the player's next action.
///
/// Implementations must be deterministic given `rng`, and must only read
/// the combat (play happens in the engine).
pub trait Policy: Send + Sync {
    fn choose(&self, combat: &Combat, ctx: &CombatContext<'_>, rng: &mut GameRng) -> Decision;
}

/// Pick from scored candidates.
///
/// Ties go to the earliest hand position. Ends the turn when nothing
/// scores above zero, or when the best score is under `threshold` and
/// block already covers the incoming attack.
#[must_use]
pub fn select(candidates: impl IntoIterator<Item = (usize, f64)>, combat: &Combat, threshold: f64) -> Decision {
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in candidates {
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((index, value));
        }
    }

    match best {
        Some((index, value)) if value > 0.0 => {
            let covered = combat.player.block >= combat.incoming_damage();
            if value < threshold && covered {
                Decision::EndTurn
            } else {
                Decision::Play { index, value }
            }
        }
        _ => Decision::EndTurn,
    }
}

/// Hand positions of the cards that can be paid for right now.
pub fn playable(combat: &Combat) -> impl Iterator<Item = usize> + '_ {
    let energy = combat.player.energy;
    combat
        .deck
        .hand()
        .iter()
        .enumerate()
        .filter(move |(_, card)| card.can_play(energy))
        .map(|(index, _)| index)
}

/// Plays the highest-valued card according to [`CardEvaluator`].
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    config: HeuristicConfig,
}

impl HeuristicPolicy {
    #[must_use]
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Heuristic value of every playable card in hand.
    #[must_use]
    pub fn scores(&self, combat: &Combat, ctx: &CombatContext<'_>) -> Vec<(usize, f64)> {
        let evaluator = CardEvaluator::new(&self.config);
        let hand = combat.deck.hand();
        playable(combat)
            .filter_map(|index| hand.get(index).map(|card| (index, evaluator.evaluate(card, combat, ctx))))
            .collect()
    }
}

impl Policy for HeuristicPolicy {
    fn choose(&self, combat: &Combat, ctx: &CombatContext<'_>, _rng: &mut GameRng) -> Decision {
        select(self.scores(combat, ctx), combat, self.config.end_turn_threshold)
    }
}
