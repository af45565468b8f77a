//! Decision-layer configuration: play styles, valuation constants and
//! lookahead parameters.

use serde::{Deserialize, Serialize};

use super::lookahead::LookaheadPolicy;
use super::policy::{HeuristicPolicy, Policy};
use crate::error::{Result, SimError};

/// Named weighting of damage, block and scaling value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    Greedy,
    Defensive,
    #[default]
    Balanced,
    Scaling,
}

/// Multipliers applied to each family of valuation terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleWeights {
    pub damage: f64,
    pub block: f64,
    pub scaling: f64,
}

impl PlayStyle {
    pub const ALL: [PlayStyle; 4] = [
        PlayStyle::Greedy,
        PlayStyle::Defensive,
        PlayStyle::Balanced,
        PlayStyle::Scaling,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PlayStyle::Greedy => "greedy",
            PlayStyle::Defensive => "defensive",
            PlayStyle::Balanced => "balanced",
            PlayStyle::Scaling => "scaling",
        }
    }

    /// Parse a style label.
    pub fn parse(label: &str) -> Result<Self> {
        let lower = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.label() == lower)
            .ok_or_else(|| SimError::invalid(format!("unknown play style '{label}'")))
    }

    #[must_use]
    pub const fn weights(self) -> StyleWeights {
        let (damage, block, scaling) = match self {
            PlayStyle::Greedy => (1.5, 0.8, 0.5),
            PlayStyle::Defensive => (0.8, 1.5, 0.7),
            PlayStyle::Balanced => (1.0, 1.0, 1.0),
            PlayStyle::Scaling => (0.7, 0.9, 1.8),
        };
        StyleWeights { damage, block, scaling }
    }
}

impl std::fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Card valuation constants.
///
/// These are calibration values, not rules. Every field can be overridden
/// from a calibration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub style: PlayStyle,

    // === Horizon estimate ===
    /// Assumed damage the player deals per turn.
    pub damage_per_turn: f64,
    /// Floor on the estimated remaining turns.
    pub min_turns: f64,

    // === Damage and block ===
    /// Lethal damage is worth enemy HP times this.
    pub lethal_multiplier: f64,
    /// Weight of block that stops incoming damage this turn.
    pub block_needed_weight: f64,
    pub block_excess_base: f64,
    pub block_excess_per_turn: f64,
    pub block_excess_cap: f64,
    pub block_idle_base: f64,
    pub block_idle_per_turn: f64,
    pub block_idle_cap: f64,

    // === Scaling ===
    pub strength_weight: f64,
    pub scaling_turn_divisor: f64,
    pub double_strength_weight: f64,
    pub retain_block_per_turn: f64,

    // === Debuffs ===
    /// Base attack damage assumed when valuing Vulnerable.
    pub vulnerable_base: f64,
    pub debuff_weight: f64,
    pub poison_weight: f64,

    // === Resources ===
    pub draw_early: f64,
    pub draw_late: f64,
    /// Turns that count as early for draw value.
    pub early_turns: u32,
    pub energy_value: f64,
    pub hp_critical: f64,
    pub hp_critical_multiplier: f64,
    pub hp_low: f64,
    pub hp_low_multiplier: f64,
    pub exhaust_penalty: f64,
    pub discard_penalty: f64,

    // === Orbs ===
    pub orb_slot_value: f64,

    // === Stances ===
    pub wrath_safe: f64,
    pub wrath_unsafe: f64,
    pub calm_value: f64,
    pub leave_calm_value: f64,
    pub divinity_value: f64,
    pub mantra_point: f64,
    pub stance_block_weight: f64,
    pub end_turn_penalty: f64,

    // === Selection ===
    pub zero_cost_bonus: f64,
    /// Below this value the turn ends if block already covers the attack.
    pub end_turn_threshold: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            style: PlayStyle::Balanced,
            damage_per_turn: 15.0,
            min_turns: 3.0,
            lethal_multiplier: 2.0,
            block_needed_weight: 1.5,
            block_excess_base: 0.3,
            block_excess_per_turn: 0.05,
            block_excess_cap: 0.3,
            block_idle_base: 0.4,
            block_idle_per_turn: 0.03,
            block_idle_cap: 0.2,
            strength_weight: 0.8,
            scaling_turn_divisor: 5.0,
            double_strength_weight: 8.0,
            retain_block_per_turn: 2.0,
            vulnerable_base: 8.0,
            debuff_weight: 0.25,
            poison_weight: 0.9,
            draw_early: 5.0,
            draw_late: 3.0,
            early_turns: 2,
            energy_value: 6.0,
            hp_critical: 0.3,
            hp_critical_multiplier: 4.0,
            hp_low: 0.5,
            hp_low_multiplier: 2.0,
            exhaust_penalty: 1.0,
            discard_penalty: 1.0,
            orb_slot_value: 4.0,
            wrath_safe: 15.0,
            wrath_unsafe: -10.0,
            calm_value: 8.0,
            leave_calm_value: 10.0,
            divinity_value: 30.0,
            mantra_point: 2.0,
            stance_block_weight: 5.0,
            end_turn_penalty: 20.0,
            zero_cost_bonus: 1.2,
            end_turn_threshold: 1.0,
        }
    }
}

impl HeuristicConfig {
    #[must_use]
    pub fn new(style: PlayStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: PlayStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn weights(&self) -> StyleWeights {
        self.style.weights()
    }
}

/// Monte Carlo lookahead parameters. Depth 0 disables lookahead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookaheadConfig {
    /// Turns simulated, counting the current one.
    pub depth: u32,
    /// Sampled continuations per candidate.
    pub samples: u32,
    /// Per-turn discount on future value.
    pub discount: f64,
    pub win_bonus: f64,
    pub loss_penalty: f64,
    /// Weight of the heuristic play that finishes the current turn.
    pub rest_of_turn_weight: f64,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            depth: 0,
            samples: 1,
            discount: 0.9,
            win_bonus: 50.0,
            loss_penalty: 100.0,
            rest_of_turn_weight: 0.5,
        }
    }
}

impl LookaheadConfig {
    #[must_use]
    pub fn new(depth: u32, samples: u32) -> Self {
        Self {
            depth,
            samples,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.depth > 0 && self.samples > 0
    }
}

/// Everything needed to build a policy. Defaults to the balanced preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub heuristic: HeuristicConfig,
    pub lookahead: LookaheadConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl PolicyConfig {
    /// Heuristic only, damage first.
    #[must_use]
    pub fn greedy() -> Self {
        Self::preset(PlayStyle::Greedy, 0, 1)
    }

    #[must_use]
    pub fn defensive() -> Self {
        Self::preset(PlayStyle::Defensive, 1, 5)
    }

    #[must_use]
    pub fn balanced() -> Self {
        Self::preset(PlayStyle::Balanced, 2, 10)
    }

    #[must_use]
    pub fn scaling() -> Self {
        Self::preset(PlayStyle::Scaling, 2, 10)
    }

    /// The preset matching a style.
    #[must_use]
    pub fn for_style(style: PlayStyle) -> Self {
        match style {
            PlayStyle::Greedy => Self::greedy(),
            PlayStyle::Defensive => Self::defensive(),
            PlayStyle::Balanced => Self::balanced(),
            PlayStyle::Scaling => Self::scaling(),
        }
    }

    fn preset(style: PlayStyle, depth: u32, samples: u32) -> Self {
        Self {
            heuristic: HeuristicConfig::new(style),
            lookahead: LookaheadConfig::new(depth, samples),
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.lookahead.depth = depth;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.lookahead.samples = samples;
        self
    }

    /// Build the policy these settings describe.
    #[must_use]
    pub fn build(&self) -> Box<dyn Policy> {
        if self.lookahead.is_enabled() {
            Box::new(LookaheadPolicy::new(self.heuristic.clone(), self.lookahead.clone()))
        } else {
            Box::new(HeuristicPolicy::new(self.heuristic.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_weights() {
        let greedy = PlayStyle::Greedy.weights();
        assert_eq!((greedy.damage, greedy.block, greedy.scaling), (1.5, 0.8, 0.5));
        let scaling = PlayStyle::Scaling.weights();
        assert_eq!(scaling.scaling, 1.8);
        assert_eq!(PlayStyle::default(), PlayStyle::Balanced);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(PlayStyle::parse("Defensive").unwrap(), PlayStyle::Defensive);
        assert!(PlayStyle::parse("reckless").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(PolicyConfig::greedy().lookahead.depth, 0);
        assert!(!PolicyConfig::greedy().lookahead.is_enabled());

        let defensive = PolicyConfig::defensive();
        assert_eq!((defensive.lookahead.depth, defensive.lookahead.samples), (1, 5));

        let balanced = PolicyConfig::balanced();
        assert_eq!((balanced.lookahead.depth, balanced.lookahead.samples), (2, 10));
        assert_eq!(balanced.lookahead.discount, 0.9);

        assert_eq!(PolicyConfig::for_style(PlayStyle::Scaling), PolicyConfig::scaling());
    }

    #[test]
    fn test_partial_calibration_json() {
        let json = r#"{ "heuristic": { "style": "greedy", "energy_value": 4.0 } }"#;
        let config: PolicyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.heuristic.style, PlayStyle::Greedy);
        assert_eq!(config.heuristic.energy_value, 4.0);
        assert_eq!(config.heuristic.lethal_multiplier, 2.0);
        assert_eq!(config.lookahead, PolicyConfig::balanced().lookahead);
    }
}
