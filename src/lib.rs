//! # spire-sim
//!
//! Deterministic Monte Carlo combat simulator for a deck-building card game
//! with four playable characters.
//!
//! ## Design Principles
//!
//! 1. **Reproducible**: every run's randomness derives from
//!    (root seed, character, modifier, run index). Same inputs, same result,
//!    on any machine and in any batch order.
//!
//! 2. **One Turn Machine**: the characters share a single turn state
//!    machine; their differences live behind `CharacterRules`.
//!
//! 3. **Closed Effects**: card and relic effects are one tagged enum,
//!    matched exhaustively by both the resolver and the card evaluator.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: piles are `im` vectors, so cloning a
//!   combat for a lookahead rollout is cheap.
//!
//! - **Batch Parallelism**: batches run on a rayon pool and share only
//!   read-only inputs; resumption is driven by a JSON manifest.
//!
//! ## Modules
//!
//! - `core`: RNG and seed derivation, characters, combat configuration
//! - `cards`: card templates, the built-in catalog, lookup
//! - `effects`: the closed effect set and its resolver
//! - `zones`: draw, hand, discard and exhaust piles
//! - `combat`: entities, damage arithmetic, combat state and results
//! - `relics`: relic hooks
//! - `encounters`: scripted enemies with fixed intent patterns
//! - `rules`: character rules trait and the turn state machine
//! - `characters`: the four character rule sets
//! - `ai`: card valuation, heuristic and lookahead policies
//! - `batch`: configuration, manifest, artifacts, orchestrator, statistics

pub mod ai;
pub mod batch;
pub mod cards;
pub mod characters;
pub mod combat;
pub mod core;
pub mod effects;
pub mod encounters;
pub mod error;
pub mod relics;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{spawn_key, Character, CombatConfig, DebuffKind, GameRng, IntentTable, IntentTables};

pub use crate::error::{Result, SimError};

pub use crate::cards::{Card, CardCategory, CardRegistry, CardSource, Cost};

pub use crate::effects::{Effect, EffectResolver, OrbKind, Stance};

pub use crate::zones::{DeckState, DrawOutcome, Pile};

pub use crate::combat::{Combat, CombatResult, CombatSetup, EnemyState, Intent, Outcome, PlayerState};

pub use crate::relics::{Relic, RelicTiming};

pub use crate::encounters::{Encounter, EncounterChoice};

pub use crate::rules::{advance, CharacterRules, CombatContext, CombatEngine, Phase};

pub use crate::characters::rules_for;

pub use crate::ai::{
    CardEvaluator, Decision, HeuristicConfig, HeuristicPolicy, LookaheadConfig, LookaheadPolicy, PlayStyle,
    Policy, PolicyConfig,
};

pub use crate::batch::{
    BatchStore, Calibration, Manifest, Orchestrator, PairedComparison, RunRecord, RunReport, SimulationConfig,
    Summary,
};
