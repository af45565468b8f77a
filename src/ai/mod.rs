//! Decision layer: card valuation and turn policies.
//!
//! ## Overview
//!
//! - [`CardEvaluator`] scores a single card play from the current state.
//! - [`HeuristicPolicy`] plays the best-scoring card until nothing is worth
//!   playing.
//! - [`LookaheadPolicy`] refines those scores with short Monte Carlo
//!   rollouts on cloned combats.
//!
//! Policies are chosen through [`PolicyConfig`]; the four named presets
//! pair a [`PlayStyle`] with a lookahead depth and sample count.
//!
//! ```rust
//! use spire_sim::ai::PolicyConfig;
//!
//! let policy = PolicyConfig::greedy().build();
//! let searching = PolicyConfig::balanced().with_samples(4).build();
//! # let _ = (policy, searching);
//! ```

pub mod config;
pub mod heuristic;
pub mod lookahead;
pub mod policy;

pub use config::{HeuristicConfig, LookaheadConfig, PlayStyle, PolicyConfig, StyleWeights};
pub use heuristic::CardEvaluator;
pub use lookahead::LookaheadPolicy;
pub use policy::{playable, select, Decision, HeuristicPolicy, Policy};
