//! Core types: RNG and seed derivation, characters, configuration.
//!
//! Everything else in the crate builds on these. Nothing in here knows
//! about cards or combat state.

pub mod character;
pub mod config;
pub mod rng;

pub use character::Character;
pub use config::{CombatConfig, DebuffKind, IntentTable, IntentTables};
pub use rng::{spawn_key, GameRng};
