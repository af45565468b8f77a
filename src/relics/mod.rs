//! Relics: passive items that inject effects at fixed points of a combat.

pub mod relic;

pub use relic::{Relic, RelicTiming};
