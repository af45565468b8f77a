//! Effect system: the closed set of card effects and their resolver.
//!
//! ## Key Types
//!
//! - `Effect`: one atomic thing a card or relic does
//! - `EffectResolver`: applies effects to a `Combat`

pub mod effect;
pub mod resolver;

pub use effect::{Effect, OrbKind, Stance};
pub use resolver::EffectResolver;
