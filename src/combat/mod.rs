//! Combat substrate: entities, damage arithmetic, full state, results.

pub mod damage;
pub mod entities;
pub mod result;
pub mod state;

pub use entities::{EnemyState, Extension, Intent, Orb, OrbState, PlayerState, Powers, StanceState};
pub use result::{CombatResult, Outcome};
pub use state::{Combat, CombatSetup, CombatStats};
