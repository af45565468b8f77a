//! The shared turn state machine.
//!
//! Every character runs the same phases:
//! TurnStart → PlayerDecision → EndOfTurn → EnemyAction → DebuffDecay,
//! looping until someone dies or the turn cap is reached. What differs per
//! character is supplied through [`CharacterRules`].

pub mod engine;
pub mod machine;
pub mod turn;

pub use engine::{CharacterRules, CombatContext};
pub use machine::{advance, CombatEngine, Phase};
