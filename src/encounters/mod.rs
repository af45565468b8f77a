//! Scripted enemies fought instead of a character's intent table.

pub mod encounter;

pub use encounter::{Encounter, EncounterChoice};
