//! Card piles: draw, hand, discard, exhaust.

pub mod piles;

pub use piles::{DeckState, DrawOutcome, Pile};
