//! Card system: templates, the built-in catalog, and lookup.
//!
//! ## Key Types
//!
//! - `Card`: immutable template (cost, category, effects, flags)
//! - `CardSource`: read-only lookup passed into every run
//! - `CardRegistry`: in-memory `CardSource` with the built-in catalog

pub mod catalog;
pub mod definition;
pub mod registry;

pub use definition::{Card, CardCategory, Cost};
pub use registry::{CardRegistry, CardSource};
