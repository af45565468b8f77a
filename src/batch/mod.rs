//! Batch orchestration: many seeded runs, resumable, merged to one dataset.
//!
//! ## Key Types
//!
//! - `SimulationConfig`: what to run and where to write it
//! - `Manifest`: completed batches per character, persisted as JSON
//! - `BatchStore`: batch artifacts, merged datasets and summaries on disk
//! - `Orchestrator`: runs pending batches on a rayon pool, then merges
//! - `Summary`: win rate with Wilson bounds and convergence metadata

pub mod config;
pub mod manifest;
pub mod orchestrator;
pub mod stats;
pub mod store;

pub use config::{Calibration, SimulationConfig, MAX_ENEMY_HP};
pub use manifest::{BatchParameters, CharacterProgress, Manifest};
pub use orchestrator::{Orchestrator, RunReport};
pub use stats::{
    convergence_series, is_converged, wilson_interval, ConvergencePoint, PairedComparison, Summary, DEFAULT_Z,
};
pub use store::{write_atomic, BatchStore, RunRecord};
