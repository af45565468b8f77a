//! Crate-wide error type.
//!
//! Combat itself never fails. Everything that can go wrong is a
//! configuration lookup resolved before a run starts, or filesystem and
//! codec trouble in the batch layer.

use std::path::PathBuf;

/// Errors raised at the configuration and persistence boundaries.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    #[error("unknown relic: {0}")]
    UnknownRelic(String),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("unknown encounter: {0}")]
    UnknownEncounter(String),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("manifest parameters for {character} differ from the requested run; use a fresh output directory")]
    ParameterMismatch { character: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encode error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Shorthand for an [`SimError::InvalidConfig`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Attach a path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
