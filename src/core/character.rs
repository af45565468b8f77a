//! Playable character archetypes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// One of the four playable archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Character {
    Ironclad,
    Silent,
    Defect,
    Watcher,
}

impl Character {
    /// All characters in canonical order.
    pub const ALL: [Character; 4] = [
        Character::Ironclad,
        Character::Silent,
        Character::Defect,
        Character::Watcher,
    ];

    /// Lowercase label used for seed contexts, paths and the CLI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Character::Ironclad => "ironclad",
            Character::Silent => "silent",
            Character::Defect => "defect",
            Character::Watcher => "watcher",
        }
    }

    /// Parse a label case-insensitively.
    pub fn parse(label: &str) -> Result<Self> {
        let lower = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == lower)
            .ok_or_else(|| SimError::UnknownCharacter(label.to_string()))
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
