//! Resume manifest: which batches are done, and under which parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::store::write_atomic;
use crate::ai::PolicyConfig;
use crate::core::{Character, CombatConfig};
use crate::error::{Result, SimError};

/// Inputs that must match for completed batches to be reused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchParameters {
    pub root_seed: u64,
    pub total_runs: u64,
    pub batch_size: u64,
    pub modifier: String,
    pub enemy_hp: Option<i64>,
    /// Runs draw from the unmodified streams.
    #[serde(default)]
    pub paired: bool,
    pub combat: CombatConfig,
    pub policy: PolicyConfig,
}

/// Progress of one character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterProgress {
    pub parameters: BatchParameters,
    pub completed: BTreeSet<u64>,
}

/// Persisted record of completed batches per character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub characters: BTreeMap<Character, CharacterProgress>,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "manifest.json";

    /// Load the manifest in `dir`, or an empty one if none exists yet.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SimError::io(path, e)),
        }
    }

    /// Write the manifest atomically into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(&dir.join(Self::FILE_NAME), &json)
    }

    /// Start or resume tracking `character`.
    ///
    /// A character already recorded under different parameters is a
    /// [`SimError::ParameterMismatch`]: its finished batches cannot be mixed
    /// with the new request.
    pub fn register(&mut self, character: Character, parameters: BatchParameters) -> Result<()> {
        match self.characters.get(&character) {
            Some(progress) if progress.parameters != parameters => Err(SimError::ParameterMismatch {
                character: character.label().to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.characters.insert(
                    character,
                    CharacterProgress {
                        parameters,
                        completed: BTreeSet::new(),
                    },
                );
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_complete(&self, character: Character, batch_index: u64) -> bool {
        self.characters
            .get(&character)
            .is_some_and(|p| p.completed.contains(&batch_index))
    }

    pub fn mark_complete(&mut self, character: Character, batch_index: u64) {
        if let Some(progress) = self.characters.get_mut(&character) {
            progress.completed.insert(batch_index);
        }
    }

    /// Batch indices below `batch_count` not yet completed, in order.
    #[must_use]
    pub fn pending(&self, character: Character, batch_count: u64) -> Vec<u64> {
        (0..batch_count)
            .filter(|&index| !self.is_complete(character, index))
            .collect()
    }

    /// Whether every batch of `character` is done.
    #[must_use]
    pub fn all_complete(&self, character: Character, batch_count: u64) -> bool {
        (0..batch_count).all(|index| self.is_complete(character, index))
    }
}
