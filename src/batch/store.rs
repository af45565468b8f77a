//! On-disk batch artifacts and merged datasets.
//!
//! ## Layout
//!
//! ```text
//! <root>/manifest.json
//! <root>/<character>/batch_0000.bin
//! <root>/final/<character>.bin
//! <root>/final/<character>.summary.json
//! ```
//!
//! Every file is written to a temporary sibling first and renamed into
//! place, so readers never see a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::stats::Summary;
use crate::combat::CombatResult;
use crate::core::Character;
use crate::error::{Result, SimError};

/// One row of a dataset: a combat result plus where it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_index: u64,
    pub batch_index: u64,
    pub character: Character,
    pub modifier: String,
    pub root_seed: u64,
    pub result: CombatResult,
}

/// Write `bytes` to `path` via a temp file and atomic rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| SimError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SimError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| SimError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| SimError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SimError::io(path, e.error))?;
    Ok(())
}

/// Paths and codecs for one output directory.
#[derive(Clone, Debug)]
pub struct BatchStore {
    root: PathBuf,
}

impl BatchStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn batch_path(&self, character: Character, batch_index: u64) -> PathBuf {
        self.root
            .join(character.label())
            .join(format!("batch_{batch_index:04}.bin"))
    }

    #[must_use]
    pub fn final_path(&self, character: Character) -> PathBuf {
        self.root.join("final").join(format!("{}.bin", character.label()))
    }

    #[must_use]
    pub fn summary_path(&self, character: Character) -> PathBuf {
        self.root
            .join("final")
            .join(format!("{}.summary.json", character.label()))
    }

    /// Persist one batch. Returns the artifact path.
    pub fn write_batch(&self, character: Character, batch_index: u64, records: &[RunRecord]) -> Result<PathBuf> {
        let path = self.batch_path(character, batch_index);
        write_atomic(&path, &bincode::serialize(records)?)?;
        Ok(path)
    }

    pub fn read_batch(&self, character: Character, batch_index: u64) -> Result<Vec<RunRecord>> {
        read_records(&self.batch_path(character, batch_index))
    }

    /// Concatenate batches `0..batch_count` in index order into the final
    /// dataset.
    pub fn merge(&self, character: Character, batch_count: u64) -> Result<Vec<RunRecord>> {
        let mut records = Vec::new();
        for index in 0..batch_count {
            records.extend(self.read_batch(character, index)?);
        }
        write_atomic(&self.final_path(character), &bincode::serialize(&records)?)?;
        Ok(records)
    }

    pub fn read_final(&self, character: Character) -> Result<Vec<RunRecord>> {
        read_records(&self.final_path(character))
    }

    pub fn write_summary(&self, summary: &Summary) -> Result<PathBuf> {
        let path = self.summary_path(summary.character);
        write_atomic(&path, &serde_json::to_vec_pretty(summary)?)?;
        Ok(path)
    }
}

fn read_records(path: &Path) -> Result<Vec<RunRecord>> {
    let bytes = std::fs::read(path).map_err(|e| SimError::io(path, e))?;
    Ok(bincode::deserialize(&bytes)?)
}
