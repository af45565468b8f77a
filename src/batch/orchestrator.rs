//! Resumable, batch-parallel execution.
//!
//! Runs are partitioned into fixed-size batches per character. Each batch
//! is one unit of work: it derives every run's generator from the root
//! seed, plays the combats, and writes its own artifact. Workers share only
//! read-only inputs; the manifest is the one piece of mutable state and
//! sits behind a mutex, saved after every finished batch.
//!
//! A batch that fails is logged and left pending, so the next invocation
//! with the same parameters picks it up. Because a run's seed depends only
//! on its index, a resumed dataset is identical to an uninterrupted one.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::SimulationConfig;
use super::manifest::Manifest;
use super::stats::Summary;
use super::store::{BatchStore, RunRecord};
use crate::ai::Policy;
use crate::cards::CardSource;
use crate::combat::CombatSetup;
use crate::core::{Character, GameRng};
use crate::error::{Result, SimError};
use crate::rules::CombatEngine;

/// What one invocation accomplished.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Batches executed successfully in this invocation.
    pub batches_run: usize,
    /// Batches that failed and stay pending.
    pub batches_failed: usize,
    /// Characters whose dataset was merged, in configuration order.
    pub summaries: Vec<Summary>,
    /// Characters with batches still pending.
    pub incomplete: Vec<Character>,
}

impl RunReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

/// Drives a [`SimulationConfig`] to merged datasets.
pub struct Orchestrator<'a> {
    config: SimulationConfig,
    cards: &'a dyn CardSource,
    store: BatchStore,
}

impl<'a> Orchestrator<'a> {
    /// Validates the configuration up front.
    pub fn new(config: SimulationConfig, cards: &'a dyn CardSource) -> Result<Self> {
        config.validate()?;
        let store = BatchStore::new(config.output_dir.clone());
        Ok(Self { config, cards, store })
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &BatchStore {
        &self.store
    }

    /// Run every pending batch (up to the batch limit), then merge and
    /// summarize each character whose batches are all done.
    pub fn run(&self) -> Result<RunReport> {
        let setups = self
            .config
            .characters
            .iter()
            .map(|&character| Ok((character, self.config.setup(character, self.cards)?)))
            .collect::<Result<Vec<(Character, CombatSetup)>>>()?;

        let root = self.store.root();
        let mut manifest = Manifest::load(root)?;
        for (character, setup) in &setups {
            manifest.register(*character, self.config.parameters(setup))?;
        }
        manifest.save(root)?;

        let batch_count = self.config.batch_count();
        let mut jobs: Vec<(Character, &CombatSetup, u64)> = setups
            .iter()
            .flat_map(|(character, setup)| {
                manifest
                    .pending(*character, batch_count)
                    .into_iter()
                    .map(move |index| (*character, setup, index))
            })
            .collect();
        if let Some(limit) = self.config.batch_limit {
            jobs.truncate(limit);
        }

        info!(
            pending = jobs.len(),
            batches_per_character = batch_count,
            workers = self.config.workers,
            "starting batches"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| SimError::invalid(format!("cannot start {} workers: {e}", self.config.workers)))?;

        let policy = self.config.policy.build();
        let manifest = Mutex::new(manifest);
        let done = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        pool.install(|| {
            jobs.par_iter().for_each(|&(character, setup, batch_index)| {
                match self.run_batch(character, setup, batch_index, policy.as_ref()) {
                    Ok(path) => {
                        let mut guard = manifest.lock().unwrap_or_else(PoisonError::into_inner);
                        guard.mark_complete(character, batch_index);
                        if let Err(error) = guard.save(root) {
                            warn!(%character, batch = batch_index, %error, "manifest save failed");
                        }
                        drop(guard);
                        done.fetch_add(1, Ordering::Relaxed);
                        info!(%character, batch = batch_index, path = %path.display(), "batch done");
                    }
                    Err(error) => {
                        failed.fetch_add(1, Ordering::Relaxed);
                        warn!(%character, batch = batch_index, %error, "batch failed; left pending");
                    }
                }
            });
        });

        let manifest = manifest.into_inner().unwrap_or_else(PoisonError::into_inner);
        manifest.save(root)?;

        let mut report = RunReport {
            batches_run: done.into_inner(),
            batches_failed: failed.into_inner(),
            ..RunReport::default()
        };
        for (character, _) in &setups {
            let character = *character;
            if !manifest.all_complete(character, batch_count) {
                report.incomplete.push(character);
                continue;
            }
            let records = self.store.merge(character, batch_count)?;
            let summary = Summary::from_records(character, &records);
            let path = self.store.write_summary(&summary)?;
            info!(
                %character,
                runs = records.len(),
                win_rate = summary.win_rate,
                path = %path.display(),
                "merged dataset"
            );
            report.summaries.push(summary);
        }
        Ok(report)
    }

    fn run_batch(
        &self,
        character: Character,
        setup: &CombatSetup,
        batch_index: u64,
        policy: &dyn Policy,
    ) -> Result<PathBuf> {
        let engine = CombatEngine::new(self.cards, &self.config.combat, policy);
        let modifier = setup.modifier_label();
        let seed_label = self.config.seed_label(setup);
        let range = self.config.batch_range(batch_index);
        debug!(%character, batch = batch_index, runs = ?range, "batch started");

        let records: Vec<RunRecord> = range
            .map(|run_index| {
                let rng = GameRng::derive(self.config.root_seed, character.label(), &seed_label, run_index);
                RunRecord {
                    run_index,
                    batch_index,
                    character,
                    modifier: modifier.clone(),
                    root_seed: self.config.root_seed,
                    result: engine.run(setup, rng),
                }
            })
            .collect();

        self.store.write_batch(character, batch_index, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PolicyConfig;
    use crate::cards::CardRegistry;

    fn small_config(dir: &std::path::Path) -> SimulationConfig {
        SimulationConfig::new()
            .with_seed(5)
            .with_runs(12, 5)
            .with_workers(2)
            .with_characters(vec![Character::Ironclad, Character::Defect])
            .with_policy(PolicyConfig::greedy())
            .with_output_dir(dir)
    }

    #[test]
    fn test_full_run_merges_every_character() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CardRegistry::builtin();
        let orchestrator = Orchestrator::new(small_config(dir.path()), &registry).unwrap();

        let report = orchestrator.run().unwrap();

        assert!(report.is_complete());
        assert_eq!(report.batches_run, 6);
        assert_eq!(report.summaries.len(), 2);
        for summary in &report.summaries {
            assert_eq!(summary.runs, 12);
            let records = orchestrator.store().read_final(summary.character).unwrap();
            let indices: Vec<u64> = records.iter().map(|r| r.run_index).collect();
            assert_eq!(indices, (0..12).collect::<Vec<_>>());
            assert_eq!(records[11].batch_index, 2);
            assert!(orchestrator.store().summary_path(summary.character).exists());
        }
    }

    #[test]
    fn test_second_invocation_does_nothing_new() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CardRegistry::builtin();
        let orchestrator = Orchestrator::new(small_config(dir.path()), &registry).unwrap();

        orchestrator.run().unwrap();
        let again = orchestrator.run().unwrap();

        assert_eq!(again.batches_run, 0);
        assert!(again.is_complete());
    }

    #[test]
    fn test_batch_limit_leaves_work_pending() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CardRegistry::builtin();
        let config = small_config(dir.path()).with_batch_limit(4);
        let orchestrator = Orchestrator::new(config, &registry).unwrap();

        let report = orchestrator.run().unwrap();

        assert_eq!(report.batches_run, 4);
        // Ironclad's three batches come first, then one of Defect's.
        assert_eq!(report.incomplete, vec![Character::Defect]);
        assert_eq!(report.summaries.len(), 1);
        assert!(!orchestrator.store().final_path(Character::Defect).exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let registry = CardRegistry::builtin();
        let config = SimulationConfig::new().with_runs(0, 5);
        assert!(Orchestrator::new(config, &registry).is_err());
    }
}
