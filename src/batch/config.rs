//! Batch simulation settings.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::manifest::BatchParameters;
use crate::ai::PolicyConfig;
use crate::cards::CardSource;
use crate::combat::CombatSetup;
use crate::core::{Character, CombatConfig};
use crate::encounters::EncounterChoice;
use crate::error::{Result, SimError};

/// Largest enemy HP a batch accepts. Combats against bigger enemies only
/// ever time out.
pub const MAX_ENEMY_HP: i64 = 1_000_000;

/// Everything that determines a batch simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Root of every run's seed derivation.
    pub root_seed: u64,
    /// Runs per character.
    pub total_runs: u64,
    pub batch_size: u64,
    /// Worker threads.
    pub workers: usize,
    pub characters: Vec<Character>,
    /// Relic label, or `none`.
    pub relic: String,
    /// Card names added to every starter deck.
    pub extra_cards: Vec<String>,
    /// Overrides each character's default enemy HP.
    pub enemy_hp: Option<i64>,
    /// Intent-table enemy or a scripted encounter.
    pub encounter: EncounterChoice,
    /// Derive seeds from the baseline label so that a run with a relic or
    /// added cards starts from the same streams as the unmodified run of
    /// the same index.
    pub paired: bool,
    /// Stop after this many batches in one invocation; the rest stay
    /// pending for the next one.
    pub batch_limit: Option<usize>,
    pub policy: PolicyConfig,
    pub combat: CombatConfig,
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            root_seed: 42,
            total_runs: 1_000,
            batch_size: 250,
            workers: std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
            characters: Character::ALL.to_vec(),
            relic: "none".to_string(),
            extra_cards: Vec::new(),
            enemy_hp: None,
            encounter: EncounterChoice::Table,
            paired: false,
            batch_limit: None,
            policy: PolicyConfig::balanced(),
            combat: CombatConfig::default(),
            output_dir: PathBuf::from("simulation_output"),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.root_seed = seed;
        self
    }

    pub fn with_runs(mut self, total_runs: u64, batch_size: u64) -> Self {
        self.total_runs = total_runs;
        self.batch_size = batch_size;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_relic(mut self, relic: impl Into<String>) -> Self {
        self.relic = relic.into();
        self
    }

    pub fn with_extra_card(mut self, card: impl Into<String>) -> Self {
        self.extra_cards.push(card.into());
        self
    }

    pub fn with_enemy_hp(mut self, hp: i64) -> Self {
        self.enemy_hp = Some(hp);
        self
    }

    pub fn with_encounter(mut self, encounter: EncounterChoice) -> Self {
        self.encounter = encounter;
        self
    }

    pub fn with_paired(mut self, paired: bool) -> Self {
        self.paired = paired;
        self
    }

    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = Some(limit);
        self
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Reject configurations that cannot produce a meaningful dataset.
    pub fn validate(&self) -> Result<()> {
        if self.total_runs == 0 {
            return Err(SimError::invalid("run count must be positive"));
        }
        if self.batch_size == 0 {
            return Err(SimError::invalid("batch size must be positive"));
        }
        if self.workers == 0 {
            return Err(SimError::invalid("worker count must be positive"));
        }
        if self.characters.is_empty() {
            return Err(SimError::invalid("no characters selected"));
        }
        let mut seen = self.characters.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.characters.len() {
            return Err(SimError::invalid("a character is listed twice"));
        }
        if matches!(self.enemy_hp, Some(hp) if hp <= 0 || hp > MAX_ENEMY_HP) {
            return Err(SimError::invalid(format!("enemy HP must lie in 1..={MAX_ENEMY_HP}")));
        }
        if self.batch_limit == Some(0) {
            return Err(SimError::invalid("batch limit must be positive"));
        }
        if self.policy.lookahead.depth > 0 && self.policy.lookahead.samples == 0 {
            return Err(SimError::invalid("lookahead needs at least one sample"));
        }
        self.combat.validate()
    }

    /// Number of batches per character; the last one may be short.
    #[must_use]
    pub fn batch_count(&self) -> u64 {
        self.total_runs.div_ceil(self.batch_size.max(1))
    }

    /// Run indices covered by one batch.
    #[must_use]
    pub fn batch_range(&self, batch_index: u64) -> Range<u64> {
        let start = batch_index * self.batch_size;
        start.min(self.total_runs)..(start + self.batch_size).min(self.total_runs)
    }

    /// Resolve relic and card names into a combat setup for `character`.
    pub fn setup(&self, character: Character, cards: &dyn CardSource) -> Result<CombatSetup> {
        let setup = CombatSetup::resolve(character, &self.relic, &self.extra_cards, cards)?
            .with_encounter(self.encounter);
        Ok(match self.enemy_hp {
            Some(hp) => setup.with_enemy_hp(hp),
            None => setup,
        })
    }

    /// Label fed to seed derivation for `setup`.
    #[must_use]
    pub fn seed_label(&self, setup: &CombatSetup) -> String {
        if self.paired {
            setup.baseline_label()
        } else {
            setup.modifier_label()
        }
    }

    /// Parameters recorded in the manifest for `setup`.
    #[must_use]
    pub fn parameters(&self, setup: &CombatSetup) -> BatchParameters {
        BatchParameters {
            root_seed: self.root_seed,
            total_runs: self.total_runs,
            batch_size: self.batch_size,
            modifier: setup.modifier_label(),
            enemy_hp: self.enemy_hp,
            paired: self.paired,
            combat: self.combat.clone(),
            policy: self.policy.clone(),
        }
    }
}

/// Tunable calibration loaded from a JSON file. Missing sections keep
/// their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub combat: CombatConfig,
    pub policy: PolicyConfig,
}

impl Calibration {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::relics::Relic;

    #[test]
    fn test_batch_partition() {
        let config = SimulationConfig::new().with_runs(1_050, 250);
        assert_eq!(config.batch_count(), 5);
        assert_eq!(config.batch_range(0), 0..250);
        assert_eq!(config.batch_range(4), 1_000..1_050);
        assert!(config.batch_range(5).is_empty());
    }

    #[test]
    fn test_validation() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::new().with_runs(0, 10).validate().is_err());
        assert!(SimulationConfig::new().with_runs(10, 0).validate().is_err());
        assert!(SimulationConfig::new().with_workers(0).validate().is_err());
        assert!(SimulationConfig::new().with_characters(vec![]).validate().is_err());
        assert!(SimulationConfig::new()
            .with_characters(vec![Character::Silent, Character::Silent])
            .validate()
            .is_err());
        assert!(SimulationConfig::new().with_enemy_hp(0).validate().is_err());
        assert!(SimulationConfig::new().with_enemy_hp(MAX_ENEMY_HP).validate().is_ok());
        assert!(SimulationConfig::new()
            .with_enemy_hp(1_000_000_000_000)
            .validate()
            .is_err());
        assert!(SimulationConfig::new()
            .with_policy(PolicyConfig::balanced().with_samples(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_setup_and_parameters() {
        let registry = CardRegistry::builtin();
        let config = SimulationConfig::new()
            .with_relic("vajra")
            .with_extra_card("Inflame")
            .with_enemy_hp(90);

        let setup = config.setup(Character::Ironclad, &registry).unwrap();
        assert_eq!(setup.relic, Some(Relic::Vajra));
        assert_eq!(setup.enemy_hp, Some(90));

        let params = config.parameters(&setup);
        assert_eq!(params.modifier, "vajra+Inflame");
        assert_eq!(params.root_seed, 42);

        let bad = SimulationConfig::new().with_relic("teapot");
        assert!(bad.setup(Character::Ironclad, &registry).is_err());

        assert_eq!(config.seed_label(&setup), "vajra+Inflame");
        let paired = config.clone().with_paired(true);
        assert_eq!(paired.seed_label(&setup), "none");
        assert!(paired.parameters(&setup).paired);
        assert_ne!(paired.parameters(&setup), config.parameters(&setup));

        let scripted = config.with_encounter(EncounterChoice::Mixed);
        let setup = scripted.setup(Character::Ironclad, &registry).unwrap();
        assert_eq!(setup.encounter, EncounterChoice::Mixed);
        assert_eq!(scripted.parameters(&setup).modifier, "vajra+Inflame@mixed");
    }

    #[test]
    fn test_calibration_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.json");
        std::fs::write(&path, r#"{ "combat": { "max_turns": 30 } }"#).unwrap();

        let calibration = Calibration::load(&path).unwrap();

        assert_eq!(calibration.combat.max_turns, 30);
        assert_eq!(calibration.combat.hand_limit, 10);
        assert_eq!(calibration.policy, PolicyConfig::default());
        assert!(Calibration::load(&dir.path().join("missing.json")).is_err());
    }
}
