//! Batch orchestrator tests.
//!
//! Resumption is the core promise: stopping after some batches and
//! re-invoking with the same parameters must produce the same merged
//! dataset as one uninterrupted run.

use std::path::Path;

use spire_sim::batch::{BatchStore, Manifest, Orchestrator, PairedComparison, RunRecord, SimulationConfig};
use spire_sim::{
    Card, CardCategory, CardRegistry, Character, Cost, Effect, Encounter, EncounterChoice, PolicyConfig, SimError,
};

fn config(dir: &Path) -> SimulationConfig {
    SimulationConfig::new()
        .with_seed(99)
        .with_runs(23, 4)
        .with_workers(3)
        .with_characters(vec![Character::Silent, Character::Watcher])
        .with_policy(PolicyConfig::greedy())
        .with_output_dir(dir)
}

// =============================================================================
// Resume
// =============================================================================

#[test]
fn test_resumed_run_matches_uninterrupted_run() {
    let registry = CardRegistry::builtin();

    let full_dir = tempfile::tempdir().unwrap();
    let full = Orchestrator::new(config(full_dir.path()), &registry).unwrap();
    let report = full.run().unwrap();
    assert!(report.is_complete());
    assert_eq!(report.batches_run, 12);

    let resumed_dir = tempfile::tempdir().unwrap();
    let first = Orchestrator::new(config(resumed_dir.path()).with_batch_limit(5), &registry).unwrap();
    let partial = first.run().unwrap();
    assert_eq!(partial.batches_run, 5);
    assert!(!partial.is_complete());

    let second = Orchestrator::new(config(resumed_dir.path()).with_batch_limit(5), &registry).unwrap();
    let middle = second.run().unwrap();
    assert_eq!(middle.batches_run, 5);

    let third = Orchestrator::new(config(resumed_dir.path()), &registry).unwrap();
    let last = third.run().unwrap();
    assert_eq!(last.batches_run, 2);
    assert!(last.is_complete());

    for character in [Character::Silent, Character::Watcher] {
        let expected = full.store().read_final(character).unwrap();
        let actual = third.store().read_final(character).unwrap();
        assert_eq!(expected.len(), 23);
        assert_eq!(expected, actual);

        let a = std::fs::read(full.store().final_path(character)).unwrap();
        let b = std::fs::read(third.store().final_path(character)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_worker_count_does_not_change_results() {
    let registry = CardRegistry::builtin();
    let one = tempfile::tempdir().unwrap();
    let many = tempfile::tempdir().unwrap();

    Orchestrator::new(config(one.path()).with_workers(1), &registry)
        .unwrap()
        .run()
        .unwrap();
    Orchestrator::new(config(many.path()).with_workers(4), &registry)
        .unwrap()
        .run()
        .unwrap();

    let a = BatchStore::new(one.path()).read_final(Character::Watcher).unwrap();
    let b = BatchStore::new(many.path()).read_final(Character::Watcher).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_missing_artifact_is_rerun_after_manifest_edit() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(config(dir.path()), &registry).unwrap();
    orchestrator.run().unwrap();
    let before = orchestrator.store().read_final(Character::Silent).unwrap();

    // Simulate a batch lost before it was recorded
    let mut manifest = Manifest::load(dir.path()).unwrap();
    manifest
        .characters
        .get_mut(&Character::Silent)
        .unwrap()
        .completed
        .remove(&2);
    manifest.save(dir.path()).unwrap();
    std::fs::remove_file(orchestrator.store().batch_path(Character::Silent, 2)).unwrap();

    let report = orchestrator.run().unwrap();
    assert_eq!(report.batches_run, 1);
    assert_eq!(orchestrator.store().read_final(Character::Silent).unwrap(), before);
}

// =============================================================================
// Manifest guards
// =============================================================================

#[test]
fn test_changed_parameters_are_rejected() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    Orchestrator::new(config(dir.path()).with_batch_limit(1), &registry)
        .unwrap()
        .run()
        .unwrap();

    let changed = Orchestrator::new(config(dir.path()).with_seed(100), &registry).unwrap();
    assert!(matches!(changed.run(), Err(SimError::ParameterMismatch { .. })));

    let other_relic = Orchestrator::new(config(dir.path()).with_relic("anchor"), &registry).unwrap();
    assert!(matches!(other_relic.run(), Err(SimError::ParameterMismatch { .. })));
}

#[test]
fn test_manifest_records_parameters() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    Orchestrator::new(config(dir.path()), &registry).unwrap().run().unwrap();

    let manifest = Manifest::load(dir.path()).unwrap();
    let progress = &manifest.characters[&Character::Watcher];
    assert_eq!(progress.parameters.root_seed, 99);
    assert_eq!(progress.parameters.batch_size, 4);
    assert_eq!(progress.completed.len(), 6);
    assert!(manifest.all_complete(Character::Silent, 6));
}

#[test]
fn test_unknown_card_is_a_configuration_error() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(config(dir.path()).with_extra_card("Hand of Greed"), &registry).unwrap();
    assert!(matches!(orchestrator.run(), Err(SimError::UnknownCard(_))));
}

#[test]
fn test_misspelled_starter_list_is_fatal() {
    let mut registry = CardRegistry::builtin();
    registry.set_starter(
        Character::Silent,
        vec![
            ("Strike".to_string(), 5),
            ("Defnd".to_string(), 5),
            ("Neutralize".to_string(), 1),
        ],
    );
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(config(dir.path()), &registry).unwrap();

    match orchestrator.run() {
        Err(SimError::UnknownCard(name)) => assert_eq!(name, "Defnd"),
        other => panic!("expected unknown card, got {other:?}"),
    }
    assert!(!dir.path().join(Manifest::FILE_NAME).exists());
}

#[test]
fn test_unregistered_added_card_is_fatal() {
    let mut registry = CardRegistry::builtin();
    registry.register(
        Card::new("Conjure Blade", Cost::Fixed(1), CardCategory::Skill).with_effect(Effect::AddToHand {
            card: "Expunger".to_string(),
            count: 1,
        }),
    );
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(config(dir.path()).with_extra_card("Conjure Blade"), &registry).unwrap();

    match orchestrator.run() {
        Err(SimError::UnknownCard(name)) => assert_eq!(name, "Expunger"),
        other => panic!("expected unknown card, got {other:?}"),
    }
}

#[test]
fn test_enemy_hp_beyond_cap_is_rejected() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let result = Orchestrator::new(config(dir.path()).with_enemy_hp(1_000_000_000_000), &registry);
    assert!(matches!(result, Err(SimError::InvalidConfig { .. })));
}

// =============================================================================
// Encounters
// =============================================================================

#[test]
fn test_mixed_encounters_are_recorded() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(
        config(dir.path())
            .with_characters(vec![Character::Ironclad])
            .with_encounter(EncounterChoice::Mixed),
        &registry,
    )
    .unwrap();
    let report = orchestrator.run().unwrap();
    assert!(report.is_complete());

    let records = orchestrator.store().read_final(Character::Ironclad).unwrap();
    assert_eq!(records.len(), 23);
    assert!(records.iter().all(|r| r.modifier == "none@mixed"));
    assert!(records.iter().all(|r| r.result.encounter.is_some()));
    assert!(records.iter().any(|r| r.result.encounter == Some(Encounter::Boss)));
}

#[test]
fn test_changed_encounter_is_rejected() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    Orchestrator::new(config(dir.path()).with_batch_limit(1), &registry)
        .unwrap()
        .run()
        .unwrap();

    let scripted = config(dir.path()).with_encounter(EncounterChoice::Fixed(Encounter::Scaling));
    let changed = Orchestrator::new(scripted, &registry).unwrap();
    assert!(matches!(changed.run(), Err(SimError::ParameterMismatch { .. })));
}

// =============================================================================
// Paired comparison
// =============================================================================

fn final_records(config: SimulationConfig, registry: &CardRegistry, character: Character) -> Vec<RunRecord> {
    let orchestrator = Orchestrator::new(config, registry).unwrap();
    orchestrator.run().unwrap();
    orchestrator.store().read_final(character).unwrap()
}

fn play_signature(records: &[RunRecord]) -> Vec<(bool, u32, u32)> {
    records
        .iter()
        .map(|r| (r.result.win, r.result.turns, r.result.cards_played))
        .collect()
}

#[test]
fn test_paired_runs_share_baseline_streams() {
    let registry = CardRegistry::builtin();
    let character = Character::Silent;
    let base = |dir: &Path| config(dir).with_characters(vec![character]);

    let baseline_dir = tempfile::tempdir().unwrap();
    let baseline = final_records(base(baseline_dir.path()), &registry, character);

    // Burning Blood only heals after a win, so paired plays are identical
    let paired_dir = tempfile::tempdir().unwrap();
    let paired_config = base(paired_dir.path()).with_relic("burning_blood").with_paired(true);
    let paired = final_records(paired_config, &registry, character);
    assert!(paired.iter().all(|r| r.modifier == "burning_blood"));
    assert_eq!(play_signature(&paired), play_signature(&baseline));

    let unpaired_dir = tempfile::tempdir().unwrap();
    let unpaired = final_records(base(unpaired_dir.path()).with_relic("burning_blood"), &registry, character);
    assert_ne!(play_signature(&unpaired), play_signature(&baseline));

    let comparison = PairedComparison::from_records(character, &baseline, &paired).unwrap();
    assert_eq!(comparison.runs, 23);
    assert_eq!((comparison.gained, comparison.lost), (0, 0));
    assert_eq!(comparison.win_rate_delta, 0.0);
    assert!(comparison.mean_damage_delta <= 0.0);
}

#[test]
fn test_toggling_pairing_is_rejected() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    Orchestrator::new(config(dir.path()).with_batch_limit(1), &registry)
        .unwrap()
        .run()
        .unwrap();

    let paired = Orchestrator::new(config(dir.path()).with_paired(true), &registry).unwrap();
    assert!(matches!(paired.run(), Err(SimError::ParameterMismatch { .. })));
}

#[test]
fn test_summary_written_with_merge() {
    let registry = CardRegistry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let report = Orchestrator::new(config(dir.path()), &registry).unwrap().run().unwrap();

    let store = BatchStore::new(dir.path());
    for summary in &report.summaries {
        let text = std::fs::read_to_string(store.summary_path(summary.character)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["runs"], 23);
        assert!(summary.ci_low <= summary.win_rate && summary.win_rate <= summary.ci_high);
        assert_eq!(summary.convergence.last().map(|p| p.runs), Some(23));
    }
}
