//! Criterion benchmarks for single combats and policy decisions.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spire_sim::{CardRegistry, Character, CombatConfig, CombatEngine, CombatSetup, GameRng, PolicyConfig};

fn bench_heuristic_combat(c: &mut Criterion) {
    let registry = CardRegistry::builtin();
    let config = CombatConfig::default();
    let policy = PolicyConfig::greedy().build();
    let engine = CombatEngine::new(&registry, &config, policy.as_ref());

    let mut group = c.benchmark_group("heuristic_combat");
    for character in Character::ALL {
        let setup = CombatSetup::new(character);
        let mut run_index = 0u64;
        group.bench_function(character.label(), |b| {
            b.iter(|| {
                run_index += 1;
                let rng = GameRng::derive(42, character.label(), "none", run_index);
                black_box(engine.run(&setup, rng))
            })
        });
    }
    group.finish();
}

fn bench_lookahead_combat(c: &mut Criterion) {
    let registry = CardRegistry::builtin();
    let config = CombatConfig::default();
    let policy = PolicyConfig::balanced().build();
    let engine = CombatEngine::new(&registry, &config, policy.as_ref());
    let setup = CombatSetup::new(Character::Silent);

    let mut group = c.benchmark_group("lookahead_combat");
    group.sample_size(10);
    group.bench_function("silent_balanced", |b| {
        let mut run_index = 0u64;
        b.iter(|| {
            run_index += 1;
            let rng = GameRng::derive(42, "silent", "none", run_index);
            black_box(engine.run(&setup, rng))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_heuristic_combat, bench_lookahead_combat);
criterion_main!(benches);
