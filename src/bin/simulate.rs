//! Batch simulation command line.
//!
//! ```text
//! simulate --runs 10000 --batch-size 500 --characters ironclad,silent --style scaling
//! ```
//!
//! Logging goes to stderr, filtered by `SPIRE_SIM_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use spire_sim::batch::{Calibration, Orchestrator, SimulationConfig};
use spire_sim::{CardRegistry, Character, EncounterChoice, PlayStyle, PolicyConfig, Result, SimError};
use tracing_subscriber::EnvFilter;

/// Raw command-line options, applied on top of defaults and calibration.
#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    runs: Option<u64>,
    batch_size: Option<u64>,
    workers: Option<usize>,
    characters: Option<Vec<Character>>,
    relic: Option<String>,
    extra_cards: Vec<String>,
    enemy_hp: Option<i64>,
    encounter: Option<EncounterChoice>,
    paired: bool,
    max_turns: Option<u32>,
    style: Option<PlayStyle>,
    depth: Option<u32>,
    samples: Option<u32>,
    calibration: Option<PathBuf>,
    output: Option<PathBuf>,
    max_batches: Option<usize>,
    help: bool,
}

fn value<T: FromStr>(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<T> {
    let raw = args
        .next()
        .ok_or_else(|| SimError::invalid(format!("{flag} requires a value")))?;
    raw.parse()
        .map_err(|_| SimError::invalid(format!("{flag}: cannot parse '{raw}'")))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--seed" => parsed.seed = Some(value(&flag, &mut args)?),
            "--runs" => parsed.runs = Some(value(&flag, &mut args)?),
            "--batch-size" => parsed.batch_size = Some(value(&flag, &mut args)?),
            "--workers" => parsed.workers = Some(value(&flag, &mut args)?),
            "--characters" => {
                let list: String = value(&flag, &mut args)?;
                let characters = list
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(Character::parse)
                    .collect::<Result<Vec<_>>>()?;
                parsed.characters = Some(characters);
            }
            "--relic" => parsed.relic = Some(value(&flag, &mut args)?),
            "--add-card" => parsed.extra_cards.push(value(&flag, &mut args)?),
            "--enemy-hp" => parsed.enemy_hp = Some(value(&flag, &mut args)?),
            "--encounter" => {
                let label: String = value(&flag, &mut args)?;
                parsed.encounter = Some(EncounterChoice::parse(&label)?);
            }
            "--paired" => parsed.paired = true,
            "--max-turns" => parsed.max_turns = Some(value(&flag, &mut args)?),
            "--style" => {
                let label: String = value(&flag, &mut args)?;
                parsed.style = Some(PlayStyle::parse(&label)?);
            }
            "--depth" => parsed.depth = Some(value(&flag, &mut args)?),
            "--samples" => parsed.samples = Some(value(&flag, &mut args)?),
            "--calibration" => parsed.calibration = Some(value(&flag, &mut args)?),
            "--output" => parsed.output = Some(value(&flag, &mut args)?),
            "--max-batches" => parsed.max_batches = Some(value(&flag, &mut args)?),
            "--help" | "-h" => parsed.help = true,
            other => return Err(SimError::invalid(format!("unknown argument: {other}"))),
        }
    }
    Ok(parsed)
}

/// Fold parsed options into a config. Calibration is loaded first so that
/// explicit flags win over it.
fn build_config(args: Args) -> Result<SimulationConfig> {
    let mut config = SimulationConfig::new();

    if let Some(path) = &args.calibration {
        let calibration = Calibration::load(path)?;
        config.combat = calibration.combat;
        config.policy = calibration.policy;
    }
    if let Some(style) = args.style {
        config.policy = PolicyConfig {
            heuristic: config.policy.heuristic.with_style(style),
            lookahead: PolicyConfig::for_style(style).lookahead,
        };
    }
    if let Some(depth) = args.depth {
        config.policy = config.policy.with_depth(depth);
    }
    if let Some(samples) = args.samples {
        config.policy = config.policy.with_samples(samples);
    }
    if let Some(turns) = args.max_turns {
        config.combat = config.combat.with_max_turns(turns);
    }

    if let Some(seed) = args.seed {
        config.root_seed = seed;
    }
    if let Some(runs) = args.runs {
        config.total_runs = runs;
    }
    if let Some(size) = args.batch_size {
        config.batch_size = size;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(characters) = args.characters {
        config.characters = characters;
    }
    if let Some(relic) = args.relic {
        config.relic = relic;
    }
    config.extra_cards.extend(args.extra_cards);
    config.enemy_hp = args.enemy_hp.or(config.enemy_hp);
    if let Some(encounter) = args.encounter {
        config.encounter = encounter;
    }
    config.paired |= args.paired;
    config.batch_limit = args.max_batches.or(config.batch_limit);
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SPIRE_SIM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!(
        "Monte Carlo combat simulator\n\
         \n\
         Usage: simulate [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --seed N             Root seed (default: 42)\n\
         \x20 --runs N             Runs per character (default: 1000)\n\
         \x20 --batch-size N       Runs per batch (default: 250)\n\
         \x20 --workers N          Worker threads (default: all cores)\n\
         \x20 --characters a,b     ironclad, silent, defect, watcher (default: all)\n\
         \x20 --relic LABEL        Starting relic (default: none)\n\
         \x20 --add-card NAME      Add a card to the starter deck; repeatable\n\
         \x20 --enemy-hp N         Override enemy starting HP\n\
         \x20 --encounter E        table, burst, debuffer, scaling, boss, mixed (default: table)\n\
         \x20 --paired             Seed runs like the unmodified deck for paired comparison\n\
         \x20 --max-turns N        Turn ceiling (default: 50)\n\
         \x20 --style S            greedy, defensive, balanced, scaling (default: balanced)\n\
         \x20 --depth N            Lookahead depth; 0 disables lookahead\n\
         \x20 --samples N          Lookahead samples per candidate\n\
         \x20 --calibration FILE   JSON with combat and policy constants\n\
         \x20 --output DIR         Output directory (default: simulation_output)\n\
         \x20 --max-batches N      Stop after N batches; rerun to resume\n\
         \x20 -h, --help           Show this help"
    );
}

fn run(args: Args) -> Result<bool> {
    let config = build_config(args)?;
    let registry = CardRegistry::builtin();
    let orchestrator = Orchestrator::new(config, &registry)?;
    let report = orchestrator.run()?;

    for summary in &report.summaries {
        println!("{summary}");
    }
    for character in &report.incomplete {
        println!("{:<9} incomplete; rerun with the same options to resume", character.label());
    }
    Ok(report.batches_failed == 0)
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            return ExitCode::from(2);
        }
    };
    if args.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    init_tracing();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
