//! Win-rate statistics over a merged dataset.
//!
//! Only the primitives reporting tools need: a Wilson score interval, the
//! cumulative win-rate series with a convergence test over its tail, and a
//! run-by-run comparison of two datasets drawn from the same streams.

use serde::{Deserialize, Serialize};

use super::store::RunRecord;
use crate::core::Character;
use crate::error::{Result, SimError};

/// z for a two-sided 95% interval.
pub const DEFAULT_Z: f64 = 1.96;

const CONVERGENCE_WINDOW: usize = 10;
const CONVERGENCE_POINTS: usize = 100;

/// Wilson score interval for `wins` out of `n`.
#[must_use]
pub fn wilson_interval(wins: u64, n: u64, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let all_won = wins >= n;
    let n = n as f64;
    let p = wins as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    let low = if wins == 0 { 0.0 } else { (center - margin).max(0.0) };
    let high = if all_won { 1.0 } else { (center + margin).min(1.0) };
    (low, high)
}

/// Cumulative win rate after `runs` runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub runs: u64,
    pub win_rate: f64,
}

/// Cumulative win rate every `step` runs, plus the final point.
#[must_use]
pub fn convergence_series(records: &[RunRecord], step: usize) -> Vec<ConvergencePoint> {
    let step = step.max(1);
    let mut series = Vec::with_capacity(records.len() / step + 1);
    let mut wins = 0u64;
    for (i, record) in records.iter().enumerate() {
        if record.result.win {
            wins += 1;
        }
        let runs = i + 1;
        if runs % step == 0 || runs == records.len() {
            series.push(ConvergencePoint {
                runs: runs as u64,
                win_rate: wins as f64 / runs as f64,
            });
        }
    }
    series
}

/// Whether the last `window` points of the series have settled.
///
/// The standard deviation of their win rates must be under 0.01, relaxed
/// to 0.02 once at least 10 000 runs are in.
#[must_use]
pub fn is_converged(series: &[ConvergencePoint], window: usize) -> bool {
    if window == 0 || series.len() < window {
        return false;
    }
    let tail = &series[series.len() - window..];
    let mean = tail.iter().map(|p| p.win_rate).sum::<f64>() / window as f64;
    let variance = tail.iter().map(|p| (p.win_rate - mean).powi(2)).sum::<f64>() / window as f64;
    let limit = match tail.last() {
        Some(last) if last.runs >= 10_000 => 0.02,
        _ => 0.01,
    };
    variance.sqrt() < limit
}

/// Aggregate view of one character's merged dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub character: Character,
    pub runs: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub mean_turns: f64,
    pub mean_damage_taken: f64,
    pub mean_final_hp_on_win: f64,
    pub convergence: Vec<ConvergencePoint>,
    pub converged: bool,
}

impl Summary {
    #[must_use]
    pub fn from_records(character: Character, records: &[RunRecord]) -> Self {
        let runs = records.len() as u64;
        let wins = records.iter().filter(|r| r.result.win).count() as u64;
        let (ci_low, ci_high) = wilson_interval(wins, runs, DEFAULT_Z);

        let mean = |total: f64, count: u64| if count == 0 { 0.0 } else { total / count as f64 };
        let turns: f64 = records.iter().map(|r| f64::from(r.result.turns)).sum();
        let damage: f64 = records.iter().map(|r| r.result.damage_taken as f64).sum();
        let hp_on_win: f64 = records
            .iter()
            .filter(|r| r.result.win)
            .map(|r| r.result.final_hp as f64)
            .sum();

        let step = (records.len() / CONVERGENCE_POINTS).max(1);
        let convergence = convergence_series(records, step);
        let converged = is_converged(&convergence, CONVERGENCE_WINDOW);

        Self {
            character,
            runs,
            wins,
            win_rate: mean(wins as f64, runs),
            ci_low,
            ci_high,
            mean_turns: mean(turns, runs),
            mean_damage_taken: mean(damage, runs),
            mean_final_hp_on_win: mean(hp_on_win, wins),
            convergence,
            converged,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<9} runs={} win_rate={:.1}% ci=[{:.1}%, {:.1}%] turns={:.1} damage_taken={:.1} hp_on_win={:.1}{}",
            self.character.label(),
            self.runs,
            self.win_rate * 100.0,
            self.ci_low * 100.0,
            self.ci_high * 100.0,
            self.mean_turns,
            self.mean_damage_taken,
            self.mean_final_hp_on_win,
            if self.converged { "" } else { " (not converged)" },
        )
    }
}

/// Per-run differences between a modified dataset and its baseline.
///
/// Both datasets must come from paired batches: same root seed and run
/// indices, so that run `i` of each starts from the same shuffle and
/// enemy rolls. Deltas are `modified - baseline`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairedComparison {
    pub character: Character,
    pub runs: u64,
    /// Runs won only with the modification.
    pub gained: u64,
    /// Runs won only without it.
    pub lost: u64,
    pub win_rate_delta: f64,
    /// Standard error of the win-rate delta over the paired differences.
    pub win_rate_stderr: f64,
    pub mean_damage_delta: f64,
    pub mean_turns_delta: f64,
}

impl PairedComparison {
    /// Pair `baseline` and `modified` run by run.
    pub fn from_records(character: Character, baseline: &[RunRecord], modified: &[RunRecord]) -> Result<Self> {
        if baseline.len() != modified.len() {
            return Err(SimError::invalid(format!(
                "paired datasets differ in length: {} vs {}",
                baseline.len(),
                modified.len()
            )));
        }

        let mut win_deltas = Vec::with_capacity(baseline.len());
        let (mut gained, mut lost) = (0u64, 0u64);
        let (mut damage, mut turns) = (0.0, 0.0);
        for (base, modded) in baseline.iter().zip(modified) {
            if base.run_index != modded.run_index || base.root_seed != modded.root_seed {
                return Err(SimError::invalid(format!(
                    "run {} (seed {}) is not paired with run {} (seed {})",
                    base.run_index, base.root_seed, modded.run_index, modded.root_seed
                )));
            }
            match (base.result.win, modded.result.win) {
                (false, true) => gained += 1,
                (true, false) => lost += 1,
                _ => {}
            }
            win_deltas.push(f64::from(u8::from(modded.result.win)) - f64::from(u8::from(base.result.win)));
            damage += (modded.result.damage_taken - base.result.damage_taken) as f64;
            turns += f64::from(modded.result.turns) - f64::from(base.result.turns);
        }

        let runs = win_deltas.len() as u64;
        let n = win_deltas.len() as f64;
        let mean = |total: f64| if runs == 0 { 0.0 } else { total / n };
        let win_rate_delta = mean(win_deltas.iter().sum());
        let win_rate_stderr = if runs < 2 {
            0.0
        } else {
            let variance = win_deltas.iter().map(|d| (d - win_rate_delta).powi(2)).sum::<f64>() / (n - 1.0);
            (variance / n).sqrt()
        };

        Ok(Self {
            character,
            runs,
            gained,
            lost,
            win_rate_delta,
            win_rate_stderr,
            mean_damage_delta: mean(damage),
            mean_turns_delta: mean(turns),
        })
    }
}

impl std::fmt::Display for PairedComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<9} paired={} win_delta={:+.1}% (se {:.1}%) gained={} lost={} damage_delta={:+.1} turns_delta={:+.1}",
            self.character.label(),
            self.runs,
            self.win_rate_delta * 100.0,
            self.win_rate_stderr * 100.0,
            self.gained,
            self.lost,
            self.mean_damage_delta,
            self.mean_turns_delta,
        )
    }
}
