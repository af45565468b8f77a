//! Scripted single-enemy encounters.
//!
//! Each encounter is a fixed enemy whose intent is a pure function of the
//! turn number and its own HP. They give a calibration surface that does
//! not depend on the per-character intent tables.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::combat::{EnemyState, Intent};
use crate::core::{DebuffKind, GameRng};
use crate::error::{Result, SimError};

/// A scripted enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encounter {
    /// Marauder: heavy single hits and a double strike.
    Burst,
    /// Hexcaster: Weak, then Vulnerable, then attacks into them.
    Debuffer,
    /// Warlord: gains Strength every third turn.
    Scaling,
    /// Corrupted Champion: enrages below half HP.
    Boss,
}

impl Encounter {
    pub const ALL: [Encounter; 4] = [
        Encounter::Burst,
        Encounter::Debuffer,
        Encounter::Scaling,
        Encounter::Boss,
    ];

    /// Label used on the command line and in seed derivation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Encounter::Burst => "burst",
            Encounter::Debuffer => "debuffer",
            Encounter::Scaling => "scaling",
            Encounter::Boss => "boss",
        }
    }

    #[must_use]
    pub const fn enemy_name(self) -> &'static str {
        match self {
            Encounter::Burst => "Marauder",
            Encounter::Debuffer => "Hexcaster",
            Encounter::Scaling => "Warlord",
            Encounter::Boss => "Corrupted Champion",
        }
    }

    /// Enemy HP is drawn uniformly from this range.
    #[must_use]
    pub const fn hp_range(self) -> Range<i64> {
        match self {
            Encounter::Burst => 55..66,
            Encounter::Debuffer => 60..71,
            Encounter::Scaling => 80..91,
            Encounter::Boss => 140..151,
        }
    }

    /// Relative weight in a mixed selection.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Encounter::Boss => 1.5,
            _ => 1.0,
        }
    }

    /// Draw one encounter by weight.
    pub fn pick(rng: &mut GameRng) -> Self {
        let weights = Self::ALL.map(Encounter::weight);
        rng.choose_weighted(&weights)
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(Encounter::Burst)
    }

    /// The intent declared at the start of `turn`.
    #[must_use]
    pub fn intent(self, turn: u32, enemy: &EnemyState) -> Intent {
        match self {
            Encounter::Burst => match turn % 3 {
                1 => Intent::Attack(12),
                2 => Intent::Attack(20),
                _ => Intent::MultiAttack { damage: 8, hits: 2 },
            },
            Encounter::Debuffer => match turn % 4 {
                1 => Intent::Debuff {
                    kind: DebuffKind::Weak,
                    amount: 2,
                },
                2 => Intent::Debuff {
                    kind: DebuffKind::Vulnerable,
                    amount: 2,
                },
                3 => Intent::Attack(15),
                _ => Intent::Attack(10),
            },
            Encounter::Scaling => {
                if turn == 1 || turn % 3 == 0 {
                    Intent::Buff(2)
                } else {
                    Intent::Attack(10)
                }
            }
            Encounter::Boss => {
                // Above half HP: phase one
                if enemy.hp * 2 > enemy.max_hp {
                    if turn % 2 == 1 {
                        Intent::Attack(14)
                    } else {
                        Intent::MultiAttack { damage: 5, hits: 3 }
                    }
                } else {
                    match turn % 3 {
                        0 => Intent::Buff(3),
                        1 => Intent::Attack(20),
                        _ => Intent::MultiAttack { damage: 7, hits: 3 },
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which enemy a combat is fought against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterChoice {
    /// The character's own intent table.
    #[default]
    Table,
    /// Always the same scripted enemy.
    Fixed(Encounter),
    /// A scripted enemy drawn by weight for every run.
    Mixed,
}

impl EncounterChoice {
    /// Look up a choice by label: `table`, `mixed`, or an encounter label.
    pub fn parse(label: &str) -> Result<Self> {
        let lower = label.trim().to_ascii_lowercase();
        match lower.as_str() {
            "" | "table" => Ok(Self::Table),
            "mixed" => Ok(Self::Mixed),
            _ => Encounter::ALL
                .into_iter()
                .find(|e| e.label() == lower)
                .map(Self::Fixed)
                .ok_or_else(|| SimError::UnknownEncounter(label.to_string())),
        }
    }

    /// Seed-derivation suffix. The table choice adds nothing.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Table => None,
            Self::Fixed(encounter) => Some(encounter.label()),
            Self::Mixed => Some("mixed"),
        }
    }

    /// Resolve to a concrete encounter, drawing from `rng` when mixed.
    pub fn resolve(self, rng: &mut GameRng) -> Option<Encounter> {
        match self {
            Self::Table => None,
            Self::Fixed(encounter) => Some(encounter),
            Self::Mixed => Some(Encounter::pick(rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(encounter: Encounter, turns: u32) -> Vec<Intent> {
        let enemy = EnemyState::new(encounter.hp_range().end - 1);
        (1..=turns).map(|turn| encounter.intent(turn, &enemy)).collect()
    }

    #[test]
    fn test_burst_cycle() {
        assert_eq!(
            script(Encounter::Burst, 4),
            vec![
                Intent::Attack(12),
                Intent::Attack(20),
                Intent::MultiAttack { damage: 8, hits: 2 },
                Intent::Attack(12),
            ]
        );
    }

    #[test]
    fn test_debuffer_debuffs_first() {
        let intents = script(Encounter::Debuffer, 5);
        assert_eq!(
            intents[0],
            Intent::Debuff {
                kind: DebuffKind::Weak,
                amount: 2
            }
        );
        assert_eq!(
            intents[1],
            Intent::Debuff {
                kind: DebuffKind::Vulnerable,
                amount: 2
            }
        );
        assert_eq!(&intents[2..], &[Intent::Attack(15), Intent::Attack(10), intents[0]]);
    }

    #[test]
    fn test_scaling_buffs_on_schedule() {
        let buffs: Vec<u32> = (1..=9)
            .filter(|&turn| Encounter::Scaling.intent(turn, &EnemyState::new(85)) == Intent::Buff(2))
            .collect();
        assert_eq!(buffs, vec![1, 3, 6, 9]);
    }

    #[test]
    fn test_boss_enrages_at_half_hp() {
        let mut boss = EnemyState::new(140);
        assert_eq!(Encounter::Boss.intent(1, &boss), Intent::Attack(14));
        assert_eq!(Encounter::Boss.intent(2, &boss), Intent::MultiAttack { damage: 5, hits: 3 });

        boss.hp = 71;
        assert_eq!(Encounter::Boss.intent(3, &boss), Intent::Attack(14));

        boss.hp = 70;
        assert_eq!(Encounter::Boss.intent(3, &boss), Intent::Buff(3));
        assert_eq!(Encounter::Boss.intent(4, &boss), Intent::Attack(20));
        assert_eq!(Encounter::Boss.intent(5, &boss), Intent::MultiAttack { damage: 7, hits: 3 });
    }

    #[test]
    fn test_weighted_pick() {
        let mut rng = GameRng::new(21);
        let mut counts = [0u32; 4];
        for _ in 0..9_000 {
            let picked = Encounter::pick(&mut rng);
            let index = Encounter::ALL.iter().position(|&e| e == picked).unwrap();
            counts[index] += 1;
        }
        // Boss weight 1.5 of 4.5 total
        assert!((2700..3300).contains(&counts[3]), "boss {}", counts[3]);
        for count in &counts[..3] {
            assert!((1700..2300).contains(count), "other {count}");
        }
    }

    #[test]
    fn test_choice_parse_and_label() {
        assert_eq!(EncounterChoice::parse("table").unwrap(), EncounterChoice::Table);
        assert_eq!(EncounterChoice::parse("Boss").unwrap(), EncounterChoice::Fixed(Encounter::Boss));
        assert_eq!(EncounterChoice::parse("mixed").unwrap(), EncounterChoice::Mixed);
        assert!(matches!(
            EncounterChoice::parse("multi_enemy"),
            Err(SimError::UnknownEncounter(_))
        ));

        assert_eq!(EncounterChoice::Table.label(), None);
        assert_eq!(EncounterChoice::Fixed(Encounter::Debuffer).label(), Some("debuffer"));
        assert_eq!(EncounterChoice::Table.resolve(&mut GameRng::new(0)), None);
    }
}
