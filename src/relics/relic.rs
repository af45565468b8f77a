//! Relics and the points in a combat where they fire.
//!
//! A relic never touches combat state itself. At each timing it hands back
//! plain [`Effect`]s which the resolver runs exactly like card effects.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::effects::{Effect, OrbKind};
use crate::error::{Result, SimError};

/// When a relic hook fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelicTiming {
    /// Once, after the opening hand is set up and before turn 1.
    CombatStart,
    /// After the turn-start draw of the given turn.
    TurnStart(u32),
    /// Once, when the enemy dies.
    CombatWon,
}

/// A relic the player may start the combat with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relic {
    BurningBlood,
    RingOfTheSnake,
    CrackedCore,
    PureWater,
    Anchor,
    BagOfMarbles,
    Vajra,
    OddlySmoothStone,
    Lantern,
    HornCleat,
}

impl Relic {
    pub const ALL: [Relic; 10] = [
        Relic::BurningBlood,
        Relic::RingOfTheSnake,
        Relic::CrackedCore,
        Relic::PureWater,
        Relic::Anchor,
        Relic::BagOfMarbles,
        Relic::Vajra,
        Relic::OddlySmoothStone,
        Relic::Lantern,
        Relic::HornCleat,
    ];

    /// Label used on the command line and in seed derivation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Relic::BurningBlood => "burning_blood",
            Relic::RingOfTheSnake => "ring_of_the_snake",
            Relic::CrackedCore => "cracked_core",
            Relic::PureWater => "pure_water",
            Relic::Anchor => "anchor",
            Relic::BagOfMarbles => "bag_of_marbles",
            Relic::Vajra => "vajra",
            Relic::OddlySmoothStone => "oddly_smooth_stone",
            Relic::Lantern => "lantern",
            Relic::HornCleat => "horn_cleat",
        }
    }

    /// Look up a relic by label. `none` (or an empty label) means no relic.
    pub fn parse(label: &str) -> Result<Option<Self>> {
        let lower = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        if lower.is_empty() || lower == "none" {
            return Ok(None);
        }
        Self::ALL
            .into_iter()
            .find(|r| r.label() == lower)
            .map(Some)
            .ok_or_else(|| SimError::UnknownRelic(label.to_string()))
    }

    /// Effects this relic produces at `timing`, if any.
    #[must_use]
    pub fn effects_at(self, timing: RelicTiming) -> SmallVec<[Effect; 2]> {
        match (self, timing) {
            (Relic::BurningBlood, RelicTiming::CombatWon) => smallvec![Effect::Heal(6)],
            (Relic::RingOfTheSnake, RelicTiming::TurnStart(1)) => smallvec![Effect::Draw(2)],
            (Relic::CrackedCore, RelicTiming::CombatStart) => {
                smallvec![Effect::channel(OrbKind::Lightning)]
            }
            (Relic::PureWater, RelicTiming::CombatStart) => smallvec![Effect::AddToHand {
                card: "Miracle".to_string(),
                count: 1,
            }],
            (Relic::Anchor, RelicTiming::TurnStart(1)) => smallvec![Effect::Block(10)],
            (Relic::BagOfMarbles, RelicTiming::CombatStart) => smallvec![Effect::Vulnerable(1)],
            (Relic::Vajra, RelicTiming::CombatStart) => smallvec![Effect::Strength(1)],
            (Relic::OddlySmoothStone, RelicTiming::CombatStart) => smallvec![Effect::Dexterity(1)],
            (Relic::Lantern, RelicTiming::TurnStart(1)) => smallvec![Effect::Energy(1)],
            (Relic::HornCleat, RelicTiming::TurnStart(2)) => smallvec![Effect::Block(14)],
            _ => SmallVec::new(),
        }
    }
}

impl std::fmt::Display for Relic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Relic::parse("none").unwrap(), None);
        assert_eq!(Relic::parse("").unwrap(), None);
        assert_eq!(Relic::parse("Vajra").unwrap(), Some(Relic::Vajra));
        assert_eq!(
            Relic::parse("Ring of the Snake").unwrap(),
            Some(Relic::RingOfTheSnake)
        );
        assert!(matches!(Relic::parse("wand"), Err(SimError::UnknownRelic(_))));
    }

    #[test]
    fn test_labels_round_trip() {
        for relic in Relic::ALL {
            assert_eq!(Relic::parse(relic.label()).unwrap(), Some(relic));
        }
    }

    #[test]
    fn test_timings() {
        assert_eq!(
            Relic::RingOfTheSnake.effects_at(RelicTiming::TurnStart(1)).as_slice(),
            &[Effect::Draw(2)]
        );
        assert!(Relic::RingOfTheSnake.effects_at(RelicTiming::TurnStart(2)).is_empty());
        assert!(Relic::HornCleat.effects_at(RelicTiming::TurnStart(1)).is_empty());
        assert_eq!(
            Relic::BurningBlood.effects_at(RelicTiming::CombatWon).as_slice(),
            &[Effect::Heal(6)]
        );
        assert!(Relic::BurningBlood.effects_at(RelicTiming::CombatStart).is_empty());
    }
}
