//! Card definitions: immutable card templates.
//!
//! A `Card` is copied by value every time it moves between piles. Piles are
//! persistent vectors, so cloning a whole combat for a lookahead sample only
//! copies the cards that later change position.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::Effect;

/// Card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Attack,
    Skill,
    Power,
    Status,
    Curse,
}

impl CardCategory {
    /// Status and curse cards cannot be played.
    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, CardCategory::Status | CardCategory::Curse)
    }
}

/// Energy cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cost {
    Fixed(i64),
    /// Spends all remaining energy; effects repeat once per energy spent.
    X,
}

impl Cost {
    /// Energy this cost would take given `energy` available.
    #[must_use]
    pub const fn to_pay(self, energy: i64) -> i64 {
        match self {
            Cost::Fixed(cost) => cost,
            Cost::X => energy,
        }
    }
}

/// Static card template.
///
/// ## Example
///
/// ```
/// use spire_sim::cards::{Card, CardCategory, Cost};
/// use spire_sim::effects::Effect;
///
/// let bash = Card::new("Bash", Cost::Fixed(2), CardCategory::Attack)
///     .with_effect(Effect::damage(8))
///     .with_effect(Effect::Vulnerable(2));
///
/// assert!(bash.is_attack());
/// assert!(bash.can_play(2));
/// assert!(!bash.can_play(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub cost: Cost,
    pub category: CardCategory,
    pub effects: SmallVec<[Effect; 3]>,

    /// Goes to the exhaust pile when played.
    #[serde(default)]
    pub exhaust: bool,

    /// Exhausts if still in hand at end of turn.
    #[serde(default)]
    pub ethereal: bool,

    /// Starts the combat on top of the draw pile.
    #[serde(default)]
    pub innate: bool,
}

impl Card {
    /// Create a card with no effects.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: Cost, category: CardCategory) -> Self {
        Self {
            name: name.into(),
            cost,
            category,
            effects: SmallVec::new(),
            exhaust: false,
            ethereal: false,
            innate: false,
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Mark as exhaust-on-play.
    #[must_use]
    pub fn exhausting(mut self) -> Self {
        self.exhaust = true;
        self
    }

    /// Mark as ethereal.
    #[must_use]
    pub fn ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }

    /// Mark as innate.
    #[must_use]
    pub fn innate(mut self) -> Self {
        self.innate = true;
        self
    }

    /// Whether the card can be played with `energy` available.
    #[must_use]
    pub fn can_play(&self, energy: i64) -> bool {
        self.category.is_playable() && self.cost.to_pay(energy) <= energy
    }

    /// Whether this card deals attack damage.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        self.category == CardCategory::Attack
    }

    /// Whether playing this removes it from the deck for the combat.
    #[must_use]
    pub fn exhausts_on_play(&self) -> bool {
        self.exhaust || self.category == CardCategory::Power
    }
}
