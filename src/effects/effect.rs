//! Effect definitions.
//!
//! Every card is a list of [`Effect`]s. The set is closed: the resolver
//! and the heuristic both match on it exhaustively, so adding a variant
//! forces both sides to decide what it means.

use serde::{Deserialize, Serialize};

/// Orb types for the Focus/Orb archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbKind {
    Lightning,
    Frost,
    Dark,
    Plasma,
}

impl OrbKind {
    /// Base passive value before Focus.
    #[must_use]
    pub const fn base_passive(self) -> i64 {
        match self {
            OrbKind::Lightning => 3,
            OrbKind::Frost => 2,
            OrbKind::Dark => 6,
            OrbKind::Plasma => 1,
        }
    }

    /// Base evoke value before Focus. Dark evokes for its stored charge.
    #[must_use]
    pub const fn base_evoke(self) -> i64 {
        match self {
            OrbKind::Lightning => 8,
            OrbKind::Frost => 5,
            OrbKind::Dark => 6,
            OrbKind::Plasma => 2,
        }
    }

    /// Whether Focus modifies this orb.
    #[must_use]
    pub const fn uses_focus(self) -> bool {
        !matches!(self, OrbKind::Plasma)
    }
}

/// Stances for the Stance/Mantra archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    #[default]
    Neutral,
    Wrath,
    Calm,
    Divinity,
}

impl Stance {
    /// Multiplier on outgoing attack damage.
    #[must_use]
    pub const fn outgoing(self) -> i64 {
        match self {
            Stance::Wrath => 2,
            Stance::Divinity => 3,
            Stance::Neutral | Stance::Calm => 1,
        }
    }

    /// Multiplier on incoming attack damage.
    #[must_use]
    pub const fn incoming(self) -> i64 {
        match self {
            Stance::Wrath => 2,
            _ => 1,
        }
    }
}

/// An atomic combat effect.
///
/// ## Offense
/// `Damage`, `HeavyDamage`, `Vulnerable`, `Weak`, `Poison`, `MultiplyPoison`
///
/// ## Defense
/// `Block`, `RetainBlock`
///
/// ## Scaling
/// `Strength`, `DoubleStrength`, `Dexterity`, `StrengthPerTurn`, `PoisonPerTurn`
///
/// ## Resources
/// `Draw`, `DrawNextTurn`, `Energy`, `LoseHp`, `Heal`, `Discard`, `AddToHand`
///
/// ## Orbs
/// `Channel`, `Evoke`, `Focus`, `OrbSlots`, `Loop`, `DrawPerOrbType`
///
/// ## Stances
/// `EnterStance`, `Mantra`, `StanceChangeBlock`, `EndTurn`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    // === Offense ===

    /// Attack for `amount` + Strength, `hits` times. X-cost cards repeat
    /// the whole thing once per energy spent.
    Damage { amount: i64, hits: u32 },

    /// Attack for `amount` + Strength × `strength_multiplier`.
    HeavyDamage { amount: i64, strength_multiplier: i64 },

    /// Apply Vulnerable to the enemy.
    Vulnerable(i64),

    /// Apply Weak to the enemy.
    Weak(i64),

    /// Apply `amount` Poison, as `hits` separate applications.
    Poison { amount: i64, hits: u32 },

    /// Multiply the enemy's current Poison.
    MultiplyPoison(i64),

    // === Defense ===

    /// Gain `amount` + Dexterity block.
    Block(i64),

    /// Block no longer resets at turn start.
    RetainBlock,

    // === Scaling ===

    Strength(i64),

    DoubleStrength,

    Dexterity(i64),

    /// Gain Strength at the start of every later turn.
    StrengthPerTurn(i64),

    /// Poison the enemy at the start of every later turn.
    PoisonPerTurn(i64),

    // === Resources ===

    Draw(usize),

    /// Extra cards on the next turn's draw.
    DrawNextTurn(usize),

    Energy(i64),

    /// Lose HP directly, ignoring block.
    LoseHp(i64),

    /// Discard cards from hand.
    Discard(usize),

    /// Heal, capped at max HP.
    Heal(i64),

    /// Create copies of a named card in hand. Overflow goes to discard.
    AddToHand { card: String, count: usize },

    // === Orbs ===

    Channel { orb: OrbKind, count: u32 },

    /// Evoke the oldest orb `times` times, then remove it.
    Evoke { times: u32 },

    Focus(i64),

    /// Gain (or lose, if negative) orb slots.
    OrbSlots(i64),

    /// One more passive trigger per orb each turn.
    Loop,

    /// Draw one card per distinct orb type held.
    DrawPerOrbType,

    // === Stances ===

    EnterStance(Stance),

    Mantra(i64),

    /// Gain block whenever the stance changes.
    StanceChangeBlock(i64),

    /// End the turn immediately after this card.
    EndTurn,
}

impl Effect {
    /// Plain single-hit attack.
    #[must_use]
    pub const fn damage(amount: i64) -> Self {
        Effect::Damage { amount, hits: 1 }
    }

    /// Single-application poison.
    #[must_use]
    pub const fn poison(amount: i64) -> Self {
        Effect::Poison { amount, hits: 1 }
    }

    /// Channel one orb.
    #[must_use]
    pub const fn channel(orb: OrbKind) -> Self {
        Effect::Channel { orb, count: 1 }
    }

    /// Whether this effect deals attack damage.
    #[must_use]
    pub const fn is_attack(&self) -> bool {
        matches!(self, Effect::Damage { .. } | Effect::HeavyDamage { .. })
    }
}
