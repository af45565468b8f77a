//! Player, enemy and intent data.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::DebuffKind;
use crate::effects::{OrbKind, Stance};
use crate::relics::Relic;

/// Ongoing effects granted by powers and cards, shared by all characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powers {
    /// Strength gained at each turn start.
    pub strength_per_turn: i64,
    /// Poison applied to the enemy at each turn start.
    pub poison_per_turn: i64,
    /// Block survives the turn-start reset.
    pub retain_block: bool,
    /// Extra draw on the next turn only.
    pub draw_next_turn: usize,
    /// Extra energy on the next turn only.
    pub energy_next_turn: i64,
}

/// A channeled orb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orb {
    pub kind: OrbKind,
    /// Accumulated evoke damage; only Dark orbs grow it.
    pub charge: i64,
}

impl Orb {
    #[must_use]
    pub const fn new(kind: OrbKind) -> Self {
        Self {
            kind,
            charge: kind.base_evoke(),
        }
    }
}

/// Focus/Orb extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbState {
    /// Oldest orb first.
    pub orbs: SmallVec<[Orb; 5]>,
    pub slots: usize,
    pub focus: i64,
    /// Extra passive triggers per end of turn.
    pub loops: u32,
}

impl OrbState {
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self {
            orbs: SmallVec::new(),
            slots,
            focus: 0,
            loops: 0,
        }
    }

    fn focused(&self, kind: OrbKind, base: i64) -> i64 {
        if kind.uses_focus() {
            (base + self.focus).max(0)
        } else {
            base
        }
    }

    /// Passive magnitude of an orb under current Focus.
    #[must_use]
    pub fn passive_value(&self, orb: &Orb) -> i64 {
        self.focused(orb.kind, orb.kind.base_passive())
    }

    /// Evoke magnitude of an orb under current Focus.
    #[must_use]
    pub fn evoke_value(&self, orb: &Orb) -> i64 {
        match orb.kind {
            OrbKind::Dark => orb.charge.max(0),
            kind => self.focused(kind, kind.base_evoke()),
        }
    }

    /// Add an orb. When every slot is full the oldest orb is pushed out and
    /// returned for evoking. With zero slots nothing happens.
    pub fn channel(&mut self, kind: OrbKind) -> Option<Orb> {
        if self.slots == 0 {
            return None;
        }
        let evicted = if self.orbs.len() >= self.slots {
            Some(self.orbs.remove(0))
        } else {
            None
        };
        self.orbs.push(Orb::new(kind));
        evicted
    }

    /// Change slot count. Orbs beyond the new capacity are dropped, newest
    /// first, without evoking.
    pub fn adjust_slots(&mut self, delta: i64) {
        let slots = (self.slots as i64 + delta).max(0);
        self.slots = usize::try_from(slots).unwrap_or(0);
        self.orbs.truncate(self.slots);
    }

    /// Number of distinct orb types held.
    #[must_use]
    pub fn distinct_kinds(&self) -> usize {
        let mut kinds: SmallVec<[OrbKind; 4]> = SmallVec::new();
        for orb in &self.orbs {
            if !kinds.contains(&orb.kind) {
                kinds.push(orb.kind);
            }
        }
        kinds.len()
    }
}

/// Stance/Mantra extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceState {
    pub stance: Stance,
    pub mantra: i64,
    /// Block gained on every stance change.
    pub change_block: i64,
}

/// Character-specific resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extension {
    #[default]
    None,
    Orbs(OrbState),
    Stance(StanceState),
}

impl Extension {
    #[must_use]
    pub fn orbs(&self) -> Option<&OrbState> {
        match self {
            Extension::Orbs(state) => Some(state),
            _ => None,
        }
    }

    pub fn orbs_mut(&mut self) -> Option<&mut OrbState> {
        match self {
            Extension::Orbs(state) => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub fn stance(&self) -> Stance {
        match self {
            Extension::Stance(state) => state.stance,
            _ => Stance::Neutral,
        }
    }

    #[must_use]
    pub fn stance_state(&self) -> Option<&StanceState> {
        match self {
            Extension::Stance(state) => Some(state),
            _ => None,
        }
    }

    pub fn stance_mut(&mut self) -> Option<&mut StanceState> {
        match self {
            Extension::Stance(state) => Some(state),
            _ => None,
        }
    }
}

/// The player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub hp: i64,
    pub max_hp: i64,
    pub block: i64,
    pub energy: i64,
    pub max_energy: i64,
    pub strength: i64,
    pub dexterity: i64,
    pub artifact: i64,
    pub poison: i64,
    /// Turns of Weak; the player's attacks deal ×0.75.
    pub weak: i64,
    /// Turns of Vulnerable; attacks on the player deal ×1.5.
    pub vulnerable: i64,
    pub relics: SmallVec<[Relic; 2]>,
    pub powers: Powers,
    pub ext: Extension,
}

impl PlayerState {
    /// Fresh player at full HP.
    #[must_use]
    pub fn new(max_hp: i64, max_energy: i64, ext: Extension) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            energy: max_energy,
            max_energy,
            strength: 0,
            dexterity: 0,
            artifact: 0,
            poison: 0,
            weak: 0,
            vulnerable: 0,
            relics: SmallVec::new(),
            powers: Powers::default(),
            ext,
        }
    }

    /// Add a relic.
    #[must_use]
    pub fn with_relic(mut self, relic: Relic) -> Self {
        self.relics.push(relic);
        self
    }

    /// HP as a fraction of max HP.
    #[must_use]
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }
}

/// The enemy's declared next action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Attack for this much before Strength.
    Attack(i64),
    /// Attack `hits` times; Strength and Weak apply to every hit.
    MultiAttack { damage: i64, hits: u32 },
    /// Gain block.
    Defend(i64),
    /// Gain Strength.
    Buff(i64),
    /// Debuff the player.
    Debuff { kind: DebuffKind, amount: i64 },
    #[default]
    Unknown,
}

/// The single enemy of an encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    pub hp: i64,
    pub max_hp: i64,
    pub block: i64,
    pub strength: i64,
    pub poison: i64,
    pub vulnerable: i64,
    pub weak: i64,
    pub artifact: i64,
    pub intent: Intent,
}

impl EnemyState {
    #[must_use]
    pub fn new(hp: i64) -> Self {
        Self {
            hp,
            max_hp: hp,
            block: 0,
            strength: 0,
            poison: 0,
            vulnerable: 0,
            weak: 0,
            artifact: 0,
            intent: Intent::Unknown,
        }
    }

    /// Start with Artifact charges.
    #[must_use]
    pub fn with_artifact(mut self, artifact: i64) -> Self {
        self.artifact = artifact;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_evicts_oldest() {
        let mut orbs = OrbState::new(2);
        assert!(orbs.channel(OrbKind::Lightning).is_none());
        assert!(orbs.channel(OrbKind::Frost).is_none());

        let evicted = orbs.channel(OrbKind::Dark);

        assert_eq!(evicted.map(|o| o.kind), Some(OrbKind::Lightning));
        let kinds: Vec<_> = orbs.orbs.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OrbKind::Frost, OrbKind::Dark]);
    }

    #[test]
    fn test_channel_with_no_slots() {
        let mut orbs = OrbState::new(0);
        assert!(orbs.channel(OrbKind::Lightning).is_none());
        assert!(orbs.orbs.is_empty());
    }

    #[test]
    fn test_focus_offsets_and_clamps() {
        let mut orbs = OrbState::new(3);
        let lightning = Orb::new(OrbKind::Lightning);
        let plasma = Orb::new(OrbKind::Plasma);

        orbs.focus = 2;
        assert_eq!(orbs.passive_value(&lightning), 5);
        assert_eq!(orbs.evoke_value(&lightning), 10);
        assert_eq!(orbs.passive_value(&plasma), 1);

        orbs.focus = -5;
        assert_eq!(orbs.passive_value(&lightning), 0);
        assert_eq!(orbs.evoke_value(&lightning), 3);
    }

    #[test]
    fn test_dark_evokes_charge() {
        let orbs = OrbState::new(3);
        let mut dark = Orb::new(OrbKind::Dark);
        dark.charge += 12;
        assert_eq!(orbs.evoke_value(&dark), 18);
    }

    #[test]
    fn test_adjust_slots_drops_newest() {
        let mut orbs = OrbState::new(3);
        orbs.channel(OrbKind::Lightning);
        orbs.channel(OrbKind::Frost);
        orbs.channel(OrbKind::Dark);

        orbs.adjust_slots(-1);

        assert_eq!(orbs.slots, 2);
        assert_eq!(orbs.orbs.len(), 2);
        assert_eq!(orbs.orbs[1].kind, OrbKind::Frost);
        assert_eq!(orbs.distinct_kinds(), 2);
    }

    #[test]
    fn test_extension_accessors() {
        let ext = Extension::Stance(StanceState {
            stance: Stance::Wrath,
            ..StanceState::default()
        });
        assert_eq!(ext.stance(), Stance::Wrath);
        assert!(ext.orbs().is_none());
        assert_eq!(Extension::None.stance(), Stance::Neutral);
    }
}
