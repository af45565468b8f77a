//! Full combat state.
//!
//! `Combat` is everything a run mutates: both entities, the piles, the turn
//! counter and the combat's own RNG stream. Cloning it is cheap (piles are
//! persistent vectors), which is what lookahead rollouts rely on.

use serde::{Deserialize, Serialize};

use super::damage::enemy_hit;
use super::entities::{EnemyState, Intent, PlayerState};
use super::result::{CombatResult, Outcome};
use crate::cards::{Card, CardSource};
use crate::core::{Character, GameRng};
use crate::encounters::{Encounter, EncounterChoice};
use crate::error::Result;
use crate::relics::Relic;
use crate::zones::DeckState;

/// Everything needed to start one combat besides the RNG.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatSetup {
    pub character: Character,
    pub relic: Option<Relic>,
    /// `None` uses the character's default encounter HP.
    pub enemy_hp: Option<i64>,
    pub enemy_artifact: i64,
    /// Cards added on top of the starter deck.
    pub extra_cards: Vec<Card>,
    /// Intent-table enemy or a scripted one.
    pub encounter: EncounterChoice,
}

impl CombatSetup {
    /// Starter deck, no relic, default enemy.
    #[must_use]
    pub fn new(character: Character) -> Self {
        Self {
            character,
            relic: None,
            enemy_hp: None,
            enemy_artifact: 0,
            extra_cards: Vec::new(),
            encounter: EncounterChoice::Table,
        }
    }

    /// Resolve a relic label and card names against a card source.
    pub fn resolve(
        character: Character,
        relic_label: &str,
        extra_cards: &[String],
        cards: &dyn CardSource,
    ) -> Result<Self> {
        let mut setup = Self::new(character).with_relic(cards.relic(relic_label)?);
        for name in extra_cards {
            let card = cards
                .card(name)
                .ok_or_else(|| crate::error::SimError::UnknownCard(name.clone()))?;
            setup = setup.with_extra_card(card.clone());
        }
        setup.check(cards)?;
        Ok(setup)
    }

    /// Check that the starter deck and every card the combat can add to the
    /// hand resolve against `cards`.
    pub fn check(&self, cards: &dyn CardSource) -> Result<()> {
        let mut deck = cards.starter_deck(self.character)?;
        deck.extend(self.extra_cards.iter().cloned());
        cards.check_added_cards(&deck, self.relic)
    }

    #[must_use]
    pub fn with_relic(mut self, relic: Option<Relic>) -> Self {
        self.relic = relic;
        self
    }

    #[must_use]
    pub fn with_enemy_hp(mut self, hp: i64) -> Self {
        self.enemy_hp = Some(hp);
        self
    }

    #[must_use]
    pub fn with_enemy_artifact(mut self, artifact: i64) -> Self {
        self.enemy_artifact = artifact;
        self
    }

    #[must_use]
    pub fn with_extra_card(mut self, card: Card) -> Self {
        self.extra_cards.push(card);
        self
    }

    #[must_use]
    pub fn with_encounter(mut self, encounter: EncounterChoice) -> Self {
        self.encounter = encounter;
        self
    }

    /// Modifier label for seed derivation: relic label, `+Card` per added
    /// card, then `@encounter` for a scripted enemy.
    #[must_use]
    pub fn modifier_label(&self) -> String {
        let mut label = self.relic.map_or("none", Relic::label).to_string();
        for card in &self.extra_cards {
            label.push('+');
            label.push_str(&card.name);
        }
        self.push_encounter(label)
    }

    /// Label of the same setup without relic or added cards. Deriving
    /// from it gives a modified setup the streams of its baseline.
    #[must_use]
    pub fn baseline_label(&self) -> String {
        self.push_encounter("none".to_string())
    }

    fn push_encounter(&self, mut label: String) -> String {
        if let Some(encounter) = self.encounter.label() {
            label.push('@');
            label.push_str(encounter);
        }
        label
    }
}

/// Running counters reported in the final result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub cards_played: u32,
    pub plays_this_turn: u32,
    pub peak_strength: i64,
    pub peak_poison: i64,
    pub peak_orbs: u32,
    pub divinity_entries: u32,
    /// Cards created mid-combat by effects.
    pub cards_added: u32,
}

/// Complete mutable state of one combat.
#[derive(Clone, Debug)]
pub struct Combat {
    pub character: Character,
    pub player: PlayerState,
    pub enemy: EnemyState,
    pub deck: DeckState,
    /// 1-based; 0 before the first turn starts.
    pub turn: u32,
    pub rng: GameRng,
    pub stats: CombatStats,
    /// Set by an end-turn effect; cleared at turn start.
    pub turn_over: bool,
    /// Scripted enemy, or `None` for the character's intent table.
    pub encounter: Option<Encounter>,
    pub(crate) start_hp: i64,
}

impl Combat {
    /// Assemble a combat from already-built parts. Turn-start and relic
    /// hooks have not fired yet.
    #[must_use]
    pub fn assemble(
        character: Character,
        player: PlayerState,
        enemy: EnemyState,
        deck: DeckState,
        rng: GameRng,
    ) -> Self {
        let start_hp = player.hp;
        Self {
            character,
            player,
            enemy,
            deck,
            turn: 0,
            rng,
            stats: CombatStats::default(),
            turn_over: false,
            encounter: None,
            start_hp,
        }
    }

    /// Terminal state, if reached. The player dying takes precedence.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.player.hp <= 0 {
            Some(Outcome::Death)
        } else if self.enemy.hp <= 0 {
            Some(Outcome::Win)
        } else {
            None
        }
    }

    /// Damage the current intent would deal before the player's block,
    /// summed over every hit.
    #[must_use]
    pub fn incoming_damage(&self) -> i64 {
        match self.enemy.intent {
            Intent::Attack(raw) => enemy_hit(raw, &self.enemy, &self.player),
            Intent::MultiAttack { damage, hits } => enemy_hit(damage, &self.enemy, &self.player) * i64::from(hits),
            _ => 0,
        }
    }

    /// Whether the enemy is attacking this turn.
    #[must_use]
    pub fn enemy_attacking(&self) -> bool {
        matches!(self.enemy.intent, Intent::Attack(_) | Intent::MultiAttack { .. })
    }

    /// Update peak metrics from the current state.
    pub fn record_peaks(&mut self) {
        let stats = &mut self.stats;
        stats.peak_strength = stats.peak_strength.max(self.player.strength);
        stats.peak_poison = stats.peak_poison.max(self.enemy.poison);
        if let Some(orbs) = self.player.ext.orbs() {
            stats.peak_orbs = stats.peak_orbs.max(orbs.orbs.len() as u32);
        }
    }

    /// Build the terminal record.
    #[must_use]
    pub fn result(&self, outcome: Outcome) -> CombatResult {
        let final_hp = self.player.hp.max(0);
        CombatResult {
            outcome,
            win: outcome.is_win(),
            turns: self.turn,
            damage_taken: (self.start_hp - final_hp).max(0),
            final_hp,
            enemy_hp: self.enemy.hp.max(0),
            cards_played: self.stats.cards_played,
            peak_strength: self.stats.peak_strength,
            peak_poison: self.stats.peak_poison,
            peak_orbs: self.stats.peak_orbs,
            divinity_entries: self.stats.divinity_entries,
            encounter: self.encounter,
        }
    }
}
