//! Card registry for template lookup.
//!
//! Combats never reach for global data. Whoever starts a run passes in a
//! [`CardSource`], and the engine only asks it for templates by name.

use rustc_hash::FxHashMap;

use super::catalog;
use super::definition::Card;
use crate::core::Character;
use crate::error::{Result, SimError};
use crate::effects::Effect;
use crate::relics::{Relic, RelicTiming};

/// Read-only name-keyed lookup of card templates and relics.
///
/// Implementors may load from anywhere; the engine only sees this trait.
pub trait CardSource: Send + Sync {
    /// Look up a card template by exact name.
    fn card(&self, name: &str) -> Option<&Card>;

    /// Look up a relic by label.
    fn relic(&self, label: &str) -> Result<Option<Relic>> {
        Relic::parse(label)
    }

    /// The starter deck for a character.
    ///
    /// Fails with [`SimError::UnknownCard`] if the starter list names a
    /// card this source does not hold.
    fn starter_deck(&self, character: Character) -> Result<Vec<Card>>;

    /// Check that every card `deck` or `relic` can add to the hand during a
    /// combat is registered, following added cards that add cards in turn.
    fn check_added_cards(&self, deck: &[Card], relic: Option<Relic>) -> Result<()> {
        let mut pending: Vec<Effect> = deck.iter().flat_map(|card| card.effects.iter().cloned()).collect();
        if let Some(relic) = relic {
            // Turn-start relics only fire on the first two turns
            for timing in [
                RelicTiming::CombatStart,
                RelicTiming::TurnStart(1),
                RelicTiming::TurnStart(2),
                RelicTiming::CombatWon,
            ] {
                pending.extend(relic.effects_at(timing));
            }
        }
        let mut seen: Vec<String> = Vec::new();
        while let Some(effect) = pending.pop() {
            let Effect::AddToHand { card: name, .. } = effect else {
                continue;
            };
            if seen.contains(&name) {
                continue;
            }
            let card = self.card(&name).ok_or_else(|| SimError::UnknownCard(name.clone()))?;
            pending.extend(card.effects.iter().cloned());
            seen.push(name);
        }
        Ok(())
    }
}

/// In-memory registry of card templates.
///
/// ## Example
///
/// ```
/// use spire_sim::cards::{CardRegistry, CardSource};
///
/// let registry = CardRegistry::builtin();
/// let bash = registry.card("Bash").unwrap();
/// assert_eq!(bash.name, "Bash");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<String, Card>,
    starters: FxHashMap<Character, Vec<(String, usize)>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in card and starter deck.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for card in catalog::all_cards() {
            registry.register(card);
        }
        for character in Character::ALL {
            registry.set_starter(character, catalog::starter_list(character));
        }
        registry
    }

    /// Register a card template, replacing any card with the same name.
    pub fn register(&mut self, card: Card) {
        self.cards.insert(card.name.clone(), card);
    }

    /// Set a character's starter deck as `(card name, copies)` pairs.
    pub fn set_starter(&mut self, character: Character, list: Vec<(String, usize)>) {
        self.starters.insert(character, list);
    }

    /// Look up a card, failing with [`SimError::UnknownCard`].
    pub fn require(&self, name: &str) -> Result<&Card> {
        self.card(name)
            .ok_or_else(|| SimError::UnknownCard(name.to_string()))
    }

    /// Check that every starter deck only names registered cards, and that
    /// every card a registered card adds to the hand exists.
    pub fn validate(&self) -> Result<()> {
        for list in self.starters.values() {
            for (name, _) in list {
                self.require(name)?;
            }
        }
        let cards: Vec<Card> = self.cards.values().cloned().collect();
        self.check_added_cards(&cards, None)
    }

    /// Number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSource for CardRegistry {
    fn card(&self, name: &str) -> Option<&Card> {
        self.cards.get(name)
    }

    fn starter_deck(&self, character: Character) -> Result<Vec<Card>> {
        let mut deck = Vec::new();
        for (name, copies) in self.starters.get(&character).into_iter().flatten() {
            let card = self.require(name)?;
            deck.extend(std::iter::repeat(card).take(*copies).cloned());
        }
        Ok(deck)
    }
}
