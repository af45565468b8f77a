//! The four card piles of a combat.
//!
//! `DeckState` owns draw, hand, discard and exhaust. Every operation here is
//! pure relocation: a card leaves one pile and enters another, so the total
//! across piles never changes. Draws that hit the hand limit or run out of
//! cards simply stop early.
//!
//! The top of the draw pile is the back of the vector.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::GameRng;

/// Pile identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Hand,
    Discard,
    Exhaust,
}

/// What a draw actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawOutcome {
    pub drawn: usize,
    pub reshuffled: bool,
}

/// Draw, hand, discard and exhaust piles.
///
/// ## Usage
///
/// ```
/// use spire_sim::cards::{CardRegistry, CardSource};
/// use spire_sim::core::{Character, GameRng};
/// use spire_sim::zones::{DeckState, Pile};
///
/// let registry = CardRegistry::builtin();
/// let mut rng = GameRng::new(1);
/// let mut deck = DeckState::new(registry.starter_deck(Character::Ironclad).unwrap(), &mut rng);
///
/// let outcome = deck.draw(5, 10, &mut rng);
/// assert_eq!(outcome.drawn, 5);
/// assert_eq!(deck.len(Pile::Hand), 5);
/// assert_eq!(deck.total(), 10);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeckState {
    draw: Vector<Card>,
    hand: Vector<Card>,
    discard: Vector<Card>,
    exhaust: Vector<Card>,
}

impl DeckState {
    /// Shuffle `cards` into a fresh draw pile. Innate cards end up on top.
    #[must_use]
    pub fn new(mut cards: Vec<Card>, rng: &mut GameRng) -> Self {
        rng.shuffle(&mut cards);
        // Stable partition keeps the shuffled order within each group
        let (innate, rest): (Vec<Card>, Vec<Card>) = cards.into_iter().partition(|c| c.innate);
        let mut draw: Vector<Card> = rest.into_iter().collect();
        draw.extend(innate);
        Self {
            draw,
            ..Self::default()
        }
    }

    /// Build a draw pile in exactly this order (last card on top).
    #[must_use]
    pub fn from_draw_pile(cards: Vec<Card>) -> Self {
        Self {
            draw: Vector::from(cards),
            ..Self::default()
        }
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vector<Card> {
        match pile {
            Pile::Draw => &mut self.draw,
            Pile::Hand => &mut self.hand,
            Pile::Discard => &mut self.discard,
            Pile::Exhaust => &mut self.exhaust,
        }
    }

    /// Cards in a pile.
    #[must_use]
    pub fn pile(&self, pile: Pile) -> &Vector<Card> {
        match pile {
            Pile::Draw => &self.draw,
            Pile::Hand => &self.hand,
            Pile::Discard => &self.discard,
            Pile::Exhaust => &self.exhaust,
        }
    }

    /// Cards in hand.
    #[must_use]
    pub fn hand(&self) -> &Vector<Card> {
        &self.hand
    }

    /// Number of cards in a pile.
    #[must_use]
    pub fn len(&self, pile: Pile) -> usize {
        self.pile(pile).len()
    }

    /// Number of cards across all four piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len() + self.exhaust.len()
    }

    /// Move the discard pile into the draw pile and shuffle.
    pub fn reshuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.draw.iter().cloned().collect();
        cards.extend(std::mem::take(&mut self.discard));
        rng.shuffle(&mut cards);
        self.draw = Vector::from(cards);
    }

    /// Draw up to `n` cards, stopping at `hand_limit` or when both the draw
    /// and discard piles are empty.
    pub fn draw(&mut self, n: usize, hand_limit: usize, rng: &mut GameRng) -> DrawOutcome {
        let mut outcome = DrawOutcome::default();
        for _ in 0..n {
            if self.hand.len() >= hand_limit {
                break;
            }
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle(rng);
                outcome.reshuffled = true;
            }
            match self.draw.pop_back() {
                Some(card) => {
                    self.hand.push_back(card);
                    outcome.drawn += 1;
                }
                None => break,
            }
        }
        outcome
    }

    /// Take a card out of hand, e.g. to play it. The caller must place it
    /// somewhere with [`DeckState::place`].
    pub fn take_from_hand(&mut self, index: usize) -> Option<Card> {
        (index < self.hand.len()).then(|| self.hand.remove(index))
    }

    /// Put a card on top of a pile.
    pub fn place(&mut self, card: Card, pile: Pile) {
        self.pile_mut(pile).push_back(card);
    }

    /// Add a new card to hand, or to discard if the hand is full.
    pub fn add_to_hand(&mut self, card: Card, hand_limit: usize) -> Pile {
        let pile = if self.hand.len() < hand_limit {
            Pile::Hand
        } else {
            Pile::Discard
        };
        self.place(card, pile);
        pile
    }

    /// Move a card from hand to discard.
    pub fn discard(&mut self, index: usize) -> bool {
        self.relocate(index, Pile::Discard)
    }

    /// Move a card from hand to exhaust.
    pub fn exhaust(&mut self, index: usize) -> bool {
        self.relocate(index, Pile::Exhaust)
    }

    fn relocate(&mut self, index: usize, to: Pile) -> bool {
        match self.take_from_hand(index) {
            Some(card) => {
                self.place(card, to);
                true
            }
            None => false,
        }
    }

    /// Move the whole hand to discard.
    pub fn discard_hand(&mut self) {
        let hand = std::mem::take(&mut self.hand);
        self.discard.append(hand);
    }

    /// End-of-turn hand cleanup: ethereal cards exhaust, the rest discard.
    ///
    /// Returns the number of cards exhausted.
    pub fn end_of_turn(&mut self) -> usize {
        let hand = std::mem::take(&mut self.hand);
        let mut exhausted = 0;
        for card in hand {
            if card.ethereal {
                self.exhaust.push_back(card);
                exhausted += 1;
            } else {
                self.discard.push_back(card);
            }
        }
        exhausted
    }

    /// Attack cards that can still be drawn or played this combat.
    #[must_use]
    pub fn attacks_remaining(&self) -> usize {
        self.draw
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .filter(|c| c.is_attack())
            .count()
    }
}
