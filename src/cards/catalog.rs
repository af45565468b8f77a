//! Built-in card templates and starter decks.

use super::definition::{Card, CardCategory, Cost};
use crate::core::Character;
use crate::effects::{Effect, OrbKind, Stance};

fn attack(name: &str, cost: i64) -> Card {
    Card::new(name, Cost::Fixed(cost), CardCategory::Attack)
}

fn skill(name: &str, cost: i64) -> Card {
    Card::new(name, Cost::Fixed(cost), CardCategory::Skill)
}

fn power(name: &str, cost: i64) -> Card {
    Card::new(name, Cost::Fixed(cost), CardCategory::Power)
}

/// Cards shared by every character.
fn basics() -> Vec<Card> {
    vec![
        attack("Strike", 1).with_effect(Effect::damage(6)),
        skill("Defend", 1).with_effect(Effect::Block(5)),
        Card::new("Wound", Cost::Fixed(0), CardCategory::Status),
        Card::new("Dazed", Cost::Fixed(0), CardCategory::Status).ethereal(),
        Card::new("Regret", Cost::Fixed(0), CardCategory::Curse),
    ]
}

fn ironclad() -> Vec<Card> {
    vec![
        attack("Bash", 2)
            .with_effect(Effect::damage(8))
            .with_effect(Effect::Vulnerable(2)),
        power("Inflame", 1).with_effect(Effect::Strength(2)),
        skill("Shrug It Off", 1)
            .with_effect(Effect::Block(8))
            .with_effect(Effect::Draw(1)),
        attack("Heavy Blade", 2).with_effect(Effect::HeavyDamage {
            amount: 14,
            strength_multiplier: 3,
        }),
        skill("Limit Break", 1)
            .with_effect(Effect::DoubleStrength)
            .exhausting(),
        attack("Clothesline", 2)
            .with_effect(Effect::damage(12))
            .with_effect(Effect::Weak(2)),
        attack("Iron Wave", 1)
            .with_effect(Effect::damage(5))
            .with_effect(Effect::Block(5)),
        attack("Pommel Strike", 1)
            .with_effect(Effect::damage(9))
            .with_effect(Effect::Draw(1)),
        attack("Twin Strike", 1).with_effect(Effect::Damage { amount: 5, hits: 2 }),
        attack("Carnage", 2).with_effect(Effect::damage(20)).ethereal(),
        skill("Bloodletting", 0)
            .with_effect(Effect::LoseHp(3))
            .with_effect(Effect::Energy(2)),
        power("Demon Form", 3).with_effect(Effect::StrengthPerTurn(2)),
        power("Barricade", 3).with_effect(Effect::RetainBlock),
        Card::new("Whirlwind", Cost::X, CardCategory::Attack).with_effect(Effect::damage(5)),
    ]
}

fn silent() -> Vec<Card> {
    vec![
        skill("Survivor", 1)
            .with_effect(Effect::Block(8))
            .with_effect(Effect::Discard(1)),
        attack("Neutralize", 0)
            .with_effect(Effect::damage(3))
            .with_effect(Effect::Weak(1)),
        skill("Deadly Poison", 1).with_effect(Effect::poison(5)),
        skill("Bouncing Flask", 2).with_effect(Effect::Poison { amount: 3, hits: 3 }),
        skill("Catalyst", 1)
            .with_effect(Effect::MultiplyPoison(2))
            .exhausting(),
        power("Noxious Fumes", 1).with_effect(Effect::PoisonPerTurn(2)),
        skill("Blade Dance", 1).with_effect(Effect::AddToHand {
            card: "Shiv".to_string(),
            count: 3,
        }),
        attack("Shiv", 0).with_effect(Effect::damage(4)).exhausting(),
        skill("Acrobatics", 1)
            .with_effect(Effect::Draw(3))
            .with_effect(Effect::Discard(1)),
        skill("Prepared", 0)
            .with_effect(Effect::Draw(1))
            .with_effect(Effect::Discard(1)),
        skill("Backflip", 1)
            .with_effect(Effect::Block(5))
            .with_effect(Effect::Draw(2)),
        attack("Dash", 2)
            .with_effect(Effect::damage(10))
            .with_effect(Effect::Block(10)),
        attack("Predator", 2)
            .with_effect(Effect::damage(15))
            .with_effect(Effect::DrawNextTurn(2)),
        power("Footwork", 1).with_effect(Effect::Dexterity(2)),
        Card::new("Skewer", Cost::X, CardCategory::Attack).with_effect(Effect::damage(7)),
    ]
}

fn defect() -> Vec<Card> {
    vec![
        skill("Zap", 1).with_effect(Effect::channel(OrbKind::Lightning)),
        skill("Dualcast", 1).with_effect(Effect::Evoke { times: 2 }),
        attack("Ball Lightning", 1)
            .with_effect(Effect::damage(7))
            .with_effect(Effect::channel(OrbKind::Lightning)),
        attack("Cold Snap", 1)
            .with_effect(Effect::damage(6))
            .with_effect(Effect::channel(OrbKind::Frost)),
        skill("Glacier", 2)
            .with_effect(Effect::Block(7))
            .with_effect(Effect::Channel {
                orb: OrbKind::Frost,
                count: 2,
            }),
        skill("Darkness", 1).with_effect(Effect::channel(OrbKind::Dark)),
        skill("Fusion", 2).with_effect(Effect::channel(OrbKind::Plasma)),
        attack("Compile Driver", 1)
            .with_effect(Effect::damage(7))
            .with_effect(Effect::DrawPerOrbType),
        power("Defragment", 1).with_effect(Effect::Focus(1)),
        power("Capacitor", 1).with_effect(Effect::OrbSlots(2)),
        power("Loop", 1).with_effect(Effect::Loop),
        skill("Consume", 2)
            .with_effect(Effect::Focus(2))
            .with_effect(Effect::OrbSlots(-1)),
    ]
}

fn watcher() -> Vec<Card> {
    vec![
        attack("Eruption", 2)
            .with_effect(Effect::damage(9))
            .with_effect(Effect::EnterStance(Stance::Wrath)),
        skill("Vigilance", 2)
            .with_effect(Effect::Block(8))
            .with_effect(Effect::EnterStance(Stance::Calm)),
        attack("Empty Fist", 1)
            .with_effect(Effect::damage(9))
            .with_effect(Effect::EnterStance(Stance::Neutral)),
        skill("Empty Body", 1)
            .with_effect(Effect::Block(7))
            .with_effect(Effect::EnterStance(Stance::Neutral)),
        attack("Flurry of Blows", 0).with_effect(Effect::damage(4)),
        skill("Crescendo", 1)
            .with_effect(Effect::EnterStance(Stance::Wrath))
            .exhausting(),
        skill("Tranquility", 1)
            .with_effect(Effect::EnterStance(Stance::Calm))
            .exhausting(),
        skill("Prostrate", 0)
            .with_effect(Effect::Mantra(2))
            .with_effect(Effect::Block(4)),
        skill("Pray", 1).with_effect(Effect::Mantra(3)),
        skill("Worship", 2).with_effect(Effect::Mantra(5)),
        attack("Tantrum", 1)
            .with_effect(Effect::Damage { amount: 3, hits: 3 })
            .with_effect(Effect::EnterStance(Stance::Wrath)),
        attack("Conclude", 1)
            .with_effect(Effect::damage(12))
            .with_effect(Effect::EndTurn),
        power("Mental Fortress", 1).with_effect(Effect::StanceChangeBlock(4)),
        skill("Miracle", 0).with_effect(Effect::Energy(1)).exhausting(),
    ]
}

/// Every built-in card template.
#[must_use]
pub fn all_cards() -> Vec<Card> {
    let mut cards = basics();
    cards.extend(ironclad());
    cards.extend(silent());
    cards.extend(defect());
    cards.extend(watcher());
    cards
}

/// Starter deck for a character as `(card name, copies)`.
#[must_use]
pub fn starter_list(character: Character) -> Vec<(String, usize)> {
    let list: &[(&str, usize)] = match character {
        Character::Ironclad => &[("Strike", 5), ("Defend", 4), ("Bash", 1)],
        Character::Silent => &[("Strike", 5), ("Defend", 5), ("Survivor", 1), ("Neutralize", 1)],
        Character::Defect => &[("Strike", 4), ("Defend", 4), ("Zap", 1), ("Dualcast", 1)],
        Character::Watcher => &[("Strike", 4), ("Defend", 4), ("Eruption", 1), ("Vigilance", 1)],
    };
    list.iter().map(|(name, n)| ((*name).to_string(), *n)).collect()
}
