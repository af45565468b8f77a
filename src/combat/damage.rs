//! Damage, block and debuff arithmetic.
//!
//! Pure functions over plain numbers and entity structs. All multipliers
//! truncate toward zero, and nothing here ever drives HP below zero.

use super::entities::{EnemyState, PlayerState};

/// Vulnerable: ×1.5, truncated.
#[must_use]
pub const fn vulnerable_scaled(amount: i64) -> i64 {
    amount * 3 / 2
}

/// Weak: ×0.75, truncated.
#[must_use]
pub const fn weak_scaled(amount: i64) -> i64 {
    amount * 3 / 4
}

/// Pre-block damage of a player attack.
///
/// Strength is added to the raw value, the stance multiplier applies to the
/// sum, then Vulnerable.
#[must_use]
pub fn outgoing_attack(raw: i64, strength: i64, stance_multiplier: i64, target_vulnerable: i64) -> i64 {
    let amount = ((raw + strength) * stance_multiplier).max(0);
    if target_vulnerable > 0 {
        vulnerable_scaled(amount)
    } else {
        amount
    }
}

/// Pre-block damage of an enemy attack.
#[must_use]
pub fn incoming_attack(raw: i64, strength: i64, source_weak: i64, stance_multiplier: i64) -> i64 {
    let mut amount = (raw + strength).max(0);
    if source_weak > 0 {
        amount = weak_scaled(amount);
    }
    amount * stance_multiplier
}

/// Resolve `amount` against block first, spilling over into HP.
///
/// Returns the HP actually lost.
pub fn absorb(amount: i64, block: &mut i64, hp: &mut i64) -> i64 {
    let amount = amount.max(0);
    let through = (amount - *block).max(0);
    *block = (*block - amount).max(0);
    let lost = through.min(*hp);
    *hp -= lost;
    lost
}

/// HP loss that ignores block. Returns the HP actually lost.
pub fn lose_hp(amount: i64, hp: &mut i64) -> i64 {
    let lost = amount.max(0).min(*hp);
    *hp -= lost;
    lost
}

/// Pre-block damage of one player hit on the enemy. A Weak player deals
/// ×0.75 before the enemy's Vulnerable applies.
#[must_use]
pub fn player_hit(raw: i64, player: &PlayerState, enemy: &EnemyState) -> i64 {
    let stance = player.ext.stance().outgoing();
    if player.weak > 0 {
        let amount = weak_scaled(((raw + player.strength) * stance).max(0));
        if enemy.vulnerable > 0 {
            vulnerable_scaled(amount)
        } else {
            amount
        }
    } else {
        outgoing_attack(raw, player.strength, stance, enemy.vulnerable)
    }
}

/// Pre-block damage of one enemy hit on the player, including the
/// player's Vulnerable.
#[must_use]
pub fn enemy_hit(raw: i64, enemy: &EnemyState, player: &PlayerState) -> i64 {
    let amount = incoming_attack(raw, enemy.strength, enemy.weak, player.ext.stance().incoming());
    if player.vulnerable > 0 {
        vulnerable_scaled(amount)
    } else {
        amount
    }
}

/// Player attacks the enemy for `raw` damage. Returns HP the enemy lost.
pub fn damage_to_enemy(raw: i64, player: &PlayerState, enemy: &mut EnemyState) -> i64 {
    let amount = player_hit(raw, player, enemy);
    absorb(amount, &mut enemy.block, &mut enemy.hp)
}

/// Enemy attacks the player for `raw` damage. Returns HP the player lost.
pub fn damage_to_player(raw: i64, enemy: &EnemyState, player: &mut PlayerState) -> i64 {
    let amount = enemy_hit(raw, enemy, player);
    absorb(amount, &mut player.block, &mut player.hp)
}

/// Apply a debuff or poison, respecting Artifact.
///
/// One Artifact charge voids the whole application no matter its size.
/// Returns whether the stat changed.
pub fn apply_debuff(artifact: &mut i64, stat: &mut i64, amount: i64) -> bool {
    if *artifact > 0 {
        *artifact -= 1;
        return false;
    }
    *stat += amount;
    true
}

/// Poison tick: lose HP equal to Poison, bypassing block, then Poison
/// drops by one. Returns HP lost.
pub fn poison_tick(poison: &mut i64, hp: &mut i64) -> i64 {
    if *poison <= 0 {
        return 0;
    }
    let lost = lose_hp(*poison, hp);
    *poison -= 1;
    lost
}

/// End-of-turn decrement of a duration debuff.
pub fn decay(stat: &mut i64) {
    if *stat > 0 {
        *stat -= 1;
    }
}

/// n(n+1)/2: total damage a stack of `n` Poison deals if left alone.
/// Saturates at `i64::MAX / 2`.
#[must_use]
pub const fn triangular(n: i64) -> i64 {
    if n <= 0 {
        0
    } else {
        n.saturating_mul(n.saturating_add(1)) / 2
    }
}

/// Extra total damage from adding `added` Poison on top of `existing`,
/// capped at the enemy's remaining HP.
#[must_use]
pub fn poison_increment(existing: i64, added: i64, enemy_hp: i64) -> i64 {
    let gain = triangular(existing.saturating_add(added)).saturating_sub(triangular(existing));
    gain.clamp(0, enemy_hp.max(0))
}
