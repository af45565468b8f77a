//! The four playable characters.
//!
//! Each character is a unit struct implementing
//! [`CharacterRules`](crate::rules::CharacterRules), plus the helper
//! functions that execute its archetype-specific effects.

pub mod defect;
pub mod ironclad;
pub mod silent;
pub mod watcher;

pub use defect::Defect;
pub use ironclad::Ironclad;
pub use silent::Silent;
pub use watcher::Watcher;

use crate::core::Character;
use crate::rules::CharacterRules;

/// Starting numbers per character.
pub mod stats {
    pub const IRONCLAD_HP: i64 = 80;
    pub const IRONCLAD_ENEMY_HP: i64 = 120;
    pub const SILENT_HP: i64 = 70;
    pub const SILENT_ENEMY_HP: i64 = 100;
    pub const DEFECT_HP: i64 = 75;
    pub const DEFECT_ENEMY_HP: i64 = 110;
    pub const DEFECT_ORB_SLOTS: usize = 3;
    pub const WATCHER_HP: i64 = 72;
    pub const WATCHER_ENEMY_HP: i64 = 105;
}

/// Rules object for a character.
#[must_use]
pub fn rules_for(character: Character) -> &'static dyn CharacterRules {
    match character {
        Character::Ironclad => &Ironclad,
        Character::Silent => &Silent,
        Character::Defect => &Defect,
        Character::Watcher => &Watcher,
    }
}
