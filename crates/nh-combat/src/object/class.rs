//! Object classes and the bless/curse tri-state

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Object classes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ObjectClass {
    #[default]
    Weapon = 2,
    Armor = 3,
    Ring = 4,
    Amulet = 5,
    Tool = 6,
    Food = 7,
    Potion = 8,
    Scroll = 9,
    Spellbook = 10,
    Wand = 11,
    Coin = 12,
    Gem = 13,
    Rock = 14,
    Ball = 15,
    Chain = 16,
    Venom = 17,
}

impl ObjectClass {
    /// Inventory symbol
    pub const fn symbol(&self) -> char {
        match self {
            ObjectClass::Weapon => ')',
            ObjectClass::Armor => '[',
            ObjectClass::Ring => '=',
            ObjectClass::Amulet => '"',
            ObjectClass::Tool => '(',
            ObjectClass::Food => '%',
            ObjectClass::Potion => '!',
            ObjectClass::Scroll => '?',
            ObjectClass::Spellbook => '+',
            ObjectClass::Wand => '/',
            ObjectClass::Coin => '$',
            ObjectClass::Gem => '*',
            ObjectClass::Rock => '`',
            ObjectClass::Ball => '0',
            ObjectClass::Chain => '_',
            ObjectClass::Venom => '.',
        }
    }
}

/// BUC (blessed/uncursed/cursed) status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BucStatus {
    Blessed,
    #[default]
    Uncursed,
    Cursed,
}

impl BucStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BucStatus::Blessed => "blessed",
            BucStatus::Uncursed => "uncursed",
            BucStatus::Cursed => "cursed",
        }
    }
}
