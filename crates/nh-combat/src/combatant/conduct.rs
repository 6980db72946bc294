//! Conduct counters
//!
//! A counter at 0 means the conduct is intact. Combat and prayer break a
//! handful of them; the rest are carried for scoring.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Tracked conducts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ConductKind {
    /// Ate anything
    Food,
    /// Ate meat
    Vegetarian,
    /// Ate animal products
    Vegan,
    /// Prayed, sacrificed or otherwise dealt with a deity
    Gnostic,
    /// Hit something with a wielded weapon
    WeaponHit,
    /// Killed something
    Killer,
    /// Read something
    Illiterate,
    /// Wore armor
    Clothing,
    /// Wore rings or amulets
    Jewelry,
    /// Lost alignment record
    LostAlign,
    /// Split a pudding
    PuddingSplit,
}

/// Violation counts per conduct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conduct {
    pub food: u32,
    pub vegetarian: u32,
    pub vegan: u32,
    pub gnostic: u32,
    pub weapon_hit: u32,
    pub killer: u32,
    pub illiterate: u32,
    pub clothing: u32,
    pub jewelry: u32,
    pub lost_align: u32,
    pub pudding_split: u32,
}

impl Conduct {
    pub fn count(&self, kind: ConductKind) -> u32 {
        match kind {
            ConductKind::Food => self.food,
            ConductKind::Vegetarian => self.vegetarian,
            ConductKind::Vegan => self.vegan,
            ConductKind::Gnostic => self.gnostic,
            ConductKind::WeaponHit => self.weapon_hit,
            ConductKind::Killer => self.killer,
            ConductKind::Illiterate => self.illiterate,
            ConductKind::Clothing => self.clothing,
            ConductKind::Jewelry => self.jewelry,
            ConductKind::LostAlign => self.lost_align,
            ConductKind::PuddingSplit => self.pudding_split,
        }
    }

    fn counter_mut(&mut self, kind: ConductKind) -> &mut u32 {
        match kind {
            ConductKind::Food => &mut self.food,
            ConductKind::Vegetarian => &mut self.vegetarian,
            ConductKind::Vegan => &mut self.vegan,
            ConductKind::Gnostic => &mut self.gnostic,
            ConductKind::WeaponHit => &mut self.weapon_hit,
            ConductKind::Killer => &mut self.killer,
            ConductKind::Illiterate => &mut self.illiterate,
            ConductKind::Clothing => &mut self.clothing,
            ConductKind::Jewelry => &mut self.jewelry,
            ConductKind::LostAlign => &mut self.lost_align,
            ConductKind::PuddingSplit => &mut self.pudding_split,
        }
    }

    /// Record one violation
    pub fn violate(&mut self, kind: ConductKind) {
        let counter = self.counter_mut(kind);
        *counter = counter.saturating_add(1);
    }

    /// Put a counter back to an earlier value, used when a hit turns out to
    /// have been a miss after all
    pub fn restore(&mut self, kind: ConductKind, value: u32) {
        *self.counter_mut(kind) = value;
    }

    pub fn is_kept(&self, kind: ConductKind) -> bool {
        self.count(kind) == 0
    }
}
