//! Item instances
//!
//! An `Item` is owned by exactly one place at a time: an inventory, an
//! equipment slot, a map tile, or a local in the middle of a transfer.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{Artifact, BucStatus, Material, ObjectCatalog, ObjectClass, ObjectStats, ObjectType};
use crate::consts::MAX_ERODE;
use crate::monster::Species;

/// Unique item identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ItemId(pub u32);

impl ItemId {
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four ways an item wears down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ErosionKind {
    Burn,
    Rust,
    Rot,
    Corrode,
}

impl ErosionKind {
    /// Burn and rust share the first counter; rot and corrosion the second
    pub const fn is_primary(&self) -> bool {
        matches!(self, ErosionKind::Burn | ErosionKind::Rust)
    }

    /// Verb used when the item takes damage ("rusts", "burns")
    pub const fn verb(&self) -> &'static str {
        match self {
            ErosionKind::Burn => "burns",
            ErosionKind::Rust => "rusts",
            ErosionKind::Rot => "rots",
            ErosionKind::Corrode => "corrodes",
        }
    }

    pub const fn adjective(&self) -> &'static str {
        match self {
            ErosionKind::Burn => "burnt",
            ErosionKind::Rust => "rusty",
            ErosionKind::Rot => "rotten",
            ErosionKind::Corrode => "corroded",
        }
    }
}

/// Result of trying to erode an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErodeResult {
    /// One more level of damage
    Eroded,
    /// Already at the material's limit
    AtLimit,
    /// Fooproofed; the erosion was stopped
    Protected,
    /// The material is not affected at all
    Immune,
}

/// A concrete object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub otype: ObjectType,
    pub class: ObjectClass,
    pub material: Material,
    pub quantity: u32,
    pub weight: u32,
    pub enchantment: i8,
    pub buc: BucStatus,
    /// Burn or rust level
    pub erosion1: u8,
    /// Rot or corrosion level
    pub erosion2: u8,
    pub erosion_proof: bool,
    /// Enchantment identified
    pub known: bool,
    pub buc_known: bool,
    /// Erodeproofing identified
    pub proof_known: bool,
    pub greased: bool,
    pub poisoned: bool,
    /// Species for corpses, eggs and figurines
    pub corpse_of: Option<Box<Species>>,
    /// Turn the item was created (corpse freshness)
    pub age: u64,
    /// Egg will still hatch
    pub hatchable: bool,
    /// Egg was laid by the hero
    pub laid_by_you: bool,
    pub artifact: Option<Artifact>,
    /// Custom name given by a crowning or the player
    pub named: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, otype: ObjectType, stats: &ObjectStats) -> Self {
        Self {
            id,
            otype,
            class: stats.class,
            material: stats.material,
            quantity: 1,
            weight: stats.weight,
            enchantment: 0,
            buc: BucStatus::Uncursed,
            erosion1: 0,
            erosion2: 0,
            erosion_proof: false,
            known: false,
            buc_known: false,
            proof_known: false,
            greased: false,
            poisoned: false,
            corpse_of: None,
            age: 0,
            hatchable: false,
            laid_by_you: false,
            artifact: None,
            named: None,
        }
    }

    /// Build from the catalog in one call
    pub fn from_catalog(id: ItemId, otype: ObjectType, catalog: &dyn ObjectCatalog) -> Self {
        Self::new(id, otype, catalog.lookup(otype))
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_enchantment(mut self, spe: i8) -> Self {
        self.enchantment = spe;
        self
    }

    pub fn with_buc(mut self, buc: BucStatus) -> Self {
        self.buc = buc;
        self
    }

    pub fn with_corpse_of(mut self, species: Species) -> Self {
        self.weight = species.weight;
        self.corpse_of = Some(Box::new(species));
        self
    }

    pub const fn is_blessed(&self) -> bool {
        matches!(self.buc, BucStatus::Blessed)
    }

    pub const fn is_cursed(&self) -> bool {
        matches!(self.buc, BucStatus::Cursed)
    }

    pub fn bless(&mut self) {
        self.buc = BucStatus::Blessed;
    }

    pub fn curse(&mut self) {
        self.buc = BucStatus::Cursed;
    }

    pub fn uncurse(&mut self) {
        self.buc = BucStatus::Uncursed;
    }

    pub const fn is_silver(&self) -> bool {
        matches!(self.material, Material::Silver)
    }

    /// Worst of the two erosion counters
    pub fn greatest_erosion(&self) -> u8 {
        self.erosion1.max(self.erosion2)
    }

    pub fn erosion(&self, kind: ErosionKind) -> u8 {
        if kind.is_primary() {
            self.erosion1
        } else {
            self.erosion2
        }
    }

    /// Erode by one level, respecting material and erodeproofing
    pub fn erode(&mut self, kind: ErosionKind) -> ErodeResult {
        if !self.material.suffers(kind) {
            return ErodeResult::Immune;
        }
        if self.erosion_proof {
            return ErodeResult::Protected;
        }
        let counter = if kind.is_primary() {
            &mut self.erosion1
        } else {
            &mut self.erosion2
        };
        if *counter >= MAX_ERODE {
            return ErodeResult::AtLimit;
        }
        *counter += 1;
        ErodeResult::Eroded
    }

    /// Set an erosion counter directly, clamped to what the material allows
    pub fn set_erosion(&mut self, kind: ErosionKind, level: u8) {
        let level = if self.material.suffers(kind) {
            level.min(MAX_ERODE)
        } else {
            0
        };
        if kind.is_primary() {
            self.erosion1 = level;
        } else {
            self.erosion2 = level;
        }
    }

    pub fn clear_erosion(&mut self) {
        self.erosion1 = 0;
        self.erosion2 = 0;
    }

    /// Total weight of the stack
    pub fn total_weight(&self) -> u32 {
        self.weight.saturating_mul(self.quantity)
    }

    /// Plain name without quantity or BUC ("long sword", "jackal corpse")
    pub fn xname(&self, catalog: &dyn ObjectCatalog) -> String {
        let base = catalog.lookup(self.otype).name;
        let mut name = match &self.corpse_of {
            Some(species) => format!("{} {}", species.name, base),
            None => base.to_string(),
        };
        if self.quantity > 1 {
            name = pluralize(&name);
        }
        match (&self.named, self.artifact) {
            (_, Some(artifact)) => format!("{name} named {artifact}"),
            (Some(label), None) => format!("{name} named {label}"),
            (None, None) => name,
        }
    }

    /// "your long sword"
    pub fn yname(&self, catalog: &dyn ObjectCatalog) -> String {
        format!("your {}", self.xname(catalog))
    }

    /// "Your long sword"
    pub fn cap_yname(&self, catalog: &dyn ObjectCatalog) -> String {
        format!("Your {}", self.xname(catalog))
    }

    /// Singular "is" or plural "are" for the stack
    pub const fn is_are(&self) -> &'static str {
        if self.quantity > 1 { "are" } else { "is" }
    }

    /// Suffix for verbs agreeing with the stack ("s" for one item)
    pub const fn verb_s(&self) -> &'static str {
        if self.quantity > 1 { "" } else { "s" }
    }
}

fn pluralize(name: &str) -> String {
    // "arrows", "daggers"; good enough for catalog names
    if let Some(stem) = name.strip_suffix("y") {
        if !stem.ends_with(['a', 'e', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if name.ends_with('s') || name.ends_with("sh") || name.ends_with("ch") {
        return format!("{name}es");
    }
    format!("{name}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{StaticCatalog, otyp};

    fn sword(cat: &StaticCatalog) -> Item {
        Item::from_catalog(ItemId(1), otyp::LONG_SWORD, cat)
    }

    #[test]
    fn test_erode_until_limit() {
        let cat = StaticCatalog::standard();
        let mut item = sword(&cat);
        for _ in 0..MAX_ERODE {
            assert_eq!(item.erode(ErosionKind::Rust), ErodeResult::Eroded);
        }
        assert_eq!(item.erode(ErosionKind::Rust), ErodeResult::AtLimit);
        assert_eq!(item.erosion1, MAX_ERODE);
    }

    #[test]
    fn test_erode_respects_material() {
        let cat = StaticCatalog::standard();
        let mut item = sword(&cat);
        assert_eq!(item.erode(ErosionKind::Burn), ErodeResult::Immune);
        item.erosion_proof = true;
        assert_eq!(item.erode(ErosionKind::Rust), ErodeResult::Protected);
        assert_eq!(item.greatest_erosion(), 0);
    }

    #[test]
    fn test_set_erosion_clamped() {
        let cat = StaticCatalog::standard();
        let mut item = sword(&cat);
        item.set_erosion(ErosionKind::Corrode, 9);
        assert_eq!(item.erosion2, MAX_ERODE);
        item.set_erosion(ErosionKind::Rot, 2);
        assert_eq!(item.erosion2, 0);
    }

    #[test]
    fn test_names() {
        let cat = StaticCatalog::standard();
        let arrows = Item::from_catalog(ItemId(2), otyp::ARROW, &cat).with_quantity(5);
        assert_eq!(arrows.xname(&cat), "arrows");
        assert_eq!(sword(&cat).yname(&cat), "your long sword");
        assert_eq!(arrows.is_are(), "are");
    }
}
