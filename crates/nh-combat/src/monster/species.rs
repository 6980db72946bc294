//! Species templates (permonst)

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::{Attack, AttackSet, AttackType, DamageType, empty_attacks};
use crate::object::Material;

/// Body size
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
pub enum MonsterSize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gigantic,
}

bitflags! {
    /// Species properties that the combat and prayer rules look at
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SpeciesFlags: u64 {
        const FLYER = 1 << 0;
        const SWIMMER = 1 << 1;
        const AMORPHOUS = 1 << 2;
        const PASSES_WALLS = 1 << 3;
        const AMPHIBIOUS = 1 << 4;
        const NOEYES = 1 << 5;
        const NOHANDS = 1 << 6;
        const NOLIMBS = 1 << 7;
        const NOHEAD = 1 << 8;
        const MINDLESS = 1 << 9;
        const HUMANOID = 1 << 10;
        const ANIMAL = 1 << 11;
        const SLITHY = 1 << 12;
        const UNSOLID = 1 << 13;
        const THICK_HIDE = 1 << 14;
        const NONCORPOREAL = 1 << 15;
        const WHIRLY = 1 << 16;
        const FLAMING = 1 << 17;
        const WEBMAKER = 1 << 18;
        const TOUCH_PETRIFIES = 1 << 19;
        const UNDEAD = 1 << 20;
        const WERE = 1 << 21;
        const HUMAN = 1 << 22;
        const ELF = 1 << 23;
        const DWARF = 1 << 24;
        const ORC = 1 << 25;
        const DEMON = 1 << 26;
        const LORD = 1 << 27;
        const PRINCE = 1 << 28;
        const UNIQUE = 1 << 29;
        const HATES_SILVER = 1 << 30;
        const HATES_IRON = 1 << 31;
        const NYMPH = 1 << 32;
        const ZOMBIE_MUMMY = 1 << 33;
        const GOLEM = 1 << 34;
        const CARNIVORE = 1 << 35;
        const HERBIVORE = 1 << 36;
        const FEMALE = 1 << 37;
        const MALE = 1 << 38;
        const CLINGER = 1 << 39;
        const FLOATER = 1 << 40;
    }
}

bitflags! {
    /// Resistances, innate or acquired
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Resistances: u16 {
        const FIRE = 1 << 0;
        const COLD = 1 << 1;
        const SLEEP = 1 << 2;
        const DISINT = 1 << 3;
        const SHOCK = 1 << 4;
        const POISON = 1 << 5;
        const ACID = 1 << 6;
        const STONE = 1 << 7;
        const DRAIN = 1 << 8;
        const SICK = 1 << 9;
        const MAGIC = 1 << 10;
    }
}

/// The handful of species the rules name outright
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SpeciesKind {
    #[default]
    Generic,
    Shade,
    FloatingEye,
    BlackPudding,
    BrownPudding,
    GreenSlime,
    ClayGolem,
    IronGolem,
    WoodGolem,
    LeatherGolem,
    StrawGolem,
    PaperGolem,
    Succubus,
    Incubus,
    Balrog,
    Medusa,
    Rider,
    Cockatrice,
    Chickatrice,
    Leprechaun,
    Watchman,
    WatchCaptain,
    FogCloud,
    LurkerAbove,
    Unicorn,
    /// Its corpse never goes stale
    AcidBlob,
}

/// A monster template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub kind: SpeciesKind,
    pub level: u8,
    pub speed: u8,
    pub ac: i8,
    /// Magic resistance, percent
    pub mr: u8,
    /// Alignment: negative chaotic, positive lawful
    pub alignment: i8,
    pub size: MonsterSize,
    pub weight: u32,
    pub nutrition: u32,
    pub flags: SpeciesFlags,
    pub resists: Resistances,
    pub attacks: AttackSet,
}

impl Default for Species {
    fn default() -> Self {
        Self {
            name: "creature".to_string(),
            kind: SpeciesKind::Generic,
            level: 0,
            speed: 12,
            ac: 10,
            mr: 0,
            alignment: 0,
            size: MonsterSize::Medium,
            weight: 100,
            nutrition: 100,
            flags: SpeciesFlags::empty(),
            resists: Resistances::empty(),
            attacks: empty_attacks(),
        }
    }
}

impl Species {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn has(&self, flags: SpeciesFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn is_undead(&self) -> bool {
        self.has(SpeciesFlags::UNDEAD)
    }

    pub fn is_demon(&self) -> bool {
        self.has(SpeciesFlags::DEMON)
    }

    pub fn is_shade(&self) -> bool {
        self.kind == SpeciesKind::Shade
    }

    pub fn is_rider(&self) -> bool {
        self.kind == SpeciesKind::Rider
    }

    pub fn is_golem(&self) -> bool {
        self.has(SpeciesFlags::GOLEM)
    }

    pub fn is_pudding(&self) -> bool {
        matches!(self.kind, SpeciesKind::BlackPudding | SpeciesKind::BrownPudding)
    }

    pub fn touch_petrifies(&self) -> bool {
        self.has(SpeciesFlags::TOUCH_PETRIFIES)
    }

    pub fn has_head(&self) -> bool {
        !self.has(SpeciesFlags::NOHEAD)
    }

    pub fn has_eyes(&self) -> bool {
        !self.has(SpeciesFlags::NOEYES)
    }

    pub fn has_hands(&self) -> bool {
        !self.has(SpeciesFlags::NOHANDS)
    }

    pub fn is_unsolid(&self) -> bool {
        self.has(SpeciesFlags::UNSOLID)
    }

    pub fn is_noncorporeal(&self) -> bool {
        self.has(SpeciesFlags::NONCORPOREAL)
    }

    pub fn is_thick_skinned(&self) -> bool {
        self.has(SpeciesFlags::THICK_HIDE)
    }

    pub fn is_flaming(&self) -> bool {
        self.has(SpeciesFlags::FLAMING)
    }

    pub fn is_mindless(&self) -> bool {
        self.has(SpeciesFlags::MINDLESS)
    }

    pub fn is_animal(&self) -> bool {
        self.has(SpeciesFlags::ANIMAL)
    }

    pub fn is_big(&self) -> bool {
        self.size >= MonsterSize::Large
    }

    /// Large enough to use the large-target damage die
    pub fn uses_large_damage(&self) -> bool {
        self.is_big()
    }

    pub fn resists(&self, res: Resistances) -> bool {
        self.resists.contains(res)
    }

    /// Whether a weapon of this material does extra damage to the species
    pub fn hates_material(&self, material: Material) -> bool {
        match material {
            Material::Silver => self.has(SpeciesFlags::HATES_SILVER),
            Material::Iron => self.has(SpeciesFlags::HATES_IRON),
            _ => false,
        }
    }

    /// Grabs and holds on its own (sticky, wrapping or hugging attacks)
    pub fn sticks(&self) -> bool {
        self.attacks.iter().any(|a| {
            matches!(a.damage_type, DamageType::Stick | DamageType::Wrap)
                || a.attack_type == AttackType::Hug
        })
    }

    /// First attack with the given shape
    pub fn attack_of(&self, shape: AttackType) -> Option<&Attack> {
        self.attacks.iter().find(|a| a.attack_type == shape)
    }

    /// The passive response slot: the first attack with no delivery shape
    pub fn passive_attack(&self) -> Option<&Attack> {
        self.attacks
            .iter()
            .find(|a| a.attack_type == AttackType::None)
    }

    /// Stands on the ground rather than floating or flowing
    pub fn stands_firm(&self) -> bool {
        !(self.has(SpeciesFlags::FLYER)
            || self.has(SpeciesFlags::FLOATER)
            || self.has(SpeciesFlags::SLITHY)
            || self.has(SpeciesFlags::AMORPHOUS)
            || self.has(SpeciesFlags::NOLIMBS)
            || self.is_noncorporeal()
            || self.is_unsolid()
            || self.has(SpeciesFlags::WHIRLY))
    }

    pub fn is_vegan(&self) -> bool {
        matches!(
            self.kind,
            SpeciesKind::GreenSlime | SpeciesKind::BlackPudding | SpeciesKind::BrownPudding
        ) || (self.has(SpeciesFlags::GOLEM) && !matches!(self.kind, SpeciesKind::LeatherGolem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passive_slot_is_first_none() {
        let mut sp = Species::named("acid blob");
        sp.attacks[0] = Attack::new(AttackType::None, DamageType::Acid, 1, 8);
        assert_eq!(sp.passive_attack().map(|a| a.damage_type), Some(DamageType::Acid));
    }

    #[test]
    fn test_material_hatred() {
        let mut sp = Species::named("vampire");
        sp.flags |= SpeciesFlags::HATES_SILVER | SpeciesFlags::UNDEAD;
        assert!(sp.hates_material(Material::Silver));
        assert!(!sp.hates_material(Material::Iron));
        assert!(sp.is_undead());
    }

    #[test]
    fn test_sticks_detects_hug() {
        let mut sp = Species::named("owlbear");
        assert!(!sp.sticks());
        sp.attacks[2] = Attack::new(AttackType::Hug, DamageType::Physical, 2, 8);
        assert!(sp.sticks());
    }
}
