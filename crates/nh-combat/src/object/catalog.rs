//! Read-only object catalog (objects.c)
//!
//! The engines never mutate catalog entries; they read per-type stats through
//! [`ObjectCatalog`]. Behaviour that used to hang off a literal item identity
//! is expressed as [`ObjectTraits`] capability flags, plus an [`ObjectKind`]
//! tag for the handful of truly one-off items.

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{Material, ObjectClass};
use crate::combatant::WeaponSkill;

/// Catalog key for an object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectType(pub u16);

bitflags! {
    /// Capability flags on a catalog entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectTraits: u32 {
        /// Fires ammunition (bows, slings)
        const LAUNCHER = 1 << 0;
        /// Fired from a launcher
        const AMMO = 1 << 1;
        /// Thrown by hand (darts, boomerangs)
        const MISSILE = 1 << 2;
        /// Reach weapon; clumsy at close range unless mounted
        const POLEARM = 1 << 3;
        /// Needs both hands
        const BIMANUAL = 1 << 4;
        /// Swings wide (cleave)
        const AXE = 1 << 5;
        /// Breaks easily; cannot be shattered by a critical blow
        const FLIMSY = 1 << 6;
        /// Tool that fights like a weapon
        const WEPTOOL = 1 << 7;
        /// Can carry poison
        const POISONABLE = 1 << 8;
        /// Shades notice it (silver, garlic, mirrors)
        const SHADE_AWARE = 1 << 9;
        /// Affects luck while carried
        const CONFERS_LUCK = 1 << 10;
        /// Cannot be dropped while cursed
        const LOADSTONE = 1 << 11;
        /// Keeps wrapping attacks from getting a grip
        const SLIPPERY = 1 << 12;
        /// Grants disintegration resistance when worn
        const DISINT_RES = 1 << 13;
        /// Reflects rays when worn
        const REFLECTS = 1 << 14;
        /// Levitates the wearer
        const LEVITATION = 1 << 15;
        /// Makes the wearer fumble
        const FUMBLING = 1 << 16;
        /// Keeps attributes from dropping
        const SUSTAIN_ABILITY = 1 << 17;
        /// Shatters when used to hit something
        const BREAKABLE = 1 << 18;
        /// Holy or unholy water when blessed or cursed
        const WATER = 1 << 19;
        /// Covers the eyes
        const BLINDFOLD = 1 << 20;
        /// Strangles the wearer
        const STRANGULATION = 1 << 21;
        /// Lights the way with a glare even shades notice
        const SHADE_GLARE = 1 << 22;
    }
}

/// One-off items that the rules still dispatch on by name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ObjectKind {
    #[default]
    Ordinary,
    Boomerang,
    Lance,
    Katana,
    LongSword,
    Ya,
    Yumi,
    ElvenArrow,
    ElvenBow,
    Sling,
    Boulder,
    HeavyIronBall,
    IronChain,
    Mirror,
    ExpensiveCamera,
    Corpse,
    Egg,
    CloveOfGarlic,
    CreamPie,
    BlindingVenom,
    AcidVenom,
    VampireBlood,
    PotionWater,
    PotionSickness,
    PotionConfusion,
    PotionBooze,
    PotionSleeping,
    PotionParalysis,
    PotionBlindness,
    PotionAcid,
    Saddle,
    SpellbookFingerOfDeath,
    SpellbookRestoreAbility,
    Spellbook,
}

/// Per-type stats
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStats {
    pub name: &'static str,
    pub class: ObjectClass,
    pub material: Material,
    pub weight: u32,
    /// Damage die against small targets
    pub small_damage: u8,
    /// Damage die against large targets
    pub large_damage: u8,
    /// Innate to-hit bonus
    pub hit_bonus: i8,
    pub skill: WeaponSkill,
    /// For ammunition: the launcher skill that fires it
    pub fired_by: Option<WeaponSkill>,
    pub probability: u16,
    pub magic: bool,
    pub ac_bonus: i8,
    /// Magic cancellation granted when worn
    pub negation: u8,
    pub traits: ObjectTraits,
    pub kind: ObjectKind,
}

impl ObjectStats {
    pub const UNKNOWN: ObjectStats = ObjectStats {
        name: "strange object",
        class: ObjectClass::Rock,
        material: Material::Mineral,
        weight: 10,
        small_damage: 0,
        large_damage: 0,
        hit_bonus: 0,
        skill: WeaponSkill::None,
        fired_by: None,
        probability: 0,
        magic: false,
        ac_bonus: 0,
        negation: 0,
        traits: ObjectTraits::empty(),
        kind: ObjectKind::Ordinary,
    };

    const fn base(name: &'static str, class: ObjectClass, material: Material, weight: u32) -> Self {
        ObjectStats {
            name,
            class,
            material,
            weight,
            ..Self::UNKNOWN
        }
    }

    const fn weapon(
        name: &'static str,
        material: Material,
        weight: u32,
        small_damage: u8,
        large_damage: u8,
        hit_bonus: i8,
        skill: WeaponSkill,
    ) -> Self {
        ObjectStats {
            small_damage,
            large_damage,
            hit_bonus,
            skill,
            ..Self::base(name, ObjectClass::Weapon, material, weight)
        }
    }

    const fn armor(name: &'static str, material: Material, weight: u32, ac_bonus: i8, negation: u8) -> Self {
        ObjectStats {
            ac_bonus,
            negation,
            ..Self::base(name, ObjectClass::Armor, material, weight)
        }
    }

    const fn with(mut self, traits: ObjectTraits) -> Self {
        self.traits = self.traits.union(traits);
        self
    }

    const fn kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    const fn fired_by(mut self, skill: WeaponSkill) -> Self {
        self.fired_by = Some(skill);
        self
    }

    const fn magical(mut self) -> Self {
        self.magic = true;
        self
    }

    pub const fn is_launcher(&self) -> bool {
        self.traits.contains(ObjectTraits::LAUNCHER)
    }

    pub const fn is_ammo(&self) -> bool {
        self.traits.contains(ObjectTraits::AMMO)
    }

    pub const fn is_missile(&self) -> bool {
        self.traits.contains(ObjectTraits::MISSILE)
    }

    pub const fn is_pole(&self) -> bool {
        self.traits.contains(ObjectTraits::POLEARM)
    }

    pub const fn is_weptool(&self) -> bool {
        self.traits.contains(ObjectTraits::WEPTOOL)
    }

    pub const fn is_bimanual(&self) -> bool {
        self.traits.contains(ObjectTraits::BIMANUAL)
    }
}

/// Read-only lookup of object type stats
pub trait ObjectCatalog {
    fn stats(&self, otype: ObjectType) -> Option<&ObjectStats>;

    /// First type tagged with `kind`
    fn find_kind(&self, kind: ObjectKind) -> Option<ObjectType>;

    /// Stats for `otype`, or a neutral placeholder for unknown ids
    fn lookup(&self, otype: ObjectType) -> &ObjectStats {
        match self.stats(otype) {
            Some(stats) => stats,
            None => {
                tracing::error!(otype = otype.0, "unknown object type");
                &ObjectStats::UNKNOWN
            }
        }
    }
}

/// Well-known type ids in [`StaticCatalog::standard`]
pub mod otyp {
    use super::ObjectType;

    pub const ARROW: ObjectType = ObjectType(1);
    pub const ELVEN_ARROW: ObjectType = ObjectType(2);
    pub const SILVER_ARROW: ObjectType = ObjectType(3);
    pub const YA: ObjectType = ObjectType(4);
    pub const DART: ObjectType = ObjectType(5);
    pub const BOOMERANG: ObjectType = ObjectType(6);
    pub const DAGGER: ObjectType = ObjectType(7);
    pub const SILVER_DAGGER: ObjectType = ObjectType(8);
    pub const AXE: ObjectType = ObjectType(9);
    pub const BATTLE_AXE: ObjectType = ObjectType(10);
    pub const SILVER_SABER: ObjectType = ObjectType(11);
    pub const LONG_SWORD: ObjectType = ObjectType(12);
    pub const TWO_HANDED_SWORD: ObjectType = ObjectType(13);
    pub const KATANA: ObjectType = ObjectType(14);
    pub const LANCE: ObjectType = ObjectType(15);
    pub const MACE: ObjectType = ObjectType(16);
    pub const BOW: ObjectType = ObjectType(17);
    pub const ELVEN_BOW: ObjectType = ObjectType(18);
    pub const YUMI: ObjectType = ObjectType(19);
    pub const SLING: ObjectType = ObjectType(20);
    pub const FLAIL: ObjectType = ObjectType(21);
    pub const CLUB: ObjectType = ObjectType(22);
    pub const RUNESWORD: ObjectType = ObjectType(23);

    pub const LEATHER_ARMOR: ObjectType = ObjectType(40);
    pub const PLATE_MAIL: ObjectType = ObjectType(41);
    pub const ELVEN_MITHRIL_COAT: ObjectType = ObjectType(42);
    pub const HAWAIIAN_SHIRT: ObjectType = ObjectType(43);
    pub const LEATHER_CLOAK: ObjectType = ObjectType(44);
    pub const OILSKIN_CLOAK: ObjectType = ObjectType(45);
    pub const CLOAK_OF_MAGIC_RESISTANCE: ObjectType = ObjectType(46);
    pub const SMALL_SHIELD: ObjectType = ObjectType(47);
    pub const SHIELD_OF_REFLECTION: ObjectType = ObjectType(48);
    pub const HELMET: ObjectType = ObjectType(49);
    pub const LEATHER_GLOVES: ObjectType = ObjectType(50);
    pub const GAUNTLETS_OF_FUMBLING: ObjectType = ObjectType(51);
    pub const LOW_BOOTS: ObjectType = ObjectType(52);
    pub const FUMBLE_BOOTS: ObjectType = ObjectType(53);
    pub const LEVITATION_BOOTS: ObjectType = ObjectType(54);

    pub const RING_OF_PROTECTION: ObjectType = ObjectType(60);
    pub const RING_OF_LEVITATION: ObjectType = ObjectType(61);
    pub const RING_OF_SUSTAIN_ABILITY: ObjectType = ObjectType(62);
    pub const IRON_RING: ObjectType = ObjectType(63);
    pub const AMULET_OF_STRANGULATION: ObjectType = ObjectType(64);
    pub const AMULET_OF_ESP: ObjectType = ObjectType(65);

    pub const BLINDFOLD: ObjectType = ObjectType(70);
    pub const MIRROR: ObjectType = ObjectType(71);
    pub const EXPENSIVE_CAMERA: ObjectType = ObjectType(72);
    pub const SADDLE: ObjectType = ObjectType(73);
    pub const PICK_AXE: ObjectType = ObjectType(74);

    pub const CORPSE: ObjectType = ObjectType(80);
    pub const EGG: ObjectType = ObjectType(81);
    pub const CLOVE_OF_GARLIC: ObjectType = ObjectType(82);
    pub const CREAM_PIE: ObjectType = ObjectType(83);

    pub const POTION_OF_WATER: ObjectType = ObjectType(90);
    pub const POTION_OF_SICKNESS: ObjectType = ObjectType(91);
    pub const POTION_OF_CONFUSION: ObjectType = ObjectType(92);
    pub const POTION_OF_BOOZE: ObjectType = ObjectType(93);
    pub const POTION_OF_SLEEPING: ObjectType = ObjectType(94);
    pub const POTION_OF_PARALYSIS: ObjectType = ObjectType(95);
    pub const POTION_OF_BLINDNESS: ObjectType = ObjectType(96);
    pub const POTION_OF_ACID: ObjectType = ObjectType(97);

    pub const SPE_FINGER_OF_DEATH: ObjectType = ObjectType(100);
    pub const SPE_RESTORE_ABILITY: ObjectType = ObjectType(101);
    pub const SPE_FORCE_BOLT: ObjectType = ObjectType(102);

    pub const WAND_OF_STRIKING: ObjectType = ObjectType(110);

    pub const ROCK: ObjectType = ObjectType(120);
    pub const LOADSTONE: ObjectType = ObjectType(121);
    pub const LUCKSTONE: ObjectType = ObjectType(122);
    pub const BOULDER: ObjectType = ObjectType(123);
    pub const HEAVY_IRON_BALL: ObjectType = ObjectType(124);
    pub const IRON_CHAIN: ObjectType = ObjectType(125);

    pub const BLINDING_VENOM: ObjectType = ObjectType(130);
    pub const ACID_VENOM: ObjectType = ObjectType(131);
    pub const VAMPIRE_BLOOD: ObjectType = ObjectType(132);
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<ObjectType, ObjectStats>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, otype: ObjectType, stats: ObjectStats) {
        self.entries.insert(otype, stats);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The object types the combat and prayer rules refer to
    pub fn standard() -> Self {
        use Material::*;
        use ObjectClass as C;
        use WeaponSkill as S;
        use otyp::*;

        let mut cat = Self::new();
        let entries = [
            // missiles and ammunition
            (ARROW, ObjectStats::weapon("arrow", Iron, 1, 6, 6, 0, S::Bow)
                .with(ObjectTraits::AMMO.union(ObjectTraits::POISONABLE)).fired_by(S::Bow)),
            (ELVEN_ARROW, ObjectStats::weapon("elven arrow", Wood, 1, 7, 6, 0, S::Bow)
                .with(ObjectTraits::AMMO.union(ObjectTraits::POISONABLE)).fired_by(S::Bow)
                .kind(ObjectKind::ElvenArrow)),
            (SILVER_ARROW, ObjectStats::weapon("silver arrow", Silver, 1, 6, 6, 0, S::Bow)
                .with(ObjectTraits::AMMO.union(ObjectTraits::POISONABLE).union(ObjectTraits::SHADE_AWARE))
                .fired_by(S::Bow)),
            (YA, ObjectStats::weapon("ya", Metal, 1, 7, 7, 1, S::Bow)
                .with(ObjectTraits::AMMO.union(ObjectTraits::POISONABLE)).fired_by(S::Bow)
                .kind(ObjectKind::Ya)),
            (DART, ObjectStats::weapon("dart", Iron, 1, 3, 2, 0, S::Dart)
                .with(ObjectTraits::MISSILE.union(ObjectTraits::POISONABLE))),
            (BOOMERANG, ObjectStats::weapon("boomerang", Wood, 5, 9, 9, 0, S::Boomerang)
                .with(ObjectTraits::MISSILE).kind(ObjectKind::Boomerang)),
            // melee
            (DAGGER, ObjectStats::weapon("dagger", Iron, 10, 4, 3, 2, S::Dagger)
                .with(ObjectTraits::POISONABLE)),
            (SILVER_DAGGER, ObjectStats::weapon("silver dagger", Silver, 12, 4, 3, 2, S::Dagger)
                .with(ObjectTraits::POISONABLE.union(ObjectTraits::SHADE_AWARE))),
            (AXE, ObjectStats::weapon("axe", Iron, 60, 6, 4, 0, S::Axe).with(ObjectTraits::AXE)),
            (BATTLE_AXE, ObjectStats::weapon("battle-axe", Iron, 120, 8, 6, 0, S::Axe)
                .with(ObjectTraits::AXE.union(ObjectTraits::BIMANUAL))),
            (SILVER_SABER, ObjectStats::weapon("silver saber", Silver, 40, 8, 8, 0, S::Saber)
                .with(ObjectTraits::SHADE_AWARE)),
            (LONG_SWORD, ObjectStats::weapon("long sword", Iron, 40, 8, 12, 0, S::LongSword)
                .kind(ObjectKind::LongSword)),
            (TWO_HANDED_SWORD, ObjectStats::weapon("two-handed sword", Iron, 150, 12, 6, 0, S::TwoHandedSword)
                .with(ObjectTraits::BIMANUAL)),
            (KATANA, ObjectStats::weapon("katana", Iron, 40, 10, 12, -2, S::LongSword)
                .kind(ObjectKind::Katana)),
            (LANCE, ObjectStats::weapon("lance", Iron, 180, 6, 8, 0, S::Lance)
                .with(ObjectTraits::POLEARM).kind(ObjectKind::Lance)),
            (MACE, ObjectStats::weapon("mace", Iron, 30, 6, 6, 0, S::Mace)),
            (FLAIL, ObjectStats::weapon("flail", Iron, 15, 6, 4, 0, S::Flail)),
            (CLUB, ObjectStats::weapon("club", Wood, 30, 6, 3, 0, S::Club)),
            (RUNESWORD, ObjectStats::weapon("runesword", Iron, 40, 4, 6, 0, S::BroadSword)),
            // launchers
            (BOW, ObjectStats::weapon("bow", Wood, 30, 2, 2, 0, S::Bow).with(ObjectTraits::LAUNCHER)),
            (ELVEN_BOW, ObjectStats::weapon("elven bow", Wood, 30, 2, 2, 0, S::Bow)
                .with(ObjectTraits::LAUNCHER).kind(ObjectKind::ElvenBow)),
            (YUMI, ObjectStats::weapon("yumi", Wood, 30, 2, 2, 0, S::Bow)
                .with(ObjectTraits::LAUNCHER).kind(ObjectKind::Yumi)),
            (SLING, ObjectStats::weapon("sling", Leather, 3, 2, 2, 0, S::Sling)
                .with(ObjectTraits::LAUNCHER).kind(ObjectKind::Sling)),
            // armor
            (LEATHER_ARMOR, ObjectStats::armor("leather armor", Leather, 150, 2, 0)),
            (PLATE_MAIL, ObjectStats::armor("plate mail", Iron, 450, 7, 2)),
            (ELVEN_MITHRIL_COAT, ObjectStats::armor("elven mithril-coat", Mithril, 150, 5, 3)),
            (HAWAIIAN_SHIRT, ObjectStats::armor("Hawaiian shirt", Cloth, 5, 0, 0)),
            (LEATHER_CLOAK, ObjectStats::armor("leather cloak", Leather, 15, 1, 1)),
            (OILSKIN_CLOAK, ObjectStats::armor("oilskin cloak", Cloth, 10, 1, 3)
                .with(ObjectTraits::SLIPPERY)),
            (CLOAK_OF_MAGIC_RESISTANCE, ObjectStats::armor("cloak of magic resistance", Cloth, 10, 1, 3)
                .magical()),
            (SMALL_SHIELD, ObjectStats::armor("small shield", Wood, 30, 1, 0)),
            (SHIELD_OF_REFLECTION, ObjectStats::armor("shield of reflection", Silver, 50, 2, 0)
                .with(ObjectTraits::REFLECTS).magical()),
            (HELMET, ObjectStats::armor("helmet", Iron, 30, 1, 0)),
            (LEATHER_GLOVES, ObjectStats::armor("leather gloves", Leather, 10, 1, 0)),
            (GAUNTLETS_OF_FUMBLING, ObjectStats::armor("gauntlets of fumbling", Leather, 10, 1, 0)
                .with(ObjectTraits::FUMBLING).magical()),
            (LOW_BOOTS, ObjectStats::armor("low boots", Leather, 10, 1, 0)),
            (FUMBLE_BOOTS, ObjectStats::armor("fumble boots", Leather, 20, 1, 0)
                .with(ObjectTraits::FUMBLING).magical()),
            (LEVITATION_BOOTS, ObjectStats::armor("levitation boots", Leather, 15, 1, 0)
                .with(ObjectTraits::LEVITATION).magical()),
            // accessories
            (RING_OF_PROTECTION, ObjectStats::base("ring of protection", C::Ring, Silver, 3).magical()),
            (RING_OF_LEVITATION, ObjectStats::base("ring of levitation", C::Ring, Gold, 3)
                .with(ObjectTraits::LEVITATION).magical()),
            (RING_OF_SUSTAIN_ABILITY, ObjectStats::base("ring of sustain ability", C::Ring, Copper, 3)
                .with(ObjectTraits::SUSTAIN_ABILITY).magical()),
            (IRON_RING, ObjectStats::base("ring of aggravate monster", C::Ring, Iron, 3).magical()),
            (AMULET_OF_STRANGULATION, ObjectStats::base("amulet of strangulation", C::Amulet, Iron, 20)
                .with(ObjectTraits::STRANGULATION).magical()),
            (AMULET_OF_ESP, ObjectStats::base("amulet of ESP", C::Amulet, Iron, 20).magical()),
            // tools
            (BLINDFOLD, ObjectStats::base("blindfold", C::Tool, Cloth, 2).with(ObjectTraits::BLINDFOLD)),
            (MIRROR, ObjectStats::base("mirror", C::Tool, Glass, 13)
                .with(ObjectTraits::SHADE_AWARE.union(ObjectTraits::BREAKABLE)).kind(ObjectKind::Mirror)),
            (EXPENSIVE_CAMERA, ObjectStats::base("expensive camera", C::Tool, Plastic, 12)
                .kind(ObjectKind::ExpensiveCamera)),
            (SADDLE, ObjectStats::base("saddle", C::Tool, Leather, 200).kind(ObjectKind::Saddle)),
            (PICK_AXE, ObjectStats {
                small_damage: 6,
                large_damage: 3,
                skill: S::PickAxe,
                ..ObjectStats::base("pick-axe", C::Tool, Iron, 100)
            }.with(ObjectTraits::WEPTOOL)),
            // food
            (CORPSE, ObjectStats::base("corpse", C::Food, Flesh, 0).kind(ObjectKind::Corpse)),
            (EGG, ObjectStats::base("egg", C::Food, Flesh, 1).kind(ObjectKind::Egg)),
            (CLOVE_OF_GARLIC, ObjectStats::base("clove of garlic", C::Food, Veggy, 1)
                .with(ObjectTraits::SHADE_AWARE).kind(ObjectKind::CloveOfGarlic)),
            (CREAM_PIE, ObjectStats::base("cream pie", C::Food, Veggy, 10).kind(ObjectKind::CreamPie)),
            // potions
            (POTION_OF_WATER, ObjectStats::base("potion of water", C::Potion, Glass, 20)
                .with(ObjectTraits::WATER).kind(ObjectKind::PotionWater)),
            (POTION_OF_SICKNESS, ObjectStats::base("potion of sickness", C::Potion, Glass, 20)
                .magical().kind(ObjectKind::PotionSickness)),
            (POTION_OF_CONFUSION, ObjectStats::base("potion of confusion", C::Potion, Glass, 20)
                .magical().kind(ObjectKind::PotionConfusion)),
            (POTION_OF_BOOZE, ObjectStats::base("potion of booze", C::Potion, Glass, 20)
                .kind(ObjectKind::PotionBooze)),
            (POTION_OF_SLEEPING, ObjectStats::base("potion of sleeping", C::Potion, Glass, 20)
                .magical().kind(ObjectKind::PotionSleeping)),
            (POTION_OF_PARALYSIS, ObjectStats::base("potion of paralysis", C::Potion, Glass, 20)
                .magical().kind(ObjectKind::PotionParalysis)),
            (POTION_OF_BLINDNESS, ObjectStats::base("potion of blindness", C::Potion, Glass, 20)
                .magical().kind(ObjectKind::PotionBlindness)),
            (POTION_OF_ACID, ObjectStats::base("potion of acid", C::Potion, Glass, 10)
                .kind(ObjectKind::PotionAcid)),
            // books
            (SPE_FINGER_OF_DEATH, ObjectStats::base("spellbook of finger of death", C::Spellbook, Paper, 50)
                .magical().kind(ObjectKind::SpellbookFingerOfDeath)),
            (SPE_RESTORE_ABILITY, ObjectStats::base("spellbook of restore ability", C::Spellbook, Paper, 50)
                .magical().kind(ObjectKind::SpellbookRestoreAbility)),
            (SPE_FORCE_BOLT, ObjectStats::base("spellbook of force bolt", C::Spellbook, Paper, 50)
                .magical().kind(ObjectKind::Spellbook)),
            (WAND_OF_STRIKING, ObjectStats::base("wand of striking", C::Wand, Silver, 7).magical()),
            // stones
            (ROCK, ObjectStats::weapon("rock", Mineral, 10, 3, 3, 0, S::Sling)
                .with(ObjectTraits::AMMO).fired_by(S::Sling)),
            (LOADSTONE, ObjectStats::base("loadstone", C::Gem, Mineral, 500)
                .with(ObjectTraits::LOADSTONE)),
            (LUCKSTONE, ObjectStats::base("luckstone", C::Gem, Mineral, 10)
                .with(ObjectTraits::CONFERS_LUCK)),
            (BOULDER, ObjectStats {
                small_damage: 20,
                large_damage: 20,
                ..ObjectStats::base("boulder", C::Rock, Mineral, 6000)
            }.with(ObjectTraits::SHADE_AWARE).kind(ObjectKind::Boulder)),
            (HEAVY_IRON_BALL, ObjectStats {
                small_damage: 25,
                large_damage: 25,
                ..ObjectStats::base("heavy iron ball", C::Ball, Iron, 480)
            }.with(ObjectTraits::SHADE_AWARE).kind(ObjectKind::HeavyIronBall)),
            (IRON_CHAIN, ObjectStats {
                small_damage: 4,
                large_damage: 4,
                ..ObjectStats::base("iron chain", C::Chain, Iron, 120)
            }.with(ObjectTraits::SHADE_AWARE).kind(ObjectKind::IronChain)),
            // venoms
            (BLINDING_VENOM, ObjectStats::base("splash of blinding venom", C::Venom, Liquid, 1)
                .kind(ObjectKind::BlindingVenom)),
            (ACID_VENOM, ObjectStats {
                small_damage: 6,
                large_damage: 6,
                ..ObjectStats::base("splash of acid venom", C::Venom, Liquid, 1)
            }.kind(ObjectKind::AcidVenom)),
            (VAMPIRE_BLOOD, ObjectStats::base("splash of vampire blood", C::Venom, Liquid, 1)
                .kind(ObjectKind::VampireBlood)),
        ];
        for (otype, stats) in entries {
            cat.insert(otype, stats);
        }
        cat
    }
}

impl ObjectCatalog for StaticCatalog {
    fn stats(&self, otype: ObjectType) -> Option<&ObjectStats> {
        self.entries.get(&otype)
    }

    fn find_kind(&self, kind: ObjectKind) -> Option<ObjectType> {
        self.entries
            .iter()
            .filter(|(_, stats)| stats.kind == kind)
            .map(|(otype, _)| *otype)
            .min()
    }
}
