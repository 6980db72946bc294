//! Species the rules and tests refer to by name
//!
//! This is not a full monster table; it covers the forms with attacks or
//! passives the engines special-case, plus a few ordinary foes.

use crate::combat::{Attack, AttackType as At, DamageType as Ad};
use crate::consts::NATTK;

use super::{MonsterSize, Resistances, Species, SpeciesFlags as F, SpeciesKind};

struct Template {
    species: Species,
}

impl Template {
    fn new(name: &str, level: u8, speed: u8, ac: i8, mr: u8, alignment: i8) -> Self {
        Self {
            species: Species {
                level,
                speed,
                ac,
                mr,
                alignment,
                ..Species::named(name)
            },
        }
    }

    fn kind(mut self, kind: SpeciesKind) -> Self {
        self.species.kind = kind;
        self
    }

    fn size(mut self, size: MonsterSize, weight: u32, nutrition: u32) -> Self {
        self.species.size = size;
        self.species.weight = weight;
        self.species.nutrition = nutrition;
        self
    }

    fn flags(mut self, flags: F) -> Self {
        self.species.flags = flags;
        self
    }

    fn resists(mut self, resists: Resistances) -> Self {
        self.species.resists = resists;
        self
    }

    fn attacks(mut self, attacks: &[(At, Ad, u8, u8)]) -> Self {
        for (slot, &(at, ad, n, d)) in attacks.iter().take(NATTK).enumerate() {
            self.species.attacks[slot] = Attack::new(at, ad, n, d);
        }
        self
    }

    fn build(self) -> Species {
        self.species
    }
}

const HUMANOID: F = F::HUMANOID.union(F::CARNIVORE).union(F::HERBIVORE);

pub fn human() -> Species {
    Template::new("human", 0, 12, 10, 0, 0)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(HUMANOID.union(F::HUMAN))
        .attacks(&[(At::Weapon, Ad::Physical, 1, 6)])
        .build()
}

pub fn elf() -> Species {
    Template::new("elf", 10, 12, 10, 2, -3)
        .size(MonsterSize::Medium, 800, 350)
        .flags(HUMANOID.union(F::ELF).union(F::HATES_IRON))
        .resists(Resistances::SLEEP)
        .attacks(&[(At::Weapon, Ad::Physical, 1, 8)])
        .build()
}

pub fn hill_orc() -> Species {
    Template::new("hill orc", 1, 9, 10, 0, -4)
        .size(MonsterSize::Medium, 1000, 200)
        .flags(HUMANOID.union(F::ORC))
        .resists(Resistances::POISON)
        .attacks(&[(At::Weapon, Ad::Physical, 1, 6)])
        .build()
}

pub fn jackal() -> Species {
    Template::new("jackal", 0, 12, 7, 0, -7)
        .size(MonsterSize::Small, 300, 250)
        .flags(F::ANIMAL | F::NOHANDS | F::CARNIVORE)
        .attacks(&[(At::Bite, Ad::Physical, 1, 2)])
        .build()
}

pub fn watchman() -> Species {
    Template::new("watchman", 10, 10, 10, 0, -2)
        .kind(SpeciesKind::Watchman)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(HUMANOID.union(F::HUMAN))
        .attacks(&[(At::Weapon, Ad::Physical, 1, 8)])
        .build()
}

pub fn aligned_priest() -> Species {
    Template::new("aligned priest", 12, 12, 10, 50, 0)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(HUMANOID.union(F::HUMAN))
        .attacks(&[
            (At::Weapon, Ad::Physical, 4, 10),
            (At::Magic, Ad::ClericSpell, 0, 0),
        ])
        .build()
}

pub fn shade() -> Species {
    Template::new("shade", 12, 10, 10, 0, 0)
        .kind(SpeciesKind::Shade)
        .size(MonsterSize::Medium, 1450, 0)
        .flags(F::FLYER | F::PASSES_WALLS | F::HUMANOID | F::UNSOLID | F::NONCORPOREAL | F::UNDEAD)
        .resists(Resistances::SLEEP | Resistances::POISON | Resistances::COLD)
        .attacks(&[(At::Touch, Ad::Paralyze, 2, 6), (At::Touch, Ad::Slow, 1, 6)])
        .build()
}

pub fn floating_eye() -> Species {
    Template::new("floating eye", 2, 1, 9, 10, 0)
        .kind(SpeciesKind::FloatingEye)
        .size(MonsterSize::Small, 10, 10)
        .flags(F::FLYER | F::AMPHIBIOUS | F::NOLIMBS | F::NOHANDS | F::NOHEAD)
        .attacks(&[(At::None, Ad::Paralyze, 0, 70)])
        .build()
}

pub fn black_pudding() -> Species {
    Template::new("black pudding", 10, 3, 6, 0, 0)
        .kind(SpeciesKind::BlackPudding)
        .size(MonsterSize::Large, 900, 250)
        .flags(F::SWIMMER | F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::COLD | Resistances::SHOCK | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::Bite, Ad::Corrode, 3, 8), (At::None, Ad::Corrode, 0, 0)])
        .build()
}

pub fn brown_pudding() -> Species {
    Template::new("brown pudding", 5, 3, 8, 0, 0)
        .kind(SpeciesKind::BrownPudding)
        .size(MonsterSize::Medium, 500, 250)
        .flags(F::SWIMMER | F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::COLD | Resistances::SHOCK | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::Bite, Ad::Decay, 0, 0), (At::None, Ad::Decay, 0, 0)])
        .build()
}

pub fn green_slime() -> Species {
    Template::new("green slime", 6, 6, 6, 0, 0)
        .kind(SpeciesKind::GreenSlime)
        .size(MonsterSize::Large, 400, 150)
        .flags(F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::COLD | Resistances::SHOCK | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::Touch, Ad::Slime, 1, 4), (At::None, Ad::Slime, 0, 0)])
        .build()
}

fn golem(name: &str, kind: SpeciesKind, level: u8, ac: i8, mr: u8, weight: u32) -> Template {
    Template::new(name, level, 8, ac, mr, 0)
        .kind(kind)
        .size(MonsterSize::Large, weight, 0)
        .flags(F::HUMANOID | F::MINDLESS | F::GOLEM)
        .resists(Resistances::SLEEP | Resistances::POISON)
}

pub fn straw_golem() -> Species {
    golem("straw golem", SpeciesKind::StrawGolem, 3, 10, 0, 400)
        .attacks(&[(At::Claw, Ad::Physical, 1, 2), (At::Claw, Ad::Physical, 1, 2)])
        .build()
}

pub fn paper_golem() -> Species {
    golem("paper golem", SpeciesKind::PaperGolem, 3, 10, 0, 400)
        .attacks(&[(At::Touch, Ad::Physical, 1, 3)])
        .build()
}

pub fn wood_golem() -> Species {
    golem("wood golem", SpeciesKind::WoodGolem, 7, 4, 0, 900)
        .attacks(&[(At::Claw, Ad::Physical, 3, 4)])
        .build()
}

pub fn leather_golem() -> Species {
    golem("leather golem", SpeciesKind::LeatherGolem, 6, 6, 0, 800)
        .attacks(&[(At::Claw, Ad::Physical, 1, 6), (At::Claw, Ad::Physical, 1, 6)])
        .build()
}

pub fn clay_golem() -> Species {
    golem("clay golem", SpeciesKind::ClayGolem, 11, 7, 40, 1550)
        .attacks(&[(At::Claw, Ad::Physical, 3, 10)])
        .build()
}

pub fn iron_golem() -> Species {
    let mut t = golem("iron golem", SpeciesKind::IronGolem, 18, 3, 60, 2000)
        .attacks(&[(At::Weapon, Ad::Physical, 4, 10), (At::Breath, Ad::DrainStrength, 4, 6)]);
    t.species.resists |= Resistances::FIRE | Resistances::COLD | Resistances::SHOCK;
    t.build()
}

pub fn cockatrice() -> Species {
    Template::new("cockatrice", 5, 6, 6, 30, 0)
        .kind(SpeciesKind::Cockatrice)
        .size(MonsterSize::Small, 30, 30)
        .flags(F::ANIMAL | F::NOHANDS | F::CARNIVORE | F::TOUCH_PETRIFIES)
        .resists(Resistances::POISON | Resistances::STONE)
        .attacks(&[
            (At::Bite, Ad::Physical, 1, 3),
            (At::Touch, Ad::Stone, 0, 0),
            (At::None, Ad::Stone, 0, 0),
        ])
        .build()
}

pub fn acid_blob() -> Species {
    Template::new("acid blob", 1, 3, 8, 0, 0)
        .kind(SpeciesKind::AcidBlob)
        .size(MonsterSize::Tiny, 30, 30)
        .flags(F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::SLEEP | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::None, Ad::Acid, 1, 8)])
        .build()
}

pub fn blue_jelly() -> Species {
    Template::new("blue jelly", 4, 0, 8, 10, 0)
        .size(MonsterSize::Medium, 50, 20)
        .flags(F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::COLD | Resistances::POISON)
        .attacks(&[(At::None, Ad::Cold, 0, 6)])
        .build()
}

pub fn red_mold() -> Species {
    Template::new("red mold", 3, 0, 9, 0, 0)
        .size(MonsterSize::Small, 50, 30)
        .flags(F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::FIRE | Resistances::POISON)
        .attacks(&[(At::None, Ad::Fire, 0, 4)])
        .build()
}

pub fn yellow_mold() -> Species {
    Template::new("yellow mold", 1, 0, 9, 0, 0)
        .size(MonsterSize::Small, 50, 30)
        .flags(F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::POISON)
        .attacks(&[(At::None, Ad::Stun, 1, 4)])
        .build()
}

pub fn shocking_sphere() -> Species {
    Template::new("shocking sphere", 6, 13, 8, 10, 0)
        .size(MonsterSize::Small, 10, 10)
        .flags(F::FLYER | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::SHOCK)
        .attacks(&[(At::Explode, Ad::Electric, 4, 6)])
        .build()
}

pub fn gelatinous_cube() -> Species {
    Template::new("gelatinous cube", 6, 6, 8, 0, 0)
        .size(MonsterSize::Large, 600, 150)
        .flags(F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::FIRE | Resistances::COLD | Resistances::SHOCK | Resistances::SLEEP | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[
            (At::Touch, Ad::Paralyze, 2, 4),
            (At::Engulf, Ad::Paralyze, 1, 4),
            (At::None, Ad::Paralyze, 1, 4),
        ])
        .build()
}

pub fn disenchanter() -> Species {
    Template::new("disenchanter", 12, 12, -10, 0, -3)
        .size(MonsterSize::Large, 750, 200)
        .flags(F::ANIMAL | F::CARNIVORE)
        .attacks(&[(At::Claw, Ad::Disenchant, 4, 4), (At::None, Ad::Disenchant, 0, 0)])
        .build()
}

pub fn rust_monster() -> Species {
    Template::new("rust monster", 5, 18, 2, 0, 0)
        .size(MonsterSize::Medium, 1000, 250)
        .flags(F::SWIMMER | F::ANIMAL | F::NOHANDS)
        .attacks(&[
            (At::Touch, Ad::Rust, 0, 0),
            (At::Touch, Ad::Rust, 0, 0),
            (At::None, Ad::Rust, 0, 0),
        ])
        .build()
}

pub fn yellow_light() -> Species {
    Template::new("yellow light", 3, 13, 0, 0, 0)
        .size(MonsterSize::Small, 0, 0)
        .flags(F::FLYER | F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS | F::UNSOLID)
        .resists(Resistances::FIRE | Resistances::COLD | Resistances::SHOCK | Resistances::DISINT | Resistances::SLEEP | Resistances::POISON | Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::Explode, Ad::Blind, 10, 20)])
        .build()
}

pub fn fog_cloud() -> Species {
    Template::new("fog cloud", 3, 1, 0, 0, 0)
        .kind(SpeciesKind::FogCloud)
        .size(MonsterSize::Huge, 0, 0)
        .flags(F::FLYER | F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS | F::UNSOLID | F::WHIRLY)
        .resists(Resistances::SLEEP | Resistances::POISON | Resistances::STONE)
        .attacks(&[(At::Engulf, Ad::Physical, 1, 6)])
        .build()
}

pub fn purple_worm() -> Species {
    Template::new("purple worm", 15, 9, 6, 20, 0)
        .size(MonsterSize::Gigantic, 2700, 700)
        .flags(F::ANIMAL | F::NOHANDS | F::CARNIVORE | F::SLITHY | F::NOLIMBS)
        .attacks(&[(At::Bite, Ad::Physical, 2, 8), (At::Engulf, Ad::Digest, 1, 10)])
        .build()
}

pub fn ochre_jelly() -> Species {
    Template::new("ochre jelly", 6, 3, 8, 20, 0)
        .size(MonsterSize::Medium, 50, 20)
        .flags(F::AMORPHOUS | F::NOEYES | F::NOLIMBS | F::NOHANDS | F::NOHEAD | F::MINDLESS)
        .resists(Resistances::ACID | Resistances::STONE)
        .attacks(&[(At::Engulf, Ad::Acid, 3, 6), (At::None, Ad::Acid, 3, 6)])
        .build()
}

pub fn owlbear() -> Species {
    Template::new("owlbear", 5, 12, 5, 0, 0)
        .size(MonsterSize::Large, 1700, 700)
        .flags(F::ANIMAL | F::NOHANDS | F::CARNIVORE)
        .attacks(&[
            (At::Claw, Ad::Physical, 1, 6),
            (At::Claw, Ad::Physical, 1, 6),
            (At::Hug, Ad::Wrap, 2, 8),
        ])
        .build()
}

pub fn mind_flayer() -> Species {
    Template::new("mind flayer", 9, 12, 5, 90, -8)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(F::HUMANOID | F::FLYER | F::CARNIVORE)
        .attacks(&[
            (At::Weapon, Ad::Physical, 1, 4),
            (At::Tentacle, Ad::DrainIntelligence, 2, 1),
        ])
        .build()
}

pub fn giant_spider() -> Species {
    Template::new("giant spider", 5, 15, 4, 0, 0)
        .size(MonsterSize::Large, 100, 100)
        .flags(F::ANIMAL | F::NOHANDS | F::CARNIVORE | F::WEBMAKER)
        .resists(Resistances::POISON)
        .attacks(&[(At::Bite, Ad::DrainStrength, 2, 4)])
        .build()
}

pub fn vampire() -> Species {
    Template::new("vampire", 10, 12, 1, 25, -8)
        .size(MonsterSize::Medium, 1450, 0)
        .flags(F::FLYER | F::HUMANOID | F::UNDEAD | F::HATES_SILVER)
        .resists(Resistances::SLEEP | Resistances::POISON)
        .attacks(&[(At::Claw, Ad::Physical, 1, 6), (At::Bite, Ad::DrainLife, 1, 6)])
        .build()
}

pub fn mummy() -> Species {
    Template::new("human mummy", 6, 12, 4, 30, -5)
        .size(MonsterSize::Medium, 1450, 200)
        .flags(F::HUMANOID | F::MINDLESS | F::UNDEAD | F::ZOMBIE_MUMMY)
        .resists(Resistances::COLD | Resistances::SLEEP | Resistances::POISON)
        .attacks(&[(At::Claw, Ad::Physical, 2, 4), (At::Claw, Ad::Physical, 2, 4)])
        .build()
}

pub fn werewolf() -> Species {
    Template::new("werewolf", 5, 12, 10, 20, -7)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(HUMANOID.union(F::HUMAN).union(F::WERE).union(F::HATES_SILVER))
        .resists(Resistances::POISON)
        .attacks(&[(At::Weapon, Ad::Physical, 2, 4)])
        .build()
}

pub fn succubus() -> Species {
    Template::new("succubus", 6, 12, 0, 70, -9)
        .kind(SpeciesKind::Succubus)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(F::HUMANOID | F::FLYER | F::DEMON | F::FEMALE | F::HATES_SILVER)
        .resists(Resistances::FIRE | Resistances::POISON)
        .attacks(&[
            (At::Bite, Ad::SeduceSpecial, 0, 0),
            (At::Claw, Ad::Physical, 1, 3),
            (At::Claw, Ad::Physical, 1, 3),
        ])
        .build()
}

pub fn imp() -> Species {
    Template::new("imp", 3, 12, 2, 20, -7)
        .size(MonsterSize::Tiny, 20, 10)
        .flags(F::HUMANOID | F::DEMON | F::HATES_SILVER)
        .attacks(&[(At::Claw, Ad::Physical, 1, 4)])
        .build()
}

pub fn water_nymph() -> Species {
    Template::new("water nymph", 3, 12, 9, 20, 0)
        .size(MonsterSize::Medium, 600, 300)
        .flags(F::HUMANOID | F::SWIMMER | F::NYMPH | F::FEMALE)
        .attacks(&[(At::Claw, Ad::StealItem, 0, 0), (At::Claw, Ad::Seduce, 0, 0)])
        .build()
}

pub fn leprechaun() -> Species {
    Template::new("leprechaun", 5, 15, 8, 20, 0)
        .kind(SpeciesKind::Leprechaun)
        .size(MonsterSize::Tiny, 60, 30)
        .flags(F::HUMANOID)
        .attacks(&[(At::Claw, Ad::StealGold, 1, 2)])
        .build()
}

pub fn medusa() -> Species {
    Template::new("Medusa", 20, 12, 2, 50, -15)
        .kind(SpeciesKind::Medusa)
        .size(MonsterSize::Large, 1450, 400)
        .flags(F::FLYER | F::SWIMMER | F::AMPHIBIOUS | F::HUMANOID | F::UNIQUE | F::FEMALE)
        .resists(Resistances::POISON | Resistances::STONE)
        .attacks(&[
            (At::Weapon, Ad::Physical, 2, 4),
            (At::Claw, Ad::Physical, 1, 8),
            (At::Gaze, Ad::Stone, 0, 0),
            (At::Bite, Ad::DrainStrength, 1, 6),
        ])
        .build()
}

pub fn death() -> Species {
    Template::new("Death", 30, 12, -5, 100, 0)
        .kind(SpeciesKind::Rider)
        .size(MonsterSize::Medium, 1450, 1)
        .flags(F::FLYER | F::HUMANOID | F::UNIQUE)
        .resists(Resistances::FIRE | Resistances::COLD | Resistances::SHOCK | Resistances::SLEEP | Resistances::POISON | Resistances::STONE)
        .attacks(&[(At::Touch, Ad::Death, 8, 8), (At::Touch, Ad::Death, 8, 8)])
        .build()
}

fn unicorn(name: &str, alignment: i8) -> Species {
    Template::new(name, 4, 24, 2, 70, alignment)
        .kind(SpeciesKind::Unicorn)
        .size(MonsterSize::Large, 1300, 300)
        .flags(F::NOHANDS | F::ANIMAL | F::HERBIVORE)
        .resists(Resistances::POISON)
        .attacks(&[(At::Butt, Ad::Physical, 1, 12), (At::Kick, Ad::Physical, 1, 6)])
        .build()
}

pub fn white_unicorn() -> Species {
    unicorn("white unicorn", 7)
}

pub fn gray_unicorn() -> Species {
    unicorn("gray unicorn", 0)
}

pub fn black_unicorn() -> Species {
    unicorn("black unicorn", -7)
}

/// Hostile servant sent by an angry deity
pub fn minion(alignment: i8) -> Species {
    let (name, demon) = match alignment.signum() {
        1 => ("Angel", false),
        0 => ("air elemental", false),
        _ => ("hezrou", true),
    };
    let flags = if demon { F::DEMON | F::HUMANOID } else { F::FLYER | F::HUMANOID };
    Template::new(name, 14, 10, -4, 55, alignment)
        .size(MonsterSize::Medium, 1450, 400)
        .flags(flags)
        .attacks(&[(At::Weapon, Ad::Physical, 1, 6), (At::Weapon, Ad::Physical, 1, 6)])
        .build()
}

/// Look a species up by its display name
pub fn by_name(name: &str) -> Option<Species> {
    let builder: fn() -> Species = match name {
        "human" => human,
        "elf" => elf,
        "hill orc" => hill_orc,
        "jackal" => jackal,
        "watchman" => watchman,
        "aligned priest" => aligned_priest,
        "shade" => shade,
        "floating eye" => floating_eye,
        "black pudding" => black_pudding,
        "brown pudding" => brown_pudding,
        "green slime" => green_slime,
        "straw golem" => straw_golem,
        "paper golem" => paper_golem,
        "wood golem" => wood_golem,
        "leather golem" => leather_golem,
        "clay golem" => clay_golem,
        "iron golem" => iron_golem,
        "cockatrice" => cockatrice,
        "acid blob" => acid_blob,
        "white unicorn" => white_unicorn,
        "gray unicorn" => gray_unicorn,
        "black unicorn" => black_unicorn,
        "blue jelly" => blue_jelly,
        "red mold" => red_mold,
        "yellow mold" => yellow_mold,
        "shocking sphere" => shocking_sphere,
        "gelatinous cube" => gelatinous_cube,
        "disenchanter" => disenchanter,
        "rust monster" => rust_monster,
        "yellow light" => yellow_light,
        "fog cloud" => fog_cloud,
        "purple worm" => purple_worm,
        "ochre jelly" => ochre_jelly,
        "owlbear" => owlbear,
        "mind flayer" => mind_flayer,
        "giant spider" => giant_spider,
        "vampire" => vampire,
        "human mummy" => mummy,
        "werewolf" => werewolf,
        "succubus" => succubus,
        "imp" => imp,
        "water nymph" => water_nymph,
        "leprechaun" => leprechaun,
        "Medusa" => medusa,
        "Death" => death,
        _ => return None,
    };
    Some(builder())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let eye = by_name("floating eye").unwrap();
        assert_eq!(eye.kind, SpeciesKind::FloatingEye);
        assert_eq!(eye.passive_attack().map(|a| a.damage_type), Some(Ad::Paralyze));
        assert!(by_name("grid bug").is_none());
    }

    #[test]
    fn test_cockatrice_is_dangerous_to_touch() {
        let c = cockatrice();
        assert!(c.touch_petrifies());
        assert!(c.resists(Resistances::STONE));
    }

    #[test]
    fn test_golems_flagged() {
        assert!(iron_golem().is_golem());
        assert!(iron_golem().resists(Resistances::FIRE));
        assert!(!jackal().is_golem());
    }
}
