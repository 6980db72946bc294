//! Combatants: the hero and monsters share one model
//!
//! A [`Combatant`] carries hit points, equipment, status and alignment. The
//! player is tagged with [`CombatRole::Player`] and carries a [`Hero`];
//! monsters carry [`MonsterTraits`]. Rules that only apply to the player ask
//! for [`Combatant::hero`] instead of comparing against a global.

mod alignment;
mod attributes;
mod conduct;
mod equipment;
mod hero;
mod skills;
mod status;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use alignment::{Alignment, AlignmentType};
pub use attributes::{Attribute, Attributes, str18};
pub use conduct::{Conduct, ConductKind};
pub use equipment::{EquipSlot, Equipment};
pub use hero::{
    Afflictions, DivineEvents, Encumbrance, Hero, HungerState, Race, Role, Sickness, Steed,
    alignment_allowed,
};
pub use skills::{SkillLevel, SkillState, Skills, WeaponSkill};
pub use status::{Snare, Status};

use crate::monster::{Resistances, Species};
use crate::object::{Inventory, ObjectCatalog, ObjectTraits};
use crate::world::Position;

/// Unique combatant identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Current and maximum hit points. `current` always stays in `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    current: i32,
    max: i32,
}

impl HitPoints {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub const fn current(&self) -> i32 {
        self.current
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    pub fn set_current(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }

    /// Lose hit points; true once they reach zero
    pub fn damage(&mut self, amount: i32) -> bool {
        if amount > 0 {
            self.set_current(self.current.saturating_sub(amount));
        }
        self.current == 0
    }

    pub fn heal(&mut self, amount: i32) {
        if amount > 0 {
            self.set_current(self.current.saturating_add(amount));
        }
    }

    pub fn heal_full(&mut self) {
        self.current = self.max;
    }

    /// Change the maximum; `current` follows it down if needed
    pub fn set_max(&mut self, max: i32) {
        self.max = max.max(1);
        self.current = self.current.min(self.max);
    }

    pub fn raise_max(&mut self, amount: i32) {
        self.set_max(self.max.saturating_add(amount));
    }

    pub const fn is_low(&self) -> bool {
        use crate::consts::{LOW_HP_FLOOR, LOW_HP_FRACTION};
        self.current < 1 || self.current <= LOW_HP_FLOOR || self.current * LOW_HP_FRACTION <= self.max
    }
}

/// How a combatant died
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Killed(String),
    Petrified,
    Slimed,
    Disintegrated,
    Digested,
    Poisoned,
    /// Level drained to nothing
    Drained,
    Drowned,
    Burned,
    /// Struck down by a deity
    Smitten,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::Killed(by) => write!(f, "killed by {by}"),
            DeathCause::Petrified => f.write_str("turned to stone"),
            DeathCause::Slimed => f.write_str("turned into green slime"),
            DeathCause::Disintegrated => f.write_str("disintegrated"),
            DeathCause::Digested => f.write_str("digested"),
            DeathCause::Poisoned => f.write_str("poisoned"),
            DeathCause::Drained => f.write_str("drained of life"),
            DeathCause::Drowned => f.write_str("drowned"),
            DeathCause::Burned => f.write_str("burned to death"),
            DeathCause::Smitten => f.write_str("smitten by a deity"),
        }
    }
}

/// Duty a monster performs, which changes how attacks on it are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Duty {
    #[default]
    None,
    /// Town watch
    Guard,
    /// Temple priest of the given alignment
    Priest(AlignmentType),
    Shopkeeper,
}

/// Monster-only state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterTraits {
    pub peaceful: bool,
    pub tame: bool,
    pub duty: Duty,
    /// Pudding splits so far
    pub split_count: u16,
    /// Spellcasting exhaustion
    pub spell_cooldown: u16,
    /// Sent by a deity
    pub minion: bool,
    /// Permanently slowed
    pub slow: bool,
    /// Can no longer move by itself (stoned statue in the making)
    pub revived: bool,
}

/// Player or monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatRole {
    Player(Box<Hero>),
    Monster(MonsterTraits),
}

/// Intrinsic properties gained during play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Resistances beyond the species'
    pub resists: Resistances,
    /// Divine protection
    pub protection: bool,
    pub telepathy: bool,
    pub fast: bool,
    pub see_invisible: bool,
    pub free_action: bool,
    pub reflecting: bool,
    pub stealth: bool,
    pub invisible: bool,
}

/// A creature in the fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    /// Personal name; monsters use their species name
    pub name: String,
    pub species: Species,
    pub level: u8,
    pub hp: HitPoints,
    pub attributes: Attributes,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub status: Status,
    pub alignment: Alignment,
    pub intrinsics: Intrinsics,
    pub conduct: Conduct,
    pub role: CombatRole,
    pub position: Position,
    pub gold: u32,
    /// Set exactly once, when the combatant dies
    pub fate: Option<DeathCause>,
}

impl Combatant {
    /// A monster of the given species
    pub fn monster(id: CombatantId, species: Species, max_hp: i32) -> Self {
        Self {
            id,
            name: species.name.clone(),
            level: species.level,
            alignment: Alignment::new(AlignmentType::from_sign(i32::from(species.alignment))),
            species,
            hp: HitPoints::new(max_hp),
            attributes: Attributes::default(),
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            status: Status::new(),
            intrinsics: Intrinsics::default(),
            conduct: Conduct::default(),
            role: CombatRole::Monster(MonsterTraits::default()),
            position: Position::default(),
            gold: 0,
            fate: None,
        }
    }

    /// The player character
    pub fn player(
        id: CombatantId,
        name: &str,
        hero: Hero,
        species: Species,
        level: u8,
        max_hp: i32,
    ) -> Self {
        let alignment = Alignment::new(hero.original_alignment);
        Self {
            id,
            name: name.to_string(),
            level,
            alignment,
            species,
            hp: HitPoints::new(max_hp),
            attributes: Attributes::default(),
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            status: Status::new(),
            intrinsics: Intrinsics::default(),
            conduct: Conduct::default(),
            role: CombatRole::Player(Box::new(hero)),
            position: Position::default(),
            gold: 0,
            fate: None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, CombatRole::Player(_))
    }

    pub fn hero(&self) -> Option<&Hero> {
        match &self.role {
            CombatRole::Player(hero) => Some(hero),
            CombatRole::Monster(_) => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut Hero> {
        match &mut self.role {
            CombatRole::Player(hero) => Some(hero),
            CombatRole::Monster(_) => None,
        }
    }

    pub fn monster_traits(&self) -> Option<&MonsterTraits> {
        match &self.role {
            CombatRole::Monster(traits) => Some(traits),
            CombatRole::Player(_) => None,
        }
    }

    pub fn monster_traits_mut(&mut self) -> Option<&mut MonsterTraits> {
        match &mut self.role {
            CombatRole::Monster(traits) => Some(traits),
            CombatRole::Player(_) => None,
        }
    }

    pub fn is_peaceful(&self) -> bool {
        self.monster_traits().is_some_and(|m| m.peaceful)
    }

    pub fn is_tame(&self) -> bool {
        self.monster_traits().is_some_and(|m| m.tame)
    }

    pub fn is_dead(&self) -> bool {
        self.fate.is_some()
    }

    /// Terminal transition. Returns false when the combatant was already
    /// dead, in which case nothing changes.
    pub fn kill(&mut self, cause: DeathCause) -> bool {
        if self.fate.is_some() {
            return false;
        }
        tracing::debug!(id = %self.id, name = %self.name, %cause, "combatant died");
        self.hp.set_current(0);
        self.fate = Some(cause);
        true
    }

    /// "you" or "the jackal"
    pub fn the_name(&self) -> String {
        if self.is_player() {
            "you".to_string()
        } else if self.species.has(crate::monster::SpeciesFlags::UNIQUE) {
            self.name.clone()
        } else {
            format!("the {}", self.name)
        }
    }

    /// "You" or "The jackal"
    pub fn cap_name(&self) -> String {
        let name = self.the_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }

    /// Base luck plus the carried luck item bonus. Monsters have none.
    pub fn luck(&self, catalog: &dyn ObjectCatalog) -> i32 {
        let Some(hero) = self.hero() else {
            return 0;
        };
        let mut carried = false;
        let mut bias = 0;
        for item in self.inventory.iter() {
            if catalog.lookup(item.otype).traits.contains(ObjectTraits::CONFERS_LUCK) {
                carried = true;
                bias += match item.buc {
                    crate::object::BucStatus::Blessed => 1,
                    crate::object::BucStatus::Uncursed => 0,
                    crate::object::BucStatus::Cursed => -1,
                };
            }
        }
        let bonus = match (carried, bias) {
            (false, _) => 0,
            (true, b) if b >= 0 => 3,
            (true, _) => -3,
        };
        hero.luck + bonus
    }

    /// Armor class: species base, less worn armor and protection
    pub fn armor_class(&self, catalog: &dyn ObjectCatalog) -> i32 {
        let mut ac = i32::from(self.species.ac);
        for (_, item) in self.equipment.armor() {
            let base = i32::from(catalog.lookup(item.otype).ac_bonus);
            ac -= base + i32::from(item.enchantment) - i32::from(item.greatest_erosion()).min(base);
        }
        for slot in EquipSlot::RINGS {
            if let Some(ring) = self.equipment.get(slot) {
                if ring.otype == crate::object::otyp::RING_OF_PROTECTION {
                    ac -= i32::from(ring.enchantment);
                }
            }
        }
        if let Some(hero) = self.hero() {
            ac -= hero.protection_bonus;
        }
        ac
    }

    /// Innate, intrinsic or worn resistance
    pub fn resists(&self, res: Resistances, catalog: &dyn ObjectCatalog) -> bool {
        if self.species.resists(res) || self.intrinsics.resists.contains(res) {
            return true;
        }
        if res == Resistances::DISINT {
            return self
                .equipment
                .iter()
                .any(|(_, item)| catalog.lookup(item.otype).traits.contains(ObjectTraits::DISINT_RES));
        }
        if res == Resistances::MAGIC {
            return self
                .equipment
                .iter()
                .any(|(_, item)| item.otype == crate::object::otyp::CLOAK_OF_MAGIC_RESISTANCE);
        }
        false
    }

    /// Wielded weapon, if any
    pub fn weapon(&self) -> Option<&crate::object::Item> {
        self.equipment.weapon()
    }

    /// Adjust the alignment record; a loss breaks the lost-alignment conduct
    pub fn adjust_alignment(&mut self, delta: i32, moves: u64) {
        if self.alignment.adjust(delta, moves) {
            self.conduct.violate(ConductKind::LostAlign);
        }
    }
}

/// Fixtures shared by the crate's unit tests
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::monster::bestiary;

    /// Level 5 neutral human Valkyrie at full health
    pub fn test_hero() -> Combatant {
        let mut hero = Hero::new(Role::Valkyrie, Race::Human, AlignmentType::Neutral);
        hero.skills = Skills::new()
            .with(WeaponSkill::LongSword, SkillLevel::Basic, SkillLevel::Expert)
            .with(WeaponSkill::Dagger, SkillLevel::Basic, SkillLevel::Expert)
            .with(WeaponSkill::Axe, SkillLevel::Basic, SkillLevel::Expert)
            .with(WeaponSkill::TwoHandedSword, SkillLevel::Basic, SkillLevel::Expert)
            .with(WeaponSkill::TwoWeapon, SkillLevel::Basic, SkillLevel::Skilled)
            .with(WeaponSkill::BareHanded, SkillLevel::Basic, SkillLevel::Expert);
        hero.max_level = 5;
        hero.prayer_timeout = 0;
        let mut you = Combatant::player(CombatantId(0), "Brunhilda", hero, bestiary::human(), 5, 40);
        you.species.ac = 10;
        you.attributes = Attributes::new([16, 10, 10, 12, 16, 10]);
        you.alignment.record = 10;
        you
    }

    /// A hostile monster with `(level + 1) * 5` hit points
    pub fn test_monster(species: Species) -> Combatant {
        let hp = (i32::from(species.level) + 1) * 5;
        Combatant::monster(CombatantId(1), species, hp)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::monster::bestiary;
    use crate::object::{BucStatus, Item, ItemId, StaticCatalog, otyp};

    #[test]
    fn test_hp_clamped() {
        let mut hp = HitPoints::new(10);
        hp.heal(50);
        assert_eq!(hp.current(), 10);
        assert!(hp.damage(30));
        assert_eq!(hp.current(), 0);
        hp.set_current(4);
        hp.set_max(2);
        assert_eq!(hp.current(), 2);
    }

    #[test]
    fn test_low_hp() {
        let mut hp = HitPoints::new(70);
        hp.set_current(10);
        assert!(hp.is_low());
        hp.set_current(11);
        assert!(!hp.is_low());
        let mut small = HitPoints::new(12);
        small.set_current(5);
        assert!(small.is_low());
    }

    #[test]
    fn test_kill_only_once() {
        let mut jackal = test_monster(bestiary::jackal());
        assert!(jackal.kill(DeathCause::Killed("you".into())));
        assert!(!jackal.kill(DeathCause::Petrified));
        assert_eq!(jackal.fate, Some(DeathCause::Killed("you".into())));
        assert_eq!(jackal.hp.current(), 0);
    }

    #[test]
    fn test_names() {
        let hero = test_hero();
        let jackal = test_monster(bestiary::jackal());
        assert_eq!(hero.cap_name(), "You");
        assert_eq!(jackal.the_name(), "the jackal");
        assert_eq!(test_monster(bestiary::medusa()).cap_name(), "Medusa");
    }

    #[test]
    fn test_armor_class() {
        let cat = StaticCatalog::standard();
        let mut hero = test_hero();
        assert_eq!(hero.armor_class(&cat), 10);
        let mut mail = Item::from_catalog(ItemId(1), otyp::PLATE_MAIL, &cat).with_enchantment(2);
        mail.erosion1 = 1;
        hero.equipment.equip(EquipSlot::Body, mail).unwrap();
        assert_eq!(hero.armor_class(&cat), 10 - (7 + 2 - 1));
        hero.hero_mut().unwrap().protection_bonus = 2;
        assert_eq!(hero.armor_class(&cat), 0);
    }

    #[test]
    fn test_luckstone_bonus() {
        let cat = StaticCatalog::standard();
        let mut hero = test_hero();
        assert_eq!(hero.luck(&cat), 0);
        hero.inventory
            .add(Item::from_catalog(ItemId(7), otyp::LUCKSTONE, &cat))
            .unwrap();
        assert_eq!(hero.luck(&cat), 3);
        hero.inventory.get_mut(ItemId(7)).unwrap().buc = BucStatus::Cursed;
        assert_eq!(hero.luck(&cat), -3);
    }

    #[test]
    fn test_alignment_loss_breaks_conduct() {
        let mut hero = test_hero();
        hero.adjust_alignment(-1, 0);
        assert_eq!(hero.alignment.record, 9);
        assert!(!hero.conduct.is_kept(ConductKind::LostAlign));
    }
}
