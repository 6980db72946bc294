//! Player-only state
//!
//! Everything a monster never has: luck, divine standing, skills, conduct
//! side effects, hunger, the steed and the afflictions prayer can fix.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{AlignmentType, CombatantId, HitPoints, Skills};
use crate::consts::{LUCK_MAX, LUCK_MIN};
use crate::monster::Species;
use crate::object::{Item, ObjectType};

/// Player role
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Role {
    Archeologist,
    Barbarian,
    Caveman,
    Healer,
    Knight,
    Monk,
    Priest,
    Ranger,
    Rogue,
    Samurai,
    Tourist,
    #[default]
    Valkyrie,
    Wizard,
}

impl Role {
    /// Trained in martial arts
    pub const fn is_martial(&self) -> bool {
        matches!(self, Role::Monk | Role::Priest | Role::Samurai)
    }

    /// Whether members of this role may follow `alignment`
    pub const fn allows(&self, alignment: AlignmentType) -> bool {
        use AlignmentType::*;
        match self {
            Role::Archeologist | Role::Caveman | Role::Valkyrie => matches!(alignment, Lawful | Neutral),
            Role::Barbarian | Role::Ranger | Role::Wizard => matches!(alignment, Neutral | Chaotic),
            Role::Healer | Role::Tourist => matches!(alignment, Neutral),
            Role::Knight | Role::Samurai => matches!(alignment, Lawful),
            Role::Rogue => matches!(alignment, Chaotic),
            Role::Monk | Role::Priest => matches!(alignment, Lawful | Neutral | Chaotic),
        }
    }
}

/// Player race
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Gnome,
    Orc,
}

impl Race {
    pub const fn allows(&self, alignment: AlignmentType) -> bool {
        use AlignmentType::*;
        match self {
            Race::Human => matches!(alignment, Lawful | Neutral | Chaotic),
            Race::Elf | Race::Orc => matches!(alignment, Chaotic),
            Race::Dwarf => matches!(alignment, Lawful),
            Race::Gnome => matches!(alignment, Neutral),
        }
    }
}

/// A role, race and alignment combination a hero can actually start with
pub const fn alignment_allowed(role: Role, race: Race, alignment: AlignmentType) -> bool {
    role.allows(alignment) && race.allows(alignment)
}

/// Encumbrance levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Display,
)]
#[repr(u8)]
pub enum Encumbrance {
    #[default]
    Unencumbered = 0,
    Burdened = 1,
    Stressed = 2,
    Strained = 3,
    Overtaxed = 4,
    Overloaded = 5,
}

impl Encumbrance {
    pub const fn tier(&self) -> i32 {
        *self as i32
    }
}

/// Hunger states the rules care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum HungerState {
    Satiated,
    NotHungry,
    Hungry,
    Weak,
    Fainting,
}

impl HungerState {
    pub const fn from_nutrition(nutrition: i32) -> Self {
        match nutrition {
            1001.. => HungerState::Satiated,
            151..=1000 => HungerState::NotHungry,
            51..=150 => HungerState::Hungry,
            1..=50 => HungerState::Weak,
            _ => HungerState::Fainting,
        }
    }
}

/// Ridden monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Steed {
    pub name: String,
    pub saddle: Option<Item>,
}

/// What kind of sickness is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sickness {
    FoodPoisoning,
    Illness,
}

/// Slow deaths and lingering conditions. Timers count down to the fatal turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Afflictions {
    pub stoned: u16,
    pub slimed: u16,
    pub strangled: u16,
    pub sick: u16,
    pub sickness: Option<Sickness>,
    /// Name of the were-form carried
    pub lycanthrope: Option<String>,
    pub wounded_legs: u16,
    /// Ball and chain attached
    pub punished: bool,
}

/// One-time divine milestones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivineEvents {
    /// 0 none, 1 Hand of Elbereth, 2 Envoy of Balance, 3 Glory of Arioch
    pub crowned: u8,
    /// How much of the castle tune the hero has been told (0..=2)
    pub heard_tune: u8,
    pub opened_drawbridge: bool,
    /// The quest artifact was brought back
    pub quest_completed: bool,
}

/// Player-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub role: Role,
    pub race: Race,
    pub female: bool,
    /// Alignment chosen at the start; conversion changes the current one
    pub original_alignment: AlignmentType,
    pub converted: bool,
    /// Highest experience level reached
    pub max_level: u8,

    pub luck: i32,
    pub god_anger: i32,
    pub prayer_timeout: i32,
    /// Divine protection (AC bonus)
    pub protection_bonus: i32,
    /// Demigod status after the Amulet
    pub demigod: bool,
    pub events: DivineEvents,
    /// Artifact gifts received
    pub gifts: u32,
    /// Turn of the last sacrifice gift
    pub last_gift_turn: u64,

    pub hit_bonus: i32,
    pub damage_bonus: i32,
    pub nutrition: i32,
    pub encumbrance: Encumbrance,
    pub skills: Skills,
    pub steed: Option<Steed>,
    pub two_weapon: bool,
    /// Monster holding or held by the hero
    pub stuck_to: Option<CombatantId>,
    pub engulfed_by: Option<CombatantId>,
    /// Next hit confuses (read from a scroll of confuse monster)
    pub confusing_touch: bool,
    /// Natural form and hit points while polymorphed
    pub original_form: Option<(Species, HitPoints)>,
    pub afflictions: Afflictions,
    /// Polymorph control via unchanging
    pub unchanging: bool,
    /// Prayer in progress; nothing can hurt the hero
    pub invulnerable: bool,
    pub aggravate: bool,
    /// Fainted from hunger
    pub fainted: bool,
    pub known_spells: Vec<ObjectType>,
    /// Turned into something that cannot use its hands
    pub handless: bool,
}

impl Hero {
    pub fn new(role: Role, race: Race, alignment: AlignmentType) -> Self {
        Self {
            role,
            race,
            female: false,
            original_alignment: alignment,
            converted: false,
            max_level: 1,
            luck: 0,
            god_anger: 0,
            prayer_timeout: 300,
            protection_bonus: 0,
            demigod: false,
            events: DivineEvents::default(),
            gifts: 0,
            last_gift_turn: 0,
            hit_bonus: 0,
            damage_bonus: 0,
            nutrition: 900,
            encumbrance: Encumbrance::Unencumbered,
            skills: Skills::new(),
            steed: None,
            two_weapon: false,
            stuck_to: None,
            engulfed_by: None,
            confusing_touch: false,
            original_form: None,
            afflictions: Afflictions::default(),
            unchanging: false,
            invulnerable: false,
            aggravate: false,
            fainted: false,
            known_spells: Vec::new(),
            handless: false,
        }
    }

    pub fn is_polymorphed(&self) -> bool {
        self.original_form.is_some()
    }

    pub fn is_riding(&self) -> bool {
        self.steed.is_some()
    }

    pub fn hunger(&self) -> HungerState {
        HungerState::from_nutrition(self.nutrition)
    }

    /// Change base luck, keeping it within bounds
    pub fn change_luck(&mut self, delta: i32) {
        self.luck = (self.luck + delta).clamp(LUCK_MIN, LUCK_MAX);
    }

    /// Multiplier for the extra cooldown after a prayer. Demigods and, when
    /// Elbereth is enabled, crowned heroes earn one each.
    pub fn kick_on_butt(&self, elbereth: bool) -> i32 {
        i32::from(self.demigod) + i32::from(elbereth && self.events.crowned > 0)
    }

    pub fn knows_spell(&self, book: ObjectType) -> bool {
        self.known_spells.contains(&book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luck_clamped() {
        let mut hero = Hero::new(Role::Priest, Race::Human, AlignmentType::Neutral);
        hero.change_luck(25);
        assert_eq!(hero.luck, LUCK_MAX);
        hero.change_luck(-40);
        assert_eq!(hero.luck, LUCK_MIN);
    }

    #[test]
    fn test_hunger_bands() {
        assert_eq!(HungerState::from_nutrition(900), HungerState::NotHungry);
        assert_eq!(HungerState::from_nutrition(150), HungerState::Hungry);
        assert_eq!(HungerState::from_nutrition(50), HungerState::Weak);
        assert_eq!(HungerState::from_nutrition(0), HungerState::Fainting);
    }

    #[test]
    fn test_kick_on_butt() {
        let mut hero = Hero::new(Role::Knight, Race::Human, AlignmentType::Lawful);
        assert_eq!(hero.kick_on_butt(true), 0);
        hero.demigod = true;
        hero.events.crowned = 1;
        assert_eq!(hero.kick_on_butt(true), 2);
        assert_eq!(hero.kick_on_butt(false), 1);
    }

    #[test]
    fn test_alignment_allowed() {
        assert!(alignment_allowed(Role::Valkyrie, Race::Human, AlignmentType::Neutral));
        assert!(alignment_allowed(Role::Valkyrie, Race::Dwarf, AlignmentType::Lawful));
        assert!(!alignment_allowed(Role::Valkyrie, Race::Human, AlignmentType::Chaotic));
        assert!(!alignment_allowed(Role::Wizard, Race::Dwarf, AlignmentType::Lawful));
        assert!(alignment_allowed(Role::Priest, Race::Elf, AlignmentType::Chaotic));
        assert!(!alignment_allowed(Role::Priest, Race::Human, AlignmentType::Unaligned));
    }

    #[test]
    fn test_martial_roles() {
        assert!(Role::Monk.is_martial());
        assert!(!Role::Valkyrie.is_martial());
    }
}
