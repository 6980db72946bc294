//! Weapon skills and the hit/damage bonuses they grant

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Skill level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
#[repr(u8)]
pub enum SkillLevel {
    /// Cannot be trained
    #[default]
    Restricted = 0,
    Unskilled = 1,
    Basic = 2,
    Skilled = 3,
    Expert = 4,
    /// Martial arts and riding only
    Master = 5,
    GrandMaster = 6,
}

impl SkillLevel {
    pub const fn value(&self) -> i32 {
        *self as i32
    }

    /// Practice needed to leave this level
    pub const fn advance_threshold(&self) -> u16 {
        match self {
            SkillLevel::Restricted | SkillLevel::GrandMaster => 0,
            SkillLevel::Unskilled => 20,
            SkillLevel::Basic => 80,
            SkillLevel::Skilled => 180,
            SkillLevel::Expert => 320,
            SkillLevel::Master => 500,
        }
    }

    pub const fn next(&self) -> Option<Self> {
        match self {
            SkillLevel::Restricted | SkillLevel::GrandMaster => None,
            SkillLevel::Unskilled => Some(SkillLevel::Basic),
            SkillLevel::Basic => Some(SkillLevel::Skilled),
            SkillLevel::Skilled => Some(SkillLevel::Expert),
            SkillLevel::Expert => Some(SkillLevel::Master),
            SkillLevel::Master => Some(SkillLevel::GrandMaster),
        }
    }
}

/// Weapon and combat skills
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum WeaponSkill {
    /// Not a weapon at all
    #[default]
    None,
    Dagger,
    Knife,
    Axe,
    PickAxe,
    ShortSword,
    BroadSword,
    LongSword,
    TwoHandedSword,
    Scimitar,
    Saber,
    Club,
    Mace,
    MorningStar,
    Flail,
    Hammer,
    Quarterstaff,
    Polearms,
    Spear,
    Trident,
    Lance,
    Bow,
    Sling,
    Crossbow,
    Dart,
    Shuriken,
    Boomerang,
    Whip,
    UnicornHorn,
    BareHanded,
    TwoWeapon,
    Riding,
}

impl WeaponSkill {
    /// One of the weapon categories (as opposed to the combat skills)
    pub const fn is_weapon(&self) -> bool {
        !matches!(
            self,
            WeaponSkill::None
                | WeaponSkill::BareHanded
                | WeaponSkill::TwoWeapon
                | WeaponSkill::Riding
        )
    }
}

/// Level, cap and practice for one skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillState {
    pub level: SkillLevel,
    pub max: SkillLevel,
    pub practice: u16,
}

impl SkillState {
    pub const fn new(level: SkillLevel, max: SkillLevel) -> Self {
        Self {
            level,
            max,
            practice: 0,
        }
    }

    pub fn can_advance(&self) -> bool {
        self.level < self.max && self.practice >= self.level.advance_threshold()
    }
}

/// Everything the hero has trained. Skills absent from the map are restricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    states: HashMap<WeaponSkill, SkillState>,
}

impl Skills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: WeaponSkill, level: SkillLevel, max: SkillLevel) -> Self {
        self.set(skill, level, max);
        self
    }

    pub fn set(&mut self, skill: WeaponSkill, level: SkillLevel, max: SkillLevel) {
        self.states.insert(skill, SkillState::new(level, max.max(level)));
    }

    pub fn level(&self, skill: WeaponSkill) -> SkillLevel {
        self.states
            .get(&skill)
            .map_or(SkillLevel::Restricted, |s| s.level)
    }

    pub fn max_level(&self, skill: WeaponSkill) -> SkillLevel {
        self.states
            .get(&skill)
            .map_or(SkillLevel::Restricted, |s| s.max)
    }

    pub fn is_restricted(&self, skill: WeaponSkill) -> bool {
        self.level(skill) == SkillLevel::Restricted
    }

    /// Open up a restricted skill: unskilled now, basic at most
    pub fn unrestrict(&mut self, skill: WeaponSkill) {
        if skill == WeaponSkill::None || !self.is_restricted(skill) {
            return;
        }
        self.states.insert(
            skill,
            SkillState::new(SkillLevel::Unskilled, SkillLevel::Basic),
        );
        tracing::debug!(%skill, "skill unrestricted");
    }

    /// Record successful use
    pub fn practice(&mut self, skill: WeaponSkill, amount: u16) {
        if let Some(state) = self.states.get_mut(&skill) {
            if state.level != SkillLevel::Restricted {
                state.practice = state.practice.saturating_add(amount);
            }
        }
    }

    /// Hit bonus for an attack using `skill`.
    ///
    /// Two-weapon fighting uses the lower of the two-weapon and weapon
    /// skills. Riding adds its own penalty on top.
    pub fn weapon_hit_bonus(
        &self,
        skill: WeaponSkill,
        two_weapon: bool,
        riding: bool,
        martial: bool,
    ) -> i32 {
        let mut bonus = match skill {
            WeaponSkill::None => 0,
            WeaponSkill::BareHanded => {
                let s = self.level(skill).value().max(SkillLevel::Unskilled.value()) - 1;
                ((s + 2) * if martial { 2 } else { 1 }) / 2
            }
            _ if two_weapon => {
                let level = self.level(WeaponSkill::TwoWeapon).min(self.level(skill));
                match level {
                    SkillLevel::Restricted | SkillLevel::Unskilled => -9,
                    SkillLevel::Basic => -7,
                    SkillLevel::Skilled => -5,
                    _ => -3,
                }
            }
            _ => match self.level(skill) {
                SkillLevel::Restricted | SkillLevel::Unskilled => -4,
                SkillLevel::Basic => 0,
                SkillLevel::Skilled => 2,
                _ => 3,
            },
        };
        if riding {
            bonus += match self.level(WeaponSkill::Riding) {
                SkillLevel::Restricted | SkillLevel::Unskilled => -2,
                SkillLevel::Basic => -1,
                _ => 0,
            };
            if two_weapon {
                bonus -= 2;
            }
        }
        bonus
    }

    /// Damage bonus for an attack using `skill`
    pub fn weapon_dam_bonus(
        &self,
        skill: WeaponSkill,
        two_weapon: bool,
        riding: bool,
        martial: bool,
    ) -> i32 {
        let mut bonus = match skill {
            WeaponSkill::None => 0,
            WeaponSkill::BareHanded => {
                let s = self.level(skill).value().max(SkillLevel::Unskilled.value()) - 1;
                ((s + 1) * if martial { 3 } else { 1 }) / 2
            }
            _ if two_weapon => {
                let level = self.level(WeaponSkill::TwoWeapon).min(self.level(skill));
                match level {
                    SkillLevel::Restricted | SkillLevel::Unskilled => -3,
                    SkillLevel::Basic => -1,
                    SkillLevel::Skilled => 0,
                    _ => 1,
                }
            }
            _ => match self.level(skill) {
                SkillLevel::Restricted | SkillLevel::Unskilled => -2,
                SkillLevel::Basic => 0,
                SkillLevel::Skilled => 1,
                _ => 2,
            },
        };
        if riding {
            bonus += match self.level(WeaponSkill::Riding) {
                SkillLevel::Skilled => 1,
                SkillLevel::Expert | SkillLevel::Master | SkillLevel::GrandMaster => 2,
                _ => 0,
            };
        }
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_skill_is_restricted() {
        let skills = Skills::new();
        assert_eq!(skills.level(WeaponSkill::Axe), SkillLevel::Restricted);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::Axe, false, false, false), -4);
        assert_eq!(skills.weapon_dam_bonus(WeaponSkill::Axe, false, false, false), -2);
    }

    #[test]
    fn test_weapon_bonus_table() {
        let skills = Skills::new()
            .with(WeaponSkill::LongSword, SkillLevel::Skilled, SkillLevel::Expert)
            .with(WeaponSkill::Dagger, SkillLevel::Expert, SkillLevel::Expert);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::LongSword, false, false, false), 2);
        assert_eq!(skills.weapon_dam_bonus(WeaponSkill::LongSword, false, false, false), 1);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::Dagger, false, false, false), 3);
        assert_eq!(skills.weapon_dam_bonus(WeaponSkill::Dagger, false, false, false), 2);
    }

    #[test]
    fn test_two_weapon_uses_lesser_skill() {
        let skills = Skills::new()
            .with(WeaponSkill::LongSword, SkillLevel::Expert, SkillLevel::Expert)
            .with(WeaponSkill::TwoWeapon, SkillLevel::Basic, SkillLevel::Skilled);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::LongSword, true, false, false), -7);
        assert_eq!(skills.weapon_dam_bonus(WeaponSkill::LongSword, true, false, false), -1);
    }

    #[test]
    fn test_martial_arts_bare_hands() {
        let skills =
            Skills::new().with(WeaponSkill::BareHanded, SkillLevel::GrandMaster, SkillLevel::GrandMaster);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::BareHanded, false, false, true), 7);
        assert_eq!(skills.weapon_dam_bonus(WeaponSkill::BareHanded, false, false, true), 9);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::BareHanded, false, false, false), 3);
    }

    #[test]
    fn test_riding_penalty() {
        let skills = Skills::new().with(WeaponSkill::Lance, SkillLevel::Basic, SkillLevel::Expert);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::Lance, false, true, false), -2);
        assert_eq!(skills.weapon_hit_bonus(WeaponSkill::Lance, true, true, false), -13);
    }

    #[test]
    fn test_unrestrict() {
        let mut skills = Skills::new();
        skills.unrestrict(WeaponSkill::LongSword);
        assert_eq!(skills.level(WeaponSkill::LongSword), SkillLevel::Unskilled);
        assert_eq!(skills.max_level(WeaponSkill::LongSword), SkillLevel::Basic);
    }
}
