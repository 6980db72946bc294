//! What an attack does once it lands
//!
//! The resolver matches on every variant with no wildcard arm, so adding a
//! damage type here is a compile error until it is handled.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Damage/effect tag of an attack
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DamageType {
    #[default]
    Physical,
    MagicMissile,
    Fire,
    Cold,
    Sleep,
    Disintegrate,
    Electric,
    DrainStrength,
    DrainDexterity,
    DrainConstitution,
    /// Brain eating
    DrainIntelligence,
    Acid,
    Blind,
    Stun,
    Slow,
    Paralyze,
    /// Level drain
    DrainLife,
    DrainEnergy,
    /// Wounds legs
    Legs,
    Stone,
    Stick,
    StealGold,
    StealItem,
    Seduce,
    SeduceSpecial,
    Teleport,
    Rust,
    Confuse,
    Digest,
    Heal,
    Wrap,
    Lycanthropy,
    Disease,
    Decay,
    Hallucinate,
    Death,
    Pestilence,
    Famine,
    Slime,
    Disenchant,
    Corrode,
    Curse,
    /// Traps the target in a block of ice
    IceBlock,
    Webs,
    Pits,
    Scald,
    Displace,
    ClericSpell,
    MageSpell,
    RandomBreath,
    StealAmulet,
}

impl DamageType {
    /// The three poison flavours
    pub const fn is_poison(&self) -> bool {
        matches!(
            self,
            DamageType::DrainStrength | DamageType::DrainDexterity | DamageType::DrainConstitution
        )
    }

    /// Item theft of any kind
    pub const fn is_theft(&self) -> bool {
        matches!(
            self,
            DamageType::StealItem
                | DamageType::Seduce
                | DamageType::SeduceSpecial
                | DamageType::StealGold
                | DamageType::StealAmulet
        )
    }

    /// Body part named in "Your X was poisoned!"
    pub const fn poison_subject(&self, shape: super::AttackType) -> &'static str {
        match shape {
            super::AttackType::Bite => "bite",
            super::AttackType::Sting => "sting",
            super::AttackType::Touch => "touch",
            super::AttackType::Tentacle => "tentacles",
            _ => "attack",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackType;

    #[test]
    fn test_poison_group() {
        assert!(DamageType::DrainStrength.is_poison());
        assert!(!DamageType::DrainIntelligence.is_poison());
    }

    #[test]
    fn test_poison_subject() {
        assert_eq!(
            DamageType::DrainStrength.poison_subject(AttackType::Sting),
            "sting"
        );
    }
}
