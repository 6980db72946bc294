//! How an attack is delivered

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Delivery shape of an attack (claw, bite, weapon...)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AttackType {
    /// Empty slot, or a passive response
    #[default]
    None,
    Claw,
    Bite,
    Kick,
    /// Head butt
    Butt,
    Touch,
    Sting,
    /// Crushing hug; needs the two previous attacks to connect
    Hug,
    Spit,
    Engulf,
    Breath,
    /// Explodes on contact, destroying the attacker's form
    Explode,
    /// Explodes when killed
    ExplodeOnDeath,
    Gaze,
    Tentacle,
    Weapon,
    Magic,
}

impl AttackType {
    /// Attacks that can be made against an adjacent target
    pub const fn is_melee(&self) -> bool {
        matches!(
            self,
            AttackType::Claw
                | AttackType::Bite
                | AttackType::Kick
                | AttackType::Butt
                | AttackType::Touch
                | AttackType::Sting
                | AttackType::Hug
                | AttackType::Tentacle
                | AttackType::Weapon
                | AttackType::Engulf
                | AttackType::Explode
        )
    }

    /// Verb used when an unarmed body attack lands
    pub const fn hit_verb(&self) -> Option<&'static str> {
        match self {
            AttackType::Kick => Some("kick"),
            AttackType::Bite => Some("bite"),
            AttackType::Sting => Some("sting"),
            AttackType::Butt => Some("butt"),
            AttackType::Touch => Some("touch"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_shapes() {
        assert!(AttackType::Weapon.is_melee());
        assert!(AttackType::Engulf.is_melee());
        assert!(!AttackType::Breath.is_melee());
        assert!(!AttackType::None.is_melee());
    }

    #[test]
    fn test_hit_verbs() {
        assert_eq!(AttackType::Kick.hit_verb(), Some("kick"));
        assert_eq!(AttackType::Claw.hit_verb(), None);
    }
}
