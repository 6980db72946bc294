//! Attack descriptors and armor-derived protection

use serde::{Deserialize, Serialize};

use super::{AttackType, DamageType};
use crate::combatant::{Combatant, EquipSlot};
use crate::consts::NATTK;
use crate::object::ObjectCatalog;

/// One attack: shape, effect and damage dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Attack {
    pub attack_type: AttackType,
    pub damage_type: DamageType,
    pub dice_num: u8,
    pub dice_sides: u8,
}

impl Attack {
    pub const NONE: Attack = Attack::new(AttackType::None, DamageType::Physical, 0, 0);

    pub const fn new(
        attack_type: AttackType,
        damage_type: DamageType,
        dice_num: u8,
        dice_sides: u8,
    ) -> Self {
        Self {
            attack_type,
            damage_type,
            dice_num,
            dice_sides,
        }
    }

    /// Anything other than an empty slot
    pub const fn is_active(&self) -> bool {
        !matches!(self.attack_type, AttackType::None) || self.dice_sides > 0
    }

    /// Weaponless bare-handed attack used when nothing better is known
    pub const fn bare_hands() -> Self {
        Attack::new(AttackType::Weapon, DamageType::Physical, 1, 2)
    }
}

/// A species' attack list
pub type AttackSet = [Attack; NATTK];

pub const fn empty_attacks() -> AttackSet {
    [Attack::NONE; NATTK]
}

/// Magic cancellation: the best MC granted by any worn armor piece
pub fn magic_negation(target: &Combatant, catalog: &dyn ObjectCatalog) -> u8 {
    let mut mc = 0;
    for slot in EquipSlot::ARMOR {
        if let Some(item) = target.equipment.get(slot) {
            mc = mc.max(catalog.lookup(item.otype).negation);
        }
    }
    if target.intrinsics.protection {
        mc = mc.max(1);
    }
    mc
}

/// Slots that shield against a petrifying touch for a given attack shape.
/// A hug needs both cloak and gloves.
pub fn attk_protection(shape: AttackType) -> &'static [EquipSlot] {
    match shape {
        AttackType::Weapon | AttackType::Claw | AttackType::Touch | AttackType::Tentacle => {
            &[EquipSlot::Gloves]
        }
        AttackType::Kick => &[EquipSlot::Boots],
        AttackType::Butt => &[EquipSlot::Helmet],
        AttackType::Hug => &[EquipSlot::Cloak, EquipSlot::Gloves],
        AttackType::None
        | AttackType::Bite
        | AttackType::Sting
        | AttackType::Spit
        | AttackType::Engulf
        | AttackType::Breath
        | AttackType::Explode
        | AttackType::ExplodeOnDeath
        | AttackType::Gaze
        | AttackType::Magic => &[],
    }
}

/// Whether the attacker's worn gear keeps its skin off the target for this
/// attack shape
pub fn is_protected(attacker: &Combatant, shape: AttackType) -> bool {
    let slots = attk_protection(shape);
    !slots.is_empty() && slots.iter().all(|slot| attacker.equipment.get(*slot).is_some())
}
