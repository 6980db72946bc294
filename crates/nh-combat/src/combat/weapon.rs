//! Weapon damage and to-hit values
//!
//! Base damage comes from the catalog die for the target's size; material
//! hatred, blessings and erosion adjust it here. Skill and strength bonuses
//! are added later, during damage assembly.

use crate::combatant::{Combatant, WeaponSkill};
use crate::monster::Species;
use crate::object::{Item, Material, ObjectCatalog, ObjectClass, ObjectTraits};

use super::CombatContext;

/// Whether an object can touch a shade at all
pub fn shade_aware(item: &Item, catalog: &dyn ObjectCatalog) -> bool {
    catalog
        .lookup(item.otype)
        .traits
        .contains(ObjectTraits::SHADE_AWARE)
        || item.material == Material::Silver
}

/// Weapons whose damage reaches a shade
pub fn shade_glare(item: &Item, catalog: &dyn ObjectCatalog) -> bool {
    catalog
        .lookup(item.otype)
        .traits
        .contains(ObjectTraits::SHADE_GLARE)
        || item.material == Material::Silver
}

/// Fights like a weapon: weapons, weapon-tools, the ball and the chain
pub fn is_weapon_like(item: &Item, catalog: &dyn ObjectCatalog) -> bool {
    matches!(
        item.class,
        ObjectClass::Weapon | ObjectClass::Ball | ObjectClass::Chain
    ) || catalog.lookup(item.otype).is_weptool()
}

/// Ammunition matched with the launcher that fires it
pub fn ammo_and_launcher(ammo: &Item, launcher: Option<&Item>, catalog: &dyn ObjectCatalog) -> bool {
    let stats = catalog.lookup(ammo.otype);
    let Some(launcher) = launcher else {
        return false;
    };
    let lstats = catalog.lookup(launcher.otype);
    stats.is_ammo() && lstats.is_launcher() && stats.fired_by == Some(lstats.skill)
}

/// Skill trained by fighting with an item
pub fn weapon_skill(item: Option<&Item>, catalog: &dyn ObjectCatalog) -> WeaponSkill {
    match item {
        None => WeaponSkill::BareHanded,
        Some(item) => {
            let stats = catalog.lookup(item.otype);
            if item.class == ObjectClass::Weapon || stats.is_weptool() {
                stats.skill
            } else {
                WeaponSkill::None
            }
        }
    }
}

/// To-hit bonus an item gives against a target
pub fn hitval(item: Option<&Item>, target: &Species, catalog: &dyn ObjectCatalog) -> i32 {
    let Some(item) = item else {
        return 0;
    };
    let stats = catalog.lookup(item.otype);
    let mut tmp = 0;
    if item.class == ObjectClass::Weapon || stats.is_weptool() {
        tmp += i32::from(item.enchantment) + i32::from(stats.hit_bonus);
    }
    if item.is_blessed() && (target.is_undead() || target.is_demon()) {
        tmp += 2;
    }
    tmp
}

/// Damage an item does to a target, before skill and strength
pub fn dmgval(item: &Item, target: &Species, ctx: &mut CombatContext<'_>) -> i32 {
    let stats = ctx.catalog.lookup(item.otype);
    let die = if target.uses_large_damage() {
        stats.large_damage
    } else {
        stats.small_damage
    };
    let mut tmp = ctx.rnd_i(i32::from(die));

    if is_weapon_like(item, ctx.catalog) {
        tmp = (tmp + i32::from(item.enchantment)).max(0);
    }
    // soft materials bounce off thick hides
    if (item.material as u8) <= (Material::Leather as u8) && target.is_thick_skinned() {
        tmp = 0;
    }
    if target.is_shade() && !shade_glare(item, ctx.catalog) {
        tmp = 0;
    }

    let mut bonus = 0;
    if item.is_blessed() && (target.is_undead() || target.is_demon()) {
        bonus += ctx.rnd(4) as i32;
    }
    if target.hates_material(item.material) {
        bonus += ctx.rnd(item.material.hatred_die()) as i32;
    }
    tmp += bonus;

    if tmp > 0 {
        tmp = (tmp - i32::from(item.greatest_erosion())).max(1);
    }
    tmp
}

/// The hero's skill in the weapon being used, or two-weapon combat
pub fn wielded_skill(attacker: &Combatant, item: Option<&Item>, catalog: &dyn ObjectCatalog) -> WeaponSkill {
    match attacker.hero() {
        Some(hero) if hero.two_weapon => WeaponSkill::TwoWeapon,
        _ => weapon_skill(item, catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{BucStatus, ItemId, StaticCatalog, otyp};
    use crate::world::Field;
    use nh_rng::{RngChannel, ScriptedRng};

    #[test]
    fn test_dmgval_uses_size_die_and_erosion() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // rnd(8) -> 6, then rnd(12) -> 12
        let mut rng = ScriptedRng::new(3).with(RngChannel::Main, [5, 11]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut sword = Item::from_catalog(ItemId(1), otyp::LONG_SWORD, &cat).with_enchantment(1);
        sword.erosion1 = 2;
        assert_eq!(dmgval(&sword, &bestiary::jackal(), &mut ctx), 6 + 1 - 2);
        assert_eq!(dmgval(&sword, &bestiary::owlbear(), &mut ctx), 12 + 1 - 2);
    }

    #[test]
    fn test_dmgval_shade_needs_silver() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(3);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let sword = Item::from_catalog(ItemId(1), otyp::LONG_SWORD, &cat);
        assert_eq!(dmgval(&sword, &bestiary::shade(), &mut ctx), 0);
        let saber = Item::from_catalog(ItemId(2), otyp::SILVER_SABER, &cat);
        assert!(dmgval(&saber, &bestiary::shade(), &mut ctx) > 0);
    }

    #[test]
    fn test_hitval_blessed_vs_undead() {
        let cat = StaticCatalog::standard();
        let dagger = Item::from_catalog(ItemId(1), otyp::DAGGER, &cat)
            .with_enchantment(2)
            .with_buc(BucStatus::Blessed);
        assert_eq!(hitval(Some(&dagger), &bestiary::jackal(), &cat), 4);
        assert_eq!(hitval(Some(&dagger), &bestiary::mummy(), &cat), 6);
        assert_eq!(hitval(None, &bestiary::mummy(), &cat), 0);
    }

    #[test]
    fn test_ammo_needs_matching_launcher() {
        let cat = StaticCatalog::standard();
        let arrow = Item::from_catalog(ItemId(1), otyp::ARROW, &cat);
        let bow = Item::from_catalog(ItemId(2), otyp::BOW, &cat);
        let sling = Item::from_catalog(ItemId(3), otyp::SLING, &cat);
        assert!(ammo_and_launcher(&arrow, Some(&bow), &cat));
        assert!(!ammo_and_launcher(&arrow, Some(&sling), &cat));
        assert!(!ammo_and_launcher(&arrow, None, &cat));
    }

    #[test]
    fn test_shade_awareness() {
        let cat = StaticCatalog::standard();
        assert!(shade_aware(&Item::from_catalog(ItemId(1), otyp::CLOVE_OF_GARLIC, &cat), &cat));
        assert!(shade_aware(&Item::from_catalog(ItemId(2), otyp::SILVER_ARROW, &cat), &cat));
        assert!(!shade_aware(&Item::from_catalog(ItemId(3), otyp::CORPSE, &cat), &cat));
    }
}
