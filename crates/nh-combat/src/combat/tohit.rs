//! The to-hit value an attack must beat with a d20

use tracing::debug;

use crate::combatant::{AlignmentType, Combatant, EquipSlot, Race, Role};
use crate::consts::ilog2_fixed;
use crate::message::MsgChannel;
use crate::monster::SpeciesFlags;
use crate::object::Item;

use super::CombatContext;
use super::weapon::{hitval, wielded_skill};

/// Penalty for casting-weight armor on a monk
const MONK_ARMOR_PENALTY: i32 = 20;

/// Luck and level on a log scale: `sign(x) * ilog2(|x|) / 512`
fn luck_level_term(luck_plus_level: i32) -> i32 {
    if luck_plus_level >= 1 {
        ilog2_fixed(luck_plus_level as u32) / 512
    } else {
        -(ilog2_fixed((1 - luck_plus_level) as u32) / 512)
    }
}

/// A lawful knight striking a helpless or fleeing foe loses alignment
pub fn knight_caitiff(attacker: &mut Combatant, defender: &Combatant, ctx: &mut CombatContext<'_>) {
    let Some(hero) = attacker.hero() else {
        return;
    };
    if hero.role != Role::Knight
        || attacker.alignment.kind != AlignmentType::Lawful
        || attacker.alignment.record <= -10
    {
        return;
    }
    let st = &defender.status;
    if !st.can_move || st.sleeping || st.fleeing {
        ctx.say(MsgChannel::AlignBad, "You caitiff!");
        attacker.adjust_alignment(-1, ctx.field.moves);
    }
}

/// Compute the to-hit value for `attacker` against `defender`.
///
/// The attack hits when this beats a d20 roll. Rolling it has side effects
/// on the defender (a sleeping target wakes, a paralysed one may recover)
/// and on the attacker's alignment.
///
/// `thrown` replaces the wielded weapon for the weapon terms.
pub fn roll_to_hit(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    thrown: Option<&Item>,
    ctx: &mut CombatContext<'_>,
) -> i32 {
    if !attacker.is_player() {
        return monster_to_hit(attacker, defender, ctx);
    }

    let luck = attacker.luck(ctx.catalog);
    let mut tmp = 1
        + attacker.attributes.hit_bonus(attacker.level)
        + defender.armor_class(ctx.catalog)
        + attacker.hero().map_or(0, |h| h.hit_bonus)
        + luck_level_term(luck + i32::from(attacker.level));

    knight_caitiff(attacker, defender, ctx);

    if attacker.hero().is_some_and(|h| h.role == Role::Samurai)
        && defender.is_peaceful()
        && attacker.alignment.record > -10
    {
        ctx.say(MsgChannel::AlignBad, "You dishonorably attack the innocent!");
        attacker.adjust_alignment(-1, ctx.field.moves);
    }

    let st = &mut defender.status;
    if st.stunned > 0 {
        tmp += 2;
    }
    if st.fleeing {
        tmp += 2;
    }
    if st.sleeping {
        st.sleeping = false;
        tmp += 2;
    }
    if !st.can_move {
        tmp += 4;
        if ctx.one_in(10) {
            st.can_move = true;
            st.frozen = 0;
        }
    }

    let Some(hero) = attacker.hero() else {
        return tmp;
    };
    if defender.species.has(SpeciesFlags::ORC) && hero.race == Race::Elf {
        tmp += 1;
    }
    if hero.role == Role::Monk && !hero.is_polymorphed() {
        if !attacker.equipment.is_empty(EquipSlot::Body) {
            if ctx.options.verbose {
                ctx.say(MsgChannel::Hint, "Your armor is rather cumbersome...");
            }
            tmp -= MONK_ARMOR_PENALTY;
        } else if attacker.equipment.is_empty(EquipSlot::Weapon)
            && attacker.equipment.is_empty(EquipSlot::Shield)
        {
            tmp += i32::from(attacker.level) / 3 + 2;
        }
    }

    let tier = hero.encumbrance.tier();
    if tier > 0 {
        tmp -= tier * 2 - 1;
    }
    if attacker.status.trapped.is_some() {
        tmp -= 3;
    }

    if !hero.is_polymorphed() {
        let weapon = thrown.or(attacker.equipment.weapon());
        let skill = wielded_skill(attacker, weapon, ctx.catalog);
        tmp += hitval(weapon, &defender.species, ctx.catalog);
        tmp += 2 * hero.skills.weapon_hit_bonus(
            skill,
            hero.two_weapon,
            hero.is_riding(),
            hero.role.is_martial(),
        );
    }

    debug!(attacker = %attacker.id, defender = %defender.id, to_hit = tmp, "roll to hit");
    tmp
}

fn monster_to_hit(attacker: &Combatant, defender: &Combatant, ctx: &mut CombatContext<'_>) -> i32 {
    let mut tmp = 10 + defender.armor_class(ctx.catalog) + i32::from(attacker.level);
    if defender.status.is_helpless() {
        tmp += 4;
    }
    if !attacker.status.can_see()
        || (defender.intrinsics.invisible && !attacker.intrinsics.see_invisible)
    {
        tmp -= 2;
    }
    if attacker.status.trapped.is_some() {
        tmp -= 2;
    }
    let tmp = tmp.max(1);
    debug!(attacker = %attacker.id, defender = %defender.id, to_hit = tmp, "monster roll to hit");
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::{test_hero, test_monster};
    use crate::combatant::{Encumbrance, Snare};
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{ItemId, StaticCatalog, otyp};
    use crate::world::Field;
    use nh_rng::{RngChannel, ScriptedRng};

    #[test]
    fn test_luck_level_term_is_symmetric() {
        assert_eq!(luck_level_term(5), 4);
        assert_eq!(luck_level_term(1), 0);
        assert_eq!(luck_level_term(0), 0);
        assert_eq!(luck_level_term(-4), -4);
    }

    #[test]
    fn test_bare_handed_hero_vs_jackal() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let mut jackal = test_monster(bestiary::jackal());
        // 1 + abon 0 + AC 7 + log term 4, then 2 * bare-handed bonus 1
        assert_eq!(roll_to_hit(&mut hero, &mut jackal, None, &mut ctx), 14);
    }

    #[test]
    fn test_helpless_target_bonuses_and_wake() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // the paralysed jackal stays paralysed
        let mut rng = ScriptedRng::new(1).with(RngChannel::Main, [3]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let mut jackal = test_monster(bestiary::jackal());
        jackal.status.fall_asleep(5);
        jackal.status.stunned = 2;
        let to_hit = roll_to_hit(&mut hero, &mut jackal, None, &mut ctx);
        assert_eq!(to_hit, 14 + 2 + 2 + 4);
        assert!(!jackal.status.sleeping);
        assert!(!jackal.status.can_move);
    }

    #[test]
    fn test_encumbrance_and_snare_penalties() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        if let Some(h) = hero.hero_mut() {
            h.encumbrance = Encumbrance::Stressed;
        }
        hero.status.trapped = Some(Snare::BearTrap);
        let mut jackal = test_monster(bestiary::jackal());
        assert_eq!(roll_to_hit(&mut hero, &mut jackal, None, &mut ctx), 14 - 3 - 3);
    }

    #[test]
    fn test_knight_caitiff_costs_alignment() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.alignment.kind = AlignmentType::Lawful;
        if let Some(h) = hero.hero_mut() {
            h.role = Role::Knight;
        }
        let mut jackal = test_monster(bestiary::jackal());
        jackal.status.flee(0, false);
        knight_caitiff(&mut hero, &jackal, &mut ctx);
        assert_eq!(hero.alignment.record, 9);
        drop(ctx);
        assert!(log.contains("You caitiff!"));
    }

    #[test]
    fn test_weapon_enters_to_hit() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.equipment
            .equip(
                EquipSlot::Weapon,
                Item::from_catalog(ItemId(5), otyp::DAGGER, &cat).with_enchantment(1),
            )
            .unwrap();
        let mut jackal = test_monster(bestiary::jackal());
        // base 12, dagger +2 +1, Basic skill +0
        assert_eq!(roll_to_hit(&mut hero, &mut jackal, None, &mut ctx), 15);
    }

    #[test]
    fn test_monster_to_hit_floor() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut jackal = test_monster(bestiary::jackal());
        let mut hero = test_hero();
        hero.species.ac = -30;
        assert_eq!(roll_to_hit(&mut jackal, &mut hero, None, &mut ctx), 1);
    }
}
