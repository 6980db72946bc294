//! Potions broken over a monster
//!
//! A potion used as a weapon shatters on the first hit. The defender takes
//! the contents, and the hero standing next to it may breathe the vapors.

use tracing::debug;

use crate::combatant::{Combatant, Role};
use crate::consts::MAX_BLIND;
use crate::message::MsgChannel;
use crate::monster::Resistances;
use crate::object::{Item, ObjectKind};

use super::CombatContext;
use super::resolver::slay;

/// Monster saving throw against a magic effect of strength `alev`
pub(crate) fn resists_magic(defender: &Combatant, alev: i32, ctx: &mut CombatContext<'_>) -> bool {
    let dlev = i32::from(defender.level).clamp(1, 50);
    let odds = (100 + alev - dlev).max(1) as u32;
    (ctx.rn2(odds) as i32) < i32::from(defender.species.mr)
}

const POTION_STRENGTH: i32 = 6;

/// Break `potion` over `defender`. The caller checks whether it survived.
pub(crate) fn potion_hit(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    potion: &Item,
    ctx: &mut CombatContext<'_>,
) {
    let catalog = ctx.catalog;
    let kind = catalog.lookup(potion.otype).kind;
    let dname = defender.the_name();
    let target = if defender.species.has_head() {
        format!("{}'s head", dname)
    } else {
        dname.clone()
    };
    ctx.say(
        MsgChannel::CombatHit,
        format!("The bottle crashes on {target} and breaks into shards."),
    );
    if ctx.rn2(5) != 0 && defender.hp.current() > 1 {
        defender.hp.damage(1);
    }
    debug!(defender = %defender.id, ?kind, "potion hit");

    match kind {
        ObjectKind::PotionSickness => {
            if defender.resists(Resistances::POISON, catalog) {
                ctx.say(MsgChannel::CombatImmune, format!("{} looks unharmed.", defender.cap_name()));
            } else {
                let current = defender.hp.current();
                let current = if current > 2 { current / 2 } else { current };
                let max = defender.hp.max();
                if max > 3 {
                    defender.hp.set_max(max / 2);
                }
                defender.hp.set_current(current);
                ctx.say(MsgChannel::CombatHit, format!("{} looks rather ill.", defender.cap_name()));
            }
        }
        ObjectKind::PotionConfusion | ObjectKind::PotionBooze => {
            if defender.status.confused == 0 && !resists_magic(defender, POTION_STRENGTH, ctx) {
                defender.status.confused = 1;
            }
        }
        ObjectKind::PotionSleeping => {
            let turns = ctx.rnd(12) as u16;
            if !defender.resists(Resistances::SLEEP, catalog) && !resists_magic(defender, POTION_STRENGTH, ctx) {
                defender.status.fall_asleep(turns);
                ctx.say(MsgChannel::CombatHit, format!("{} falls asleep.", defender.cap_name()));
            }
        }
        ObjectKind::PotionParalysis => {
            if defender.status.can_move {
                let turns = ctx.rnd(25) as u16;
                defender.status.paralyze(turns);
            }
        }
        ObjectKind::PotionBlindness => {
            if defender.species.has_eyes() {
                let mut turns = 64 + ctx.rn2(32);
                let extra = ctx.rn2(32);
                if !resists_magic(defender, POTION_STRENGTH, ctx) {
                    turns += extra;
                }
                defender.status.add_blindness(turns.min(u32::from(MAX_BLIND)) as u16);
            }
        }
        ObjectKind::PotionWater => {
            let unholy_target = defender.species.is_undead() || defender.species.is_demon();
            if unholy_target && potion.is_blessed() {
                ctx.say(MsgChannel::CombatHit, format!("{} shrieks in pain!", defender.cap_name()));
                let burn = ctx.dice(2, 6);
                if defender.hp.damage(burn) {
                    slay(attacker, defender, ctx);
                }
            } else if unholy_target && potion.is_cursed() {
                ctx.say(MsgChannel::CombatHit, format!("{} looks healthier.", defender.cap_name()));
                let boost = ctx.dice(2, 6);
                defender.hp.heal(boost);
            }
        }
        ObjectKind::PotionAcid => {
            if !defender.resists(Resistances::ACID, catalog) && !resists_magic(defender, POTION_STRENGTH, ctx) {
                ctx.say(MsgChannel::CombatHit, format!("{} shrieks in pain!", defender.cap_name()));
                let n = if potion.is_cursed() { 2 } else { 1 };
                let sides = if potion.is_blessed() { 5 } else { 10 };
                let burn = ctx.dice(n, sides);
                if defender.hp.damage(burn) {
                    slay(attacker, defender, ctx);
                }
            }
        }
        _ => {}
    }

    if attacker.is_player() && ctx.rn2(5) != 0 {
        breathe_vapors(attacker, kind, ctx);
    }
}

/// The hero standing next to the broken bottle gets a whiff
fn breathe_vapors(you: &mut Combatant, kind: ObjectKind, ctx: &mut CombatContext<'_>) {
    let catalog = ctx.catalog;
    match kind {
        ObjectKind::PotionSleeping if !you.resists(Resistances::SLEEP, catalog) => {
            ctx.say(MsgChannel::StatusBad, "You feel rather tired.");
            let turns = ctx.rnd(5) as u16;
            you.status.fall_asleep(turns);
        }
        ObjectKind::PotionParalysis => {
            ctx.say(MsgChannel::StatusBad, "Something seems to be holding you.");
            let turns = ctx.rnd(5) as u16;
            you.status.paralyze(turns);
        }
        ObjectKind::PotionBlindness if you.status.can_see() => {
            ctx.say(MsgChannel::StatusBad, "It suddenly gets dark.");
            let turns = ctx.rnd(5) as u16;
            you.status.add_blindness(turns);
        }
        ObjectKind::PotionConfusion | ObjectKind::PotionBooze => {
            if you.status.confused == 0 {
                ctx.say(MsgChannel::StatusBad, "You feel somewhat dizzy.");
            }
            let turns = ctx.rnd(5) as u16;
            you.status.add_confusion(turns);
        }
        ObjectKind::PotionSickness if you.hero().is_some_and(|h| h.role != Role::Healer) => {
            let current = you.hp.current();
            you.hp.set_current(if current <= 5 { 1 } else { current - 5 });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Strike, strike};
    use crate::combatant::test_support::{test_hero, test_monster};
    use crate::combatant::{CombatantId, ConductKind, EquipSlot};
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{BucStatus, ItemId, ObjectType, StaticCatalog, otyp};
    use crate::world::Field;
    use nh_rng::{RngChannel, ScriptedRng};

    /// Break `potion` over `defender`; the hero, the log and the blow's own
    /// damage come back
    fn bash(potion: Item, defender: &mut Combatant, script: &[u32]) -> (Combatant, MessageLog, i32) {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, script.iter().copied());
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut hero = test_hero();
        let mut blow = Strike::wielded(Some(potion), EquipSlot::Weapon, 10);
        strike(&mut hero, defender, &mut blow, &mut ctx);
        assert!(blow.weapon.is_none());
        drop(ctx);
        (hero, log, blow.damage)
    }

    fn potion(otype: ObjectType) -> Item {
        Item::from_catalog(ItemId(30), otype, &StaticCatalog::standard())
    }

    #[test]
    fn test_sleeping_potion_puts_target_to_sleep() {
        let mut orc = test_monster(bestiary::hill_orc());
        // no nick, rnd(12) = 7, save fails, no vapors
        let (_, log, _) = bash(potion(otyp::POTION_OF_SLEEPING), &mut orc, &[0, 6, 99, 0]);
        assert!(orc.status.sleeping);
        assert!(!orc.status.can_move);
        assert!(log.contains("The hill orc falls asleep."));
    }

    #[test]
    fn test_blindness_potion_blinds_for_a_long_time() {
        let mut orc = test_monster(bestiary::hill_orc());
        bash(potion(otyp::POTION_OF_BLINDNESS), &mut orc, &[0, 10, 20, 99, 0]);
        assert_eq!(orc.status.blinded, 64 + 10 + 20);
    }

    #[test]
    fn test_confusion_vapors_reach_the_hero() {
        let mut orc = test_monster(bestiary::hill_orc());
        // nick, save fails, vapors, rnd(5) = 3
        let (hero, log, _) = bash(potion(otyp::POTION_OF_CONFUSION), &mut orc, &[1, 99, 1, 2]);
        assert_eq!(orc.status.confused, 1);
        assert_eq!(hero.status.confused, 3);
        assert!(log.contains("You feel somewhat dizzy."));
    }

    #[test]
    fn test_acid_potion_burns() {
        let mut orc = Combatant::monster(CombatantId(9), bestiary::hill_orc(), 40);
        // no nick, save fails, d10 = 8, no vapors
        let (_, log, blow) = bash(potion(otyp::POTION_OF_ACID), &mut orc, &[0, 99, 7, 0]);
        assert!(log.contains("The hill orc shrieks in pain!"));
        assert!(blow >= 1);
        assert_eq!(orc.hp.current(), 40 - 8 - blow);
    }

    #[test]
    fn test_holy_water_kills_undead() {
        let mut mummy = Combatant::monster(CombatantId(9), bestiary::mummy(), 4);
        let holy = potion(otyp::POTION_OF_WATER).with_buc(BucStatus::Blessed);
        let (hero, log, _) = bash(holy, &mut mummy, &[0, 5, 5]);
        assert!(mummy.is_dead());
        assert!(log.contains("shrieks in pain!"));
        assert_eq!(hero.conduct.count(ConductKind::Killer), 1);
    }

    #[test]
    fn test_unholy_water_heals_undead() {
        let mut mummy = Combatant::monster(CombatantId(9), bestiary::mummy(), 30);
        mummy.hp.set_current(10);
        let unholy = potion(otyp::POTION_OF_WATER).with_buc(BucStatus::Cursed);
        let (_, log, blow) = bash(unholy, &mut mummy, &[0, 2, 3, 0]);
        assert!(log.contains("looks healthier."));
        // 2d6 = 7 back, then the blow itself
        assert_eq!(mummy.hp.current(), 10 + 7 - blow);
    }
}
