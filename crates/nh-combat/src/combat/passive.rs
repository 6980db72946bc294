//! Passive responses: what a defender does to whoever touched it
//!
//! A defender's passive slot is the first entry in its attack list with no
//! delivery shape. Some responses land even when the defender just died
//! (acid, a petrifying touch, rust); the rest need it alive and fire two
//! times in three.

use tracing::debug;

use crate::combatant::{CombatantId, Combatant, DeathCause, EquipSlot, Equipment};
use crate::message::MsgChannel;
use crate::monster::{Resistances, SpeciesKind};
use crate::object::{ErosionKind, Inventory, ObjectClass, ObjectTraits};
use crate::world::Position;

use super::context::pov;
use super::erosion::{erode_obj, hurtarmor, possessive};
use super::resolver::{slay, subject_does, subject_is};
use super::{Attack, AttackType, CombatContext, DamageType, Event, attk_protection, is_protected};

fn near(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1
}

/// Lose one experience level. A victim already at level 1 dies.
pub(crate) fn lose_level(victim: &mut Combatant, ctx: &mut CombatContext<'_>) {
    if victim.level <= 1 {
        ctx.say(MsgChannel::Fatal, format!("{} drained of life!", subject_is(victim)));
        ctx.kill(victim, DeathCause::Drained);
        return;
    }
    if victim.is_player() {
        ctx.say(MsgChannel::StatusBad, format!("Goodbye level {}.", victim.level));
    } else {
        ctx.say(MsgChannel::StatusBad, format!("{} seems weaker.", victim.cap_name()));
    }
    victim.level -= 1;
    let loss = ctx.rnd(8) as i32;
    let current = (victim.hp.current() - loss).max(1);
    victim.hp.set_max(victim.hp.max() - loss);
    victim.hp.set_current(current);
    ctx.emit(Event::LevelLost { id: victim.id });
}

/// Split a monster in two. The clone takes half the hit points, lands on a
/// free square next to the original (never on `avoid`) and joins the
/// bystanders. Gear stays with the original.
pub(crate) fn split_monster(
    mon: &mut Combatant,
    avoid: Position,
    ctx: &mut CombatContext<'_>,
) -> Option<CombatantId> {
    if mon.is_player() || mon.hp.current() < 2 {
        return None;
    }
    let field = &*ctx.field;
    let spot = mon.position.neighbors().find(|p| {
        *p != avoid && !field.terrain(*p).is_solid() && field.bystander_at(*p).is_none()
    })?;

    let mut clone = mon.clone();
    clone.id = ctx.field.new_combatant_id();
    clone.position = spot;
    clone.inventory = Inventory::new();
    clone.equipment = Equipment::new();
    clone.gold = 0;
    let half = mon.hp.current() / 2;
    mon.hp.set_current(mon.hp.current() - half);
    clone.hp.set_current(half);

    let (original, id) = (mon.id, clone.id);
    debug!(%original, clone = %id, ?spot, "monster split");
    ctx.field.bystanders.push(clone);
    ctx.emit(Event::Split { original, clone: id });
    Some(id)
}

/// Passive damage landing on the attacker; true if it survived
fn hurt(defender: &mut Combatant, attacker: &mut Combatant, amount: i32, ctx: &mut CombatContext<'_>) -> bool {
    if amount > 0 && attacker.hp.damage(amount) {
        slay(defender, attacker, ctx);
    }
    !attacker.is_dead()
}

/// A petrifying touch with no covering in the way
fn touch_petrifies(attacker: &Combatant, shape: AttackType) -> bool {
    let shape = if shape == AttackType::Magic {
        AttackType::Claw
    } else {
        shape
    };
    if is_protected(attacker, shape) {
        return false;
    }
    // a wielded weapon keeps bare hands off
    !(attk_protection(shape) == [EquipSlot::Gloves] && attacker.weapon().is_some())
}

fn handles_object(shape: AttackType) -> bool {
    matches!(
        shape,
        AttackType::Weapon | AttackType::Claw | AttackType::Magic | AttackType::Touch
    )
}

/// The defender's passive response to an attack by `attacker`.
///
/// `hit` is whether the attack connected and `defender_alive` whether the
/// defender survived it. Returns whether the attacker is still alive.
pub fn trigger_passive(
    defender: &mut Combatant,
    attacker: &mut Combatant,
    hit: bool,
    defender_alive: bool,
    shape: AttackType,
    ctx: &mut CombatContext<'_>,
) -> bool {
    if attacker.is_dead() {
        return false;
    }
    let Some(&passive) = defender.species.passive_attack() else {
        return true;
    };
    let tmp = if passive.dice_num > 0 && passive.dice_sides > 0 {
        ctx.dice(u32::from(passive.dice_num), u32::from(passive.dice_sides))
    } else if passive.dice_sides > 0 {
        ctx.dice(u32::from(defender.level) + 1, u32::from(passive.dice_sides))
    } else {
        0
    };
    let cancelled = defender.status.cancelled;
    debug!(defender = %defender.id, attacker = %attacker.id, effect = %passive.damage_type, damage = tmp, hit, "passive");

    match passive.damage_type {
        DamageType::Acid => {
            if hit && ctx.rn2(2) != 0 {
                if !attacker.status.can_see() || !ctx.options.verbose {
                    ctx.say(MsgChannel::CombatHit, format!("{} splashed!", subject_is(attacker)));
                } else {
                    ctx.say(
                        MsgChannel::CombatHit,
                        format!("{} splashed by {} acid!", subject_is(attacker), possessive(defender)),
                    );
                }
                if !attacker.resists(Resistances::ACID, ctx.catalog) && !hurt(defender, attacker, tmp, ctx) {
                    return false;
                }
                if ctx.one_in(30) {
                    hurtarmor(attacker, ErosionKind::Corrode, ctx);
                }
            }
            if hit {
                if shape == AttackType::Kick {
                    let whose = possessive(attacker);
                    if attacker.equipment.get(EquipSlot::Boots).is_some() && ctx.one_in(6) {
                        if let Some(boots) = attacker.equipment.get_mut(EquipSlot::Boots) {
                            erode_obj(boots, &whose, ErosionKind::Corrode, true, ctx);
                        }
                    }
                } else if handles_object(shape) {
                    passive_item_damage(defender, attacker, None, &passive, ctx);
                }
            }
        }
        DamageType::Stone => {
            if hit
                && touch_petrifies(attacker, shape)
                && !attacker.resists(Resistances::STONE, ctx.catalog)
            {
                ctx.say(
                    MsgChannel::Fatal,
                    format!("{} to stone.", subject_does(attacker, "turn", "turns")),
                );
                ctx.kill(attacker, DeathCause::Petrified);
                return false;
            }
        }
        DamageType::Rust | DamageType::Corrode => {
            if hit && !cancelled {
                let kind = if passive.damage_type == DamageType::Rust {
                    ErosionKind::Rust
                } else {
                    ErosionKind::Corrode
                };
                if shape == AttackType::Kick {
                    let whose = possessive(attacker);
                    if let Some(boots) = attacker.equipment.get_mut(EquipSlot::Boots) {
                        erode_obj(boots, &whose, kind, true, ctx);
                    }
                } else if handles_object(shape) {
                    passive_item_damage(defender, attacker, None, &passive, ctx);
                }
            }
        }
        DamageType::MagicMissile => {
            if attacker.resists(Resistances::MAGIC, ctx.catalog) {
                ctx.say(
                    MsgChannel::CombatImmune,
                    format!("A hail of magic missiles narrowly misses {}!", attacker.the_name()),
                );
            } else {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} hit by magic missiles appearing from thin air!", subject_is(attacker)),
                );
                if !hurt(defender, attacker, tmp, ctx) {
                    return false;
                }
            }
        }
        DamageType::Disenchant => {
            if hit {
                match shape {
                    AttackType::Kick => {
                        if attacker.equipment.get(EquipSlot::Boots).is_some() {
                            passive_item_damage(defender, attacker, Some(EquipSlot::Boots), &passive, ctx);
                        }
                    }
                    AttackType::Bite
                    | AttackType::Butt
                    | AttackType::Sting
                    | AttackType::Hug
                    | AttackType::Spit
                    | AttackType::Engulf
                    | AttackType::Breath
                    | AttackType::Explode
                    | AttackType::ExplodeOnDeath
                    | AttackType::Gaze
                    | AttackType::Tentacle => {}
                    AttackType::None
                    | AttackType::Claw
                    | AttackType::Touch
                    | AttackType::Weapon
                    | AttackType::Magic => {
                        passive_item_damage(defender, attacker, None, &passive, ctx);
                    }
                }
            }
        }
        DamageType::DrainLife => {
            if hit && !cancelled && !attacker.resists(Resistances::DRAIN, ctx.catalog) {
                lose_level(attacker, ctx);
                if attacker.is_dead() {
                    return false;
                }
            }
        }
        _ => {}
    }

    if !defender_alive || cancelled || ctx.rn2(3) == 0 {
        return !attacker.is_dead();
    }

    match passive.damage_type {
        DamageType::Paralyze => {
            if defender.species.kind == SpeciesKind::FloatingEye {
                let sees_it = attacker.status.can_see()
                    && (!defender.intrinsics.invisible || attacker.intrinsics.see_invisible);
                if !sees_it {
                    return true;
                }
                if defender.status.can_see() {
                    if let Some(mirror) = reflector(attacker, ctx) {
                        ctx.say(
                            MsgChannel::CombatImmune,
                            format!(
                                "{} gaze is reflected by {} {mirror}.",
                                upcase(&possessive(defender)),
                                possessive(attacker)
                            ),
                        );
                    } else if attacker.intrinsics.free_action {
                        ctx.say(
                            MsgChannel::CombatMiss,
                            format!(
                                "{} momentarily under {} gaze!",
                                subject_does(attacker, "stiffen", "stiffens"),
                                possessive(defender)
                            ),
                        );
                    }
                } else {
                    ctx.say(
                        MsgChannel::CombatMiss,
                        format!("The blind {} cannot defend itself.", defender.name),
                    );
                    if ctx.one_in(500) {
                        if let Some(hero) = attacker.hero_mut() {
                            hero.change_luck(-1);
                        }
                    }
                }
            } else if attacker.intrinsics.free_action {
                ctx.say(
                    MsgChannel::CombatMiss,
                    format!("{} momentarily.", subject_does(attacker, "stiffen", "stiffens")),
                );
            } else {
                ctx.say(
                    MsgChannel::StatusBad,
                    format!("{} frozen by {}!", subject_is(attacker), defender.the_name()),
                );
                attacker.status.paralyze(u16::try_from(tmp.max(0)).unwrap_or(u16::MAX));
            }
        }
        DamageType::Cold => {
            if near(attacker.position, defender.position) {
                if attacker.resists(Resistances::COLD, ctx.catalog) {
                    ctx.say(
                        MsgChannel::CombatMiss,
                        format!("{} a mild chill.", pov(attacker, "You feel", |n| format!("{n} feels"))),
                    );
                    return true;
                }
                ctx.say(MsgChannel::CombatHit, format!("{} suddenly very cold!", subject_is(attacker)));
                if !hurt(defender, attacker, tmp, ctx) {
                    return false;
                }
                // the monster feeds on the heat
                let fed = defender.hp.current() + tmp / 2;
                if fed > defender.hp.max() {
                    defender.hp.set_max(fed);
                }
                defender.hp.set_current(fed);
                if defender.hp.max() > (i32::from(defender.level) + 1) * 8
                    && split_monster(defender, attacker.position, ctx).is_some()
                {
                    ctx.say(MsgChannel::Info, format!("{} multiplies!", defender.cap_name()));
                }
            }
        }
        DamageType::Stun => {
            if attacker.status.stunned == 0 {
                ctx.say(
                    MsgChannel::StatusBad,
                    format!("{}...", subject_does(attacker, "stagger", "staggers")),
                );
                attacker.status.add_stun(u16::try_from(tmp.max(0)).unwrap_or(u16::MAX));
            }
        }
        DamageType::Fire => {
            if near(attacker.position, defender.position) {
                if attacker.resists(Resistances::FIRE, ctx.catalog) {
                    ctx.say(
                        MsgChannel::CombatMiss,
                        format!("{} mildly warm.", pov(attacker, "You feel", |n| format!("{n} feels"))),
                    );
                    return true;
                }
                ctx.say(MsgChannel::CombatHit, format!("{} suddenly very hot!", subject_is(attacker)));
                return hurt(defender, attacker, tmp, ctx);
            }
        }
        DamageType::Electric => {
            if attacker.resists(Resistances::SHOCK, ctx.catalog) {
                ctx.say(
                    MsgChannel::CombatMiss,
                    format!("{} a mild tingle.", pov(attacker, "You feel", |n| format!("{n} feels"))),
                );
                return true;
            }
            ctx.say(
                MsgChannel::CombatHit,
                format!("{} jolted with electricity!", subject_is(attacker)),
            );
            return hurt(defender, attacker, tmp, ctx);
        }
        DamageType::Displace => {
            std::mem::swap(&mut attacker.position, &mut defender.position);
            attacker.status.trapped = None;
            defender.status.trapped = None;
            ctx.say(
                MsgChannel::CombatHit,
                format!("{} displaces {}!", defender.cap_name(), attacker.the_name()),
            );
            ctx.emit(Event::Displaced { id: defender.id });
        }
        DamageType::Scald => {
            ctx.say(
                MsgChannel::Info,
                format!("{} skin oozes a foul stench.", upcase(&possessive(defender))),
            );
            ctx.emit(Event::GasCloud { id: defender.id });
        }
        _ => {}
    }
    !attacker.is_dead()
}

/// Worn or carried gear that reflects gazes
pub(crate) fn reflector(who: &Combatant, ctx: &CombatContext<'_>) -> Option<String> {
    if who.intrinsics.reflecting {
        return Some("skin".to_string());
    }
    who.equipment
        .iter()
        .find(|(_, item)| ctx.catalog.lookup(item.otype).traits.contains(ObjectTraits::REFLECTS))
        .map(|(_, item)| item.xname(ctx.catalog))
}

fn upcase(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Passive damage to the object the attacker hit with. With no slot given
/// this is the wielded weapon (either one when fighting with two), or the
/// gloves for a disenchanter touched bare-handed.
pub fn passive_item_damage(
    defender: &Combatant,
    attacker: &mut Combatant,
    slot: Option<EquipSlot>,
    passive: &Attack,
    ctx: &mut CombatContext<'_>,
) {
    let slot = match slot {
        Some(slot) => slot,
        None => {
            let two_weapon = attacker.hero().is_some_and(|h| h.two_weapon);
            let mut pick = EquipSlot::Weapon;
            if two_weapon && !attacker.equipment.is_empty(EquipSlot::SwapWeapon) && ctx.one_in(2) {
                pick = EquipSlot::SwapWeapon;
            }
            if attacker.equipment.is_empty(pick) && passive.damage_type == DamageType::Disenchant {
                pick = EquipSlot::Gloves;
            }
            pick
        }
    };
    let whose = possessive(attacker);
    let cancelled = defender.status.cancelled;
    let Some(item) = attacker.equipment.get_mut(slot) else {
        return;
    };
    match passive.damage_type {
        DamageType::Acid => {
            if ctx.one_in(6) {
                erode_obj(item, &whose, ErosionKind::Corrode, true, ctx);
            }
        }
        DamageType::Rust if !cancelled => {
            erode_obj(item, &whose, ErosionKind::Rust, true, ctx);
        }
        DamageType::Corrode if !cancelled => {
            erode_obj(item, &whose, ErosionKind::Corrode, true, ctx);
        }
        DamageType::Disenchant if !cancelled => {
            if item.artifact.is_some() || item.enchantment == 0 {
                return;
            }
            item.enchantment -= item.enchantment.signum();
            if item.known || item.class == ObjectClass::Armor {
                let seem = if item.quantity > 1 { "seem" } else { "seems" };
                ctx.say(
                    MsgChannel::ItemLoss,
                    format!("{} {} {seem} less effective.", upcase(&whose), item.xname(ctx.catalog)),
                );
            }
        }
        _ => {}
    }
}
