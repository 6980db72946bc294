//! Typed damage: what each damage type does once an attack has landed
//!
//! [`apply_typed_damage`] rolls the attack's dice and dispatches on the
//! damage type. A branch may change the damage, touch the defender's status
//! or gear, transform the defender or end it outright. The defender's worn
//! magic cancellation both negates special effects and shields what it
//! carries.
//!
//! [`explode_on`] and [`engulf`] frame the same effects for the two attack
//! shapes that do not strike: blowing up next to the target and swallowing
//! it whole.

use tracing::debug;

use crate::combatant::{Attribute, Combatant, ConductKind, DeathCause, EquipSlot, Snare};
use crate::consts::MAX_BLIND;
use crate::message::MsgChannel;
use crate::monster::{MonsterSize, Resistances, SpeciesFlags, SpeciesKind, bestiary};
use crate::object::{ErosionKind, Item, ObjectClass, ObjectTraits};
use crate::world::{Terrain, TrapKind};

use super::context::pov;
use super::erosion::{erode_obj, hurtarmor, possessive};
use super::{Attack, AttackType, CombatContext, DamageType, Event, magic_negation};

/// What a typed hit did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Damage {
    /// Hit points taken from the defender by the typed effect
    pub hp_delta: i32,
    pub defender_died: bool,
    /// Something other than damage happened: a theft, a transformation, a
    /// summoning, the attacker blowing up
    pub special: bool,
}

impl Damage {
    fn special() -> Self {
        Damage {
            special: true,
            ..Damage::default()
        }
    }
}

/// "You are" or "The jackal is"
pub(crate) fn subject_is(who: &Combatant) -> String {
    pov(who, "You are", |n| format!("{n} is"))
}

/// "You stagger" or "The jackal staggers"
pub(crate) fn subject_does(who: &Combatant, you: &str, them: &str) -> String {
    pov(who, &format!("You {you}"), |n| format!("{n} {them}"))
}

/// Things that were never alive are destroyed rather than killed
fn nonliving(who: &Combatant) -> bool {
    who.species.is_undead() || who.species.is_golem() || who.species.is_mindless()
}

/// Finish off a defender whose hit points ran out. Returns false if it was
/// already dead.
pub(crate) fn slay(attacker: &mut Combatant, defender: &mut Combatant, ctx: &mut CombatContext<'_>) -> bool {
    if defender.is_dead() {
        return false;
    }
    if defender.is_tame() && !attacker.status.can_see() {
        ctx.say(MsgChannel::Info, "You feel embarrassed for a moment.");
    }
    let verb = if nonliving(defender) { "destroy" } else { "kill" };
    if defender.is_player() {
        ctx.say(MsgChannel::Fatal, "You die...");
    } else if attacker.is_player() {
        if ctx.options.verbose {
            ctx.say(MsgChannel::CombatKill, format!("You {verb} {}!", defender.the_name()));
        } else {
            ctx.say(MsgChannel::CombatKill, "You destroy it!");
        }
        attacker.conduct.violate(ConductKind::Killer);
    } else {
        ctx.say(
            MsgChannel::CombatKill,
            format!("{} {verb}s {}!", attacker.cap_name(), defender.the_name()),
        );
    }
    ctx.kill(defender, DeathCause::Killed(attacker.the_name()))
}

/// Kill `defender` by a named cause after the caller has described the
/// death. The attacker still gets the credit.
pub(crate) fn slay_by(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    cause: DeathCause,
    ctx: &mut CombatContext<'_>,
) -> bool {
    if defender.is_dead() {
        return false;
    }
    if attacker.is_player() && !defender.is_player() {
        attacker.conduct.violate(ConductKind::Killer);
    }
    ctx.kill(defender, cause)
}

/// What elemental damage does to one carried unit of a class: the verb for
/// one item, the verb for several, and the damage die it deals the carrier
fn carried_loss(class: ObjectClass, effect: DamageType) -> Option<(&'static str, &'static str, u32)> {
    match (class, effect) {
        (ObjectClass::Scroll | ObjectClass::Spellbook, DamageType::Fire) => {
            Some(("catches fire and burns", "catch fire and burn", 1))
        }
        (ObjectClass::Potion, DamageType::Fire) => Some(("boils and explodes", "boil and explode", 6)),
        (ObjectClass::Potion, DamageType::Cold) => Some(("freezes and shatters", "freeze and shatter", 4)),
        (ObjectClass::Wand, DamageType::Electric) => Some(("explodes", "explode", 10)),
        (ObjectClass::Ring, DamageType::Electric) => {
            Some(("turns to dust and vanishes", "turn to dust and vanish", 0))
        }
        _ => None,
    }
}

/// Destroy carried items of one class; each unit goes 1 time in 3.
/// Returns the extra damage done to the carrier.
fn destroy_carried(
    owner: &mut Combatant,
    class: ObjectClass,
    effect: DamageType,
    ctx: &mut CombatContext<'_>,
) -> i32 {
    let Some((one, many, die)) = carried_loss(class, effect) else {
        return 0;
    };
    let whose = possessive(owner);
    let ids: Vec<_> = owner
        .inventory
        .iter()
        .filter(|item| item.class == class)
        .map(|item| (item.id, item.quantity))
        .collect();

    let mut dmg = 0;
    for (id, quantity) in ids {
        let lost = (0..quantity).filter(|_| ctx.one_in(3)).count() as u32;
        if lost == 0 {
            continue;
        }
        for _ in 0..lost {
            dmg += ctx.rnd_i(die as i32);
        }
        let Some(item) = owner.inventory.get_mut(id) else {
            continue;
        };
        let name = item.xname(ctx.catalog);
        let text = if quantity == 1 {
            format!("{whose} {name} {one}!")
        } else if lost == quantity {
            format!("All of {whose} {name} {many}!")
        } else {
            format!("{lost} of {whose} {name} {many}!")
        };
        ctx.say(MsgChannel::ItemLoss, upcase_first(&text));
        if lost >= item.quantity {
            if owner.inventory.remove(id).is_ok() {
                ctx.emit(Event::ItemDestroyed { owner: owner.id, item: id });
            }
        } else {
            item.quantity -= lost;
        }
    }
    dmg
}

fn upcase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Physical damage as modified by the attack shape
fn physical(attacker: &Combatant, defender: &Combatant, attack: &Attack, mut tmp: i32, ctx: &mut CombatContext<'_>) -> i32 {
    match attack.attack_type {
        AttackType::Weapon => {
            // weapon damage was already assembled by the strike
            if attacker.weapon().is_some() {
                tmp = 0;
            }
        }
        AttackType::Kick => {
            if defender.species.is_thick_skinned() {
                tmp = 0;
            }
            if defender.species.is_shade() {
                let blessed_boots = attacker
                    .equipment
                    .get(EquipSlot::Boots)
                    .is_some_and(Item::is_blessed);
                tmp = if blessed_boots { ctx.rnd(4) as i32 } else { 0 };
            }
            let bonus = attacker.hero().map_or(0, |h| h.damage_bonus);
            if bonus > 0 {
                tmp += bonus;
            } else if tmp > 0 {
                tmp = (tmp + bonus).max(1);
            }
        }
        _ => {}
    }
    tmp
}

/// Greased or slippery outer clothing lets a grab slide off
pub fn slips_free(defender: &mut Combatant, attack: &Attack, ctx: &mut CombatContext<'_>) -> bool {
    let slot = if attack.damage_type == DamageType::DrainIntelligence {
        Some(EquipSlot::Helmet).filter(|s| !defender.equipment.is_empty(*s))
    } else {
        [EquipSlot::Cloak, EquipSlot::Body, EquipSlot::Shirt]
            .into_iter()
            .find(|s| !defender.equipment.is_empty(*s))
    };
    let Some(slot) = slot else {
        return false;
    };
    let owner = possessive(defender);
    let catalog = ctx.catalog;
    let Some(item) = defender.equipment.get(slot) else {
        return false;
    };
    let slippery = catalog.lookup(item.otype).traits.contains(ObjectTraits::SLIPPERY);
    if !(item.greased || slippery) {
        return false;
    }
    let cursed = item.is_cursed();
    let greased = item.greased;
    let name = item.xname(catalog);
    if cursed && ctx.rn2(3) == 0 {
        return false;
    }
    let how = if attack.damage_type == DamageType::Wrap {
        "slip off of"
    } else {
        "grab, but cannot hold onto"
    };
    ctx.say(
        MsgChannel::CombatMiss,
        format!(
            "You {how} {owner} {} {name}!",
            if greased { "greased" } else { "slippery" }
        ),
    );
    if greased && ctx.one_in(2) {
        ctx.say(MsgChannel::ItemLoss, "The grease wears off.");
        if let Some(item) = defender.equipment.get_mut(slot) {
            item.greased = false;
        }
    }
    true
}

/// Body armor makes a seductive thief take everything
pub(crate) fn could_seduce(attack: &Attack, defender: &Combatant) -> bool {
    matches!(attack.damage_type, DamageType::Seduce | DamageType::SeduceSpecial)
        && !defender.species.is_animal()
        && !defender.species.is_mindless()
}

fn give_stolen(attacker: &mut Combatant, item: Item, ctx: &mut CombatContext<'_>) -> bool {
    let name = item.xname(ctx.catalog);
    let thief = if attacker.is_player() { "You steal" } else { "Stolen" };
    match attacker.inventory.add(item) {
        Ok(()) => {
            ctx.say(MsgChannel::ItemGain, format!("{thief}: {name}."));
            true
        }
        Err(err) => {
            tracing::error!(%err, "stolen item could not be held");
            false
        }
    }
}

/// Take one item, or everything from a target wearing body armor who can
/// be seduced out of it
pub fn steal(attacker: &mut Combatant, defender: &mut Combatant, attack: &Attack, ctx: &mut CombatContext<'_>) {
    let worn: Vec<EquipSlot> = defender.equipment.iter().map(|(slot, _)| slot).collect();
    if defender.inventory.is_empty() && worn.is_empty() {
        return;
    }
    let take_all = could_seduce(attack, defender) && !defender.equipment.is_empty(EquipSlot::Body);
    if take_all {
        ctx.say(
            MsgChannel::CombatHit,
            format!(
                "{} {} and it starts to take off its clothes.",
                subject_does(attacker, "seduce", "seduces"),
                defender.the_name()
            ),
        );
    }

    // carried items go first, the suit comes off last
    let mut order: Vec<Option<EquipSlot>> = Vec::new();
    order.extend(std::iter::repeat(None).take(defender.inventory.len()));
    order.extend(worn.iter().copied().filter(|s| *s != EquipSlot::Body).map(Some));
    if worn.contains(&EquipSlot::Body) {
        order.push(Some(EquipSlot::Body));
    }

    for source in order {
        let item = match source {
            None => {
                let Some(id) = defender.inventory.iter().next().map(|i| i.id) else {
                    continue;
                };
                defender.inventory.remove(id).ok()
            }
            Some(slot) => {
                let item = defender.equipment.take(slot);
                if slot == EquipSlot::Body && item.is_some() {
                    ctx.say(
                        MsgChannel::Info,
                        format!("{} finishes taking off its suit.", defender.cap_name()),
                    );
                }
                item
            }
        };
        let Some(item) = item else {
            continue;
        };
        let deadly = item.corpse_of.as_ref().is_some_and(|sp| sp.touch_petrifies());
        if !give_stolen(attacker, item, ctx) {
            continue;
        }
        if deadly
            && attacker.equipment.is_empty(EquipSlot::Gloves)
            && !attacker.resists(Resistances::STONE, ctx.catalog)
        {
            ctx.say(MsgChannel::Fatal, format!("{} to stone.", subject_does(attacker, "turn", "turns")));
            ctx.kill(attacker, DeathCause::Petrified);
            break;
        }
        if source == Some(EquipSlot::Gloves)
            && defender
                .weapon()
                .and_then(|w| w.corpse_of.as_ref())
                .is_some_and(|sp| sp.touch_petrifies())
            && !defender.resists(Resistances::STONE, ctx.catalog)
        {
            ctx.say(MsgChannel::CombatKill, format!("{} turns to stone.", defender.cap_name()));
            ctx.kill(defender, DeathCause::Petrified);
            return;
        }
        if !take_all {
            break;
        }
    }
}

/// Freeze the defender into a block of ice. Traps under it change the
/// outcome. Returns damage to deal outright.
fn ice_block(defender: &mut Combatant, dmg: i32, ctx: &mut CombatContext<'_>) -> i32 {
    if defender.species.is_flaming() {
        return dmg * 2;
    }
    let name = defender.cap_name();
    let pos = defender.position;
    if defender.species.has(SpeciesFlags::PASSES_WALLS) {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("A block of ice surrounds {} but cannot contain it.", defender.the_name()),
        );
    }
    let encased = format!("{name} is momentarily encased in a block of ice.");
    match ctx.field.trap_at(pos).map(|t| t.kind) {
        Some(TrapKind::VibratingSquare) => {
            ctx.say(MsgChannel::Info, encased);
            ctx.say(MsgChannel::Info, "The block of ice vibrates strangely and shatters.");
            ctx.field.reveal_trap(pos);
            return 0;
        }
        Some(TrapKind::MagicPortal | TrapKind::Teleport | TrapKind::LevelTeleport) => {
            ctx.say(MsgChannel::Info, encased);
            ctx.say(MsgChannel::Info, "The block of ice suddenly disappears!");
            ctx.field.reveal_trap(pos);
            return 0;
        }
        Some(TrapKind::MagicTrap | TrapKind::FireTrap) => {
            ctx.say(MsgChannel::Info, encased);
            ctx.say(
                MsgChannel::Info,
                format!("The ice melts away from {}.", defender.the_name()),
            );
            return 0;
        }
        Some(TrapKind::PolyTrap) => {
            ctx.say(MsgChannel::Info, encased);
            defender.status.trapped = Some(Snare::Ice);
            ctx.field.reveal_trap(pos);
            ctx.emit(Event::Polymorphed {
                id: defender.id,
                into: String::new(),
            });
            return 0;
        }
        Some(kind @ (TrapKind::Pit | TrapKind::SpikedPit | TrapKind::Hole | TrapKind::TrapDoor)) => {
            ctx.field.set_terrain(pos, Terrain::Ice);
            let what = match kind {
                TrapKind::Hole => "hole",
                TrapKind::TrapDoor => "trap door",
                _ => "pit",
            };
            ctx.say(
                MsgChannel::Info,
                format!("The {what} below {} is filled in with ice.", defender.the_name()),
            );
            ctx.field.set_trap(pos, None);
        }
        Some(TrapKind::Web | TrapKind::BearTrap) | None => {}
    }
    defender.status.trapped = Some(Snare::Ice);
    ctx.say(MsgChannel::Info, format!("{} encased in a block of ice.", subject_is(defender)));
    0
}

/// Spin a web around the defender, slowing it and sticking it to the floor
pub fn web_attack(
    attacker: &Combatant,
    defender: &mut Combatant,
    strength: i32,
    mentioned: bool,
    ctx: &mut CombatContext<'_>,
) {
    let sp = &defender.species;
    if sp.has(SpeciesFlags::WEBMAKER)
        || sp.has(SpeciesFlags::AMORPHOUS)
        || sp.has(SpeciesFlags::WHIRLY)
        || sp.is_unsolid()
    {
        return;
    }
    let old_slow = defender.status.slowed;
    defender.status.add_web_slow(u16::try_from(strength.max(0) * 2).unwrap_or(u16::MAX));

    let pos = defender.position;
    let mut trapped = false;
    let trap = ctx.field.trap_at(pos);
    match trap {
        None if ctx.field.terrain(pos).holds_web() => {
            ctx.field.set_trap(pos, Some(TrapKind::Web));
            defender.status.trapped = Some(Snare::Web);
            trapped = true;
        }
        Some(t) if t.kind == TrapKind::Web && defender.status.trapped.is_none() => {
            defender.status.trapped = Some(Snare::Web);
            trapped = true;
        }
        _ => {}
    }
    let has_web = ctx.field.trap_at(pos).is_some_and(|t| t.kind == TrapKind::Web);
    if has_web {
        ctx.field.reveal_trap(pos);
    }

    let surface = ctx.field.terrain(pos).surface();
    if defender.status.slowed > old_slow || trapped {
        if !mentioned {
            ctx.say(
                MsgChannel::CombatHit,
                format!(
                    "{} {} spinnerets around {}.",
                    subject_does(attacker, "move", "moves"),
                    if attacker.is_player() { "your" } else { "its" },
                    defender.the_name()
                ),
            );
        }
        if trapped {
            ctx.say(
                MsgChannel::CombatHit,
                format!("The web sticks {} to the {surface}.", defender.the_name()),
            );
        }
    } else if !has_web {
        let whose = upcase_first(&possessive(attacker));
        let surface = if defender.species.has(SpeciesFlags::CLINGER)
            || defender.species.kind == SpeciesKind::LurkerAbove
        {
            "ceiling"
        } else {
            surface
        };
        ctx.say(
            MsgChannel::CombatImmune,
            format!("{whose} webbing does not adhere to the {surface}."),
        );
    }
}

/// Open a pit under the defender
fn pit_attack(defender: &mut Combatant, ctx: &mut CombatContext<'_>) {
    let pos = defender.position;
    match ctx.field.trap_at(pos) {
        None if ctx.field.terrain(pos).holds_web() => {
            ctx.field.set_trap(pos, Some(TrapKind::Pit));
            ctx.field.reveal_trap(pos);
            ctx.say(MsgChannel::Info, format!("A pit opens up under {}!", defender.the_name()));
        }
        Some(t) if t.kind.is_pit() => {}
        _ => return,
    }
    if defender.species.has(SpeciesFlags::FLYER) || defender.species.has(SpeciesFlags::FLOATER) {
        return;
    }
    if defender.status.trapped.is_none() {
        defender.status.trapped = Some(Snare::Pit);
        ctx.say(MsgChannel::StatusBad, format!("{} into the pit!", subject_does(defender, "fall", "falls")));
    }
}

/// Golems that fall apart when their material is attacked
fn golem_crumbles(defender: &Combatant, effect: DamageType) -> bool {
    matches!(
        (defender.species.kind, effect),
        (SpeciesKind::IronGolem, DamageType::Rust)
            | (SpeciesKind::WoodGolem | SpeciesKind::LeatherGolem, DamageType::Decay)
    )
}

/// Apply the typed effect of a landed attack.
///
/// Rolls the attack's dice, lets the defender's magic cancellation negate
/// the special part, then applies whatever the damage type does. Damage left
/// over comes off the defender's hit points. A dead defender is left alone.
pub fn apply_typed_damage(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    ctx: &mut CombatContext<'_>,
) -> Damage {
    if defender.is_dead() {
        return Damage {
            defender_died: true,
            ..Damage::default()
        };
    }
    let catalog = ctx.catalog;
    let mut tmp = ctx.dice(u32::from(attack.dice_num), u32::from(attack.dice_sides));
    let armpro = i32::from(magic_negation(defender, catalog));
    let negated = !((ctx.rn2(9) as i32) >= 2 * armpro || ctx.one_in(50));
    let protect_inventory = !(armpro < 5 && (armpro < 1 || ctx.one_in((armpro * 2) as u32)));
    let mut special = false;

    if attacker.is_player()
        && attacker.species.is_demon()
        && ctx.one_in(13)
        && attacker.weapon().is_none()
        && !matches!(
            attacker.species.kind,
            SpeciesKind::Succubus | SpeciesKind::Incubus | SpeciesKind::Balrog
        )
    {
        ctx.say(MsgChannel::Info, "Some hell-p has arrived!");
        ctx.emit(Event::DemonSummoned);
        return Damage::special();
    }

    let dname = defender.cap_name();
    match attack.damage_type {
        DamageType::Stun => {
            if attacker.status.can_see() {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} for a moment.", subject_does(defender, "stagger", "staggers")),
                );
            }
            defender.status.stunned = defender.status.stunned.max(1);
            tmp = physical(attacker, defender, attack, tmp, ctx);
        }
        DamageType::Legs => {
            if armpro >= 4 {
                tmp = 0;
            } else {
                tmp = physical(attacker, defender, attack, tmp, ctx);
            }
        }
        DamageType::Lycanthropy | DamageType::Heal | DamageType::Physical => {
            tmp = physical(attacker, defender, attack, tmp, ctx);
        }
        DamageType::Fire => {
            if negated {
                tmp = 0;
            } else {
                let resists = defender.resists(Resistances::FIRE, catalog);
                if !resists {
                    ctx.say(MsgChannel::CombatHit, format!("{} on fire!", subject_is(defender)));
                }
                if matches!(
                    defender.species.kind,
                    SpeciesKind::StrawGolem | SpeciesKind::PaperGolem
                ) {
                    ctx.say(MsgChannel::CombatKill, format!("{dname} burns completely!"));
                    slay_by(attacker, defender, DeathCause::Burned, ctx);
                    tmp = 0;
                } else {
                    if !protect_inventory {
                        tmp += destroy_carried(defender, ObjectClass::Scroll, DamageType::Fire, ctx);
                        tmp += destroy_carried(defender, ObjectClass::Spellbook, DamageType::Fire, ctx);
                    }
                    if resists {
                        ctx.say(
                            MsgChannel::CombatImmune,
                            format!("{} on fire, but doesn't heat up!", subject_is(defender)),
                        );
                        tmp = 0;
                    }
                    if !protect_inventory {
                        tmp += destroy_carried(defender, ObjectClass::Potion, DamageType::Fire, ctx);
                    }
                }
            }
        }
        DamageType::Cold => {
            if negated {
                tmp = 0;
            } else {
                if defender.resists(Resistances::COLD, catalog) {
                    ctx.say(
                        MsgChannel::CombatImmune,
                        format!("{} covered in frost, but not chilly!", subject_is(defender)),
                    );
                    tmp = 0;
                } else {
                    ctx.say(MsgChannel::CombatHit, format!("{} covered in frost!", subject_is(defender)));
                }
                if !protect_inventory {
                    tmp += destroy_carried(defender, ObjectClass::Potion, DamageType::Cold, ctx);
                }
            }
        }
        DamageType::Electric => {
            if negated {
                tmp = 0;
            } else {
                let resists = defender.resists(Resistances::SHOCK, catalog);
                if !resists {
                    ctx.say(MsgChannel::CombatHit, format!("{} zapped!", subject_is(defender)));
                }
                if !protect_inventory {
                    tmp += destroy_carried(defender, ObjectClass::Wand, DamageType::Electric, ctx);
                }
                if resists {
                    ctx.say(
                        MsgChannel::CombatImmune,
                        format!("{} zapped, but not shocked!", subject_is(defender)),
                    );
                    tmp = 0;
                }
                if !protect_inventory {
                    tmp += destroy_carried(defender, ObjectClass::Ring, DamageType::Electric, ctx);
                }
            }
        }
        DamageType::Acid => {
            if defender.resists(Resistances::ACID, catalog) {
                tmp = 0;
            }
            if ctx.one_in(30) && !protect_inventory {
                hurtarmor(defender, ErosionKind::Corrode, ctx);
            }
            if ctx.one_in(6) && !protect_inventory {
                let whose = possessive(defender);
                if let Some(weapon) = defender.equipment.get_mut(EquipSlot::Weapon) {
                    erode_obj(weapon, &whose, ErosionKind::Corrode, true, ctx);
                }
            }
        }
        DamageType::Stone => {
            if !defender.resists(Resistances::STONE, catalog) {
                ctx.say(MsgChannel::CombatKill, format!("{} to stone!", subject_does(defender, "turn", "turns")));
                slay_by(attacker, defender, DeathCause::Petrified, ctx);
            }
            tmp = 0;
        }
        DamageType::Seduce | DamageType::SeduceSpecial | DamageType::StealItem => {
            steal(attacker, defender, attack, ctx);
            special = true;
            tmp = 0;
        }
        DamageType::StealAmulet => {
            if let Some(amulet) = defender.equipment.take(EquipSlot::Amulet) {
                give_stolen(attacker, amulet, ctx);
                special = true;
            }
            tmp = 0;
        }
        DamageType::StealGold => {
            if defender.gold > 0 {
                attacker.gold += std::mem::take(&mut defender.gold);
                if attacker.is_player() {
                    ctx.say(MsgChannel::ItemGain, "Your purse feels heavier.");
                } else if defender.is_player() {
                    ctx.say(MsgChannel::ItemLoss, "Your purse feels lighter.");
                }
                special = true;
            }
            tmp = 0;
        }
        DamageType::Teleport => {
            tmp = tmp.max(1);
            if !negated && tmp < defender.hp.current() {
                if !defender.is_player() {
                    ctx.say(MsgChannel::Info, format!("{dname} suddenly disappears!"));
                }
                ctx.emit(Event::Teleported { id: defender.id });
                special = true;
            }
        }
        DamageType::MagicMissile => {
            if negated || i32::from(defender.species.mr) > ctx.rn2(100) as i32 {
                ctx.say(
                    MsgChannel::CombatImmune,
                    format!(
                        "{} magical attack seems to have no effect on {}.",
                        upcase_first(&possessive(attacker)),
                        defender.the_name()
                    ),
                );
                tmp = 0;
            } else {
                tmp = (tmp * 2 - armpro).max(1);
            }
        }
        DamageType::Disintegrate => {
            if negated || defender.resists(Resistances::DISINT, catalog) {
                let sp = &defender.species;
                let verb = if sp.stands_firm() { "stands" } else { "remains" };
                let firm = if sp.is_noncorporeal() || sp.is_unsolid() || sp.has(SpeciesFlags::WHIRLY) {
                    ""
                } else {
                    " firm"
                };
                let text = if defender.is_player() {
                    format!("You {}{firm}.", verb.trim_end_matches('s'))
                } else {
                    format!("{dname} {verb}{firm}.")
                };
                ctx.say(MsgChannel::CombatImmune, text);
            } else {
                let slot = [EquipSlot::Cloak, EquipSlot::Body, EquipSlot::Shirt]
                    .into_iter()
                    .find(|s| !defender.equipment.is_empty(*s));
                match slot {
                    Some(slot) => {
                        let whose = upcase_first(&possessive(defender));
                        let proof = defender.equipment.get(slot).is_some_and(|item| {
                            catalog.lookup(item.otype).traits.contains(ObjectTraits::DISINT_RES)
                        });
                        let name = defender
                            .equipment
                            .get(slot)
                            .map(|item| item.xname(catalog))
                            .unwrap_or_default();
                        if proof {
                            ctx.say(MsgChannel::CombatImmune, format!("{whose} {name} is not disintegrated."));
                        } else if let Some(item) = defender.equipment.take(slot) {
                            ctx.say(MsgChannel::ItemLoss, format!("{whose} {name} disintegrates!"));
                            ctx.emit(Event::ItemDestroyed {
                                owner: defender.id,
                                item: item.id,
                            });
                        }
                    }
                    None => {
                        ctx.say(MsgChannel::CombatKill, format!("{} disintegrate{}.", dname, if defender.is_player() { "" } else { "s" }));
                        slay_by(attacker, defender, DeathCause::Disintegrated, ctx);
                    }
                }
            }
            tmp = 0;
        }
        DamageType::Blind => {
            if defender.species.has_eyes() {
                if defender.status.can_see() {
                    ctx.say(MsgChannel::CombatHit, format!("{} blinded.", subject_is(defender)));
                }
                let turns = (tmp / armpro.max(1)).max(1);
                defender
                    .status
                    .add_blindness(u16::try_from(turns).unwrap_or(MAX_BLIND));
            }
            tmp = 0;
        }
        DamageType::Curse => {
            if ctx.field.night && ctx.one_in(10) && !defender.status.cancelled {
                if defender.species.kind == SpeciesKind::ClayGolem {
                    ctx.say(
                        MsgChannel::CombatKill,
                        format!("Some writing vanishes from {} head!", possessive(defender)),
                    );
                    slay(attacker, defender, ctx);
                } else {
                    defender.status.cancelled = true;
                    ctx.say(MsgChannel::Info, if attacker.is_player() { "You chuckle." } else { "You hear a chuckling laugh." });
                }
            }
            tmp = 0;
        }
        DamageType::DrainLife => {
            if !negated && ctx.one_in(3) && !defender.resists(Resistances::DRAIN, catalog) {
                let drained = ctx.dice(2, 6);
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} suddenly {} weaker!", dname, if defender.is_player() { "feel" } else { "seems" }),
                );
                let remaining = defender.hp.current() - drained;
                defender.hp.set_max(defender.hp.max() - drained);
                if remaining <= 0 || defender.level == 0 {
                    ctx.say(MsgChannel::CombatKill, format!("{dname} dies!"));
                    slay_by(attacker, defender, DeathCause::Drained, ctx);
                } else {
                    defender.hp.set_current(remaining);
                    defender.level -= 1;
                    ctx.emit(Event::LevelLost { id: defender.id });
                }
                tmp = 0;
            }
        }
        DamageType::Rust | DamageType::Decay | DamageType::Corrode => {
            if golem_crumbles(defender, attack.damage_type) {
                ctx.say(MsgChannel::CombatKill, format!("{dname} falls to pieces!"));
                slay(attacker, defender, ctx);
            } else if !protect_inventory {
                let kind = match attack.damage_type {
                    DamageType::Rust => ErosionKind::Rust,
                    DamageType::Decay => ErosionKind::Rot,
                    _ => ErosionKind::Corrode,
                };
                hurtarmor(defender, kind, ctx);
            }
            tmp = 0;
        }
        DamageType::DrainStrength | DamageType::DrainDexterity | DamageType::DrainConstitution => {
            if !negated && ctx.one_in(8) {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!(
                        "{} {} was poisoned!",
                        upcase_first(&possessive(attacker)),
                        attack.damage_type.poison_subject(attack.attack_type)
                    ),
                );
                if defender.resists(Resistances::POISON, catalog) {
                    ctx.say(
                        MsgChannel::CombatImmune,
                        format!("The poison doesn't seem to affect {}.", defender.the_name()),
                    );
                } else if ctx.one_in(10) {
                    ctx.say(MsgChannel::CombatKill, "The poison was deadly...");
                    tmp = defender.hp.current();
                } else {
                    tmp += ctx.rn1(10, 6);
                }
            }
        }
        DamageType::DrainIntelligence => {
            tmp = eat_brain(attacker, defender, attack, armpro, tmp, ctx);
        }
        DamageType::Stick => {
            if !negated && !defender.species.sticks() {
                if let Some(hero) = attacker.hero_mut() {
                    hero.stuck_to = Some(defender.id);
                }
            }
        }
        DamageType::Wrap => {
            tmp = wrap(attacker, defender, attack, tmp, ctx);
        }
        DamageType::Paralyze => {
            if !negated && defender.status.can_move && ctx.one_in(3) && tmp < defender.hp.current() {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} frozen by {}!", subject_is(defender), attacker.the_name()),
                );
                let turns = ctx.rnd((11 / (armpro + 1)).max(1) as u32) as u16;
                if turns > 1 {
                    defender.status.paralyze(turns);
                } else {
                    defender.status.frozen = defender.status.frozen.max(turns);
                }
            }
        }
        DamageType::Sleep => {
            if !negated
                && !defender.status.sleeping
                && !defender.resists(Resistances::SLEEP, catalog)
            {
                let turns = ctx.rnd(20) as u16;
                defender.status.fall_asleep(turns);
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} put to sleep by {}!", subject_is(defender), attacker.the_name()),
                );
            }
        }
        DamageType::Slime => {
            if !negated && armpro < 5 && ctx.one_in(4) {
                let sp = &defender.species;
                if !sp.is_flaming() && !sp.is_unsolid() && sp.kind != SpeciesKind::GreenSlime {
                    ctx.say(
                        MsgChannel::CombatHit,
                        format!("{} {} into slime.", subject_does(attacker, "turn", "turns"), defender.the_name()),
                    );
                    let slime = bestiary::green_slime();
                    defender.name.clone_from(&slime.name);
                    defender.species = slime;
                    ctx.emit(Event::Polymorphed {
                        id: defender.id,
                        into: defender.name.clone(),
                    });
                    special = true;
                    tmp = 0;
                }
            }
        }
        DamageType::Slow => {
            let already_slow = defender.monster_traits().is_some_and(|m| m.slow)
                || (defender.is_player() && defender.status.slowed > 0);
            if !negated && !already_slow && ctx.one_in((15 - 2 * armpro).max(1) as u32) {
                match defender.monster_traits_mut() {
                    Some(traits) => traits.slow = true,
                    None => defender.intrinsics.fast = false,
                }
                ctx.say(MsgChannel::CombatHit, format!("{} down.", subject_does(defender, "slow", "slows")));
            }
        }
        DamageType::Confuse => {
            if defender.status.confused == 0 {
                ctx.say(MsgChannel::CombatHit, format!("{} confused.", pov(defender, "You feel", |n| format!("{n} looks"))));
                defender.status.add_confusion(1);
            }
        }
        DamageType::IceBlock => {
            tmp = ice_block(defender, tmp, ctx);
        }
        DamageType::Webs => {
            web_attack(attacker, defender, tmp, true, ctx);
            tmp = 0;
        }
        DamageType::Pits => {
            pit_attack(defender, ctx);
        }
        DamageType::Disenchant
        | DamageType::Digest
        | DamageType::Hallucinate
        | DamageType::Death
        | DamageType::Pestilence
        | DamageType::Famine
        | DamageType::Disease
        | DamageType::DrainEnergy
        | DamageType::Scald
        | DamageType::Displace
        | DamageType::ClericSpell
        | DamageType::MageSpell
        | DamageType::RandomBreath => {
            if attack.damage_type != DamageType::Disenchant {
                tmp = 0;
            }
        }
    }

    debug!(
        damage_type = %attack.damage_type,
        negated,
        protect_inventory,
        damage = tmp,
        "typed damage"
    );

    if defender.is_dead() {
        return Damage {
            hp_delta: 0,
            defender_died: true,
            special,
        };
    }
    let before = defender.hp.current();
    let died = tmp > 0 && defender.hp.damage(tmp) && slay(attacker, defender, ctx);
    Damage {
        hp_delta: before - defender.hp.current(),
        defender_died: died || defender.is_dead(),
        special,
    }
}

/// Brain eating: the helmet and grease can stop it, and the eater gets fed
fn eat_brain(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    armpro: i32,
    mut tmp: i32,
    ctx: &mut CombatContext<'_>,
) -> i32 {
    if !defender.species.has_head() {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("{} harmed.", pov(defender, "You don't seem", |n| format!("{n} doesn't seem"))),
        );
        return 0;
    }
    if defender.species.kind == SpeciesKind::GreenSlime {
        let unsolid = attacker.species.is_unsolid();
        if let Some(hero) = attacker.hero_mut().filter(|h| !h.unchanging && !unsolid) {
            ctx.say(MsgChannel::Fatal, "You suck in some slime and don't feel very well.");
            hero.afflictions.slimed = 10;
        }
        return tmp;
    }
    if slips_free(defender, attack, ctx) {
        return tmp;
    }
    if !defender.equipment.is_empty(EquipSlot::Helmet) && ctx.rn2(8) != 0 {
        ctx.say(
            MsgChannel::CombatMiss,
            format!("{} helmet blocks {} attack to its head.", upcase_first(&possessive(defender)), possessive(attacker)),
        );
        return tmp;
    }
    if armpro * armpro >= ctx.rn2(27) as i32 {
        return tmp;
    }

    let eater_is_hero = attacker.is_player();
    if defender.species.is_mindless() {
        ctx.say(
            MsgChannel::CombatHit,
            format!("{} {} brain, but it doesn't notice.", subject_does(attacker, "eat", "eats"), possessive(defender)),
        );
    } else {
        ctx.say(
            MsgChannel::CombatHit,
            format!("{} {} brain!", subject_does(attacker, "eat", "eats"), possessive(defender)),
        );
    }
    if eater_is_hero && !ctx.sub_attack {
        attacker.conduct.violate(ConductKind::Food);
        if !defender.species.is_vegan() {
            attacker.conduct.violate(ConductKind::Vegan);
        }
        attacker.conduct.violate(ConductKind::Vegetarian);
    }
    if defender.species.touch_petrifies() && !attacker.resists(Resistances::STONE, ctx.catalog) {
        if let Some(hero) = attacker.hero_mut() {
            if hero.afflictions.stoned == 0 {
                hero.afflictions.stoned = 5;
                ctx.say(MsgChannel::Fatal, "You are slowing down.");
            }
        }
    }
    if defender.species.is_mindless() {
        return tmp;
    }
    tmp += ctx.rnd(10) as i32;
    if eater_is_hero {
        let food = ctx.rnd(30) as i32;
        let restore = ctx.rnd(4) as i32;
        if let Some(hero) = attacker.hero_mut() {
            hero.nutrition += food;
        }
        attacker.attributes.restore_by(Attribute::Intelligence, restore);
    }
    tmp
}

/// Wrapping attacks: grab on first, then crush or drown
fn wrap(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    tmp: i32,
    ctx: &mut CombatContext<'_>,
) -> i32 {
    if defender.species.sticks() {
        return 0;
    }
    let stuck = attacker.hero().and_then(|h| h.stuck_to);
    match stuck {
        None => {
            if !ctx.one_in(10) {
                ctx.say(
                    MsgChannel::CombatMiss,
                    format!("{} against {} leg.", subject_does(attacker, "brush", "brushes"), possessive(defender)),
                );
                return 0;
            }
            if slips_free(defender, attack, ctx) {
                return 0;
            }
            ctx.say(
                MsgChannel::CombatHit,
                format!("{} around {}!", subject_does(attacker, "swing yourself", "swings itself"), defender.the_name()),
            );
            if let Some(hero) = attacker.hero_mut() {
                hero.stuck_to = Some(defender.id);
            }
            tmp
        }
        Some(id) if id == defender.id => {
            let sp = &defender.species;
            if ctx.field.terrain(attacker.position).is_pool()
                && !sp.has(SpeciesFlags::SWIMMER)
                && !sp.has(SpeciesFlags::AMPHIBIOUS)
            {
                ctx.say(MsgChannel::CombatKill, format!("You drown {}...", defender.the_name()));
                defender.hp.current()
            } else {
                if attack.attack_type == AttackType::Hug {
                    ctx.say(MsgChannel::CombatHit, format!("{} being crushed.", subject_is(defender)));
                }
                tmp
            }
        }
        Some(_) => {
            ctx.say(
                MsgChannel::CombatMiss,
                format!("{} against {} leg.", subject_does(attacker, "brush", "brushes"), possessive(defender)),
            );
            0
        }
    }
}

/// End the attacker's form after it blew itself up
fn end_exploded_form(attacker: &mut Combatant, ctx: &mut CombatContext<'_>) {
    let restored = attacker
        .hero_mut()
        .and_then(|hero| hero.original_form.take());
    match restored {
        Some((species, hp)) => {
            attacker.name.clone_from(&species.name);
            attacker.species = species;
            attacker.hp = hp;
            ctx.say(MsgChannel::StatusBad, "You return to your normal form.");
            ctx.emit(Event::HeroExploded);
        }
        None if attacker.is_player() => {
            ctx.emit(Event::HeroExploded);
        }
        None => {
            ctx.kill(attacker, DeathCause::Killed("its own explosion".to_string()));
        }
    }
}

/// Explode against the defender. The attacker's current form is used up
/// whatever happens.
pub fn explode_on(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    ctx: &mut CombatContext<'_>,
) -> Damage {
    let tmp = ctx.dice(u32::from(attack.dice_num), u32::from(attack.dice_sides));
    ctx.say(MsgChannel::StatusBad, format!("{}!", subject_does(attacker, "explode", "explodes")));
    let mut died = false;
    let before = defender.hp.current();
    let whose = possessive(attacker);
    match attack.damage_type {
        DamageType::Blind => {
            if defender.species.has_eyes() && defender.status.can_see() {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} blinded by {whose} flash of light!", subject_is(defender)),
                );
                defender
                    .status
                    .add_blindness(u16::try_from(tmp.max(0)).unwrap_or(MAX_BLIND));
            }
        }
        DamageType::Hallucinate => {
            if defender.species.has_eyes() && defender.status.can_see() {
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("{} affected by {whose} flash of light!", subject_is(defender)),
                );
                defender.status.confused = defender.status.confused.max(1);
            }
        }
        DamageType::Cold | DamageType::Fire | DamageType::Electric => {
            let res = match attack.damage_type {
                DamageType::Cold => Resistances::COLD,
                DamageType::Fire => Resistances::FIRE,
                _ => Resistances::SHOCK,
            };
            if defender.resists(res, ctx.catalog) {
                ctx.say(
                    MsgChannel::CombatImmune,
                    format!("The blast doesn't seem to affect {}.", defender.the_name()),
                );
            } else {
                ctx.say(MsgChannel::CombatHit, format!("{} blasted!", pov(defender, "You get", |n| format!("{n} gets"))));
                if defender.hp.damage(tmp) {
                    died = slay(attacker, defender, ctx);
                }
            }
        }
        _ => {}
    }
    end_exploded_form(attacker, ctx);
    Damage {
        hp_delta: before - defender.hp.current(),
        defender_died: died || defender.is_dead(),
        special: true,
    }
}

/// Swallow the defender whole for one round, then spit it back out
pub fn engulf(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    ctx: &mut CombatContext<'_>,
) -> Damage {
    let mut dam = ctx.dice(u32::from(attack.dice_num), u32::from(attack.dice_sides));
    if defender.species.size >= MonsterSize::Huge {
        return Damage::default();
    }
    let (nutrition, engulfed) = attacker
        .hero()
        .map_or((0, false), |h| (h.nutrition, h.engulfed_by.is_some()));
    if nutrition >= 1500 || engulfed {
        return Damage::default();
    }

    let stone_res = attacker.resists(Resistances::STONE, ctx.catalog);
    let digest = attack.damage_type == DamageType::Digest;
    let rider = defender.species.is_rider();
    let fatal = (defender.species.touch_petrifies() && !stone_res)
        || (digest && (rider || (defender.species.kind == SpeciesKind::Medusa && !stone_res)));

    if (digest || fatal) && attacker.is_player() && !ctx.sub_attack {
        attacker.conduct.violate(ConductKind::Food);
        if !defender.species.is_vegan() {
            attacker.conduct.violate(ConductKind::Vegan);
        }
        attacker.conduct.violate(ConductKind::Vegetarian);
    }

    if fatal && !rider {
        ctx.say(MsgChannel::Fatal, format!("You bite into {}.", defender.the_name()));
        ctx.say(MsgChannel::Fatal, "You turn to stone.");
        ctx.kill(attacker, DeathCause::Petrified);
        return Damage::special();
    }

    ctx.say(MsgChannel::CombatHit, format!("{} {}!", subject_does(attacker, "engulf", "engulfs"), defender.the_name()));
    let before = defender.hp.current();
    match attack.damage_type {
        DamageType::Digest => {
            if rider {
                ctx.say(MsgChannel::Fatal, "Unfortunately, digesting any of it is fatal.");
                ctx.kill(attacker, DeathCause::Killed(format!("unwisely trying to eat {}", defender.name)));
                return Damage::special();
            }
            let text = format!("You totally digest {}.", defender.the_name());
            slay_by(attacker, defender, DeathCause::Digested, ctx);
            ctx.say(MsgChannel::CombatKill, text);
            let slime = defender.species.kind == SpeciesKind::GreenSlime;
            let gain = (defender.species.nutrition as i32 + 1) / 2;
            if let Some(hero) = attacker.hero_mut() {
                hero.nutrition += gain;
                if slime {
                    ctx.say(MsgChannel::Fatal, "The green slime isn't sitting well with you.");
                    if !hero.unchanging {
                        hero.afflictions.slimed = 5;
                    }
                }
            }
            return Damage {
                hp_delta: before,
                defender_died: true,
                special: true,
            };
        }
        DamageType::Physical => {
            if attacker.species.kind == SpeciesKind::FogCloud {
                if defender.species.has(SpeciesFlags::AMPHIBIOUS) && !defender.species.is_flaming() {
                    dam = 0;
                    ctx.say(
                        MsgChannel::CombatImmune,
                        format!("{} doesn't seem harmed by your moisture.", defender.cap_name()),
                    );
                } else {
                    ctx.say(MsgChannel::CombatHit, format!("{} laden with your moisture.", subject_is(defender)));
                }
            } else {
                ctx.say(MsgChannel::CombatHit, format!("{} pummeled with your debris!", subject_is(defender)));
            }
        }
        DamageType::Acid => {
            if defender.resists(Resistances::ACID, ctx.catalog) {
                ctx.say(
                    MsgChannel::CombatImmune,
                    format!("Your goo covers {}, but doesn't harm it.", defender.the_name()),
                );
                dam = 0;
            } else {
                ctx.say(MsgChannel::CombatHit, format!("{} covered with your goo!", subject_is(defender)));
            }
        }
        DamageType::Blind => {
            if defender.species.has_eyes() {
                if defender.status.can_see() {
                    ctx.say(MsgChannel::CombatHit, format!("{} can't see in there!", defender.cap_name()));
                }
                defender
                    .status
                    .add_blindness(u16::try_from(dam.max(0)).unwrap_or(MAX_BLIND));
            }
            dam = 0;
        }
        DamageType::Electric | DamageType::Cold | DamageType::Fire => {
            if ctx.rn2(2) != 0 {
                let (res, immune, hurt) = match attack.damage_type {
                    DamageType::Electric => (
                        Resistances::SHOCK,
                        format!("Your crackle of electricity fails to hurt {}.", defender.the_name()),
                        format!("The air around {} crackles with electricity.", defender.the_name()),
                    ),
                    DamageType::Cold => (
                        Resistances::COLD,
                        format!("{} seems mildly chilly.", defender.cap_name()),
                        format!("{} freezing to death!", subject_is(defender)),
                    ),
                    _ => (
                        Resistances::FIRE,
                        format!("{} seems mildly hot.", defender.cap_name()),
                        format!("{} burning to a crisp!", subject_is(defender)),
                    ),
                };
                if defender.resists(res, ctx.catalog) {
                    ctx.say(MsgChannel::CombatImmune, immune);
                    dam = 0;
                } else {
                    ctx.say(MsgChannel::CombatHit, hurt);
                }
            } else {
                dam = 0;
            }
        }
        _ => dam = 0,
    }

    let died = defender.hp.damage(dam) && slay(attacker, defender, ctx);
    if !died {
        let verb = if attacker.species.is_animal() { "regurgitate" } else { "expel" };
        ctx.say(MsgChannel::Info, format!("You {verb} {}!", defender.the_name()));
        if attacker.species.is_animal() {
            ctx.say(
                MsgChannel::Info,
                format!("Obviously, you didn't like {} taste.", possessive(defender)),
            );
        }
    }
    Damage {
        hp_delta: before - defender.hp.current(),
        defender_died: died || defender.is_dead(),
        special: false,
    }
}

/// Items that, held in an attack, can carry the effect (used by callers
/// deciding whether a weapon hit also delivers its damage type)
pub(crate) fn delivers_typed_effect(effect: DamageType) -> bool {
    !matches!(
        effect,
        DamageType::Physical | DamageType::ClericSpell | DamageType::MageSpell
    )
}
