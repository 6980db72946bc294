//! Damage assembly for one blow struck by the hero
//!
//! A blow is dealt with whatever the hero holds: a wielded weapon, a thrown
//! missile, some improvised object or bare hands. The object travels inside
//! the [`Strike`] for the duration of the blow and comes back out of it
//! (possibly changed, possibly used up) when the blow is over.

use tracing::debug;

use crate::combatant::{
    AlignmentType, Combatant, ConductKind, DeathCause, Duty, EquipSlot, Race, Role, SkillLevel,
    WeaponSkill,
};
use crate::consts::{DEVOUT, MAX_BLIND, MAX_SPLIT_COUNT};
use crate::message::MsgChannel;
use crate::monster::{Resistances, SpeciesKind};
use crate::object::{Item, Material, ObjectCatalog, ObjectClass, ObjectKind, ObjectTraits, otyp};
use crate::world::Position;

use super::erosion::possessive;
use super::passive::{split_monster, trigger_passive};
use super::potion::{potion_hit, resists_magic};
use super::resolver::{slay, slay_by};
use super::weapon::{ammo_and_launcher, dmgval, shade_aware, shade_glare, weapon_skill, wielded_skill};
use super::{AttackType, CombatContext, Event};

/// One blow
#[derive(Debug, Clone, PartialEq)]
pub struct Strike {
    /// What the blow is struck with; `None` is bare hands. Emptied when the
    /// object is used up by the blow.
    pub weapon: Option<Item>,
    /// Slot the object was drawn from, for wielded weapons
    pub slot: Option<EquipSlot>,
    pub thrown: bool,
    /// The d20 the to-hit roll was made with
    pub dieroll: i32,
    /// Hit points the blow took, once struck
    pub damage: i32,
}

impl Strike {
    pub fn bare_handed(dieroll: i32) -> Self {
        Self {
            weapon: None,
            slot: None,
            thrown: false,
            dieroll,
            damage: 0,
        }
    }

    /// A blow with the item held in `slot`
    pub fn wielded(weapon: Option<Item>, slot: EquipSlot, dieroll: i32) -> Self {
        Self {
            slot: weapon.is_some().then_some(slot),
            weapon,
            ..Self::bare_handed(dieroll)
        }
    }

    pub fn thrown(missile: Item, dieroll: i32) -> Self {
        Self {
            weapon: Some(missile),
            thrown: true,
            ..Self::bare_handed(dieroll)
        }
    }

    fn is_wielded(&self, two_weapon: bool) -> bool {
        match self.slot {
            Some(EquipSlot::Weapon) => true,
            Some(EquipSlot::SwapWeapon) => two_weapon,
            _ => false,
        }
    }

    /// Use up one of the object, or all of it
    fn use_up(&mut self, all: bool) {
        match self.weapon.as_mut() {
            Some(obj) if !all && !self.thrown && obj.quantity > 1 => obj.quantity -= 1,
            _ => self.weapon = None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joust {
    No,
    Hit,
    /// Hit, and the lance breaks
    Shatter,
}

/// "!" for a solid hit, "." for a weak one
fn exclam(force: i32) -> &'static str {
    if force < 0 {
        "?"
    } else if force <= 4 {
        "."
    } else {
        "!"
    }
}

fn skill_value(attacker: &Combatant, skill: WeaponSkill) -> i32 {
    attacker
        .hero()
        .map_or(0, |h| h.skills.level(skill).value())
}

fn fumbling(attacker: &Combatant, catalog: &dyn ObjectCatalog) -> bool {
    attacker
        .equipment
        .iter()
        .any(|(_, item)| catalog.lookup(item.otype).traits.contains(ObjectTraits::FUMBLING))
}

/// Whether a lance blow from horseback turns into a joust
fn joust(attacker: &Combatant, defender: &Combatant, lance: &Strike, ctx: &mut CombatContext<'_>) -> Joust {
    let Some(hero) = attacker.hero() else {
        return Joust::No;
    };
    if fumbling(attacker, ctx.catalog) || attacker.status.stunned > 0 {
        return Joust::No;
    }
    if !lance.is_wielded(hero.two_weapon) {
        return Joust::No;
    }
    let mut rating = hero.skills.level(WeaponSkill::Lance);
    if hero.two_weapon {
        rating = rating.min(hero.skills.level(WeaponSkill::TwoWeapon));
    }
    let rating = rating.max(SkillLevel::Unskilled).value() as u32;

    let roll = ctx.rn2(5);
    if roll >= rating {
        return Joust::No;
    }
    if roll == 0 && ctx.rnl(50, attacker.luck(ctx.catalog)) == 49 && !defender.species.is_unsolid() {
        return Joust::Shatter;
    }
    Joust::Hit
}

/// The squares an axe swing sweeps besides the target's. The last two are
/// only reached by a master.
fn cleave_squares(from: Position, target: Position) -> [Position; 4] {
    let (u, m) = (from, target);
    if u.x == m.x {
        [
            Position::new(m.x + 1, m.y),
            Position::new(m.x - 1, m.y),
            Position::new(m.x + 1, u.y),
            Position::new(m.x - 1, u.y),
        ]
    } else if u.y == m.y {
        [
            Position::new(m.x, m.y + 1),
            Position::new(m.x, m.y - 1),
            Position::new(u.x, m.y + 1),
            Position::new(u.x, m.y - 1),
        ]
    } else {
        let (dx3, dx4) = if u.x > m.x { (1, -1) } else { (-1, 1) };
        let (dy3, dy4) = if u.y > m.y { (-1, 1) } else { (1, -1) };
        [
            Position::new(u.x, m.y),
            Position::new(m.x, u.y),
            Position::new(u.x + dx3, u.y + dy3),
            Position::new(u.x + dx4, u.y + dy4),
        ]
    }
}

/// Carry an axe swing into the hostile bystanders on either side
fn cleave(attacker: &mut Combatant, target: Position, blow: &mut Strike, ctx: &mut CombatContext<'_>) {
    let axe_skill = attacker
        .hero()
        .map_or(SkillLevel::Restricted, |h| h.skills.level(WeaponSkill::Axe));
    let Some(axe) = blow.weapon.as_ref() else {
        return;
    };
    let arc = if axe_skill >= SkillLevel::Master { "tremendous" } else { "wide" };
    ctx.say(MsgChannel::Info, format!("You swing {} in a {arc} arc.", axe.yname(ctx.catalog)));

    let reach = if axe_skill >= SkillLevel::Master { 4 } else { 2 };
    ctx.axe_in_use = true;
    for pos in cleave_squares(attacker.position, target).into_iter().take(reach) {
        let Some(idx) = ctx.field.bystander_at(pos) else {
            continue;
        };
        let eligible = {
            let other = &ctx.field.bystanders[idx];
            !other.is_tame() && !other.is_peaceful() && !other.is_dead()
        };
        if !eligible {
            continue;
        }
        let mut other = ctx.field.bystanders.remove(idx);
        let mut sweep = Strike {
            weapon: blow.weapon.take(),
            slot: blow.slot,
            thrown: false,
            dieroll: blow.dieroll,
            damage: 0,
        };
        ctx.with_sub_attack(|ctx| {
            let alive = strike(attacker, &mut other, &mut sweep, ctx);
            // the passive response sees the axe back in hand
            if let Some(slot) = sweep.slot {
                attacker.equipment.put_back(slot, sweep.weapon.take());
                trigger_passive(&mut other, attacker, true, alive, AttackType::Weapon, ctx);
                sweep.weapon = attacker.equipment.take(slot);
            } else {
                trigger_passive(&mut other, attacker, true, alive, AttackType::Weapon, ctx);
            }
        });
        blow.weapon = sweep.weapon.take();
        let idx = idx.min(ctx.field.bystanders.len());
        ctx.field.bystanders.insert(idx, other);
        if blow.weapon.is_none() || attacker.is_dead() {
            break;
        }
    }
    ctx.axe_in_use = false;
}

/// A peaceful defender turns on the hero; temple priests take it badly
fn provoke(defender: &mut Combatant, ctx: &mut CombatContext<'_>) {
    defender.status.wake();
    let Some(traits) = defender.monster_traits_mut() else {
        return;
    };
    if !traits.peaceful {
        return;
    }
    traits.peaceful = false;
    if matches!(traits.duty, Duty::Priest(_)) {
        ctx.emit(Event::PriestAngered { priest: defender.id });
    }
}

/// Strike `defender` with the blow. Returns whether the defender is still
/// alive.
///
/// Hitting a peaceful watchman, priest or shopkeeper brings the town watch
/// down on the hero. A temple priest may call its god's wrath whatever
/// happens.
pub fn strike(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    blow: &mut Strike,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let guarded = defender.is_peaceful()
        && (defender.monster_traits().is_some_and(|t| t.duty != Duty::None)
            || matches!(
                defender.species.kind,
                SpeciesKind::Watchman | SpeciesKind::WatchCaptain
            ));
    let priest = defender
        .monster_traits()
        .is_some_and(|t| matches!(t.duty, Duty::Priest(_)));

    let alive = hit_monster(attacker, defender, blow, ctx);

    if priest && ctx.one_in(2) {
        ctx.say(MsgChannel::Divine, "You feel that the god of this temple is displeased.");
        ctx.emit(Event::TempleGodWrath { priest: defender.id });
    }
    if guarded {
        ctx.say(MsgChannel::CombatAlert, "You hear the shrill sound of a guard's whistle.");
        ctx.emit(Event::GuardsAngered);
    }
    alive
}

fn hit_monster(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    blow: &mut Strike,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let catalog = ctx.catalog;
    let thrown = blow.thrown;
    let (own_form, two_weapon, riding, martial, role, race) = match attacker.hero() {
        Some(h) => (
            !h.is_polymorphed(),
            h.two_weapon,
            h.is_riding(),
            h.role.is_martial(),
            Some(h.role),
            Some(h.race),
        ),
        None => (false, false, false, false, None, None),
    };
    let stuck_to_it = attacker
        .hero()
        .is_some_and(|h| h.stuck_to == Some(defender.id) || h.engulfed_by == Some(defender.id));
    let engulfed = attacker.hero().is_some_and(|h| h.engulfed_by.is_some());
    let luck = attacker.luck(catalog);
    let sees = attacker.status.can_see();
    let dname = defender.the_name();

    let mut tmp: i32;
    let mut hittxt = false;
    let mut get_dmg_bonus = true;
    let mut valid_weapon_attack = false;
    let mut poisoned = false;
    let mut jousting = Joust::No;
    let mut already_killed = false;
    let mut do_cleave = false;
    // material of whatever seared the defender, and what did it
    let mut sear: Option<(Material, Option<String>)> = None;
    let mut rings = 0;
    let mut unconventional: Option<String> = None;
    let unarmed = blow.slot.is_none()
        && attacker.weapon().is_none()
        && attacker.equipment.is_empty(EquipSlot::Body)
        && attacker.equipment.is_empty(EquipSlot::Shield);

    provoke(defender, ctx);

    match blow.weapon.as_ref() {
        None => {
            tmp = if defender.species.is_shade() {
                0
            } else if martial {
                let s = skill_value(attacker, WeaponSkill::BareHanded);
                ctx.rnd_i(4 + s * 2) + s
            } else {
                ctx.rnd(2) as i32
            };
            valid_weapon_attack = tmp > 1;
            let gloves = attacker.equipment.get(EquipSlot::Gloves);
            if gloves.is_some_and(Item::is_blessed)
                && (defender.species.is_undead() || defender.species.is_demon())
            {
                tmp += ctx.rnd(4) as i32;
            }
            if gloves.is_none() {
                let hated = [Material::Silver, Material::Iron]
                    .into_iter()
                    .find(|m| defender.species.hates_material(*m));
                if let Some(hated) = hated {
                    rings = EquipSlot::RINGS
                        .iter()
                        .filter(|slot| attacker.equipment.get(**slot).is_some_and(|r| r.material == hated))
                        .count();
                    if rings > 0 {
                        tmp += ctx.rnd(hated.hatred_die()) as i32;
                        sear = Some((hated, None));
                    }
                }
            }
        }
        Some(obj) => {
            let stats = catalog.lookup(obj.otype);
            let oname = obj.xname(catalog);
            if matches!(obj.class, ObjectClass::Weapon | ObjectClass::Gem) || stats.is_weptool() {
                let launcher = attacker.weapon();
                let not_melee = stats.is_launcher()
                    || (!thrown && (stats.is_missile() || stats.is_ammo()))
                    || (!thrown && !riding && stats.is_pole())
                    || (stats.is_ammo() && !ammo_and_launcher(obj, launcher, catalog));
                if not_melee {
                    tmp = if defender.species.is_shade() && !shade_glare(obj, catalog) {
                        0
                    } else {
                        ctx.rnd(2) as i32
                    };
                    if defender.species.hates_material(obj.material) {
                        tmp += ctx.rnd(obj.material.hatred_die()) as i32;
                        sear = Some((obj.material, Some(oname)));
                    }
                    if !thrown
                        && blow.slot == Some(EquipSlot::Weapon)
                        && stats.kind == ObjectKind::Boomerang
                        && ctx.rnl(4, luck) == 3
                    {
                        let several = obj.quantity > 1;
                        ctx.say(
                            MsgChannel::ItemLoss,
                            format!(
                                "As you hit {dname}, {}{} breaks into splinters.",
                                if several { "one of " } else { "" },
                                obj.yname(catalog)
                            ),
                        );
                        blow.use_up(false);
                        hittxt = true;
                        if !defender.species.is_shade() {
                            tmp += 1;
                        }
                    }
                } else {
                    tmp = dmgval(obj, &defender.species, ctx);
                    valid_weapon_attack = tmp > 1;
                    let wtype = wielded_skill(attacker, Some(obj), catalog);
                    let st = &defender.status;
                    let off_guard = st.fleeing
                        || st.trapped.is_some()
                        || st.frozen > 0
                        || !st.can_move
                        || st.sleeping
                        || st.stunned > 0
                        || st.confused > 0
                        || st.blinded > 0
                        || defender.is_peaceful();
                    if !valid_weapon_attack || stuck_to_it || two_weapon {
                        // no special bonuses
                    } else if off_guard && role == Some(Role::Rogue) && own_form {
                        let helpless = defender.is_peaceful()
                            || st.trapped.is_some()
                            || st.frozen > 0
                            || (!st.can_move && !st.sleeping);
                        let how = if defender.is_peaceful() {
                            "off guard"
                        } else if helpless {
                            "at a disadvantage"
                        } else if st.fleeing {
                            "from behind"
                        } else {
                            "unaware"
                        };
                        let verb = if helpless { "catch" } else { "strike" };
                        ctx.say(MsgChannel::CombatAlert, format!("You {verb} {dname} {how}!"));
                        tmp += ctx.rnd(3) as i32;
                        if wtype != WeaponSkill::None {
                            let s = skill_value(attacker, wtype);
                            tmp += ctx.rnd_i(1 + 3 * s * s / 2);
                        }
                        hittxt = true;
                    } else if blow.dieroll == 2
                        && blow.is_wielded(two_weapon)
                        && obj.class == ObjectClass::Weapon
                        && (stats.is_bimanual()
                            || (role == Some(Role::Samurai)
                                && obj.otype == otyp::KATANA
                                && attacker.equipment.is_empty(EquipSlot::Shield)))
                        && wtype != WeaponSkill::None
                        && skill_value(attacker, wtype) >= SkillLevel::Skilled.value()
                        && defender.weapon().is_some_and(|w| {
                            !catalog.lookup(w.otype).traits.contains(ObjectTraits::FLIMSY)
                        })
                        && (ctx.rn2(100) as i32) >= 50 + 15 * i32::from(obj.greatest_erosion())
                    {
                        if let Some(broken) = defender.equipment.take(EquipSlot::Weapon) {
                            ctx.say(
                                MsgChannel::CombatAlert,
                                format!(
                                    "{} {} shatters from the force of your blow!",
                                    upcase(&possessive(defender)),
                                    broken.xname(catalog)
                                ),
                            );
                            ctx.emit(Event::ItemDestroyed {
                                owner: defender.id,
                                item: broken.id,
                            });
                        }
                        if ctx.rn2(4) != 0 {
                            let timer = ctx.dice(2, 3);
                            defender.status.flee(timer as u16, true);
                        }
                        hittxt = true;
                    }

                    if defender.species.hates_material(obj.material) {
                        sear = Some((obj.material, Some(oname)));
                    }
                    if riding && !thrown && tmp > 0 && stats.kind == ObjectKind::Lance && !stuck_to_it {
                        jousting = joust(attacker, defender, blow, ctx);
                        if jousting != Joust::No {
                            valid_weapon_attack = true;
                        }
                    }
                    // reborrow after the joust roll
                    if let Some(obj) = blow.weapon.as_ref() {
                        if thrown && (stats.is_ammo() || stats.is_missile()) {
                            if let Some(bow) = attacker.weapon().filter(|b| ammo_and_launcher(obj, Some(*b), catalog)) {
                                if (role == Some(Role::Samurai)
                                    && obj.otype == otyp::YA
                                    && bow.otype == otyp::YUMI)
                                    || (race == Some(Race::Elf)
                                        && obj.otype == otyp::ELVEN_ARROW
                                        && bow.otype == otyp::ELVEN_BOW)
                                {
                                    tmp += 1;
                                }
                            }
                            poisoned = obj.poisoned && stats.traits.contains(ObjectTraits::POISONABLE);
                        }
                        do_cleave = stats.traits.contains(ObjectTraits::AXE)
                            && !ctx.axe_in_use
                            && !engulfed
                            && !thrown
                            && attacker.hero().is_some_and(|h| {
                                h.skills.level(WeaponSkill::Axe) >= SkillLevel::Skilled
                                    && h.skills.max_level(WeaponSkill::Axe) >= SkillLevel::Expert
                            });
                    }
                }
            } else if obj.class == ObjectClass::Potion {
                let mut bottle = obj.clone();
                bottle.quantity = 1;
                blow.use_up(false);
                potion_hit(attacker, defender, &bottle, ctx);
                if defender.is_dead() {
                    return false;
                }
                hittxt = true;
                tmp = if defender.species.is_shade() { 0 } else { 1 };
            } else if defender.species.is_shade() && !shade_aware(obj, catalog) {
                tmp = 0;
                unconventional = Some(oname);
            } else {
                match stats.kind {
                    ObjectKind::Boulder | ObjectKind::HeavyIronBall | ObjectKind::IronChain => {
                        tmp = dmgval(obj, &defender.species, ctx);
                    }
                    ObjectKind::Mirror => {
                        if !(obj.erosion_proof || ctx.rn2(100) < 1) {
                            ctx.say(
                                MsgChannel::StatusBad,
                                format!("You break {}.  That's bad luck!", obj.yname(catalog)),
                            );
                            if let Some(hero) = attacker.hero_mut() {
                                hero.change_luck(-2);
                            }
                            blow.use_up(false);
                            get_dmg_bonus = false;
                            hittxt = true;
                        }
                        tmp = 1;
                    }
                    ObjectKind::ExpensiveCamera => {
                        ctx.say(
                            MsgChannel::ItemLoss,
                            format!("You succeed in destroying {}.  Congratulations!", obj.yname(catalog)),
                        );
                        blow.use_up(false);
                        return true;
                    }
                    ObjectKind::Corpse => {
                        match obj.corpse_of.as_deref() {
                            Some(dead) if dead.touch_petrifies() => {
                                let what = if obj.quantity > 1 { "corpses" } else { "corpse" };
                                ctx.say(
                                    MsgChannel::CombatHit,
                                    format!("You hit {dname} with the {} {what}.", dead.name),
                                );
                                tmp = 1;
                                hittxt = true;
                                if !defender.resists(Resistances::STONE, catalog) {
                                    petrify(attacker, defender, ctx);
                                    return !defender.is_dead();
                                }
                            }
                            Some(dead) => tmp = dead.size as i32 + 1,
                            None => tmp = 1,
                        }
                    }
                    ObjectKind::Egg => {
                        tmp = 1;
                        get_dmg_bonus = false;
                        hittxt = true;
                        let count = obj.quantity;
                        let petrifying = obj.corpse_of.as_deref().is_some_and(|s| s.touch_petrifies());
                        if obj.laid_by_you && obj.corpse_of.is_some() {
                            let loss = count.min(5) as i32;
                            if let Some(hero) = attacker.hero_mut() {
                                hero.change_luck(-loss);
                            }
                        }
                        if petrifying {
                            let kind = obj.corpse_of.as_deref().map_or("", |s| s.name.as_str());
                            let (article, what) = if obj.known {
                                ("the", kind)
                            } else {
                                (if count > 1 { "some" } else { "a" }, "petrifying")
                            };
                            ctx.say(
                                MsgChannel::CombatHit,
                                format!(
                                    "Splat! You hit {dname} with {article} {what} egg{}!",
                                    if count > 1 { "s" } else { "" }
                                ),
                            );
                            blow.use_up(true);
                            if !defender.resists(Resistances::STONE, catalog) {
                                petrify(attacker, defender, ctx);
                                return !defender.is_dead();
                            }
                        } else {
                            let plural = if count > 1 { "s" } else { "" };
                            if defender.species.is_demon() {
                                ctx.say(MsgChannel::CombatHit, format!("Deviled egg{plural}!"));
                            } else {
                                let article = match obj.corpse_of.as_deref() {
                                    Some(kind) if obj.known => format!("the {}", kind.name),
                                    _ if count > 1 => "some".to_string(),
                                    _ => "an".to_string(),
                                };
                                ctx.say(
                                    MsgChannel::CombatHit,
                                    format!("You hit {dname} with {article} egg{plural}."),
                                );
                            }
                            if defender.species.touch_petrifies() && obj.hatchable {
                                ctx.say(
                                    MsgChannel::Info,
                                    format!(
                                        "The egg{plural} {} alive any more...",
                                        if count == 1 { "isn't" } else { "aren't" }
                                    ),
                                );
                                let rock = Item::from_catalog(obj.id, otyp::ROCK, catalog).with_quantity(count);
                                blow.weapon = Some(rock);
                            } else {
                                ctx.say(MsgChannel::Info, "Splat!");
                                blow.use_up(true);
                            }
                        }
                    }
                    ObjectKind::CloveOfGarlic => {
                        if defender.species.is_undead() {
                            let timer = ctx.dice(2, 4);
                            defender.status.flee(timer as u16, false);
                        }
                        tmp = 1;
                    }
                    ObjectKind::CreamPie | ObjectKind::BlindingVenom => {
                        let venom = stats.kind == ObjectKind::BlindingVenom;
                        let splat = if venom { "Splash!" } else { "Splat!" };
                        defender.status.sleeping = false;
                        if defender.species.has_eyes() {
                            if !sees {
                                ctx.say(MsgChannel::Info, splat);
                            } else if venom {
                                ctx.say(
                                    MsgChannel::CombatHit,
                                    format!(
                                        "The venom blinds {dname}{}!",
                                        if defender.status.can_see() { "" } else { " further" }
                                    ),
                                );
                            } else {
                                let what = if !thrown && obj.quantity > 1 {
                                    format!("A {}", singular(obj, catalog))
                                } else {
                                    format!("The {oname}")
                                };
                                let whom = if defender.species.kind == SpeciesKind::FloatingEye {
                                    dname.clone()
                                } else {
                                    format!("{dname}'s face")
                                };
                                ctx.say(MsgChannel::CombatHit, format!("{what} splashes over {whom}!"));
                            }
                            let turns = ctx.rn1(25, 21);
                            defender
                                .status
                                .add_blindness(u16::try_from(turns).unwrap_or(MAX_BLIND));
                        } else {
                            ctx.say(MsgChannel::CombatHit, splat);
                        }
                        blow.use_up(false);
                        hittxt = true;
                        get_dmg_bonus = false;
                        tmp = 0;
                    }
                    ObjectKind::VampireBlood => {
                        if defender.resists(Resistances::DRAIN, catalog) {
                            ctx.say(
                                MsgChannel::CombatImmune,
                                format!("Your blood hits {dname} and does nothing"),
                            );
                        } else {
                            let drained = ctx.dice(2, 6);
                            ctx.say(MsgChannel::CombatHit, format!("Your blood weakens {dname}!"));
                            let left = defender.hp.current() - drained;
                            defender.hp.set_max(defender.hp.max() - drained);
                            if left <= 0 || defender.level == 0 {
                                ctx.say(MsgChannel::CombatKill, format!("{} dies.", defender.cap_name()));
                                slay(attacker, defender, ctx);
                                already_killed = true;
                            } else {
                                defender.hp.set_current(left);
                                defender.level -= 1;
                            }
                        }
                        tmp = 0;
                        blow.use_up(false);
                    }
                    ObjectKind::AcidVenom => {
                        if defender.resists(Resistances::ACID, catalog) {
                            ctx.say(
                                MsgChannel::CombatImmune,
                                format!("Your venom hits {dname} harmlessly."),
                            );
                            tmp = 0;
                        } else {
                            ctx.say(MsgChannel::CombatHit, format!("Your venom burns {dname}!"));
                            tmp = dmgval(obj, &defender.species, ctx);
                        }
                        blow.use_up(false);
                        hittxt = true;
                        get_dmg_bonus = false;
                    }
                    _ => {
                        // heavy things hurt, a little
                        let heft = (obj.total_weight() / 100) as i32;
                        tmp = if heft < 1 { 1 } else { ctx.rnd_i(heft) }.min(6);
                        if defender.species.hates_material(obj.material) {
                            tmp += ctx.rnd(obj.material.hatred_die()) as i32;
                            sear = Some((obj.material, Some(oname)));
                        }
                    }
                }
            }
        }
    }

    if do_cleave {
        cleave(attacker, defender.position, blow, ctx);
    }

    let hero_bonus = attacker.hero().map_or(0, |h| h.damage_bonus);
    let launched = thrown
        && blow
            .weapon
            .as_ref()
            .is_some_and(|obj| ammo_and_launcher(obj, attacker.weapon(), catalog));
    if get_dmg_bonus && tmp > 0 && attacker.is_player() {
        tmp += hero_bonus;
        let dbon = attacker.attributes.damage_bonus();
        if !launched {
            tmp += dbon;
        } else if weapon_skill(attacker.weapon(), catalog) == WeaponSkill::Sling {
            tmp += if dbon > 1 { ctx.rnd_i(dbon / 2) } else { dbon };
        }
    }

    if valid_weapon_attack {
        appraise(attacker, blow, &mut tmp, ctx);
    }

    let mut poison_resisted = false;
    let mut poison_killed = false;
    if poisoned {
        let weight = blow.weapon.as_ref().map_or(0, |o| o.total_weight() as i32);
        let nopoison = (10 - weight / 10).max(2);
        if role == Some(Role::Samurai) {
            ctx.say(MsgChannel::AlignBad, "You dishonorably use a poisoned weapon!");
            let delta = -attacker.alignment.kind.value().signum();
            attacker.adjust_alignment(delta, ctx.field.moves);
        } else if attacker.alignment.kind == AlignmentType::Lawful && attacker.alignment.record > 0 {
            ctx.say(
                MsgChannel::AlignBad,
                "You feel like an evil coward for using a poisoned weapon.",
            );
            attacker.adjust_alignment(-1, ctx.field.moves);
        }
        if blow.weapon.is_some() && ctx.rn2(nopoison as u32) == 0 {
            if let Some(obj) = blow.weapon.as_mut() {
                obj.poisoned = false;
                ctx.say(
                    MsgChannel::ItemLoss,
                    format!("Your {} {} no longer poisoned.", obj.xname(catalog), obj.is_are()),
                );
            }
        }
        if defender.resists(Resistances::POISON, catalog) {
            poison_resisted = true;
        } else if ctx.rn2(10) != 0 {
            tmp += ctx.rnd(6) as i32;
        } else {
            poison_killed = true;
        }
    }

    if tmp < 1 {
        tmp = 0;
        if defender.species.is_shade() {
            if !hittxt {
                let what = unconventional.as_deref().unwrap_or("attack");
                ctx.say(
                    MsgChannel::CombatImmune,
                    format!("Your {what} passes harmlessly through {dname}."),
                );
                hittxt = true;
            }
        } else if get_dmg_bonus {
            tmp = 1;
        }
    }

    if jousting != Joust::No {
        let sides = if blow.slot == Some(EquipSlot::Weapon) { 10 } else { 2 };
        tmp += ctx.dice(2, sides);
        ctx.say(
            MsgChannel::CombatAlert,
            format!("You joust {dname}{}", if sees { exclam(tmp) } else { "." }),
        );
        let devout_knight = role == Some(Role::Knight) && attacker.alignment.record >= DEVOUT;
        if jousting == Joust::Shatter && !devout_knight {
            if let Some(lance) = blow.weapon.take() {
                ctx.say(MsgChannel::ItemLoss, format!("Your {} shatters on impact!", lance.xname(catalog)));
                ctx.emit(Event::ItemDestroyed {
                    owner: attacker.id,
                    item: lance.id,
                });
            }
            if let Some(hero) = attacker.hero_mut() {
                hero.two_weapon = false;
            }
        }
        if defender.hp.current() > tmp {
            ctx.emit(Event::Knockback { id: defender.id });
        }
        hittxt = true;
    } else if unarmed && tmp > 1 && !thrown && blow.weapon.is_none() && own_form {
        let s = skill_value(attacker, WeaponSkill::BareHanded);
        if (ctx.rnd(100) as i32) < s * 3 - 3
            && !defender.species.is_big()
            && !defender.species.is_thick_skinned()
        {
            if sees {
                ctx.say(
                    MsgChannel::CombatAlert,
                    format!("{} staggers from your powerful strike!", defender.cap_name()),
                );
            }
            if defender.hp.current() > tmp {
                ctx.emit(Event::Knockback { id: defender.id });
            }
            hittxt = true;
        }
    }

    if !already_killed {
        defender.hp.damage(tmp);
    }
    blow.damage = tmp;
    let destroyed = defender.hp.current() < 1 || defender.is_dead();
    debug!(attacker = %attacker.id, defender = %defender.id, damage = tmp, destroyed, "strike");

    if defender.is_tame() && tmp > 0 && !destroyed {
        let timer = 10 * ctx.rnd_i(tmp);
        defender.status.flee(u16::try_from(timer).unwrap_or(u16::MAX), false);
    }

    if defender.species.is_pudding()
        && blow.slot == Some(EquipSlot::Weapon)
        && blow.weapon.as_ref().is_some_and(|o| o.material == Material::Iron)
        && defender.hp.current() >= 2
        && !thrown
        && !defender.status.cancelled
        && ctx.options.pudding_split.allows(defender.hp.max())
        && divide_pudding(attacker, defender, ctx)
    {
        hittxt = true;
    }

    if !hittxt && !destroyed {
        match (&blow.weapon, thrown) {
            (Some(obj), true) => ctx.say(
                MsgChannel::CombatHit,
                format!("The {} hits {dname}{}", singular(obj, catalog), exclam(tmp)),
            ),
            (_, true) => {}
            _ if !ctx.options.verbose => ctx.say(MsgChannel::CombatHit, "You hit it."),
            _ => {
                let verb = if role == Some(Role::Barbarian) { "smite" } else { "hit" };
                ctx.say(
                    MsgChannel::CombatHit,
                    format!("You {verb} {dname}{}", if sees { exclam(tmp) } else { "." }),
                );
            }
        }
    }

    if let Some((material, what)) = sear {
        let flesh = if defender.species.is_noncorporeal() {
            String::new()
        } else {
            "'s flesh".to_string()
        };
        let adj = material.adjective();
        let line = if !sees {
            format!("{}{flesh} is seared!", upcase(&dname))
        } else if rings == 1 {
            format!("Your {adj} ring sears {dname}{flesh}!")
        } else if rings == 2 {
            format!("Your {adj} rings sear {dname}{flesh}!")
        } else if let Some(what) = what {
            let named = if what.contains(adj) { what } else { format!("{adj} {what}") };
            format!("Your {named} sears {dname}{flesh}!")
        } else {
            format!("The {adj} sears {dname}{flesh}!")
        };
        ctx.say(MsgChannel::CombatHit, line);
    }

    if poison_resisted {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("The poison doesn't seem to affect {dname}."),
        );
    }
    if poison_killed {
        ctx.say(MsgChannel::CombatKill, "The poison was deadly...");
        if !already_killed {
            slay_by(attacker, defender, DeathCause::Poisoned, ctx);
        }
        return false;
    }
    if destroyed {
        if !already_killed {
            slay(attacker, defender, ctx);
        }
    } else if !thrown && attacker.hero().is_some_and(|h| h.confusing_touch) {
        if let Some(hero) = attacker.hero_mut() {
            hero.confusing_touch = false;
        }
        ctx.say(MsgChannel::Info, "Your hands stop glowing red.");
        if defender.status.confused == 0 && !resists_spell(defender, ctx) {
            defender.status.confused = 1;
            let st = &defender.status;
            if st.stunned == 0 && st.can_move && !st.sleeping && sees {
                ctx.say(MsgChannel::CombatHit, format!("{} appears confused.", defender.cap_name()));
            }
        }
    }
    !destroyed && !defender.is_dead()
}

/// Skill damage, practice, and the chance to learn the weapon's enchantment
fn appraise(
    attacker: &mut Combatant,
    blow: &mut Strike,
    tmp: &mut i32,
    ctx: &mut CombatContext<'_>,
) {
    let catalog = ctx.catalog;
    let projectile = blow
        .weapon
        .as_ref()
        .is_some_and(|o| catalog.lookup(o.otype).is_ammo());
    let wtype = if blow.thrown {
        let wep = if projectile { attacker.weapon() } else { blow.weapon.as_ref() };
        weapon_skill(wep, catalog)
    } else {
        wielded_skill(attacker, blow.weapon.as_ref(), catalog)
    };
    let Some(hero) = attacker.hero_mut() else {
        return;
    };
    *tmp += hero
        .skills
        .weapon_dam_bonus(wtype, hero.two_weapon, hero.is_riding(), hero.role.is_martial());
    hero.skills.practice(wtype, 1);
    let level = hero.skills.level(wtype);

    let wep = if projectile {
        attacker.equipment.get_mut(EquipSlot::Weapon)
    } else {
        blow.weapon.as_mut()
    };
    let Some(wep) = wep else {
        return;
    };
    if wep.known || level < SkillLevel::Basic {
        return;
    }
    let learned = level >= SkillLevel::Expert
        || ctx.one_in(if level == SkillLevel::Skilled { 10 } else { 100 });
    if learned {
        ctx.say(MsgChannel::Info, "You have successfully appraised this weapon's enchantment.");
        wep.known = true;
    }
}

/// Split a pudding struck with iron. The halves share the original's hit
/// point total but not its toughness.
fn divide_pudding(attacker: &mut Combatant, defender: &mut Combatant, ctx: &mut CombatContext<'_>) -> bool {
    let Some(clone_id) = split_monster(defender, attacker.position, ctx) else {
        return false;
    };
    ctx.say(MsgChannel::Info, format!("{} divides as you hit it!", defender.cap_name()));
    let count = defender.monster_traits().map_or(0, |t| t.split_count);
    let count = if count < MAX_SPLIT_COUNT { count + 1 } else { count };
    if let Some(traits) = defender.monster_traits_mut() {
        traits.split_count = count;
    }
    let original_max = defender.hp.max();
    defender.hp.set_max(original_max * 3 / 5);
    let capped = defender.hp.current() >= defender.hp.max();
    if let Some(clone) = ctx.field.bystanders.iter_mut().find(|m| m.id == clone_id) {
        if let Some(traits) = clone.monster_traits_mut() {
            traits.split_count = count;
        }
        clone.hp.set_max(original_max * 5 / 3);
        if capped {
            clone.hp.heal_full();
        }
    }
    attacker.conduct.violate(ConductKind::PuddingSplit);
    true
}

/// Monster saving throw against a spellbook-strength effect
fn resists_spell(defender: &Combatant, ctx: &mut CombatContext<'_>) -> bool {
    resists_magic(defender, 10, ctx)
}

fn petrify(attacker: &mut Combatant, defender: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::CombatKill, format!("{} turns to stone!", defender.cap_name()));
    slay_by(attacker, defender, DeathCause::Petrified, ctx);
}

fn singular(obj: &Item, catalog: &dyn ObjectCatalog) -> String {
    let mut one = obj.clone();
    one.quantity = 1;
    one.xname(catalog)
}

fn upcase(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
