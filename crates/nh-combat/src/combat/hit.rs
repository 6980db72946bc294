//! Attack entry points: one melee round, or one thrown missile

use tracing::{debug, warn};

use crate::combatant::{Combatant, ConductKind, DeathCause, Encumbrance, EquipSlot};
use crate::message::MsgChannel;
use crate::monster::{Resistances, SpeciesFlags, SpeciesKind};
use crate::object::{Item, ObjectCatalog, ObjectClass};

use super::passive::{reflector, trigger_passive};
use super::resolver::{could_seduce, slay};
use super::tohit::roll_to_hit;
use super::weapon::{dmgval, hitval, wielded_skill};
use super::{
    Attack, AttackOutcome, AttackType, CombatContext, DamageType, Strike, apply_typed_damage, engulf,
    explode_on, strike,
};

/// Result of one attack in a polymorphed hero's round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landed {
    Missed,
    Hit,
    Killed,
}

impl Landed {
    fn from_damage(died: bool) -> Self {
        if died { Landed::Killed } else { Landed::Hit }
    }

    fn connected(self) -> bool {
        self != Landed::Missed
    }
}

/// Resolve one melee round of `attacker` against `defender`.
///
/// The hero fights with the wielded weapon (and the off-hand one when
/// fighting with two), or with the attacks of a polymorphed form. A monster
/// uses its species' attack list. The defender's passive response runs after
/// each attack.
pub fn resolve_attack(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    ctx: &mut CombatContext<'_>,
) -> AttackOutcome {
    if attacker.is_dead() || defender.is_dead() {
        return AttackOutcome::Cancelled;
    }
    let outcome = if attacker.is_player() {
        hero_attack(attacker, defender, ctx)
    } else {
        monster_attack(attacker, defender, ctx)
    };
    debug!(attacker = %attacker.id, defender = %defender.id, ?outcome, "attack resolved");
    outcome
}

fn hero_attack(hero: &mut Combatant, defender: &mut Combatant, ctx: &mut CombatContext<'_>) -> AttackOutcome {
    let (polymorphed, overloaded) = hero.hero().map_or((false, false), |h| {
        (h.is_polymorphed(), h.encumbrance >= Encumbrance::Overloaded)
    });
    if polymorphed && !hero.species.attacks.iter().any(Attack::is_active) {
        ctx.say(MsgChannel::Hint, "You have no way to attack monsters physically.");
        return AttackOutcome::Cancelled;
    }
    if overloaded {
        ctx.say(MsgChannel::Hint, "You cannot fight while so heavily loaded.");
        return AttackOutcome::Cancelled;
    }

    let st = &defender.status;
    if defender.species.kind == SpeciesKind::Leprechaun
        && st.frozen == 0
        && !st.sleeping
        && st.confused == 0
        && st.can_see()
        && ctx.one_in(7)
    {
        debug!(defender = %defender.id, "leprechaun dodged");
        return AttackOutcome::Dodged;
    }

    let to_hit = roll_to_hit(hero, defender, None, ctx);
    if polymorphed {
        attack_as_monster(hero, defender, to_hit, ctx)
    } else {
        attack_in_own_form(hero, defender, to_hit, ctx)
    }
}

fn is_engulfed(hero: &Combatant) -> bool {
    hero.hero().is_some_and(|h| h.engulfed_by.is_some())
}

/// Whether a to-hit value beats the die
fn beats(to_hit: i32, dieroll: i32) -> bool {
    to_hit >= 20 || to_hit > dieroll
}

fn miss(hero: &Combatant, defender: &mut Combatant, attack: &Attack, ctx: &mut CombatContext<'_>) {
    if could_seduce(attack, defender) {
        ctx.say(
            MsgChannel::CombatMiss,
            format!("You pretend to be friendly to {}.", defender.the_name()),
        );
    } else if ctx.options.verbose && hero.status.can_see() {
        ctx.say(MsgChannel::CombatMiss, format!("You miss {}.", defender.the_name()));
    } else {
        ctx.say(MsgChannel::CombatMiss, "You miss it.");
    }
    if !defender.status.sleeping && defender.status.can_move {
        defender.status.wake();
    }
}

/// Strike with whatever is in `slot`, then return it to the slot
fn strike_from(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    slot: EquipSlot,
    dieroll: i32,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let weapon = attacker.equipment.take(slot);
    let mut blow = Strike::wielded(weapon, slot, dieroll);
    let alive = strike(attacker, defender, &mut blow, ctx);
    if let Some(displaced) = attacker.equipment.put_back(slot, blow.weapon.take()) {
        if let Err(err) = attacker.inventory.add(displaced) {
            warn!(%err, "weapon could not be stowed after the blow");
        }
    }
    alive
}

fn breaks_weapon_conduct(weapon: Option<&Item>, catalog: &dyn ObjectCatalog) -> bool {
    weapon.is_some_and(|w| w.class == ObjectClass::Weapon || catalog.lookup(w.otype).is_weptool())
}

/// Follow up a landed weapon attack. Returns whether the defender lives and
/// updates `hit` when the blow turned out to do nothing.
fn known_hit(
    hero: &mut Combatant,
    defender: &mut Combatant,
    hit: &mut bool,
    attack: &Attack,
    dieroll: i32,
    ctx: &mut CombatContext<'_>,
) -> bool {
    if !*hit {
        miss(hero, defender, attack, ctx);
        return true;
    }
    let old_hp = defender.hp.current();
    let saved_conduct = hero.conduct.count(ConductKind::WeaponHit);
    let armed = breaks_weapon_conduct(hero.weapon(), ctx.catalog);
    if armed {
        hero.conduct.violate(ConductKind::WeaponHit);
    }

    let mut alive = strike_from(hero, defender, EquipSlot::Weapon, dieroll, ctx);
    let two_weapon = hero.hero().is_some_and(|h| h.two_weapon);
    if alive && two_weapon && !hero.equipment.is_empty(EquipSlot::SwapWeapon) {
        alive = strike_from(hero, defender, EquipSlot::SwapWeapon, dieroll, ctx);
    }

    if alive {
        if ctx.one_in(25) && defender.hp.current() < defender.hp.max() / 2 {
            let swallowed_by_it = hero.hero().is_some_and(|h| h.engulfed_by == Some(defender.id));
            if !swallowed_by_it {
                let timer = if ctx.one_in(3) { ctx.rnd(100) as u16 } else { 0 };
                defender.status.flee(timer, false);
                let sticky = hero.species.sticks();
                if let Some(h) = hero.hero_mut() {
                    if h.stuck_to == Some(defender.id) && h.engulfed_by.is_none() && !sticky {
                        h.stuck_to = None;
                    }
                }
            }
        }
        if defender.hp.current() == old_hp {
            *hit = false;
            if armed {
                hero.conduct.restore(ConductKind::WeaponHit, saved_conduct);
            }
        }
    }

    if alive && defender.species.kind == SpeciesKind::FloatingEye {
        vicarious_suffering(hero, defender, old_hp - defender.hp.current(), ctx);
    }
    alive
}

/// Hurting a floating eye that holds your gaze hurts you too
fn vicarious_suffering(hero: &mut Combatant, eye: &Combatant, difference: i32, ctx: &mut CombatContext<'_>) {
    let sees_it = hero.status.can_see() && (!eye.intrinsics.invisible || hero.intrinsics.see_invisible);
    if difference <= 0 || !sees_it || !eye.status.can_see() || reflector(hero, ctx).is_some() {
        return;
    }
    ctx.say(
        MsgChannel::StatusBad,
        "As you meet its deep, meaningful gaze, you feel its suffering as though it were your own.",
    );
    let suffering = (difference * i32::from(hero.level)).min((hero.hp.max() - 1) / 2);
    if hero.hp.damage(suffering) {
        ctx.say(MsgChannel::Fatal, "You die...");
        ctx.kill(hero, DeathCause::Killed("vicarious suffering".to_string()));
    }
}

fn attack_in_own_form(
    hero: &mut Combatant,
    defender: &mut Combatant,
    to_hit: i32,
    ctx: &mut CombatContext<'_>,
) -> AttackOutcome {
    let dieroll = ctx.rnd(20) as i32;
    let mut hit = beats(to_hit, dieroll) || is_engulfed(hero);
    let attack = hero.species.attacks[0];
    let alive = known_hit(hero, defender, &mut hit, &attack, dieroll, ctx);
    trigger_passive(defender, hero, hit, alive, AttackType::Weapon, ctx);
    if !alive {
        AttackOutcome::Hit { defender_died: true }
    } else if hit {
        AttackOutcome::Hit { defender_died: false }
    } else {
        AttackOutcome::Missed
    }
}

fn touch_verb(hero: &Combatant, shape: AttackType, defender: &Combatant) -> String {
    let them = defender.the_name();
    match shape {
        AttackType::Kick => format!("You kick {them}."),
        AttackType::Bite => format!("You bite {them}."),
        AttackType::Sting => format!("You sting {them}."),
        AttackType::Butt => format!("You butt {them}."),
        AttackType::Touch => format!("You touch {them}."),
        AttackType::Tentacle => format!("Your tentacles suck {them}."),
        AttackType::Claw if hero.species.has_hands() => format!("You hit {them}."),
        AttackType::Claw => format!("You claw {them}."),
        _ => format!("You hit {them}."),
    }
}

/// Which attacks of a polymorphed form are really weapon blows
fn uses_weapon(hero: &Combatant, index: usize, shape: AttackType) -> bool {
    let armed = hero.weapon().is_some();
    match shape {
        AttackType::Weapon => true,
        AttackType::Claw if index == 0 => armed && hero.species.has_hands(),
        AttackType::Claw if index == 1 => {
            armed && matches!(hero.species.kind, SpeciesKind::Succubus | SpeciesKind::Incubus)
        }
        _ => false,
    }
}

/// A polymorphed hero's round: every attack of the form in turn
fn attack_as_monster(
    hero: &mut Combatant,
    defender: &mut Combatant,
    to_hit: i32,
    ctx: &mut CombatContext<'_>,
) -> AttackOutcome {
    let attacks = hero.species.attacks;
    let dieroll = ctx.rnd(20) as i32;
    let mut results = [Landed::Missed; crate::consts::NATTK];
    let mut any_hit = false;
    let mut exploded = false;

    for (i, attack) in attacks.iter().enumerate() {
        let shape = attack.attack_type;
        let engulfed = is_engulfed(hero);
        let result = match shape {
            AttackType::None | AttackType::ExplodeOnDeath => continue,
            AttackType::Breath | AttackType::Spit | AttackType::Gaze => Landed::Missed,
            _ if uses_weapon(hero, i, shape) => {
                let bonus = weapon_bonus(hero, defender, ctx);
                let mut hit = beats(to_hit + bonus, dieroll) || engulfed;
                if !known_hit(hero, defender, &mut hit, attack, dieroll, ctx) {
                    Landed::Killed
                } else if hit
                    && !matches!(attack.damage_type, DamageType::Physical | DamageType::MageSpell)
                {
                    Landed::from_damage(apply_typed_damage(hero, defender, attack, ctx).defender_died)
                } else if hit {
                    Landed::Hit
                } else {
                    Landed::Missed
                }
            }
            AttackType::Claw
            | AttackType::Kick
            | AttackType::Bite
            | AttackType::Sting
            | AttackType::Touch
            | AttackType::Butt
            | AttackType::Tentacle
            | AttackType::Weapon => {
                if beats(to_hit, dieroll) || engulfed {
                    touch(hero, defender, attack, ctx)
                } else {
                    miss(hero, defender, attack, ctx);
                    Landed::Missed
                }
            }
            AttackType::Hug => {
                let earlier_two = i >= 2 && results[i - 1].connected() && results[i - 2].connected();
                hug(hero, defender, attack, earlier_two, ctx)
            }
            AttackType::Explode => {
                defender.status.wake();
                exploded = true;
                Landed::from_damage(explode_on(hero, defender, attack, ctx).defender_died)
            }
            AttackType::Engulf => {
                if to_hit > ctx.rnd(20 + i as u32) as i32 {
                    defender.status.wake();
                    swallow(hero, defender, attack, ctx)
                } else {
                    miss(hero, defender, attack, ctx);
                    Landed::Missed
                }
            }
            AttackType::Magic => {
                if matches!(attack.damage_type, DamageType::ClericSpell | DamageType::MageSpell) {
                    debug!(attacker = %hero.id, "spellcasting left to the caster");
                    Landed::Missed
                } else {
                    Landed::from_damage(apply_typed_damage(hero, defender, attack, ctx).defender_died)
                }
            }
        };
        results[i] = result;

        if result == Landed::Killed || defender.is_dead() {
            trigger_passive(defender, hero, true, false, shape, ctx);
            return AttackOutcome::Hit { defender_died: true };
        }
        trigger_passive(defender, hero, result.connected(), true, shape, ctx);
        any_hit |= result.connected();

        let still_polymorphed = hero.hero().is_some_and(|h| h.is_polymorphed());
        if !still_polymorphed || hero.status.is_helpless() || hero.is_dead() {
            break;
        }
    }

    if exploded {
        AttackOutcome::Special
    } else if any_hit {
        AttackOutcome::Hit { defender_died: false }
    } else {
        AttackOutcome::Missed
    }
}

/// Weapon terms a polymorphed form adds only when it swings the weapon
fn weapon_bonus(hero: &Combatant, defender: &Combatant, ctx: &CombatContext<'_>) -> i32 {
    let weapon = hero.weapon();
    let skill = wielded_skill(hero, weapon, ctx.catalog);
    let skill_bonus = hero.hero().map_or(0, |h| {
        h.skills
            .weapon_hit_bonus(skill, h.two_weapon, h.is_riding(), h.role.is_martial())
    });
    hitval(weapon, &defender.species, ctx.catalog) + skill_bonus
}

/// A landed claw, bite, kick or similar
fn touch(hero: &mut Combatant, defender: &mut Combatant, attack: &Attack, ctx: &mut CombatContext<'_>) -> Landed {
    if !is_engulfed(hero) && could_seduce(attack, defender) {
        let look = if defender.status.can_see() && defender.species.has_eyes() {
            "smile at"
        } else {
            "talk to"
        };
        ctx.say(
            MsgChannel::CombatHit,
            format!("You {look} {} seductively.", defender.the_name()),
        );
        return Landed::from_damage(apply_typed_damage(hero, defender, attack, ctx).defender_died);
    }
    defender.status.wake();
    let blessed_kick = attack.attack_type == AttackType::Kick
        && hero.equipment.get(EquipSlot::Boots).is_some_and(Item::is_blessed);
    if defender.species.is_shade() && !blessed_kick {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("Your attack passes harmlessly through {}.", defender.the_name()),
        );
        return Landed::Missed;
    }
    ctx.say(MsgChannel::CombatHit, touch_verb(hero, attack.attack_type, defender));
    Landed::from_damage(apply_typed_damage(hero, defender, attack, ctx).defender_died)
}

/// Hugs land on their own once the two attacks before them did
fn hug(
    hero: &mut Combatant,
    defender: &mut Combatant,
    attack: &Attack,
    earlier_two: bool,
    ctx: &mut CombatContext<'_>,
) -> Landed {
    defender.status.wake();
    if defender.species.is_shade() {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("Your hug passes harmlessly through {}.", defender.the_name()),
        );
        return Landed::Hit;
    }
    if defender.species.sticks() || is_engulfed(hero) {
        return Landed::Hit;
    }
    let holding = hero.hero().is_some_and(|h| h.stuck_to == Some(defender.id));
    if holding {
        ctx.say(MsgChannel::CombatHit, format!("{} is being crushed.", defender.cap_name()));
    } else if earlier_two {
        ctx.say(MsgChannel::CombatHit, format!("You grab {}!", defender.the_name()));
        if let Some(h) = hero.hero_mut() {
            h.stuck_to = Some(defender.id);
        }
    } else {
        return Landed::Hit;
    }
    Landed::from_damage(apply_typed_damage(hero, defender, attack, ctx).defender_died)
}

fn swallow(hero: &mut Combatant, defender: &mut Combatant, attack: &Attack, ctx: &mut CombatContext<'_>) -> Landed {
    if defender.species.is_shade() {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("Your attempt to surround {} is harmless.", defender.the_name()),
        );
        return Landed::Hit;
    }
    let outcome = engulf(hero, defender, attack, ctx);
    if outcome.defender_died
        && defender.species.has(SpeciesFlags::ZOMBIE_MUMMY)
        && !ctx.one_in(5)
        && !hero.resists(Resistances::SICK, ctx.catalog)
    {
        ctx.say(MsgChannel::StatusBad, "You feel sick.");
        let sickness = ctx.rnd_i(8);
        if hero.hp.damage(sickness) {
            ctx.say(MsgChannel::Fatal, "You die...");
            ctx.kill(hero, DeathCause::Killed(defender.the_name()));
        }
    }
    Landed::from_damage(outcome.defender_died)
}

fn monster_verb(shape: AttackType) -> &'static str {
    match shape {
        AttackType::Bite => "bites",
        AttackType::Kick => "kicks",
        AttackType::Sting => "stings",
        AttackType::Butt => "butts",
        AttackType::Touch => "touches",
        AttackType::Tentacle => "sucks",
        AttackType::Hug => "squeezes",
        _ => "hits",
    }
}

/// A monster's round: each attack of its species rolls separately
fn monster_attack(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    ctx: &mut CombatContext<'_>,
) -> AttackOutcome {
    let to_hit = roll_to_hit(attacker, defender, None, ctx);
    let attacks = attacker.species.attacks;
    let mut any_hit = false;

    for (i, attack) in attacks.iter().enumerate() {
        let shape = attack.attack_type;
        match shape {
            AttackType::None
            | AttackType::ExplodeOnDeath
            | AttackType::Breath
            | AttackType::Spit
            | AttackType::Gaze
            | AttackType::Magic => continue,
            AttackType::Explode => {
                let died = explode_on(attacker, defender, attack, ctx).defender_died;
                return if died {
                    AttackOutcome::Hit { defender_died: true }
                } else {
                    AttackOutcome::Special
                };
            }
            _ => {}
        }

        let dieroll = ctx.rnd(20 + i as u32) as i32;
        if !beats(to_hit, dieroll) {
            let text = if defender.is_player() {
                format!("{} misses!", attacker.cap_name())
            } else {
                format!("{} misses {}.", attacker.cap_name(), defender.the_name())
            };
            ctx.say(MsgChannel::CombatMiss, text);
            trigger_passive(defender, attacker, false, true, shape, ctx);
            continue;
        }
        any_hit = true;

        let died = if shape == AttackType::Engulf {
            engulf(attacker, defender, attack, ctx).defender_died
        } else {
            let verb = monster_verb(shape);
            let text = if defender.is_player() {
                format!("{} {verb}!", attacker.cap_name())
            } else {
                format!("{} {verb} {}.", attacker.cap_name(), defender.the_name())
            };
            ctx.say(MsgChannel::CombatHit, text);

            let weapon_damage = if shape == AttackType::Weapon {
                match attacker.weapon() {
                    Some(weapon) => dmgval(weapon, &defender.species, ctx),
                    None => 0,
                }
            } else {
                0
            };
            let mut died = apply_typed_damage(attacker, defender, attack, ctx).defender_died;
            if !died && weapon_damage > 0 && defender.hp.damage(weapon_damage) {
                died = slay(attacker, defender, ctx);
            }
            died || defender.is_dead()
        };

        trigger_passive(defender, attacker, true, !died, shape, ctx);
        if died {
            return AttackOutcome::Hit { defender_died: true };
        }
        if attacker.is_dead() {
            break;
        }
    }

    if any_hit {
        AttackOutcome::Hit { defender_died: false }
    } else {
        AttackOutcome::Missed
    }
}

/// Resolve a missile thrown by the hero at `defender`.
///
/// Returns the outcome and whatever is left of the missile to land on the
/// floor, which is nothing when the hit used it up.
pub fn resolve_throw(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    missile: Item,
    ctx: &mut CombatContext<'_>,
) -> (AttackOutcome, Option<Item>) {
    if defender.is_dead() {
        return (AttackOutcome::Cancelled, Some(missile));
    }
    let to_hit = roll_to_hit(attacker, defender, Some(&missile), ctx);
    let dieroll = ctx.rnd(20) as i32;
    if !beats(to_hit, dieroll) {
        let name = missile.xname(ctx.catalog);
        ctx.say(
            MsgChannel::CombatMiss,
            format!("The {name} misses {}.", defender.the_name()),
        );
        defender.status.wake();
        return (AttackOutcome::Missed, Some(missile));
    }

    let mut blow = Strike::thrown(missile, dieroll);
    let alive = strike(attacker, defender, &mut blow, ctx);
    debug!(attacker = %attacker.id, defender = %defender.id, damage = blow.damage, "throw resolved");
    (AttackOutcome::Hit { defender_died: !alive }, blow.weapon.take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::{test_hero, test_monster};
    use crate::combatant::HitPoints;
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::{Species, bestiary};
    use crate::object::{ItemId, StaticCatalog, otyp};
    use crate::world::Field;
    use nh_rng::{RngChannel, ScriptedRng};

    #[test]
    fn test_overloaded_hero_cannot_fight() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        if let Some(h) = hero.hero_mut() {
            h.encumbrance = Encumbrance::Overloaded;
        }
        let mut jackal = test_monster(bestiary::jackal());
        assert_eq!(resolve_attack(&mut hero, &mut jackal, &mut ctx), AttackOutcome::Cancelled);
        drop(ctx);
        assert!(log.contains("You cannot fight while so heavily loaded."));
    }

    #[test]
    fn test_formless_hero_has_no_attack() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let own = std::mem::replace(&mut hero.species, Species::named("blob"));
        if let Some(h) = hero.hero_mut() {
            h.original_form = Some((own, HitPoints::new(40)));
        }
        let mut jackal = test_monster(bestiary::jackal());
        assert_eq!(resolve_attack(&mut hero, &mut jackal, &mut ctx), AttackOutcome::Cancelled);
        drop(ctx);
        assert!(log.contains("You have no way to attack monsters physically."));
    }

    #[test]
    fn test_leprechaun_dodges() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let mut leprechaun = test_monster(bestiary::leprechaun());
        assert_eq!(resolve_attack(&mut hero, &mut leprechaun, &mut ctx), AttackOutcome::Dodged);
        assert_eq!(leprechaun.hp.current(), leprechaun.hp.max());
    }

    #[test]
    fn test_sword_hit_kills_and_breaks_conduct() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // d20 = 10 against a to-hit of 12, then d8 = 8
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [9, 7]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.equipment
            .equip(EquipSlot::Weapon, Item::from_catalog(ItemId(4), otyp::LONG_SWORD, &cat))
            .unwrap();
        let mut jackal = test_monster(bestiary::jackal());
        let outcome = resolve_attack(&mut hero, &mut jackal, &mut ctx);
        assert_eq!(outcome, AttackOutcome::Hit { defender_died: true });
        assert!(jackal.is_dead());
        assert_eq!(hero.conduct.count(ConductKind::WeaponHit), 1);
        assert_eq!(hero.weapon().map(|w| w.otype), Some(otyp::LONG_SWORD));
    }

    #[test]
    fn test_miss_leaves_conduct_alone() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [19]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.equipment
            .equip(EquipSlot::Weapon, Item::from_catalog(ItemId(4), otyp::LONG_SWORD, &cat))
            .unwrap();
        let mut jackal = test_monster(bestiary::jackal());
        assert_eq!(resolve_attack(&mut hero, &mut jackal, &mut ctx), AttackOutcome::Missed);
        assert_eq!(jackal.hp.current(), 5);
        assert_eq!(hero.conduct.count(ConductKind::WeaponHit), 0);
        drop(ctx);
        assert!(log.contains("You miss the jackal."));
    }

    #[test]
    fn test_floating_eye_shares_its_suffering() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // d20 = 1, d2 = 1, no stagger, no flee
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0, 0, 99, 1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.intrinsics.free_action = true;
        let mut eye = test_monster(bestiary::floating_eye());
        let outcome = resolve_attack(&mut hero, &mut eye, &mut ctx);
        assert_eq!(outcome, AttackOutcome::Hit { defender_died: false });
        assert_eq!(eye.hp.current(), 12);
        // 3 damage times level 5
        assert_eq!(hero.hp.current(), 25);
        drop(ctx);
        assert!(log.contains("you feel its suffering as though it were your own"));
    }

    #[test]
    fn test_polymorphed_hero_bites() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // d20 = 1 against 12, then d2 = 2
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0, 1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let own = std::mem::replace(&mut hero.species, bestiary::jackal());
        if let Some(h) = hero.hero_mut() {
            h.original_form = Some((own, HitPoints::new(40)));
        }
        let mut jackal = test_monster(bestiary::jackal());
        let outcome = resolve_attack(&mut hero, &mut jackal, &mut ctx);
        assert_eq!(outcome, AttackOutcome::Hit { defender_died: false });
        assert_eq!(jackal.hp.current(), 3);
        drop(ctx);
        assert!(log.contains("You bite the jackal."));
    }

    #[test]
    fn test_monster_bites_hero() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // d20 = 5 against 20, then d2 = 2
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [4, 1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut jackal = test_monster(bestiary::jackal());
        let mut hero = test_hero();
        let outcome = resolve_attack(&mut jackal, &mut hero, &mut ctx);
        assert_eq!(outcome, AttackOutcome::Hit { defender_died: false });
        assert_eq!(hero.hp.current(), 38);
        drop(ctx);
        assert!(log.contains("The jackal bites!"));
    }

    #[test]
    fn test_thrown_dagger_miss_returns_it() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [19]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let mut jackal = test_monster(bestiary::jackal());
        let dagger = Item::from_catalog(ItemId(9), otyp::DAGGER, &cat);
        let (outcome, left) = resolve_throw(&mut hero, &mut jackal, dagger, &mut ctx);
        assert_eq!(outcome, AttackOutcome::Missed);
        assert_eq!(left.map(|d| d.id), Some(ItemId(9)));
        drop(ctx);
        assert!(log.contains("The dagger misses the jackal."));
    }

    #[test]
    fn test_thrown_dagger_hit_wounds() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        let mut jackal = test_monster(bestiary::jackal());
        let dagger = Item::from_catalog(ItemId(9), otyp::DAGGER, &cat);
        let (outcome, left) = resolve_throw(&mut hero, &mut jackal, dagger, &mut ctx);
        assert!(outcome.is_hit());
        assert!(jackal.hp.current() < 5);
        assert!(left.is_some());
    }
}
