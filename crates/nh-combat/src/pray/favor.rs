//! A pleased god: how much gets fixed, and the gifts handed to a hero with
//! nothing left to fix

use tracing::{debug, error};

use super::PrayerState;
use super::deity::{Pantheon, align_god_name, god_voice, mortal_or_creature, verbalize};
use super::trouble::{
    Trouble, diagnose, fix_worst_trouble, item_mut, item_spots, natural_hp, troubles, uncurse_and_announce,
    welded,
};
use crate::combat::{CombatContext, Event};
use crate::combatant::{AlignmentType, Attribute, Combatant, EquipSlot, Role, WeaponSkill};
use crate::consts::{DEVOUT, NOT_HUNGRY, PIOUS, STRIDENT};
use crate::message::MsgChannel;
use crate::monster::Resistances;
use crate::object::{Artifact, BucStatus, Item, ObjectCatalog, ObjectClass, ObjectType, otyp};
use crate::world::Altar;
use nh_rng::RngChannel;

/// Spellbooks a god leaves at the hero's feet
const GIFT_BOOKS: [ObjectType; 3] = [otyp::SPE_FORCE_BOLT, otyp::SPE_RESTORE_ABILITY, otyp::SPE_FINGER_OF_DEATH];

const MAX_LEVEL: u8 = 30;

/// How much a pleased god does, from 0 (nothing) to 5 (everything plus a
/// gift)
pub fn favor_tier(luck: i32, record: i32, altar: Option<Altar>, ctx: &mut CombatContext<'_>) -> u8 {
    let bonus = altar.map_or(2, |a| 3 + i32::from(a.shrine));
    let actionmax = (luck + bonus).max(1);
    let mut action = ctx.rn1(actionmax as u32, 1);
    if altar.is_none() {
        action = action.min(3);
    }
    if record < STRIDENT {
        action = i32::from(record > 0 || ctx.rnl(2, luck) == 0);
    }
    action.clamp(0, 5) as u8
}

/// Fix every current trouble `wanted` accepts, worst first. Each trouble is
/// tried once; a stuck hero is only reported to the game loop.
fn fix_troubles(you: &mut Combatant, wanted: impl Fn(Trouble) -> bool, ctx: &mut CombatContext<'_>) {
    let mut tried: Vec<Trouble> = Vec::new();
    loop {
        let next = troubles(you, ctx.field, ctx.catalog)
            .into_iter()
            .find(|t| wanted(*t) && !tried.contains(t));
        let Some(trouble) = next else {
            break;
        };
        fix_worst_trouble(you, trouble, ctx);
        tried.push(trouble);
    }
}

/// The god the hero prayed to is satisfied
pub fn pleased(you: &mut Combatant, gods: &dyn Pantheon, state: &PrayerState, ctx: &mut CombatContext<'_>) {
    // troubles may have cleared up during the prayer
    let trouble = diagnose(you, ctx.field, ctx.catalog);
    let own = you.alignment.kind;
    let moves = ctx.field.moves;
    let hallu = you.status.hallucinating > 0;

    let record = you.alignment.record;
    let mood = if record >= DEVOUT {
        if hallu { "pleased as punch" } else { "well-pleased" }
    } else if record >= STRIDENT {
        if hallu { "ticklish" } else { "pleased" }
    } else if hallu {
        "full"
    } else {
        "satisfied"
    };
    let god = align_god_name(gods, you, state.alignment);
    ctx.say(MsgChannel::AlignGood, format!("You feel that {god} is {mood}."));

    if state.altar.is_some() && state.alignment != own {
        you.adjust_alignment(-1, moves);
        return;
    }
    if record < 2 && trouble.is_none() {
        you.adjust_alignment(1, moves);
    } else if trouble.is_none() && own == AlignmentType::Neutral {
        you.adjust_alignment(1, moves);
        if you.alignment.record > record {
            ctx.say(MsgChannel::AlignGood, "You feel more balanced.");
        }
    }

    let record = you.alignment.record;
    let mut pat_on_head = false;
    if trouble.is_none() && record >= DEVOUT {
        // a hero who was in trouble but got better gets no extra favor
        pat_on_head = state.trouble.is_none();
    } else {
        let luck = you.luck(ctx.catalog);
        let tier = favor_tier(luck, record, state.altar, ctx);
        debug!(tier, ?trouble, "favor tier");
        match tier {
            4 | 5 => {
                pat_on_head = tier == 5;
                fix_troubles(you, |_| true, ctx);
            }
            3 => {
                match trouble {
                    Some(worst) => fix_worst_trouble(you, worst, ctx),
                    None => god_voice(you, gods, own, Some("You seem to be doing fine so far!"), ctx),
                }
                fix_troubles(you, |t| t.is_major(), ctx);
            }
            2 => fix_troubles(you, |t| t.is_major(), ctx),
            1 => {
                if let Some(worst) = trouble.filter(Trouble::is_major) {
                    fix_worst_trouble(you, worst, ctx);
                }
            }
            _ => {}
        }
    }

    if pat_on_head {
        let luck = you.luck(ctx.catalog);
        let sides = ((luck + 6) >> 1).max(1) as u32;
        let roll = ctx.rn2(sides);
        pat_on_head_gift(you, gods, state.alignment, roll, ctx);
    }

    let level = you.level;
    let kick = you.hero().map_or(0, |h| h.kick_on_butt(ctx.options.elbereth));
    let mut timeout = ctx.rnz_on(RngChannel::PrayerTimeout, 350, level);
    if kick > 0 {
        timeout += kick * ctx.rnz(1000, level);
    }
    if let Some(hero) = you.hero_mut() {
        hero.prayer_timeout = timeout;
    }
}

/// A gratuitous favor picked by `roll`
fn pat_on_head_gift(
    you: &mut Combatant,
    gods: &dyn Pantheon,
    prayed_to: AlignmentType,
    roll: u32,
    ctx: &mut CombatContext<'_>,
) {
    debug!(roll, "pat on head");
    match roll {
        0 => {}
        1 => repair_weapon(you, gods, ctx),
        2 => golden_glow(you, ctx),
        3 => {
            if !castle_hint(you, gods, prayed_to, ctx) {
                golden_glow(you, ctx);
            }
        }
        4 => uncurse_everything(you, gods, ctx),
        5 => grant_intrinsic(you, gods, ctx),
        6 => gift_spellbook(you, ctx),
        7..=9 => {
            let crownable = ctx.options.elbereth
                && you.alignment.record >= PIOUS
                && you.hero().is_some_and(|h| h.events.crowned == 0);
            if crownable {
                crown_hero(you, gods, ctx);
            } else {
                gift_spellbook(you, ctx);
            }
        }
        _ => error!(roll, "Confused deity!"),
    }
}

fn is_weapon_like(item: &Item, catalog: &dyn ObjectCatalog) -> bool {
    item.class == ObjectClass::Weapon || catalog.lookup(item.otype).is_weptool()
}

fn repair_weapon(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    let catalog = ctx.catalog;
    let usable = welded(you, catalog) || you.weapon().is_some_and(|w| is_weapon_like(w, catalog));
    if !usable {
        return;
    }
    let sees = you.status.can_see();
    let god = align_god_name(gods, you, you.alignment.kind);
    let Some(weapon) = you.equipment.get_mut(EquipSlot::Weapon) else {
        return;
    };
    let name = weapon.xname(catalog);
    let s = weapon.verb_s();
    let eroded = weapon.greatest_erosion() > 0;
    let mut repaired = if eroded {
        format!(" and {} now as good as new", weapon.is_are())
    } else {
        String::new()
    };

    if weapon.is_cursed() {
        weapon.uncurse();
        weapon.buc_known = true;
        let text = if sees {
            format!("Your {name} softly glow{s} amber{repaired}.")
        } else {
            format!("You feel the power of {god} over your {name}.")
        };
        ctx.say(MsgChannel::ItemGain, text);
        repaired.clear();
    } else if !weapon.is_blessed() {
        weapon.bless();
        weapon.buc_known = true;
        let text = if sees {
            format!("Your {name} softly glow{s} with a light blue aura{repaired}.")
        } else {
            format!("You feel the blessing of {god} over your {name}.")
        };
        ctx.say(MsgChannel::ItemGain, text);
        repaired.clear();
    }

    if eroded {
        weapon.clear_erosion();
        // only when blessing or uncursing said nothing
        if !repaired.is_empty() {
            let verb = if sees { "look" } else { "feel" };
            ctx.say(MsgChannel::ItemGain, format!("Your {name} {verb}{s} as good as new!"));
        }
    }
}

/// Regain one experience level
pub(crate) fn gain_level(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::StatusGood, "You feel more experienced.");
    let gain = ctx.rnd_i(8);
    let hp = natural_hp(you);
    hp.raise_max(gain);
    hp.heal(gain);
    if you.level < MAX_LEVEL {
        you.level += 1;
    }
    let level = you.level;
    if let Some(hero) = you.hero_mut() {
        hero.max_level = hero.max_level.max(level);
    }
    ctx.say(MsgChannel::StatusGood, format!("Welcome to experience level {level}."));
}

/// Full restoration; lost levels come back first
fn golden_glow(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    if you.status.can_see() {
        ctx.say(MsgChannel::StatusHeal, "You are surrounded by a golden glow.");
    }
    let polymorphed = you.hero().is_some_and(|h| h.is_polymorphed());
    let lost_levels = you.hero().is_some_and(|h| you.level < h.max_level);
    if lost_levels {
        if ctx.options.challenge {
            if let Some(hero) = you.hero_mut() {
                hero.max_level = hero.max_level.saturating_sub(1);
            }
        }
        gain_level(you, ctx);
    } else {
        natural_hp(you).raise_max(5);
        if polymorphed {
            you.hp.raise_max(5);
        }
    }
    natural_hp(you).heal_full();
    if polymorphed {
        you.hp.heal_full();
    }
    you.attributes.restore(Attribute::Strength);
    if let Some(hero) = you.hero_mut() {
        hero.nutrition = hero.nutrition.max(NOT_HUNGRY);
        hero.luck = hero.luck.max(0);
    }
    you.status.blinded = 0;
    you.status.creamed = 0;
}

/// Two hints teach the castle tune. False once both were given.
fn castle_hint(you: &mut Combatant, gods: &dyn Pantheon, prayed_to: AlignmentType, ctx: &mut CombatContext<'_>) -> bool {
    let Some(hero) = you.hero() else {
        return false;
    };
    if hero.events.opened_drawbridge {
        return false;
    }
    match hero.events.heard_tune {
        0 => {
            god_voice(you, gods, prayed_to, None, ctx);
            verbalize(ctx, MsgChannel::Divine, format!("Hark, {}!", mortal_or_creature(you)));
            verbalize(ctx, MsgChannel::Hint, "To enter the castle, thou must play the right tune!");
        }
        1 => {
            ctx.say(MsgChannel::Divine, "You hear a divine music...");
            let tune = ctx.field.castle_tune.clone();
            ctx.say(MsgChannel::Hint, format!("It sounds like:  \"{tune}\"."));
        }
        _ => return false,
    }
    if let Some(hero) = you.hero_mut() {
        hero.events.heard_tune += 1;
    }
    true
}

fn uncurse_everything(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    if you.status.can_see() {
        ctx.say(MsgChannel::AlignGood, "You are surrounded by a light blue aura.");
    } else {
        let god = align_god_name(gods, you, you.alignment.kind);
        ctx.say(MsgChannel::AlignGood, format!("You feel the power of {god}."));
    }
    for spot in item_spots(you) {
        if item_mut(you, spot).is_some_and(|o| o.is_cursed()) {
            uncurse_and_announce(you, spot, ctx);
        }
    }
}

fn grant_intrinsic(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    god_voice(you, gods, own, Some("Thou hast pleased me with thy progress,"), ctx);
    let gift = if !you.intrinsics.telepathy {
        you.intrinsics.telepathy = true;
        "Telepathy"
    } else if !you.intrinsics.fast {
        you.intrinsics.fast = true;
        "Speed"
    } else {
        if !you.intrinsics.protection {
            you.intrinsics.protection = true;
            if you.hero().is_some_and(|h| h.protection_bonus == 0) {
                let bonus = 2 + ctx.rn2_on(RngChannel::FirstProtection, 3) as i32;
                if let Some(hero) = you.hero_mut() {
                    hero.protection_bonus = bonus;
                }
            }
        } else if let Some(hero) = you.hero_mut() {
            hero.protection_bonus += 1;
        }
        "my protection"
    };
    verbalize(ctx, MsgChannel::StatusGood, format!("and thus I grant thee the gift of {gift}!"));
    verbalize(ctx, MsgChannel::AlignGood, "Use it wisely in my name!");
}

/// A blessed spellbook, preferring one the hero does not know yet
fn gift_spellbook(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    at_your_feet(you, "An object", ctx);
    let knows = |you: &Combatant, book| you.hero().is_some_and(|h| h.knows_spell(book));
    let mut book = GIFT_BOOKS[ctx.rn2(GIFT_BOOKS.len() as u32) as usize];
    for _ in 0..you.level {
        if !knows(you, book) {
            break;
        }
        book = GIFT_BOOKS[ctx.rn2_on(RngChannel::SpellbookGift, GIFT_BOOKS.len() as u32) as usize];
    }
    let id = ctx.field.new_item_id();
    let gift = Item::from_catalog(id, book, ctx.catalog).with_buc(BucStatus::Blessed);
    ctx.field.place_object(you.position, gift);
    ctx.emit(Event::GiftGranted { item: id, artifact: false });
}

/// "An object appears at your feet!", or wherever the floor is
pub(crate) fn at_your_feet(you: &Combatant, what: &str, ctx: &mut CombatContext<'_>) {
    let blind = !you.status.can_see();
    let what = if blind { "Something" } else { what };
    let engulfer = you
        .hero()
        .and_then(|h| h.engulfed_by)
        .and_then(|id| ctx.field.bystanders.iter().find(|m| m.id == id))
        .map(|m| m.the_name());
    let text = match engulfer {
        Some(engulfer) => format!("{what} drops into {engulfer}'s stomach."),
        None if blind => format!("{what} lands at your feet!"),
        None => format!("{what} appears at your feet!"),
    };
    ctx.say(MsgChannel::ItemGain, text);
}

/// A fresh artifact, recorded as existing
pub(crate) fn make_artifact(otype: ObjectType, artifact: Artifact, ctx: &mut CombatContext<'_>) -> Item {
    let id = ctx.field.new_item_id();
    let mut item = Item::from_catalog(id, otype, ctx.catalog);
    item.artifact = Some(artifact);
    ctx.field.record_artifact(artifact);
    item
}

fn count_gift(you: &mut Combatant) {
    if let Some(hero) = you.hero_mut() {
        hero.gifts += 1;
    }
}

fn unrestrict(you: &mut Combatant, skill: WeaponSkill) {
    if let Some(hero) = you.hero_mut() {
        hero.skills.unrestrict(skill);
    }
}

/// What crowning enhances
enum Blessed {
    Wielded,
    Gift(Item),
    Nothing,
}

/// Make the hero their god's champion
pub fn crown_hero(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    let (crown, artifact) = match own {
        AlignmentType::Lawful => (1, Artifact::Excalibur),
        AlignmentType::Neutral => (2, Artifact::VorpalBlade),
        AlignmentType::Chaotic => (3, Artifact::Stormbringer),
        AlignmentType::Unaligned => {
            error!("crowning an unaligned hero");
            return;
        }
    };
    let catalog = ctx.catalog;
    you.intrinsics.see_invisible = true;
    you.intrinsics.resists |=
        Resistances::FIRE | Resistances::COLD | Resistances::SHOCK | Resistances::SLEEP | Resistances::POISON;
    god_voice(you, gods, own, None, ctx);

    let wielded_artifact = you.weapon().and_then(|w| w.artifact);
    let in_hand = own != AlignmentType::Lawful && wielded_artifact == Some(artifact);
    let already_exists = ctx.field.artifact_exists(artifact);
    let words = match own {
        AlignmentType::Lawful => "I crown thee...  The Hand of Elbereth!".to_string(),
        AlignmentType::Neutral => "Thou shalt be my Envoy of Balance!".to_string(),
        _ => {
            let deed = if already_exists && !in_hand { "take lives" } else { "steal souls" };
            format!("Thou art chosen to {deed} for My Glory!")
        }
    };
    verbalize(ctx, MsgChannel::StatusGood, words);
    if let Some(hero) = you.hero_mut() {
        hero.events.crowned = crown;
    }
    ctx.emit(Event::Crowned);

    let mut target = if you.weapon().is_some_and(|w| is_weapon_like(w, catalog)) {
        Blessed::Wielded
    } else {
        Blessed::Nothing
    };
    let carrying = |you: &Combatant, otype: ObjectType| you.inventory.iter().any(|o| o.otype == otype);
    let role = you.hero().map(|h| h.role);
    let book = match role {
        Some(Role::Wizard)
            if !matches!(wielded_artifact, Some(Artifact::VorpalBlade | Artifact::Stormbringer))
                && !carrying(you, otyp::SPE_FINGER_OF_DEATH) =>
        {
            Some(otyp::SPE_FINGER_OF_DEATH)
        }
        Some(Role::Monk) if wielded_artifact.is_none() && !carrying(you, otyp::SPE_RESTORE_ABILITY) => {
            Some(otyp::SPE_RESTORE_ABILITY)
        }
        _ => None,
    };

    let mut class_gift = false;
    if let Some(book) = book {
        class_gift = true;
        let id = ctx.field.new_item_id();
        let mut gift = Item::from_catalog(id, book, catalog).with_buc(BucStatus::Blessed);
        gift.buc_known = true;
        at_your_feet(you, "A spellbook", ctx);
        ctx.field.place_object(you.position, gift);
        ctx.emit(Event::GiftGranted { item: id, artifact: false });
        count_gift(you);
        // a book for a known spell enhances the wielded weapon instead
        if !you.hero().is_some_and(|h| h.knows_spell(book)) {
            target = Blessed::Nothing;
        }
    } else if role == Some(Role::Knight) && !ctx.field.artifact_exists(Artifact::Dragonbane) {
        class_gift = true;
        let lance = make_artifact(otyp::LANCE, Artifact::Dragonbane, ctx);
        at_your_feet(you, "A weapon", ctx);
        count_gift(you);
        target = Blessed::Gift(lance);
    }

    let sees = you.status.can_see();
    match own {
        AlignmentType::Lawful => {
            if !class_gift && matches!(target, Blessed::Wielded) && !already_exists {
                if let Some(sword) = you.equipment.get_mut(EquipSlot::Weapon) {
                    if sword.otype == otyp::LONG_SWORD && sword.artifact.is_none() {
                        sword.artifact = Some(Artifact::Excalibur);
                        ctx.field.record_artifact(Artifact::Excalibur);
                        if sees {
                            ctx.say(MsgChannel::ItemGain, "Your sword shines brightly for a moment.");
                        }
                        count_gift(you);
                    }
                }
            }
            unrestrict(you, WeaponSkill::LongSword);
        }
        AlignmentType::Neutral | AlignmentType::Chaotic => {
            let chaotic = own == AlignmentType::Chaotic;
            if class_gift {
                // the class gift stands in for the sword
            } else if in_hand {
                let text = if chaotic {
                    "Your black sword hums ominously!".to_string()
                } else {
                    let name = you.weapon().map(|w| w.xname(catalog)).unwrap_or_default();
                    format!("Your {name} goes snicker-snack!")
                };
                ctx.say(MsgChannel::Info, text);
            } else if !already_exists {
                let (base, what) = if chaotic {
                    (otyp::RUNESWORD, "A black sword")
                } else {
                    (otyp::LONG_SWORD, "A sword")
                };
                let mut sword = make_artifact(base, artifact, ctx);
                sword.enchantment = 1;
                at_your_feet(you, what, ctx);
                count_gift(you);
                target = Blessed::Gift(sword);
            }
            let skill = if chaotic { WeaponSkill::BroadSword } else { WeaponSkill::LongSword };
            unrestrict(you, skill);
        }
        AlignmentType::Unaligned => {}
    }

    let enhance = |item: &mut Item| {
        item.bless();
        item.clear_erosion();
        item.erosion_proof = true;
        item.buc_known = true;
        item.proof_known = true;
        item.enchantment = item.enchantment.max(1);
        catalog.lookup(item.otype).skill
    };
    let skill = match &mut target {
        Blessed::Wielded => you.equipment.get_mut(EquipSlot::Weapon).map(enhance),
        Blessed::Gift(item) => Some(enhance(item)),
        Blessed::Nothing => None,
    };
    match skill {
        Some(skill) => unrestrict(you, skill),
        None if !class_gift => ctx.say(MsgChannel::Info, "You feel unworthy."),
        None => {}
    }
    if let Blessed::Gift(item) = target {
        let id = item.id;
        ctx.field.place_object(you.position, item);
        ctx.emit(Event::GiftGranted { item: id, artifact: true });
    }
}
