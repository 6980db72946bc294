//! Gods: their names, their voices and their wrath

use tracing::{debug, warn};

use super::trouble::{ItemSpot, item_mut, item_spots};
use crate::combat::{CombatContext, Event, lose_level};
use crate::combatant::{AlignmentType, Attribute, Combatant, DeathCause, EquipSlot, Role};
use crate::consts::STRIDENT;
use crate::message::MsgChannel;
use crate::monster::{Resistances, SpeciesFlags};
use crate::object::{BucStatus, ObjectClass, ObjectTraits};
use nh_rng::RngChannel;

/// Names of the gods a role can pray to
///
/// A name starting with `_` belongs to a goddess.
pub trait Pantheon {
    fn god(&self, role: Role, alignment: AlignmentType) -> &str;
}

/// The stock pantheons, one per role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardPantheon {
    /// Priests serve the gods of another role
    priest_borrows: Role,
}

impl Default for StandardPantheon {
    fn default() -> Self {
        Self {
            priest_borrows: Role::Wizard,
        }
    }
}

impl StandardPantheon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pantheon for a priest; a priest cannot borrow from priests
    pub fn for_priest(borrows: Role) -> Self {
        if borrows == Role::Priest {
            warn!("priest pantheon cannot borrow from priests");
            return Self::default();
        }
        Self {
            priest_borrows: borrows,
        }
    }

    /// Lawful, neutral and chaotic gods of a role
    const fn gods_of(role: Role) -> Option<[&'static str; 3]> {
        Some(match role {
            Role::Archeologist => ["Quetzalcoatl", "Camaxtli", "Huhetotl"],
            Role::Barbarian => ["Mitra", "Crom", "Set"],
            Role::Caveman => ["Anu", "_Ishtar", "Anshar"],
            Role::Healer => ["_Athena", "Hermes", "Poseidon"],
            Role::Knight => ["Lugh", "_Brigit", "Manannan Mac Lir"],
            Role::Monk => ["Shan Lai Ching", "Chih Sung-tzu", "Huan Ti"],
            Role::Ranger => ["Mercury", "_Venus", "Mars"],
            Role::Rogue => ["Issek", "Mog", "Kos"],
            Role::Samurai => ["_Amaterasu Omikami", "Raijin", "Susanowo"],
            Role::Tourist => ["Blind Io", "_The Lady", "Offler"],
            Role::Valkyrie => ["Tyr", "Odin", "Loki"],
            Role::Wizard => ["Ptah", "Thoth", "Anhur"],
            Role::Priest => return None,
        })
    }
}

impl Pantheon for StandardPantheon {
    fn god(&self, role: Role, alignment: AlignmentType) -> &str {
        let gods = Self::gods_of(role)
            .or_else(|| Self::gods_of(self.priest_borrows))
            .unwrap_or(["Ptah", "Thoth", "Anhur"]);
        match alignment {
            AlignmentType::Lawful => gods[0],
            AlignmentType::Neutral => gods[1],
            AlignmentType::Chaotic => gods[2],
            AlignmentType::Unaligned => "Moloch",
        }
    }
}

fn hero_role(you: &Combatant) -> Role {
    you.hero().map_or(Role::default(), |h| h.role)
}

/// Display name of the god of `alignment` for this hero
pub fn align_god_name(gods: &dyn Pantheon, you: &Combatant, alignment: AlignmentType) -> String {
    if alignment == AlignmentType::Unaligned {
        return "Moloch".to_string();
    }
    let raw = gods.god(hero_role(you), alignment);
    raw.strip_prefix('_').unwrap_or(raw).to_string()
}

/// "god" or "goddess"
pub fn god_title(gods: &dyn Pantheon, you: &Combatant, alignment: AlignmentType) -> &'static str {
    if alignment != AlignmentType::Unaligned && gods.god(hero_role(you), alignment).starts_with('_') {
        "goddess"
    } else {
        "god"
    }
}

/// How a god addresses the hero
pub(crate) fn mortal_or_creature(you: &Combatant) -> &'static str {
    if you.species.has(SpeciesFlags::HUMAN) || you.species.has(SpeciesFlags::ELF) {
        "mortal"
    } else {
        "creature"
    }
}

fn him_or_her(you: &Combatant) -> &'static str {
    if you.hero().is_some_and(|h| h.female) { "her" } else { "him" }
}

const VOICES: [&str; 4] = ["booms out", "thunders", "rings out", "booms"];

/// "The voice of Tyr thunders: ..." with optional quoted words
pub fn god_voice(
    you: &Combatant,
    gods: &dyn Pantheon,
    alignment: AlignmentType,
    words: Option<&str>,
    ctx: &mut CombatContext<'_>,
) {
    let verb = VOICES[ctx.rn2_on(RngChannel::Display, VOICES.len() as u32) as usize];
    let god = align_god_name(gods, you, alignment);
    let text = match words {
        Some(words) => format!("The voice of {god} {verb}: \"{words}\""),
        None => format!("The voice of {god} {verb}:"),
    };
    ctx.say(MsgChannel::Divine, text);
}

/// A god quoted without the voice preamble
pub(crate) fn verbalize(ctx: &mut CombatContext<'_>, channel: MsgChannel, words: impl AsRef<str>) {
    ctx.say(channel, format!("\"{}\"", words.as_ref()));
}

pub fn gods_angry(you: &Combatant, gods: &dyn Pantheon, alignment: AlignmentType, ctx: &mut CombatContext<'_>) {
    god_voice(you, gods, alignment, Some("Thou hast angered me."), ctx);
}

/// Raise the anger of the hero's own god, or soothe it when another god was
/// offended, then face that god's wrath
pub fn gods_upset(you: &mut Combatant, gods: &dyn Pantheon, alignment: AlignmentType, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    if let Some(hero) = you.hero_mut() {
        if alignment == own {
            hero.god_anger += 1;
        } else if hero.god_anger > 0 {
            hero.god_anger -= 1;
        }
    }
    angry_gods(you, gods, alignment, ctx);
}

/// Wearing something that keeps attributes from changing
pub(crate) fn sustains_ability(you: &Combatant, ctx: &CombatContext<'_>) -> bool {
    EquipSlot::RINGS.iter().any(|&slot| {
        you.equipment
            .get(slot)
            .is_some_and(|r| ctx.catalog.lookup(r.otype).traits.contains(ObjectTraits::SUSTAIN_ABILITY))
    })
}

/// Drain wisdom; `permanent` also lowers the peak
pub(crate) fn lose_wisdom(you: &mut Combatant, amount: i32, permanent: bool, ctx: &mut CombatContext<'_>) {
    if sustains_ability(you, ctx) {
        return;
    }
    if you.attributes.adjust(Attribute::Wisdom, -amount, permanent) {
        ctx.say(MsgChannel::StatusBad, "You feel foolish!");
    }
}

fn punish(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::StatusBad, "You are being punished for your misbehavior!");
    if let Some(hero) = you.hero_mut() {
        hero.afflictions.punished = true;
    }
}

/// The wrath ladder. How bad it gets scales with anger and bad luck.
pub fn angry_gods(you: &mut Combatant, gods: &dyn Pantheon, resp: AlignmentType, ctx: &mut CombatContext<'_>) {
    let resp = if ctx.field.in_gehennom {
        AlignmentType::Unaligned
    } else {
        resp
    };
    let luck = you.luck(ctx.catalog);
    let record = you.alignment.record;
    let own = you.alignment.kind;
    let Some(hero) = you.hero_mut() else {
        return;
    };
    hero.protection_bonus = 0;
    let punished = hero.afflictions.punished;

    let maxanger = if resp != own {
        record / 2 + if luck > 0 { -luck / 3 } else { -luck }
    } else {
        let luck_term = if luck > 0 || record >= STRIDENT {
            -luck / 3
        } else {
            -luck
        };
        3 * hero.god_anger + luck_term
    };
    // bad alignment with good luck can go below 1
    let maxanger = maxanger.clamp(1, 15);

    let roll = ctx.rn2_on(RngChannel::GodAnger, maxanger as u32);
    debug!(%resp, maxanger, roll, "angry gods");
    let god = align_god_name(gods, you, resp);
    match roll {
        0 | 1 => {
            let mood = if you.status.hallucinating > 0 { "bummed" } else { "displeased" };
            ctx.say(MsgChannel::AlignBad, format!("You feel that {god} is {mood}."));
        }
        2 | 3 => {
            god_voice(you, gods, resp, None, ctx);
            let charge = if you.alignment.god_is_angry() && resp == own {
                "hast strayed from the path"
            } else {
                "art arrogant"
            };
            let who = mortal_or_creature(you);
            verbalize(ctx, MsgChannel::AlignBad, format!("Thou {charge}, {who}."));
            verbalize(ctx, MsgChannel::StatusBad, "Thou must relearn thy lessons!");
            lose_wisdom(you, 1, false, ctx);
            lose_level(you, ctx);
        }
        6 if !punished => {
            gods_angry(you, gods, resp, ctx);
            punish(you, ctx);
        }
        4..=6 => {
            gods_angry(you, gods, resp, ctx);
            if you.status.can_see() && !you.resists(Resistances::MAGIC, ctx.catalog) {
                ctx.say(MsgChannel::ItemLoss, "A black glow surrounds you.");
            }
            rndcurse(you, ctx);
        }
        7 | 8 => {
            god_voice(you, gods, resp, None, ctx);
            let scorned = ctx
                .field
                .altar_at(you.position)
                .is_some_and(|a| a.alignment != resp);
            let verb = if scorned { "scorn" } else { "call upon" };
            verbalize(ctx, MsgChannel::AlignBad, format!("Thou durst {verb} me?"));
            let who = mortal_or_creature(you);
            verbalize(ctx, MsgChannel::CombatAlert, format!("Then die, {who}!"));
            ctx.emit(Event::MinionSummoned {
                alignment: resp,
                hostile: true,
            });
        }
        _ => {
            gods_angry(you, gods, resp, ctx);
            god_zaps_you(you, gods, resp, ctx);
        }
    }
    let level = you.level;
    let timeout = ctx.rnz(300, level);
    if let Some(hero) = you.hero_mut() {
        hero.prayer_timeout = timeout;
    }
}

/// Curse a handful of the hero's things at random; blessed ones only lose
/// their blessing
pub fn rndcurse(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    let resistant = you.resists(Resistances::MAGIC, ctx.catalog);
    if resistant {
        ctx.say(MsgChannel::ItemLoss, "You feel a malignant aura surround you.");
    }
    let spots = item_spots(you);
    if !spots.is_empty() {
        let count = ctx.rnd(6 / (u32::from(resistant) + 1));
        for _ in 0..count {
            let pick = spots[ctx.rn2(spots.len() as u32) as usize];
            let Some(item) = item_mut(you, pick) else {
                continue;
            };
            match item.buc {
                BucStatus::Cursed => {}
                BucStatus::Blessed => item.uncurse(),
                BucStatus::Uncursed => item.curse(),
            }
        }
    }

    let saddle_at_risk = you
        .hero()
        .and_then(|h| h.steed.as_ref())
        .and_then(|s| s.saddle.as_ref())
        .is_some_and(|s| !s.is_cursed());
    if saddle_at_risk && ctx.one_in(4) {
        let sees = you.status.can_see();
        let steed = you
            .hero()
            .and_then(|h| h.steed.as_ref())
            .map(|s| s.name.clone())
            .unwrap_or_default();
        if let Some(saddle) = item_mut(you, ItemSpot::Saddle) {
            saddle.curse();
            if sees {
                saddle.buc_known = true;
                ctx.say(MsgChannel::ItemLoss, format!("The saddle on {steed} glows black."));
            }
        }
    }
}

fn fry(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::Fatal, "You fry to a crisp.");
    ctx.kill(you, DeathCause::Smitten);
}

/// What a reflected lightning bolt bounces off
fn reflector(you: &Combatant, ctx: &CombatContext<'_>) -> Option<&'static str> {
    let worn = [
        (EquipSlot::Shield, "shield"),
        (EquipSlot::Weapon, "weapon"),
        (EquipSlot::Amulet, "medallion"),
        (EquipSlot::Body, "armor"),
        (EquipSlot::Cloak, "cloak"),
    ];
    worn.into_iter()
        .find(|&(slot, _)| {
            you.equipment
                .get(slot)
                .is_some_and(|o| ctx.catalog.lookup(o.otype).traits.contains(ObjectTraits::REFLECTS))
        })
        .map(|(_, what)| what)
        .or(you.intrinsics.reflecting.then_some("body"))
}

/// Index of the monster that has swallowed the hero
fn engulfer_index(you: &Combatant, ctx: &CombatContext<'_>) -> Option<usize> {
    let id = you.hero()?.engulfed_by?;
    ctx.field.bystanders.iter().position(|m| m.id == id && !m.is_dead())
}

/// Strike the engulfer instead of the hero. True when it died.
fn strike_engulfer(
    idx: usize,
    resist: Resistances,
    cause: DeathCause,
    hit: impl FnOnce(&str) -> String,
    shrug: impl FnOnce(&str) -> String,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let mut engulfer = ctx.field.bystanders.remove(idx);
    let name = engulfer.cap_name();
    let died = if engulfer.resists(resist, ctx.catalog) {
        ctx.say(MsgChannel::CombatImmune, shrug(&name));
        false
    } else {
        ctx.say(MsgChannel::CombatKill, hit(&name));
        ctx.kill(&mut engulfer, cause)
    };
    ctx.field.bystanders.insert(idx, engulfer);
    died
}

fn destroy_worn(you: &mut Combatant, slot: EquipSlot, ctx: &mut CombatContext<'_>) {
    let Some(item) = you.equipment.take(slot) else {
        return;
    };
    let text = match slot {
        EquipSlot::Cloak => "Your cloak crumbles and turns to dust!",
        EquipSlot::Body => "Your armor turns to dust and falls to the floor!",
        EquipSlot::Shirt => "Your shirt crumbles into tiny threads and falls apart!",
        _ => "Your shield crumbles away!",
    };
    ctx.say(MsgChannel::ItemLoss, text);
    ctx.emit(Event::ItemDestroyed {
        owner: you.id,
        item: item.id,
    });
}

/// Lightning, then a disintegration beam, then the sanctum's servants
pub fn god_zaps_you(you: &mut Combatant, gods: &dyn Pantheon, resp: AlignmentType, ctx: &mut CombatContext<'_>) {
    let god = align_god_name(gods, you, resp);

    if let Some(idx) = engulfer_index(you, ctx) {
        ctx.say(
            MsgChannel::AlignBad,
            "Suddenly a bolt of lightning comes down at you from the heavens!",
        );
        let died = strike_engulfer(
            idx,
            Resistances::SHOCK,
            DeathCause::Smitten,
            |name| format!("{name} is hit by it, and fries to a crisp!"),
            |name| format!("{name} is hit by it, but seems unaffected."),
            ctx,
        );
        if died {
            if let Some(hero) = you.hero_mut() {
                hero.engulfed_by = None;
            }
        }
    } else {
        ctx.say(MsgChannel::AlignBad, "Suddenly, a bolt of lightning strikes you!");
        if let Some(what) = reflector(you, ctx) {
            if you.status.can_see() {
                ctx.say(MsgChannel::CombatImmune, format!("It reflects from your {what}."));
            } else {
                ctx.say(MsgChannel::CombatImmune, "For some reason you're unaffected.");
            }
        } else if you.resists(Resistances::SHOCK, ctx.catalog) {
            ctx.say(MsgChannel::CombatImmune, "It seems not to affect you.");
        } else {
            fry(you, ctx);
            return;
        }
    }

    ctx.say(MsgChannel::AlignBad, format!("{god} is not deterred..."));
    if let Some(idx) = engulfer_index(you, ctx) {
        strike_engulfer(
            idx,
            Resistances::DISINT,
            DeathCause::Disintegrated,
            |name| format!("A wide-angle disintegration beam fries {name} to a crisp!"),
            |name| format!("{name} blocks a wide-angle disintegration beam!"),
            ctx,
        );
        return;
    }

    ctx.say(MsgChannel::ItemLoss, "A wide-angle disintegration beam hits you!");
    let catalog = ctx.catalog;
    let exposed = |you: &Combatant, slot: EquipSlot| {
        you.equipment.get(slot).is_some_and(|o| {
            let traits = catalog.lookup(o.otype).traits;
            !traits.contains(ObjectTraits::REFLECTS) && !traits.contains(ObjectTraits::DISINT_RES)
        })
    };
    if exposed(you, EquipSlot::Shield) {
        destroy_worn(you, EquipSlot::Shield, ctx);
    }
    if exposed(you, EquipSlot::Cloak) {
        destroy_worn(you, EquipSlot::Cloak, ctx);
    }
    if exposed(you, EquipSlot::Body) && you.equipment.is_empty(EquipSlot::Cloak) {
        destroy_worn(you, EquipSlot::Body, ctx);
    }
    if you.equipment.is_empty(EquipSlot::Body) && you.equipment.is_empty(EquipSlot::Cloak) {
        destroy_worn(you, EquipSlot::Shirt, ctx);
    }
    if !you.resists(Resistances::DISINT, ctx.catalog) {
        fry(you, ctx);
        return;
    }
    ctx.say(MsgChannel::CombatImmune, "You bask in its black glow for a minute...");
    god_voice(you, gods, resp, Some("I believe it not!"), ctx);

    if ctx.field.has_sanctum(resp) {
        let who = mortal_or_creature(you);
        verbalize(ctx, MsgChannel::AlignBad, format!("Thou cannot escape my wrath, {who}!"));
        for _ in 0..3 {
            ctx.emit(Event::MinionSummoned {
                alignment: resp,
                hostile: true,
            });
        }
        let target = him_or_her(you);
        verbalize(ctx, MsgChannel::CombatAlert, format!("Destroy {target}, my servants!"));
    }
}

/// An altar was desecrated in front of its god
pub fn altar_wrath(you: &mut Combatant, gods: &dyn Pantheon, altar: AlignmentType, ctx: &mut CombatContext<'_>) {
    if altar == you.alignment.kind {
        god_voice(you, gods, altar, Some("How darest thou desecrate my altar!"), ctx);
        lose_wisdom(you, 1, false, ctx);
    } else {
        let god = align_god_name(gods, you, altar);
        ctx.say(MsgChannel::AlignBad, format!("A voice (could it be {god}?) whispers:"));
        verbalize(ctx, MsgChannel::AlignBad, "Thou shalt pay, infidel!");
        if let Some(hero) = you.hero_mut() {
            hero.change_luck(-1);
        }
    }
}

/// Turn the potions of water on the hero's square holy or unholy. True if
/// any changed.
pub fn water_prayer(you: &Combatant, bless: bool, ctx: &mut CombatContext<'_>) -> bool {
    let sees = you.status.can_see();
    let aware = sees && you.status.hallucinating == 0;
    let catalog = ctx.catalog;
    let mut changed = 0u32;
    let mut other = false;
    for item in ctx.field.objects_at_mut(you.position) {
        let water = catalog.lookup(item.otype).traits.contains(ObjectTraits::WATER);
        let needs_change = if bless { !item.is_blessed() } else { !item.is_cursed() };
        if water && needs_change {
            if bless {
                item.bless();
            } else {
                item.curse();
            }
            item.buc_known = aware;
            changed += item.quantity;
        } else if item.class == ObjectClass::Potion {
            other = true;
        }
    }
    if sees && changed > 0 {
        let which = match (other, changed > 1) {
            (true, true) => "Some of the",
            (true, false) => "One of the",
            (false, _) => "The",
        };
        let plural = if other || changed > 1 { "s" } else { "" };
        let verb = if changed > 1 { "" } else { "s" };
        let color = if bless { "light blue" } else { "black" };
        let channel = if bless { MsgChannel::ItemGain } else { MsgChannel::ItemLoss };
        ctx.say(
            channel,
            format!("{which} potion{plural} on the altar glow{verb} {color} for a moment."),
        );
    }
    changed > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::{test_hero, test_monster};
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{Item, ItemId, StaticCatalog, otyp};
    use crate::world::{Altar, Field, Terrain};
    use nh_rng::ScriptedRng;

    #[test]
    fn test_god_names() {
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        assert_eq!(align_god_name(&gods, &you, AlignmentType::Neutral), "Odin");
        assert_eq!(align_god_name(&gods, &you, AlignmentType::Unaligned), "Moloch");
        assert_eq!(god_title(&gods, &you, AlignmentType::Lawful), "god");

        if let Some(hero) = you.hero_mut() {
            hero.role = Role::Samurai;
        }
        assert_eq!(align_god_name(&gods, &you, AlignmentType::Lawful), "Amaterasu Omikami");
        assert_eq!(god_title(&gods, &you, AlignmentType::Lawful), "goddess");

        if let Some(hero) = you.hero_mut() {
            hero.role = Role::Priest;
        }
        let knightly = StandardPantheon::for_priest(Role::Knight);
        assert_eq!(align_god_name(&knightly, &you, AlignmentType::Neutral), "Brigit");
        assert_eq!(align_god_name(&gods, &you, AlignmentType::Chaotic), "Anhur");
    }

    #[test]
    fn test_god_voice_verb_from_display_channel() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1).with(RngChannel::Display, [1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let you = test_hero();

        god_voice(&you, &StandardPantheon::new(), AlignmentType::Neutral, Some("Hark!"), &mut ctx);
        drop(ctx);
        assert_eq!(log.last().map(|m| m.text.as_str()), Some("The voice of Odin thunders: \"Hark!\""));
    }

    #[test]
    fn test_mild_anger_is_only_displeasure() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [0]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.protection_bonus = 2;
            hero.god_anger = 1;
        }

        angry_gods(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        let hero = you.hero().unwrap();
        assert_eq!(hero.protection_bonus, 0);
        assert!(hero.prayer_timeout > 0);
        drop(ctx);
        assert!(log.contains("You feel that Odin is displeased."));
        // 3 * anger with no luck term
        assert_eq!(rng.draws_on(RngChannel::GodAnger).next().map(|d| d.arg), Some(3));
    }

    #[test]
    fn test_anger_is_clamped() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [0]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = 20;
            hero.luck = -10;
        }
        angry_gods(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        drop(ctx);
        assert_eq!(rng.draws_on(RngChannel::GodAnger).next().map(|d| d.arg), Some(15));
    }

    #[test]
    fn test_punishment_then_curses() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [6, 6]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        you.inventory
            .add(Item::from_catalog(ItemId(5), otyp::LONG_SWORD, &cat))
            .unwrap();
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = 5;
        }
        let gods = StandardPantheon::new();

        angry_gods(&mut you, &gods, AlignmentType::Neutral, &mut ctx);
        assert!(you.hero().unwrap().afflictions.punished);

        // already punished: the same roll curses instead
        angry_gods(&mut you, &gods, AlignmentType::Neutral, &mut ctx);
        assert!(you.inventory.get(ItemId(5)).unwrap().is_cursed());
        drop(ctx);
        assert!(log.contains("You are being punished for your misbehavior!"));
        assert!(log.contains("A black glow surrounds you."));
    }

    #[test]
    fn test_lesson_costs_a_level() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [2]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = 3;
        }
        angry_gods(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        assert_eq!(you.level, 4);
        assert_eq!(you.attributes.get(Attribute::Wisdom), 9);
        drop(ctx);
        assert!(log.contains("\"Thou art arrogant, mortal.\""));
        assert!(log.contains("Goodbye level 5."));
    }

    #[test]
    fn test_lightning_fries_unprotected_hero() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();

        god_zaps_you(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        assert!(you.is_dead());
        assert_eq!(you.fate, Some(DeathCause::Smitten));
        let kills = ctx.events.iter().filter(|e| matches!(e, Event::Killed { .. })).count();
        assert_eq!(kills, 1);
        drop(ctx);
        assert!(log.contains("You fry to a crisp."));
        assert!(!log.contains("is not deterred"));
    }

    #[test]
    fn test_reflection_and_disintegration_resistance_survive() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let neutral_sanctum = Altar {
            sanctum: true,
            ..Altar::new(AlignmentType::Neutral)
        };
        field.set_terrain(crate::world::Position::new(5, 5), Terrain::Altar(neutral_sanctum));
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        you.equipment
            .equip(EquipSlot::Shield, Item::from_catalog(ItemId(1), otyp::SHIELD_OF_REFLECTION, &cat))
            .unwrap();
        you.equipment
            .equip(EquipSlot::Cloak, Item::from_catalog(ItemId(2), otyp::LEATHER_CLOAK, &cat))
            .unwrap();
        you.equipment
            .equip(EquipSlot::Body, Item::from_catalog(ItemId(3), otyp::LEATHER_ARMOR, &cat))
            .unwrap();
        you.intrinsics.resists |= Resistances::DISINT;

        god_zaps_you(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        assert!(!you.is_dead());
        assert!(you.equipment.get(EquipSlot::Shield).is_some());
        assert!(you.equipment.is_empty(EquipSlot::Cloak));
        assert!(you.equipment.is_empty(EquipSlot::Body));
        let minions = ctx
            .events
            .iter()
            .filter(|e| matches!(e, Event::MinionSummoned { hostile: true, .. }))
            .count();
        assert_eq!(minions, 3);
        drop(ctx);
        assert!(log.contains("It reflects from your shield."));
        assert!(log.contains("You bask in its black glow for a minute..."));
        assert!(log.contains("\"Destroy him, my servants!\""));
    }

    #[test]
    fn test_engulfer_takes_the_bolt() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut blob = test_monster(bestiary::purple_worm());
        blob.id = crate::combatant::CombatantId(77);
        field.bystanders.push(blob);
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        you.intrinsics.resists |= Resistances::DISINT;
        if let Some(hero) = you.hero_mut() {
            hero.engulfed_by = Some(crate::combatant::CombatantId(77));
        }

        god_zaps_you(&mut you, &StandardPantheon::new(), AlignmentType::Neutral, &mut ctx);
        assert!(ctx.field.bystanders[0].is_dead());
        assert_eq!(you.hero().unwrap().engulfed_by, None);
        assert!(!you.is_dead());
        drop(ctx);
        assert!(log.contains("is hit by it, and fries to a crisp!"));
        assert!(log.contains("A wide-angle disintegration beam hits you!"));
    }

    #[test]
    fn test_altar_wrath() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        let mut you = test_hero();
        let gods = StandardPantheon::new();

        altar_wrath(&mut you, &gods, AlignmentType::Neutral, &mut ctx);
        assert_eq!(you.attributes.get(Attribute::Wisdom), 9);
        altar_wrath(&mut you, &gods, AlignmentType::Lawful, &mut ctx);
        assert_eq!(you.hero().unwrap().luck, -1);
        drop(ctx);
        assert!(log.contains("How darest thou desecrate my altar!"));
        assert!(log.contains("A voice (could it be Tyr?) whispers:"));
    }

    #[test]
    fn test_water_prayer_blesses_water_only() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let you = test_hero();
        field.place_object(you.position, Item::from_catalog(ItemId(1), otyp::POTION_OF_WATER, &cat));
        field.place_object(you.position, Item::from_catalog(ItemId(2), otyp::POTION_OF_SICKNESS, &cat));
        let mut rng = ScriptedRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        assert!(water_prayer(&you, true, &mut ctx));
        assert!(!water_prayer(&you, true, &mut ctx), "already holy");
        let pile = ctx.field.objects_at(you.position);
        assert!(pile[0].is_blessed());
        assert!(!pile[1].is_blessed());
        drop(ctx);
        assert!(log.contains("One of the potions on the altar glows light blue for a moment."));
    }
}
