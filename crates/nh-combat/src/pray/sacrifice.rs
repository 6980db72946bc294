//! Corpses offered on an altar

use tracing::debug;

use super::deity::{
    Pantheon, align_god_name, angry_gods, god_voice, god_zaps_you, gods_upset, lose_wisdom, mortal_or_creature,
};
use super::favor::{at_your_feet, make_artifact};
use crate::combat::{CombatContext, Event};
use crate::combatant::{AlignmentType, Combatant, ConductKind, Duty, Race};
use crate::consts::{LUCK_MAX, MAX_SACRIFICE_VALUE, align_limit};
use crate::message::MsgChannel;
use crate::monster::{Species, SpeciesFlags, SpeciesKind};
use crate::object::{Artifact, Item};
use crate::world::{Altar, Terrain};
use nh_rng::RngChannel;
use strum::IntoEnumIterator;

/// Corpses older than this many turns are worthless
const FRESH_TURNS: u64 = 50;

/// Sides of the die the gift index is read from
const GIFT_SEED: u32 = 27720;

/// What a corpse is worth: the species level plus one while fresh, nothing
/// once stale. Acid blobs never go stale.
pub fn corpse_value(corpse: &Item, moves: u64) -> i32 {
    let Some(species) = corpse.corpse_of.as_deref() else {
        return 0;
    };
    if species.kind == SpeciesKind::AcidBlob || corpse.age + FRESH_TURNS >= moves {
        i32::from(species.level) + 1
    } else {
        0
    }
}

fn race_flag(race: Race) -> Option<SpeciesFlags> {
    match race {
        Race::Human => Some(SpeciesFlags::HUMAN),
        Race::Elf => Some(SpeciesFlags::ELF),
        Race::Dwarf => Some(SpeciesFlags::DWARF),
        Race::Orc => Some(SpeciesFlags::ORC),
        Race::Gnome => None,
    }
}

fn race_adjective(race: Race) -> &'static str {
    match race {
        Race::Human => "human",
        Race::Elf => "elven",
        Race::Dwarf => "dwarvish",
        Race::Gnome => "gnomish",
        Race::Orc => "orcish",
    }
}

fn own_race(you: &Combatant, species: &Species) -> bool {
    you.hero()
        .and_then(|h| race_flag(h.race))
        .is_some_and(|flag| species.has(flag))
}

fn luck_of(you: &Combatant) -> i32 {
    you.hero().map_or(0, |h| h.luck)
}

fn change_luck(you: &mut Combatant, delta: i32) {
    if let Some(hero) = you.hero_mut() {
        hero.change_luck(delta);
    }
}

/// Raise negative luck by one, or to zero when `reset`
fn soften_bad_luck(you: &mut Combatant, reset: bool) {
    if let Some(hero) = you.hero_mut() {
        if hero.luck < 0 {
            hero.luck = if reset { 0 } else { hero.luck + 1 };
        }
    }
}

/// Temple priests nearby turn hostile, except those serving `spare`
fn anger_temple_priests(spare: Option<AlignmentType>, ctx: &mut CombatContext<'_>) {
    let mut angered = Vec::new();
    for priest in ctx.field.bystanders.iter_mut() {
        let id = priest.id;
        let Some(traits) = priest.monster_traits_mut() else {
            continue;
        };
        if let Duty::Priest(serves) = traits.duty {
            if spare != Some(serves) {
                traits.peaceful = false;
                angered.push(id);
            }
        }
    }
    for priest in angered {
        ctx.emit(Event::PriestAngered { priest });
    }
}

fn consume_offering(you: &Combatant, ctx: &mut CombatContext<'_>) {
    let text = if you.status.hallucinating > 0 {
        match ctx.rn2(3) {
            0 => "Your sacrifice sprouts wings and a propeller and roars away!",
            1 => "Your sacrifice puffs up, swelling bigger and bigger, and pops!",
            _ => "Your sacrifice collapses into a cloud of dancing particles and fades away!",
        }
    } else if !you.status.can_see() && you.alignment.kind == AlignmentType::Lawful {
        "Your sacrifice disappears!"
    } else if you.alignment.kind == AlignmentType::Lawful {
        "Your sacrifice is consumed in a flash of light!"
    } else {
        "Your sacrifice is consumed in a burst of flame!"
    };
    ctx.say(MsgChannel::Info, text);
}

/// Offer `corpse` on the altar under the hero. The offering comes back
/// when the gods leave it where it lies.
pub fn offer_sacrifice(
    you: &mut Combatant,
    corpse: Item,
    gods: &dyn Pantheon,
    ctx: &mut CombatContext<'_>,
) -> Option<Item> {
    let engulfed = you.hero().is_some_and(|h| h.engulfed_by.is_some());
    let altar = match ctx.field.altar_at(you.position) {
        Some(altar) if !engulfed => altar,
        _ => {
            ctx.say(MsgChannel::Info, "You are not standing on an altar.");
            return Some(corpse);
        }
    };
    let own = you.alignment.kind;
    let moves = ctx.field.moves;
    debug!(altar = %altar.alignment, ?own, "sacrifice");

    let mut value = 0;
    if let Some(species) = corpse.corpse_of.as_deref() {
        you.conduct.violate(ConductKind::Gnostic);
        value = corpse_value(&corpse, moves);

        if own_race(you, species) {
            own_race_sacrifice(you, gods, altar, ctx);
            return None;
        }
        if species.is_undead() {
            if own != AlignmentType::Chaotic {
                value += 1;
            }
        } else if species.kind == SpeciesKind::Unicorn {
            value = unicorn_value(you, species, altar, value, ctx);
        }
    }

    if value == 0 {
        ctx.say(MsgChannel::Info, "Nothing happens.");
        return Some(corpse);
    }

    if altar.sanctum && altar.alignment != own {
        ctx.say(MsgChannel::CombatAlert, "You feel the air around you grow charged...");
        let altar_god = align_god_name(gods, you, altar.alignment);
        ctx.say(
            MsgChannel::AlignBad,
            format!("Suddenly, you realize that {altar_god} has noticed you..."),
        );
        let words = format!("So, {}!  You dare desecrate my High Temple!", mortal_or_creature(you));
        god_voice(you, gods, altar.alignment, Some(&words), ctx);
        god_zaps_you(you, gods, altar.alignment, ctx);
        return Some(corpse);
    }

    if value < 0 {
        gods_upset(you, gods, altar.alignment, ctx);
        return Some(corpse);
    }

    if altar.alignment != own {
        let rejected_in_hell = altar.alignment == AlignmentType::Unaligned && ctx.field.in_gehennom;
        if you.alignment.god_is_angry() || rejected_in_hell {
            if altar.alignment == AlignmentType::Unaligned {
                reject(you, gods, ctx);
                return Some(corpse);
            }
            convert(you, gods, altar.alignment, ctx);
            return None;
        }
        contest_altar(you, gods, altar, ctx);
        return None;
    }

    consume_offering(you, ctx);
    reward(you, gods, value, ctx);
    None
}

/// Unicorns count by how their alignment relates to the altar and the hero
fn unicorn_value(
    you: &mut Combatant,
    unicorn: &Species,
    altar: Altar,
    value: i32,
    ctx: &mut CombatContext<'_>,
) -> i32 {
    let own = you.alignment.kind;
    let unicorn = AlignmentType::from_sign(i32::from(unicorn.alignment));
    let moves = ctx.field.moves;
    if unicorn == altar.alignment {
        let insulted = match unicorn {
            AlignmentType::Chaotic => "chaos",
            AlignmentType::Neutral => "balance",
            _ => "law",
        };
        ctx.say(MsgChannel::AlignBad, format!("Such an action is an insult to {insulted}!"));
        lose_wisdom(you, 1, true, ctx);
        -5
    } else if own == altar.alignment {
        if you.alignment.record < align_limit(moves) {
            ctx.say(MsgChannel::AlignGood, format!("You feel appropriately {}.", own.adjective()));
        } else {
            ctx.say(MsgChannel::AlignBad, "You feel you are thoroughly on the right path.");
        }
        you.adjust_alignment(5, moves);
        value + 3
    } else if unicorn == own {
        for _ in 0..=you.alignment.record {
            you.conduct.violate(ConductKind::LostAlign);
        }
        you.alignment.record = -1;
        1
    } else {
        value + 3
    }
}

/// Sacrificing one's own kind
fn own_race_sacrifice(you: &mut Combatant, gods: &dyn Pantheon, altar: Altar, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    let chaotic = own == AlignmentType::Chaotic;
    if you.species.is_demon() {
        ctx.say(MsgChannel::AlignGood, "You find the idea very satisfying.");
    } else if !chaotic {
        ctx.say(MsgChannel::AlignBad, "You'll regret this infamous offense!");
    }

    let pos = you.position;
    if !matches!(altar.alignment, AlignmentType::Chaotic | AlignmentType::Unaligned) {
        let race = you.hero().map_or(Race::Human, |h| h.race);
        ctx.say(
            MsgChannel::AlignBad,
            format!("The altar is stained with {} blood.", race_adjective(race)),
        );
        if !altar.sanctum {
            let stained = Altar {
                alignment: AlignmentType::Chaotic,
                shrine: false,
                sanctum: false,
            };
            ctx.field.set_terrain(pos, Terrain::Altar(stained));
        }
        anger_temple_priests(None, ctx);
    } else {
        if altar.alignment == AlignmentType::Chaotic && !chaotic && !altar.sanctum {
            ctx.say(
                MsgChannel::CombatAlert,
                "The blood floods the altar, which vanishes in a black cloud!",
            );
            ctx.field.set_terrain(pos, Terrain::Room);
            anger_temple_priests(None, ctx);
        } else {
            ctx.say(MsgChannel::Info, "The blood covers the altar!");
            change_luck(you, if altar.alignment == own { 2 } else { -2 });
        }
        ctx.emit(Event::DemonSummoned);
        ctx.say(MsgChannel::StatusBad, "You are terrified, and unable to move.");
        you.status.paralyze(3);
    }

    let moves = ctx.field.moves;
    if chaotic {
        you.adjust_alignment(5, moves);
        return;
    }
    you.adjust_alignment(-5, moves);
    if let Some(hero) = you.hero_mut() {
        hero.god_anger += 3;
    }
    lose_wisdom(you, 1, true, ctx);
    if !ctx.field.in_gehennom {
        angry_gods(you, gods, own, ctx);
    }
    change_luck(you, -5);
}

/// Own god is angry: the altar's god takes the hero in
fn convert(you: &mut Combatant, gods: &dyn Pantheon, altar: AlignmentType, ctx: &mut CombatContext<'_>) {
    let own_god = align_god_name(gods, you, you.alignment.kind);
    ctx.say(MsgChannel::AlignBad, format!("You have a strong feeling that {own_god} is angry..."));
    consume_offering(you, ctx);
    let altar_god = align_god_name(gods, you, altar);
    ctx.say(MsgChannel::StatusBad, format!("{altar_god} accepts your allegiance."));

    you.alignment.kind = altar;
    let original = you.hero().map_or(altar, |h| h.original_alignment);
    if let Some(hero) = you.hero_mut() {
        hero.converted = true;
        hero.protection_bonus = 0;
        hero.change_luck(-3);
        hero.prayer_timeout += 300;
    }
    ctx.say(MsgChannel::StatusGood, "You have a sudden sense of a new direction.");
    let moves = ctx.field.moves;
    you.adjust_alignment(original.value() * (align_limit(moves) / 2), moves);
}

/// Moloch wants nothing from the hero
fn reject(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    let moves = ctx.field.moves;
    if let Some(hero) = you.hero_mut() {
        hero.god_anger += 3;
    }
    you.adjust_alignment(-5, moves);
    let altar_god = align_god_name(gods, you, AlignmentType::Unaligned);
    ctx.say(MsgChannel::AlignBad, format!("{altar_god} rejects your sacrifice!"));
    god_voice(you, gods, AlignmentType::Unaligned, Some("Suffer, infidel!"), ctx);
    change_luck(you, -5);
    lose_wisdom(you, 2, true, ctx);
    if !ctx.field.in_gehennom {
        angry_gods(you, gods, you.alignment.kind, ctx);
    }
}

/// Try to claim a cross-aligned altar for the hero's god
fn contest_altar(you: &mut Combatant, gods: &dyn Pantheon, altar: Altar, ctx: &mut CombatContext<'_>) {
    consume_offering(you, ctx);
    let own = you.alignment.kind;
    let own_god = align_god_name(gods, you, own);
    let altar_god = align_god_name(gods, you, altar.alignment);
    ctx.say(
        MsgChannel::Info,
        format!("You sense a conflict between {own_god} and {altar_god}."),
    );
    let limit = align_limit(ctx.field.moves);
    if ctx.rn2_on(RngChannel::AltarConvert, 8 + u32::from(you.level)) > 5 {
        ctx.say(MsgChannel::AlignGood, format!("You feel the power of {own_god} increase."));
        change_luck(you, 1);
        let claimed = Altar {
            alignment: own,
            shrine: false,
            sanctum: altar.sanctum,
        };
        ctx.field.set_terrain(you.position, Terrain::Altar(claimed));
        if you.status.can_see() {
            let colour = match own {
                AlignmentType::Lawful => "white",
                AlignmentType::Neutral => "gray",
                _ => "black",
            };
            ctx.say(MsgChannel::Info, format!("The altar glows {colour}."));
        }
        ctx.emit(Event::AltarConverted { alignment: own });
        vengeful_minion(you, altar.alignment, 3 * limit / 4, ctx);
        anger_temple_priests(Some(own), ctx);
    } else {
        ctx.say(
            MsgChannel::StatusBad,
            format!("Unluckily, you feel the power of {own_god} decrease."),
        );
        change_luck(you, -1);
        vengeful_minion(you, altar.alignment, 7 * limit / 8, ctx);
    }
}

fn vengeful_minion(you: &Combatant, alignment: AlignmentType, threshold: i32, ctx: &mut CombatContext<'_>) {
    let luck = you.luck(ctx.catalog);
    let record = you.alignment.record;
    if ctx.rnl(u32::from(you.level), luck) > 6 && record > 0 && ctx.rnd_i(record) > threshold {
        ctx.emit(Event::MinionSummoned {
            alignment,
            hostile: true,
        });
    }
}

/// Own god accepts the offering
fn reward(you: &mut Combatant, gods: &dyn Pantheon, value: i32, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    let god = align_god_name(gods, you, own);
    let hallu = you.status.hallucinating > 0;
    let chaotic = own == AlignmentType::Chaotic;
    let moves = ctx.field.moves;
    let (anger, timeout) = you.hero().map_or((0, 0), |h| (h.god_anger, h.prayer_timeout));

    if anger > 0 {
        let per = if chaotic { 2 } else { 3 };
        let eased = (anger - value * per / MAX_SACRIFICE_VALUE).max(0);
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = eased;
        }
        if eased == anger {
            let text = if hallu { "The gods seem tall." } else { "You have a feeling of inadequacy." };
            ctx.say(MsgChannel::Info, text);
        } else if eased > 0 {
            let mood = if hallu { "groovy" } else { "slightly mollified" };
            ctx.say(MsgChannel::AlignGood, format!("{god} seems {mood}."));
            soften_bad_luck(you, false);
        } else {
            let mood = if hallu { "cosmic (not a new fact)" } else { "mollified" };
            ctx.say(MsgChannel::StatusHeal, format!("{god} seems {mood}."));
            soften_bad_luck(you, true);
        }
    } else if you.alignment.god_is_angry() {
        let absolved = value.min(MAX_SACRIFICE_VALUE).min(-you.alignment.record);
        you.adjust_alignment(absolved, moves);
        ctx.say(MsgChannel::AlignGood, "You feel partially absolved.");
    } else if timeout > 0 {
        let per = if chaotic { 500 } else { 300 };
        let eased = (timeout - value * per / MAX_SACRIFICE_VALUE).max(0);
        if let Some(hero) = you.hero_mut() {
            hero.prayer_timeout = eased;
        }
        if eased != timeout {
            if eased > 0 {
                let text = if hallu {
                    "You realize that the gods are not like you and I."
                } else {
                    "You have a hopeful feeling."
                };
                ctx.say(MsgChannel::AlignGood, text);
                soften_bad_luck(you, false);
            } else {
                let text = if hallu {
                    "Overall, there is a smell of fried onions."
                } else {
                    "You have a feeling of reconciliation."
                };
                ctx.say(MsgChannel::StatusHeal, text);
                soften_bad_luck(you, true);
            }
        }
    } else {
        let before = luck_of(you);
        if you.level > 2 && before >= 0 && try_gift(you, gods, ctx) {
            return;
        }
        change_luck(you, value * LUCK_MAX / (MAX_SACRIFICE_VALUE * 2));
        if luck_of(you) < 0 {
            soften_bad_luck(you, true);
        }
        if luck_of(you) != before {
            let text = if !you.status.can_see() {
                "You think something brushed your foot."
            } else if hallu {
                "You see crabgrass at your feet.  A funny thing in a dungeon."
            } else {
                "You glimpse a four-leaf clover at your feet."
            };
            ctx.say(MsgChannel::StatusGood, text);
        }
    }
}

/// Roll for an artifact gift. Both outcomes consume one seed draw on the
/// gift channel so later gifts do not depend on this roll.
fn try_gift(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) -> bool {
    let nart = ctx.field.nartifacts() as u32;
    let gifts = you.hero().map_or(0, |h| h.gifts);
    let lucky = ctx.rn2_on(RngChannel::AltarGift, 10 + 2 * gifts * nart) == 0;
    let seed = ctx.rn2_on(RngChannel::AltarGift, GIFT_SEED) as usize;
    if !lucky {
        return false;
    }

    let own = you.alignment.kind;
    let candidates: Vec<Artifact> = Artifact::iter()
        .filter(|a| !ctx.field.artifact_exists(*a))
        .filter(|a| a.alignment().is_none_or(|al| al == own))
        .collect();
    if candidates.is_empty() {
        debug!("no artifact left to give");
        return false;
    }
    let artifact = candidates[seed % candidates.len()];

    let mut gift = make_artifact(artifact.base_type(), artifact, ctx);
    gift.enchantment = gift.enchantment.max(0);
    if gift.is_cursed() {
        gift.uncurse();
    }
    gift.erosion_proof = true;
    if let Some(skill) = ctx.catalog.stats(gift.otype).map(|s| s.skill) {
        if let Some(hero) = you.hero_mut() {
            hero.skills.unrestrict(skill);
        }
    }
    let id = gift.id;
    ctx.field.place_object(you.position, gift);
    at_your_feet(you, "An object", ctx);
    god_voice(you, gods, own, Some("Use my gift wisely!"), ctx);

    let level = you.level;
    let timeout = ctx.rnz(300 + 50 * nart as i32, level);
    let moves = ctx.field.moves;
    if let Some(hero) = you.hero_mut() {
        hero.gifts += 1;
        hero.last_gift_turn = moves;
        hero.prayer_timeout = timeout;
    }
    ctx.emit(Event::GiftGranted { item: id, artifact: true });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::{test_hero, test_monster};
    use crate::combatant::Attribute;
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{ItemId, StaticCatalog, otyp};
    use crate::pray::StandardPantheon;
    use crate::world::{Field, Position};
    use nh_rng::ScriptedRng;

    fn corpse(species: Species, age: u64) -> Item {
        let cat = StaticCatalog::standard();
        let mut item = Item::from_catalog(ItemId(900), otyp::CORPSE, &cat).with_corpse_of(species);
        item.age = age;
        item
    }

    fn temple(alignment: AlignmentType) -> Field {
        let mut field = Field::new();
        field.moves = 5000;
        field.set_terrain(Position::default(), Terrain::Altar(Altar::new(alignment)));
        field
    }

    fn big_corpse(level: u8) -> Item {
        let mut species = bestiary::owlbear();
        species.level = level;
        corpse(species, 4990)
    }

    #[test]
    fn test_corpse_value_goes_stale() {
        assert_eq!(corpse_value(&corpse(bestiary::owlbear(), 100), 120), 6);
        assert_eq!(corpse_value(&corpse(bestiary::owlbear(), 100), 151), 0);
        assert_eq!(corpse_value(&corpse(bestiary::acid_blob(), 0), 10_000), 2);
    }

    #[test]
    fn test_stale_corpse_is_left_alone() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let back = offer_sacrifice(&mut you, corpse(bestiary::owlbear(), 0), &gods, &mut ctx);
        drop(ctx);
        assert!(back.is_some());
        assert!(log.contains("Nothing happens."));
        assert_eq!(you.conduct.count(ConductKind::Gnostic), 1);
    }

    #[test]
    fn test_needs_an_altar() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = Field::new();
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        assert!(offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx).is_some());
        drop(ctx);
        assert!(log.contains("You are not standing on an altar."));
        assert_eq!(you.conduct.count(ConductKind::Gnostic), 0);
    }

    #[test]
    fn test_no_gift_still_burns_a_seed_and_brings_luck() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::AltarGift, [3, 0]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        assert!(offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx).is_none());
        drop(ctx);
        assert_eq!(rng.draws_on(RngChannel::AltarGift).count(), 2);
        assert_eq!(you.hero().map(|h| h.luck), Some(1));
        assert!(log.contains("Your sacrifice is consumed in a burst of flame!"));
        assert!(log.contains("You glimpse a four-leaf clover at your feet."));
    }

    #[test]
    fn test_gift_is_an_unclaimed_artifact() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::AltarGift, [0, 0]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        let events = std::mem::take(&mut ctx.events);
        drop(ctx);
        let floor = field.objects_at(Position::default());
        assert_eq!(floor.len(), 1);
        assert_eq!(floor[0].artifact, Some(Artifact::VorpalBlade));
        assert!(floor[0].erosion_proof);
        assert!(field.artifact_exists(Artifact::VorpalBlade));
        assert!(log.contains("Use my gift wisely!"));
        let hero = you.hero().map(|h| (h.gifts, h.last_gift_turn, h.prayer_timeout));
        assert!(matches!(hero, Some((1, 5000, t)) if t > 0));
        assert!(events.iter().any(|e| matches!(e, Event::GiftGranted { artifact: true, .. })));
    }

    #[test]
    fn test_big_offering_mollifies() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = 3;
            hero.luck = -2;
        }
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(23), &gods, &mut ctx);
        drop(ctx);
        assert_eq!(you.hero().map(|h| (h.god_anger, h.luck)), Some((0, 0)));
        assert!(log.contains("Odin seems mollified."));
    }

    #[test]
    fn test_small_offering_is_inadequate() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.god_anger = 3;
        }
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        drop(ctx);
        assert_eq!(you.hero().map(|h| h.god_anger), Some(3));
        assert!(log.contains("You have a feeling of inadequacy."));
    }

    #[test]
    fn test_partial_absolution() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        you.alignment.record = -5;
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        drop(ctx);
        assert_eq!(you.alignment.record, 0);
        assert!(log.contains("You feel partially absolved."));
    }

    #[test]
    fn test_offering_shortens_the_timeout() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.prayer_timeout = 500;
        }
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(7), &gods, &mut ctx);
        drop(ctx);
        assert_eq!(you.hero().map(|h| h.prayer_timeout), Some(400));
        assert!(log.contains("You have a hopeful feeling."));
    }

    #[test]
    fn test_angry_god_means_conversion() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Lawful);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        you.alignment.record = -1;
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        assert!(offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx).is_none());
        drop(ctx);
        assert_eq!(you.alignment.kind, AlignmentType::Lawful);
        let hero = you.hero().map(|h| (h.converted, h.luck, h.prayer_timeout));
        assert_eq!(hero, Some((true, -3, 300)));
        assert!(log.contains("Tyr accepts your allegiance."));
    }

    #[test]
    fn test_altar_changes_hands() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::AltarConvert, [7]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Lawful);
        let mut priest = test_monster(bestiary::aligned_priest());
        if let Some(traits) = priest.monster_traits_mut() {
            traits.peaceful = true;
            traits.duty = Duty::Priest(AlignmentType::Lawful);
        }
        field.bystanders.push(priest);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        let events = std::mem::take(&mut ctx.events);
        drop(ctx);
        let altar = field.altar_at(Position::default()).map(|a| a.alignment);
        assert_eq!(altar, Some(AlignmentType::Neutral));
        assert_eq!(you.hero().map(|h| h.luck), Some(1));
        assert!(log.contains("The altar glows gray."));
        assert!(events.contains(&Event::AltarConverted { alignment: AlignmentType::Neutral }));
        assert!(events.iter().any(|e| matches!(e, Event::PriestAngered { .. })));
    }

    #[test]
    fn test_failed_altar_claim_costs_luck() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::AltarConvert, [2]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Chaotic);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        drop(ctx);
        assert_eq!(field.altar_at(Position::default()).map(|a| a.alignment), Some(AlignmentType::Chaotic));
        assert_eq!(you.hero().map(|h| h.luck), Some(-1));
        assert!(log.contains("Unluckily, you feel the power of Odin decrease."));
    }

    #[test]
    fn test_own_race_stains_the_altar() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [0]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        assert!(offer_sacrifice(&mut you, corpse(bestiary::human(), 4990), &gods, &mut ctx).is_none());
        drop(ctx);
        assert!(log.contains("You'll regret this infamous offense!"));
        assert!(log.contains("The altar is stained with human blood."));
        assert_eq!(field.altar_at(Position::default()).map(|a| a.alignment), Some(AlignmentType::Chaotic));
        assert_eq!(you.alignment.record, 5);
        assert_eq!(you.hero().map(|h| (h.god_anger, h.luck)), Some((3, -5)));
        assert_eq!(you.attributes.get(Attribute::Wisdom), 9);
    }

    #[test]
    fn test_unicorn_of_the_altar_insults_it() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::GodAnger, [0]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let back = offer_sacrifice(&mut you, corpse(bestiary::gray_unicorn(), 4990), &gods, &mut ctx);
        drop(ctx);
        assert!(back.is_some());
        assert!(log.contains("Such an action is an insult to balance!"));
        assert_eq!(you.hero().map(|h| h.god_anger), Some(1));
    }

    #[test]
    fn test_cross_aligned_unicorn_pleases() {
        let mut rng = ScriptedRng::new(1).with(RngChannel::AltarGift, [5, 0]);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = temple(AlignmentType::Neutral);
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        offer_sacrifice(&mut you, corpse(bestiary::white_unicorn(), 4990), &gods, &mut ctx);
        drop(ctx);
        assert!(log.contains("You feel appropriately neutral."));
        assert_eq!(you.alignment.record, 15);
    }

    #[test]
    fn test_high_temple_cannot_be_claimed() {
        let mut rng = ScriptedRng::new(1);
        let cat = StaticCatalog::standard();
        let mut log = MessageLog::new();
        let opts = RulesOptions::default();
        let mut field = Field::new();
        field.moves = 5000;
        let sanctum = Altar {
            alignment: AlignmentType::Unaligned,
            shrine: true,
            sanctum: true,
        };
        field.set_terrain(Position::default(), Terrain::Altar(sanctum));
        let gods = StandardPantheon::new();
        let mut you = test_hero();
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let back = offer_sacrifice(&mut you, big_corpse(5), &gods, &mut ctx);
        drop(ctx);
        assert!(back.is_some());
        assert!(log.contains("You feel the air around you grow charged..."));
        assert!(log.contains("You dare desecrate my High Temple!"));
    }
}
