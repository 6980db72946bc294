//! End-to-end scenarios with scripted dice.

#![allow(clippy::unwrap_used)]

use nh_combat::combat::{AttackOutcome, CombatContext, Event, Strike, resolve_attack, resolve_throw, strike};
use nh_combat::combatant::{
    AlignmentType, Attributes, Combatant, CombatantId, DeathCause, EquipSlot, Hero, Race, Role, SkillLevel,
    Skills, WeaponSkill,
};
use nh_combat::monster::bestiary;
use nh_combat::object::{Item, ItemId, StaticCatalog, otyp};
use nh_combat::pray::{PrayerType, StandardPantheon, Trouble, diagnose, pleased, pray, prayer_done};
use nh_combat::world::{Altar, Field, Position, Terrain};
use nh_combat::{MessageLog, RngChannel, RulesOptions, ScriptedRng};

fn valkyrie() -> Combatant {
    let mut hero = Hero::new(Role::Valkyrie, Race::Human, AlignmentType::Neutral);
    hero.skills = Skills::new()
        .with(WeaponSkill::LongSword, SkillLevel::Basic, SkillLevel::Expert)
        .with(WeaponSkill::TwoHandedSword, SkillLevel::Skilled, SkillLevel::Expert);
    hero.prayer_timeout = 0;
    let mut you = Combatant::player(CombatantId(0), "Brunhilda", hero, bestiary::human(), 5, 40);
    you.attributes = Attributes::new([16, 10, 10, 12, 16, 10]);
    you.alignment.record = 10;
    you
}

fn monster(species: nh_combat::monster::Species, hp: i32) -> Combatant {
    Combatant::monster(CombatantId(1), species, hp)
}

/// Scenario 1: a hit takes exactly the damage it computed
#[test]
fn weapon_hit_costs_exactly_its_damage() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [5]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    let mut owlbear = monster(bestiary::owlbear(), 200);
    let sword = Item::from_catalog(ItemId(4), otyp::LONG_SWORD, &cat);
    let mut blow = Strike::wielded(Some(sword), EquipSlot::Weapon, 10);
    assert!(strike(&mut you, &mut owlbear, &mut blow, &mut ctx));
    assert!(blow.damage > 0);
    assert_eq!(owlbear.hp.current(), 200 - blow.damage.max(0));
}

/// Scenario 2: plain iron goes straight through a shade
#[test]
fn shade_ignores_plain_iron() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [7]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    let mut shade = monster(bestiary::shade(), 60);
    let sword = Item::from_catalog(ItemId(4), otyp::LONG_SWORD, &cat);
    let mut blow = Strike::wielded(Some(sword), EquipSlot::Weapon, 10);
    assert!(strike(&mut you, &mut shade, &mut blow, &mut ctx));
    assert_eq!(shade.hp.current(), 60);
    drop(ctx);
    assert!(log.contains("Your attack passes harmlessly through the shade."));
}

/// Scenario 3: a thrown cockatrice corpse petrifies whatever it hits
#[test]
fn thrown_cockatrice_corpse_petrifies() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [0]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    let mut owlbear = monster(bestiary::owlbear(), 500);
    let corpse = Item::from_catalog(ItemId(9), otyp::CORPSE, &cat).with_corpse_of(bestiary::cockatrice());
    let (outcome, _) = resolve_throw(&mut you, &mut owlbear, corpse, &mut ctx);
    assert_eq!(outcome, AttackOutcome::Hit { defender_died: true });
    assert_eq!(owlbear.fate, Some(DeathCause::Petrified));
    let events = std::mem::take(&mut ctx.events);
    drop(ctx);
    assert!(log.contains("The owlbear turns to stone!"));
    assert!(events.iter().any(|e| matches!(e, Event::Killed { cause: DeathCause::Petrified, .. })));
}

/// Scenario 4: praying too soon raises the timeout and fixes nothing
#[test]
fn praying_too_soon() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ScriptedRng::new(11).with(RngChannel::GodAnger, [0]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
    let gods = StandardPantheon::new();

    let mut you = valkyrie();
    you.status.stunned = 4;
    if let Some(hero) = you.hero_mut() {
        hero.prayer_timeout = 150;
    }
    let state = pray(&mut you, &gods, &mut ctx).unwrap();
    assert_eq!(state.kind, PrayerType::TooSoon);
    assert_eq!(state.trouble, Some(Trouble::Stunned));
    prayer_done(&mut you, &gods, &state, &mut ctx);
    assert_eq!(diagnose(&you, ctx.field, ctx.catalog), Some(Trouble::Stunned));
    let hero = you.hero().unwrap();
    assert_eq!(hero.luck, -3);
    assert!(hero.prayer_timeout > 0);
    assert_eq!(hero.god_anger, 1);
}

/// Scenario 5: a fix-all answer leaves nothing to diagnose
#[test]
fn fix_all_clears_near_death() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let shrine = Altar {
        shrine: true,
        ..Altar::new(AlignmentType::Neutral)
    };
    field.set_terrain(Position::default(), Terrain::Altar(shrine));
    // tier roll: rn1(luck + 4, 1) lands on 4
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [3]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
    let gods = StandardPantheon::new();

    let mut you = valkyrie();
    you.hp.set_current(2);
    you.status.confused = 6;
    let state = pray(&mut you, &gods, &mut ctx).unwrap();
    assert_eq!(state.kind, PrayerType::Favor);
    assert_eq!(state.trouble, Some(Trouble::Hit));
    pleased(&mut you, &gods, &state, &mut ctx);
    assert_eq!(diagnose(&you, ctx.field, ctx.catalog), None);
    assert_eq!(diagnose(&you, ctx.field, ctx.catalog), None);
    assert_eq!(you.hp.current(), you.hp.max());
}

fn two_handed_blow(break_roll: u32) -> (Combatant, Vec<Event>) {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    // d12 damage, then the shatter roll, then no flight
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [11, break_roll, 3]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    let mut orc = monster(bestiary::hill_orc(), 300);
    orc.equipment
        .equip(EquipSlot::Weapon, Item::from_catalog(ItemId(20), otyp::LONG_SWORD, &cat))
        .unwrap();
    let greatsword = Item::from_catalog(ItemId(4), otyp::TWO_HANDED_SWORD, &cat);
    let mut blow = Strike::wielded(Some(greatsword), EquipSlot::Weapon, 2);
    strike(&mut you, &mut orc, &mut blow, &mut ctx);
    let events = std::mem::take(&mut ctx.events);
    (orc, events)
}

/// Scenario 6: a skilled two-handed blow on a natural 2 can shatter the
/// defender's weapon, half the time
#[test]
fn two_handed_blow_shatters_weapon() {
    let (orc, events) = two_handed_blow(99);
    assert!(orc.weapon().is_none());
    assert!(events.contains(&Event::ItemDestroyed {
        owner: orc.id,
        item: ItemId(20),
    }));

    let (orc, events) = two_handed_blow(49);
    assert_eq!(orc.weapon().map(|w| w.id), Some(ItemId(20)));
    assert!(!events.iter().any(|e| matches!(e, Event::ItemDestroyed { .. })));
}

fn deaths_of(events: &[Event], who: CombatantId) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Killed { id, .. } if *id == who))
        .count()
}

/// Scenario 7: a poisoned dagger that would kill twice over, by the poison
/// and by the blow, kills once
#[test]
fn deadly_poison_and_lethal_blow_kill_once() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    // every roll low: the blow lands and the poison is deadly
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [0; 32]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    let mut dagger = Item::from_catalog(ItemId(4), otyp::DAGGER, &cat);
    dagger.poisoned = true;
    you.equipment.equip(EquipSlot::Weapon, dagger).unwrap();
    let mut jackal = monster(bestiary::jackal(), 1);

    let outcome = resolve_attack(&mut you, &mut jackal, &mut ctx);
    assert_eq!(outcome, AttackOutcome::Hit { defender_died: true });
    assert_eq!(deaths_of(&ctx.events, jackal.id), 1);
    assert_eq!(jackal.fate, Some(DeathCause::Poisoned));
    assert_eq!(jackal.hp.current(), 0);

    // nothing more happens to a corpse
    assert_eq!(resolve_attack(&mut you, &mut jackal, &mut ctx), AttackOutcome::Cancelled);
    assert_eq!(deaths_of(&ctx.events, jackal.id), 1);
    drop(ctx);
    assert!(log.contains("The poison was deadly..."));
    assert!(!log.contains("You kill the jackal!"));
}

/// Scenario 8: every attack in an owlbear's round could finish a hero on one
/// hit point; the round stops at the first
#[test]
fn round_stops_at_the_first_lethal_attack() {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ScriptedRng::new(11).with(RngChannel::Main, [0; 32]);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = valkyrie();
    you.hp.set_current(1);
    let mut owlbear = monster(bestiary::owlbear(), 60);

    let outcome = resolve_attack(&mut owlbear, &mut you, &mut ctx);
    assert_eq!(outcome, AttackOutcome::Hit { defender_died: true });
    assert_eq!(deaths_of(&ctx.events, you.id), 1);
    assert!(you.is_dead());
    assert_eq!(you.hp.current(), 0);
    drop(ctx);
    let hits = log.on_channel(nh_combat::MsgChannel::CombatHit).count();
    assert_eq!(hits, 1);
    assert_eq!(log.on_channel(nh_combat::MsgChannel::Fatal).count(), 1);
}
