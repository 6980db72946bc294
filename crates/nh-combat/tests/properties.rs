//! Property-based tests for combat and prayer invariants.
//!
//! Run with: cargo test -p nh-combat --test properties

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use nh_combat::combat::{AttackOutcome, CombatContext, Event, resolve_attack};
use nh_combat::combatant::{
    AlignmentType, Attributes, Combatant, CombatantId, EquipSlot, Hero, Race, Role, SkillLevel, Skills,
    Status, WeaponSkill,
};
use nh_combat::consts::STRIDENT;
use nh_combat::monster::bestiary;
use nh_combat::object::{Item, ItemId, StaticCatalog, otyp};
use nh_combat::pray::{Trouble, diagnose, favor_tier};
use nh_combat::world::{Altar, Field};
use nh_combat::{ChannelRng, MessageLog, RngChannel, RulesOptions, ScriptedRng};

fn valkyrie() -> Combatant {
    let mut hero = Hero::new(Role::Valkyrie, Race::Human, AlignmentType::Neutral);
    hero.skills = Skills::new().with(WeaponSkill::LongSword, SkillLevel::Basic, SkillLevel::Expert);
    hero.prayer_timeout = 0;
    let mut you = Combatant::player(CombatantId(0), "Brunhilda", hero, bestiary::human(), 5, 40);
    you.attributes = Attributes::new([16, 10, 10, 12, 16, 10]);
    you.alignment.record = 10;
    you
}

fn armed_valkyrie(cat: &StaticCatalog) -> Combatant {
    let mut you = valkyrie();
    you.equipment
        .equip(EquipSlot::Weapon, Item::from_catalog(ItemId(100), otyp::LONG_SWORD, cat))
        .unwrap();
    you
}

fn foe(pick: usize) -> Combatant {
    let species = match pick % 5 {
        0 => bestiary::jackal(),
        1 => bestiary::owlbear(),
        2 => bestiary::hill_orc(),
        3 => bestiary::giant_spider(),
        _ => bestiary::mummy(),
    };
    let hp = (i32::from(species.level) + 1) * 5;
    Combatant::monster(CombatantId(1), species, hp)
}

/// One round from a fresh random stream: the outcome, both hit point totals
/// and everything narrated
fn one_round(seed: u64, pick: usize, hero_attacks: bool) -> (AttackOutcome, i32, i32, Vec<String>) {
    let cat = StaticCatalog::standard();
    let opts = RulesOptions::default();
    let mut log = MessageLog::new();
    let mut field = Field::new();
    let mut rng = ChannelRng::new(seed);
    let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

    let mut you = armed_valkyrie(&cat);
    let mut them = foe(pick);
    let outcome = if hero_attacks {
        resolve_attack(&mut you, &mut them, &mut ctx)
    } else {
        resolve_attack(&mut them, &mut you, &mut ctx)
    };
    drop(ctx);
    let said = log.messages().iter().map(|m| m.text.clone()).collect();
    (outcome, you.hp.current(), them.hp.current(), said)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The same draws give the same fight.
    #[test]
    fn prop_attack_is_deterministic(seed in any::<u64>(), pick in 0usize..5, hero_attacks in any::<bool>()) {
        prop_assert_eq!(one_round(seed, pick, hero_attacks), one_round(seed, pick, hero_attacks));
    }

    /// Hit points stay within bounds, and zero means dead.
    #[test]
    fn prop_hp_stays_clamped(seed in any::<u64>(), pick in 0usize..5, rounds in 1usize..12) {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ChannelRng::new(seed);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut you = armed_valkyrie(&cat);
        let mut them = foe(pick);
        for round in 0..rounds {
            if round % 2 == 0 {
                resolve_attack(&mut you, &mut them, &mut ctx);
            } else {
                resolve_attack(&mut them, &mut you, &mut ctx);
            }
            for c in [&you, &them] {
                prop_assert!(c.hp.current() >= 0);
                prop_assert!(c.hp.current() <= c.hp.max());
                prop_assert!(c.hp.current() > 0 || c.is_dead());
            }
        }
    }

    /// A combatant dies at most once, however often it is struck.
    #[test]
    fn prop_no_double_death(seed in any::<u64>(), pick in 0usize..5) {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ChannelRng::new(seed);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut you = armed_valkyrie(&cat);
        you.hp.set_max(1000);
        you.hp.heal_full();
        let mut them = foe(pick);
        for _ in 0..60 {
            let outcome = resolve_attack(&mut you, &mut them, &mut ctx);
            if them.is_dead() {
                break;
            }
            prop_assert_ne!(outcome, AttackOutcome::Cancelled);
        }
        if them.is_dead() {
            prop_assert_eq!(resolve_attack(&mut you, &mut them, &mut ctx), AttackOutcome::Cancelled);
        }
        let deaths = ctx
            .events
            .iter()
            .filter(|e| matches!(e, Event::Killed { id, .. } if *id == them.id))
            .count();
        prop_assert!(deaths <= 1);
    }

    /// Blindness piles up but never past 127 turns.
    #[test]
    fn prop_blindness_saturates(doses in proptest::collection::vec(any::<u16>(), 1..20)) {
        let mut status = Status::new();
        for dose in doses {
            status.add_blindness(dose);
            prop_assert!(status.blinded <= 127);
        }
    }

    /// A major trouble always outranks a minor one.
    #[test]
    fn prop_major_trouble_first(hp in 1i32..=5, nutrition in 51i32..=150, confused in 0u16..10) {
        let cat = StaticCatalog::standard();
        let field = Field::new();
        let mut you = valkyrie();
        you.hp.set_current(hp);
        you.status.confused = confused;
        if let Some(hero) = you.hero_mut() {
            hero.nutrition = nutrition;
        }
        let worst = diagnose(&you, &field, &cat);
        prop_assert_eq!(worst, Some(Trouble::Hit));
        prop_assert!(worst.is_some_and(|t| t.is_major()));
    }

    /// More luck never means less help, for a hero in good standing.
    #[test]
    fn prop_favor_tier_monotonic_in_luck(
        low in -10i32..=10,
        raise in 0i32..=10,
        draw in 0u32..20,
        record in STRIDENT..40,
        altar in proptest::option::of(any::<bool>()),
    ) {
        let high = (low + raise).min(10);
        let altar = altar.map(|shrine| Altar { shrine, ..Altar::new(AlignmentType::Neutral) });
        let tier = |luck: i32| {
            let cat = StaticCatalog::standard();
            let opts = RulesOptions::default();
            let mut log = MessageLog::new();
            let mut field = Field::new();
            let mut rng = ScriptedRng::new(7).with(RngChannel::Main, [draw]);
            let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
            favor_tier(luck, record, altar, &mut ctx)
        };
        prop_assert!(tier(low) <= tier(high));
    }
}
