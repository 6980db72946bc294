//! What is wrong with the hero, worst first, and how a god puts it right

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, error};

use crate::combat::{CombatContext, Event};
use crate::combatant::{
    Attribute, CombatRole, Combatant, Encumbrance, EquipSlot, HitPoints, HungerState, Snare,
};
use crate::consts::{LOW_HP_FLOOR, NOT_HUNGRY, TRIVIAL_BLINDNESS};
use crate::message::MsgChannel;
use crate::monster::{MonsterSize, SpeciesFlags, SpeciesKind};
use crate::object::{Item, ItemId, ObjectCatalog, ObjectClass, ObjectTraits};
use crate::world::Field;

/// A condition prayer can fix. Earlier variants are worse; everything up to
/// [`Trouble::Blindfold`] is major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum Trouble {
    Stoned,
    Slimed,
    Strangled,
    Lava,
    Sick,
    Starving,
    /// Near death
    Hit,
    Lycanthrope,
    Collapsing,
    Stuck,
    Levitation,
    Hands,
    Blindfold,

    Punished,
    Fumbling,
    Cursed,
    Saddle,
    Blind,
    /// An attribute below its peak
    Poisoned,
    WoundedLegs,
    Hungry,
    Stunned,
    Confused,
    Hallucinating,
}

impl Trouble {
    pub const fn is_major(&self) -> bool {
        (*self as u8) <= (Trouble::Blindfold as u8)
    }

    pub const fn is_minor(&self) -> bool {
        !self.is_major()
    }
}

/// Where one of the hero's items sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemSpot {
    Worn(EquipSlot),
    Carried(ItemId),
    /// On the ridden steed
    Saddle,
}

/// Worn slots in the order a cursed item there matters
const CURSE_PRIORITY: [EquipSlot; 11] = [
    EquipSlot::Gloves,
    EquipSlot::Shield,
    EquipSlot::Cloak,
    EquipSlot::Body,
    EquipSlot::Helmet,
    EquipSlot::Boots,
    EquipSlot::Shirt,
    EquipSlot::Amulet,
    EquipSlot::LeftRing,
    EquipSlot::RightRing,
    EquipSlot::Blindfold,
];

fn cursed_in(you: &Combatant, slot: EquipSlot) -> bool {
    you.equipment.get(slot).is_some_and(|o| o.is_cursed())
}

fn cursed_with(you: &Combatant, slot: EquipSlot, traits: ObjectTraits, catalog: &dyn ObjectCatalog) -> bool {
    you.equipment
        .get(slot)
        .is_some_and(|o| o.is_cursed() && catalog.lookup(o.otype).traits.contains(traits))
}

/// A cursed weapon stuck to the hero's hand
pub(crate) fn welded(you: &Combatant, catalog: &dyn ObjectCatalog) -> bool {
    you.equipment.get(EquipSlot::Weapon).is_some_and(|w| {
        w.is_cursed() && (w.class == ObjectClass::Weapon || catalog.lookup(w.otype).is_weptool())
    })
}

fn bimanual_weapon(you: &Combatant, catalog: &dyn ObjectCatalog) -> bool {
    you.equipment
        .get(EquipSlot::Weapon)
        .is_some_and(|w| catalog.lookup(w.otype).is_bimanual())
}

/// At least one hand is not held by a welded weapon
fn free_hand(you: &Combatant, catalog: &dyn ObjectCatalog) -> bool {
    !welded(you, catalog)
        || (!bimanual_weapon(you, catalog) && !cursed_in(you, EquipSlot::Shield))
}

fn handless(you: &Combatant) -> bool {
    !you.species.has_hands() || you.hero().is_some_and(|h| h.handless)
}

/// What keeps a ring with `traits` on its finger: a welded weapon in that
/// hand, cursed gloves, or the ring's own curse
fn stuck_ring(
    you: &Combatant,
    ring_slot: EquipSlot,
    traits: ObjectTraits,
    catalog: &dyn ObjectCatalog,
) -> Option<EquipSlot> {
    let ring = you.equipment.get(ring_slot)?;
    if !catalog.lookup(ring.otype).traits.contains(traits) {
        return None;
    }
    if welded(you, catalog) && (ring_slot == EquipSlot::RightRing || bimanual_weapon(you, catalog)) {
        return Some(EquipSlot::Weapon);
    }
    if cursed_in(you, EquipSlot::Gloves) {
        return Some(EquipSlot::Gloves);
    }
    ring.is_cursed().then_some(ring_slot)
}

fn stuck_ring_either(you: &Combatant, traits: ObjectTraits, catalog: &dyn ObjectCatalog) -> Option<EquipSlot> {
    EquipSlot::RINGS
        .iter()
        .find_map(|&slot| stuck_ring(you, slot, traits, catalog))
}

/// The cursed item that most gets in the hero's way
pub fn worst_cursed_item(you: &Combatant, catalog: &dyn ObjectCatalog) -> Option<ItemSpot> {
    let hero = you.hero()?;
    let has = |item: &Item, traits: ObjectTraits| {
        catalog.lookup(item.otype).traits.contains(traits)
    };

    if hero.encumbrance >= Encumbrance::Strained {
        if let Some(stone) = you
            .inventory
            .find(|o| o.is_cursed() && has(o, ObjectTraits::LOADSTONE))
        {
            return Some(ItemSpot::Carried(stone.id));
        }
    }
    let weapon_welded = welded(you, catalog);
    // a welded weapon blocks the right ring and, two-handed, the shield
    if weapon_welded
        && (!you.equipment.is_empty(EquipSlot::RightRing)
            || (you.species.size < MonsterSize::Huge && bimanual_weapon(you, catalog)))
    {
        return Some(ItemSpot::Worn(EquipSlot::Weapon));
    }
    if let Some(slot) = CURSE_PRIORITY.iter().find(|&&slot| cursed_in(you, slot)) {
        return Some(ItemSpot::Worn(*slot));
    }
    if weapon_welded {
        return Some(ItemSpot::Worn(EquipSlot::Weapon));
    }
    if hero.two_weapon && cursed_in(you, EquipSlot::SwapWeapon) {
        return Some(ItemSpot::Worn(EquipSlot::SwapWeapon));
    }
    you.inventory
        .find(|o| o.is_cursed() && (has(o, ObjectTraits::LOADSTONE) || has(o, ObjectTraits::CONFERS_LUCK)))
        .map(|o| ItemSpot::Carried(o.id))
}

/// Every trouble the hero has right now, worst first. Monsters never have
/// any.
pub fn troubles(you: &Combatant, field: &Field, catalog: &dyn ObjectCatalog) -> Vec<Trouble> {
    let Some(hero) = you.hero() else {
        return Vec::new();
    };
    let ails = &hero.afflictions;
    let status = &you.status;

    let str_drain = you.attributes.max(Attribute::Strength) - you.attributes.get(Attribute::Strength);
    let no_hands = handless(you);
    let hands_busy = no_hands || !free_hand(you, catalog);
    let stuck_hands = hands_busy
        && (welded(you, catalog) || (hero.is_polymorphed() && no_hands && !hero.unchanging));
    let saddle_cursed = hero
        .steed
        .as_ref()
        .and_then(|s| s.saddle.as_ref())
        .is_some_and(|s| s.is_cursed());

    let checks = [
        (ails.stoned > 0, Trouble::Stoned),
        (ails.slimed > 0, Trouble::Slimed),
        (ails.strangled > 0, Trouble::Strangled),
        (status.trapped == Some(Snare::Lava), Trouble::Lava),
        (ails.sick > 0, Trouble::Sick),
        (hero.hunger() >= HungerState::Weak, Trouble::Starving),
        (you.hp.is_low(), Trouble::Hit),
        (ails.lycanthrope.is_some(), Trouble::Lycanthrope),
        (hero.encumbrance >= Encumbrance::Overtaxed && str_drain > 3, Trouble::Collapsing),
        (
            field.is_boxed_in(you.position, catalog) && !you.species.has(SpeciesFlags::PASSES_WALLS),
            Trouble::Stuck,
        ),
        (
            cursed_with(you, EquipSlot::Boots, ObjectTraits::LEVITATION, catalog)
                || stuck_ring_either(you, ObjectTraits::LEVITATION, catalog).is_some(),
            Trouble::Levitation,
        ),
        (stuck_hands, Trouble::Hands),
        (cursed_with(you, EquipSlot::Blindfold, ObjectTraits::BLINDFOLD, catalog), Trouble::Blindfold),
        (ails.punished, Trouble::Punished),
        (
            cursed_with(you, EquipSlot::Gloves, ObjectTraits::FUMBLING, catalog)
                || cursed_with(you, EquipSlot::Boots, ObjectTraits::FUMBLING, catalog),
            Trouble::Fumbling,
        ),
        (worst_cursed_item(you, catalog).is_some(), Trouble::Cursed),
        (saddle_cursed, Trouble::Saddle),
        (status.blinded > TRIVIAL_BLINDNESS && you.species.has_eyes(), Trouble::Blind),
        (you.attributes.any_drained(), Trouble::Poisoned),
        (ails.wounded_legs > 0 && !hero.is_riding(), Trouble::WoundedLegs),
        // starving already covers hungry
        (hero.hunger() == HungerState::Hungry, Trouble::Hungry),
        (status.stunned > 0, Trouble::Stunned),
        (status.confused > 0, Trouble::Confused),
        (status.hallucinating > 0, Trouble::Hallucinating),
    ];
    checks
        .into_iter()
        .filter_map(|(present, trouble)| present.then_some(trouble))
        .collect()
}

/// The hero's worst trouble
pub fn diagnose(you: &Combatant, field: &Field, catalog: &dyn ObjectCatalog) -> Option<Trouble> {
    troubles(you, field, catalog).into_iter().next()
}

pub(crate) fn item_mut(you: &mut Combatant, spot: ItemSpot) -> Option<&mut Item> {
    match spot {
        ItemSpot::Worn(slot) => you.equipment.get_mut(slot),
        ItemSpot::Carried(id) => you.inventory.get_mut(id),
        ItemSpot::Saddle => you
            .hero_mut()
            .and_then(|h| h.steed.as_mut())
            .and_then(|s| s.saddle.as_mut()),
    }
}

/// Every item the hero carries or wears, worn first
pub(crate) fn item_spots(you: &Combatant) -> Vec<ItemSpot> {
    you.equipment
        .iter()
        .map(|(slot, _)| ItemSpot::Worn(slot))
        .chain(you.inventory.iter().map(|o| ItemSpot::Carried(o.id)))
        .collect()
}

/// Lift the curse from one of the hero's items and say so
///
/// Logs and returns false when nothing is there to uncurse.
pub fn uncurse_and_announce(you: &mut Combatant, spot: ItemSpot, ctx: &mut CombatContext<'_>) -> bool {
    let sees = you.status.can_see();
    let steed = you
        .hero()
        .and_then(|h| h.steed.as_ref())
        .map(|s| s.name.clone());
    let Some(item) = item_mut(you, spot) else {
        error!(?spot, "nothing to uncurse");
        return false;
    };
    item.uncurse();
    if !sees {
        return true;
    }
    item.buc_known = true;
    let text = match spot {
        ItemSpot::Worn(EquipSlot::LeftRing) => "Your left ring softly glows amber.".to_string(),
        ItemSpot::Worn(EquipSlot::RightRing) => "Your right ring softly glows amber.".to_string(),
        ItemSpot::Saddle => {
            let owner = steed.unwrap_or_else(|| "your steed".to_string());
            let mut chars = owner.chars();
            let owner: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => owner,
            };
            format!("{owner}'s {} softly glow{} amber.", item.xname(ctx.catalog), item.verb_s())
        }
        _ => format!("{} softly glow{} amber.", item.cap_yname(ctx.catalog), item.verb_s()),
    };
    ctx.say(MsgChannel::ItemGain, text);
    true
}

/// Hit points of the hero's own body, wherever they are kept
pub(crate) fn natural_hp(you: &mut Combatant) -> &mut HitPoints {
    if let CombatRole::Player(hero) = &mut you.role {
        if let Some((_, hp)) = hero.original_form.as_mut() {
            return hp;
        }
    }
    &mut you.hp
}

/// Leave a polymorphed form. False when the hero was in their own shape.
pub(crate) fn return_to_natural_form(you: &mut Combatant, ctx: &mut CombatContext<'_>) -> bool {
    let Some(hero) = you.hero_mut() else {
        return false;
    };
    let Some((species, hp)) = hero.original_form.take() else {
        return false;
    };
    hero.handless = false;
    let race = hero.race.to_string().to_lowercase();
    you.species = species;
    you.hp = hp;
    ctx.say(MsgChannel::StatusBad, format!("You return to {race} form!"));
    true
}

fn fix_near_death(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::StatusHeal, "You feel much better.");
    if you.hero().is_some_and(|h| h.is_polymorphed()) {
        let gain = ctx.rnd_i(5);
        you.hp.raise_max(gain);
        if you.hp.max() <= LOW_HP_FLOOR {
            you.hp.set_max(LOW_HP_FLOOR + 1);
        }
        you.hp.heal_full();
    }
    let level = i32::from(you.level);
    let hp = natural_hp(you);
    if hp.max() < level * 5 + 11 {
        let gain = ctx.rnd_i(5);
        hp.raise_max(gain);
    }
    if hp.max() <= LOW_HP_FLOOR {
        hp.set_max(LOW_HP_FLOOR + 1);
    }
    hp.heal_full();
}

fn fix_hunger(you: &mut Combatant, ctx: &mut CombatContext<'_>) {
    ctx.say(MsgChannel::StatusHeal, "Your stomach feels content.");
    if let Some(hero) = you.hero_mut() {
        hero.nutrition = NOT_HUNGRY;
        hero.fainted = false;
    }
}

/// Cure one trouble, the way a pleased god does
pub fn fix_worst_trouble(you: &mut Combatant, trouble: Trouble, ctx: &mut CombatContext<'_>) {
    debug!(%trouble, "fixing trouble");
    let catalog = ctx.catalog;
    match trouble {
        Trouble::Stoned => {
            ctx.say(MsgChannel::StatusHeal, "You feel more limber.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.stoned = 0;
            }
        }
        Trouble::Slimed => {
            ctx.say(MsgChannel::StatusHeal, "The slime disappears.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.slimed = 0;
            }
        }
        Trouble::Strangled => {
            let strangling = you.equipment.get(EquipSlot::Amulet).is_some_and(|a| {
                catalog.lookup(a.otype).traits.contains(ObjectTraits::STRANGULATION)
            });
            if strangling {
                if let Some(amulet) = you.equipment.take(EquipSlot::Amulet) {
                    ctx.say(MsgChannel::ItemLoss, "Your amulet vanishes!");
                    ctx.emit(Event::ItemDestroyed {
                        owner: you.id,
                        item: amulet.id,
                    });
                }
            }
            ctx.say(MsgChannel::StatusHeal, "You can breathe again.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.strangled = 0;
            }
        }
        Trouble::Lava => {
            ctx.say(MsgChannel::StatusHeal, "You are back on solid ground.");
            you.status.trapped = None;
            ctx.emit(Event::Teleported { id: you.id });
        }
        Trouble::Starving => {
            you.attributes.adjust(Attribute::Strength, 1, false);
            fix_hunger(you, ctx);
        }
        Trouble::Hungry => fix_hunger(you, ctx),
        Trouble::Sick => {
            ctx.say(MsgChannel::StatusHeal, "You feel better.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.sick = 0;
                hero.afflictions.sickness = None;
            }
        }
        Trouble::Hit => fix_near_death(you, ctx),
        Trouble::Collapsing => {
            let drain = you.attributes.max(Attribute::Strength) - you.attributes.get(Attribute::Strength);
            let much = if drain > 6 { "much " } else { "" };
            ctx.say(MsgChannel::StatusHeal, format!("You feel {much}stronger."));
            you.attributes.restore(Attribute::Strength);
            if let Some(slot) = stuck_ring_either(you, ObjectTraits::SUSTAIN_ABILITY, catalog) {
                uncurse_and_announce(you, ItemSpot::Worn(slot), ctx);
            }
        }
        Trouble::Stuck => {
            ctx.say(MsgChannel::StatusHeal, "Your surroundings change.");
            ctx.emit(Event::Teleported { id: you.id });
        }
        Trouble::Levitation => {
            let slot = if cursed_with(you, EquipSlot::Boots, ObjectTraits::LEVITATION, catalog) {
                Some(EquipSlot::Boots)
            } else {
                stuck_ring_either(you, ObjectTraits::LEVITATION, catalog)
            };
            match slot {
                Some(slot) => {
                    uncurse_and_announce(you, ItemSpot::Worn(slot), ctx);
                }
                None => error!("levitation trouble with nothing to uncurse"),
            }
        }
        Trouble::Hands => {
            if welded(you, catalog) {
                uncurse_and_announce(you, ItemSpot::Worn(EquipSlot::Weapon), ctx);
                return;
            }
            let shifted = you.hero().is_some_and(|h| h.is_polymorphed() && !h.unchanging);
            if shifted && handless(you) {
                ctx.say(MsgChannel::StatusHeal, "Your shape becomes uncertain.");
                return_to_natural_form(you, ctx);
            }
            if handless(you) || !free_hand(you, catalog) {
                error!("couldn't cure hands");
            }
        }
        Trouble::Blindfold => {
            uncurse_and_announce(you, ItemSpot::Worn(EquipSlot::Blindfold), ctx);
        }
        Trouble::Lycanthrope => {
            ctx.say(MsgChannel::StatusHeal, "You feel purified.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.lycanthrope = None;
            }
        }
        Trouble::Punished => {
            ctx.say(MsgChannel::StatusHeal, "Your chain disappears.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.punished = false;
            }
        }
        Trouble::Fumbling => {
            let slot = [EquipSlot::Gloves, EquipSlot::Boots]
                .into_iter()
                .find(|&s| cursed_with(you, s, ObjectTraits::FUMBLING, catalog));
            match slot {
                Some(slot) => {
                    uncurse_and_announce(you, ItemSpot::Worn(slot), ctx);
                }
                None => error!("fumbling trouble with nothing to uncurse"),
            }
        }
        Trouble::Cursed => match worst_cursed_item(you, catalog) {
            Some(spot) => {
                uncurse_and_announce(you, spot, ctx);
            }
            None => error!("cursed trouble with nothing to uncurse"),
        },
        Trouble::Saddle => {
            uncurse_and_announce(you, ItemSpot::Saddle, ctx);
        }
        Trouble::Blind => {
            let text = if you.species.kind == SpeciesKind::FloatingEye {
                "Your eye feels better."
            } else {
                "Your eyes feel better."
            };
            ctx.say(MsgChannel::StatusHeal, text);
            you.status.creamed = 0;
            you.status.blinded = 0;
        }
        Trouble::Poisoned => {
            let text = if you.status.hallucinating > 0 {
                "There's a tiger in your tank."
            } else {
                "You feel in good health again."
            };
            ctx.say(MsgChannel::StatusGood, text);
            for attr in Attribute::ALL {
                you.attributes.restore(attr);
            }
        }
        Trouble::WoundedLegs => {
            ctx.say(MsgChannel::StatusHeal, "Your legs feel somewhat better.");
            if let Some(hero) = you.hero_mut() {
                hero.afflictions.wounded_legs = 0;
            }
        }
        Trouble::Stunned => {
            ctx.say(MsgChannel::StatusHeal, "You feel a bit steadier now.");
            you.status.stunned = 0;
        }
        Trouble::Confused => {
            ctx.say(MsgChannel::StatusHeal, "You feel less confused now.");
            you.status.confused = 0;
        }
        Trouble::Hallucinating => {
            ctx.say(MsgChannel::StatusHeal, "Looks like you are back in Kansas.");
            you.status.hallucinating = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::test_hero;
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::monster::bestiary;
    use crate::object::{BucStatus, StaticCatalog, otyp};
    use nh_rng::{RngChannel, ScriptedRng};

    fn open_floor(you: &Combatant) -> Field {
        let here = you.position;
        Field::with_floor(std::iter::once(here).chain(here.neighbors()))
    }

    fn cursed(id: u32, otype: crate::object::ObjectType, cat: &StaticCatalog) -> Item {
        Item::from_catalog(ItemId(id), otype, cat).with_buc(BucStatus::Cursed)
    }

    #[test]
    fn test_healthy_hero_has_no_trouble() {
        let cat = StaticCatalog::standard();
        let you = test_hero();
        assert_eq!(diagnose(&you, &open_floor(&you), &cat), None);
    }

    #[test]
    fn test_solid_rock_all_around_is_stuck() {
        let cat = StaticCatalog::standard();
        let you = test_hero();
        assert_eq!(diagnose(&you, &Field::new(), &cat), Some(Trouble::Stuck));
    }

    #[test]
    fn test_major_trouble_outranks_minor() {
        let cat = StaticCatalog::standard();
        let mut you = test_hero();
        you.hp.set_current(4);
        you.status.stunned = 3;
        if let Some(hero) = you.hero_mut() {
            hero.nutrition = 100;
        }
        let found = diagnose(&you, &open_floor(&you), &cat);
        assert_eq!(found, Some(Trouble::Hit));
        assert!(Trouble::Hit < Trouble::Hungry);
        assert!(Trouble::Blindfold.is_major());
        assert!(Trouble::Punished.is_minor());
    }

    #[test]
    fn test_petrification_beats_sickness() {
        let cat = StaticCatalog::standard();
        let mut you = test_hero();
        if let Some(hero) = you.hero_mut() {
            hero.afflictions.sick = 10;
            hero.afflictions.stoned = 5;
        }
        assert_eq!(diagnose(&you, &open_floor(&you), &cat), Some(Trouble::Stoned));
    }

    #[test]
    fn test_cursed_item_priority() {
        let cat = StaticCatalog::standard();
        let mut you = test_hero();
        you.equipment.equip(EquipSlot::Helmet, cursed(1, otyp::HELMET, &cat)).unwrap();
        you.equipment.equip(EquipSlot::Gloves, cursed(2, otyp::LEATHER_GLOVES, &cat)).unwrap();
        assert_eq!(worst_cursed_item(&you, &cat), Some(ItemSpot::Worn(EquipSlot::Gloves)));

        // a welded two-hander comes before everything worn
        you.equipment
            .equip(EquipSlot::Weapon, cursed(3, otyp::TWO_HANDED_SWORD, &cat))
            .unwrap();
        assert_eq!(worst_cursed_item(&you, &cat), Some(ItemSpot::Worn(EquipSlot::Weapon)));
    }

    #[test]
    fn test_cursed_luckstone_only_after_worn_items() {
        let cat = StaticCatalog::standard();
        let mut you = test_hero();
        you.inventory.add(cursed(4, otyp::LUCKSTONE, &cat)).unwrap();
        assert_eq!(worst_cursed_item(&you, &cat), Some(ItemSpot::Carried(ItemId(4))));
        you.equipment.equip(EquipSlot::Boots, cursed(5, otyp::LOW_BOOTS, &cat)).unwrap();
        assert_eq!(worst_cursed_item(&you, &cat), Some(ItemSpot::Worn(EquipSlot::Boots)));
        assert_eq!(diagnose(&you, &open_floor(&you), &cat), Some(Trouble::Cursed));
    }

    #[test]
    fn test_fumbling_and_levitation_gear() {
        let cat = StaticCatalog::standard();
        let mut you = test_hero();
        you.equipment
            .equip(EquipSlot::Gloves, cursed(6, otyp::GAUNTLETS_OF_FUMBLING, &cat))
            .unwrap();
        let field = open_floor(&you);
        assert_eq!(diagnose(&you, &field, &cat), Some(Trouble::Fumbling));

        // uncursed levitation ring held on by the cursed gauntlets
        you.equipment
            .equip(EquipSlot::LeftRing, Item::from_catalog(ItemId(7), otyp::RING_OF_LEVITATION, &cat))
            .unwrap();
        assert_eq!(diagnose(&you, &field, &cat), Some(Trouble::Levitation));
    }

    #[test]
    fn test_near_death_fix_clears_trouble() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        you.hp.set_current(3);
        fix_worst_trouble(&mut you, Trouble::Hit, &mut ctx);
        // max 40 already clears level 5's threshold of 36
        assert_eq!(you.hp.current(), 40);
        assert_eq!(you.hp.max(), 40);
        assert_eq!(diagnose(&you, ctx.field, &cat), None);
        drop(ctx);
        assert!(log.contains("You feel much better."));
    }

    #[test]
    fn test_near_death_raises_low_max() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3).with(RngChannel::Main, [2]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        you.hp.set_max(20);
        you.hp.set_current(1);
        fix_worst_trouble(&mut you, Trouble::Hit, &mut ctx);
        assert_eq!(you.hp.max(), 23);
        assert_eq!(you.hp.current(), 23);
    }

    #[test]
    fn test_strangulation_fix_destroys_amulet() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        you.equipment
            .equip(EquipSlot::Amulet, Item::from_catalog(ItemId(8), otyp::AMULET_OF_STRANGULATION, &cat))
            .unwrap();
        if let Some(hero) = you.hero_mut() {
            hero.afflictions.strangled = 5;
        }
        fix_worst_trouble(&mut you, Trouble::Strangled, &mut ctx);
        assert!(you.equipment.is_empty(EquipSlot::Amulet));
        assert!(ctx.events.contains(&Event::ItemDestroyed { owner: you.id, item: ItemId(8) }));
        drop(ctx);
        assert!(log.contains("Your amulet vanishes!"));
        assert!(log.contains("You can breathe again."));
    }

    #[test]
    fn test_uncurse_ring_names_the_hand() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        you.equipment.equip(EquipSlot::LeftRing, cursed(9, otyp::IRON_RING, &cat)).unwrap();
        fix_worst_trouble(&mut you, Trouble::Cursed, &mut ctx);
        let ring = you.equipment.get(EquipSlot::LeftRing).unwrap();
        assert!(!ring.is_cursed());
        assert!(ring.buc_known);
        assert!(!uncurse_and_announce(&mut you, ItemSpot::Worn(EquipSlot::Cloak), &mut ctx));
        drop(ctx);
        assert!(log.contains("Your left ring softly glows amber."));
    }

    #[test]
    fn test_handless_form_is_reverted() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3);

        let own = you.species.clone();
        you.species = bestiary::jackal();
        you.hp = HitPoints::new(8);
        if let Some(hero) = you.hero_mut() {
            hero.original_form = Some((own, HitPoints::new(40)));
        }
        assert_eq!(diagnose(&you, &field, &cat), Some(Trouble::Hands));

        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);
        fix_worst_trouble(&mut you, Trouble::Hands, &mut ctx);
        assert_eq!(you.species.name, "human");
        assert_eq!(you.hp.max(), 40);
        drop(ctx);
        assert!(log.contains("Your shape becomes uncertain."));
        assert!(log.contains("You return to human form!"));
        assert_eq!(diagnose(&you, &field, &cat), None);
    }

    #[test]
    fn test_starving_fix_feeds_and_strengthens() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut you = test_hero();
        let mut field = open_floor(&you);
        let mut rng = ScriptedRng::new(3);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        if let Some(hero) = you.hero_mut() {
            hero.nutrition = 20;
        }
        assert_eq!(diagnose(&you, ctx.field, &cat), Some(Trouble::Starving));
        fix_worst_trouble(&mut you, Trouble::Starving, &mut ctx);
        assert_eq!(you.hero().map(|h| h.nutrition), Some(NOT_HUNGRY));
        assert_eq!(you.attributes.get(Attribute::Strength), 17);
    }
}
