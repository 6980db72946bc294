//! Rust, corrosion, burning and rot inflicted during a fight

use crate::combatant::{Combatant, EquipSlot};
use crate::consts::MAX_ERODE;
use crate::message::MsgChannel;
use crate::object::{ErodeResult, ErosionKind, Item};

use super::CombatContext;

/// "your" or "the jackal's"
pub fn possessive(owner: &Combatant) -> String {
    if owner.is_player() {
        "your".to_string()
    } else {
        format!("{}'s", owner.the_name())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Erode one item, announcing the result. Grease absorbs the hit when
/// `grease_protects` is set. Returns true if the item was affected in any
/// way (eroded or saved by grease).
pub fn erode_obj(
    item: &mut Item,
    whose: &str,
    kind: ErosionKind,
    grease_protects: bool,
    ctx: &mut CombatContext<'_>,
) -> bool {
    let name = capitalize(&format!("{whose} {}", item.xname(ctx.catalog)));

    if grease_protects && item.greased {
        ctx.say(MsgChannel::Info, format!("{name} {} protected by grease.", item.is_are()));
        if ctx.one_in(2) {
            ctx.say(MsgChannel::ItemLoss, "The grease dissolves.");
            item.greased = false;
        }
        return true;
    }
    if !item.material.suffers(kind) || (item.erosion_proof && item.proof_known) {
        ctx.say(MsgChannel::CombatImmune, format!("{name} {} not affected.", item.is_are()));
        return false;
    }
    if item.erosion_proof || (item.is_blessed() && ctx.rnl(4, 0) == 0) {
        ctx.say(
            MsgChannel::CombatImmune,
            format!("Somehow, {} {} not affected.", name.to_lowercase(), item.is_are()),
        );
        if item.erosion_proof {
            item.proof_known = true;
        }
        return false;
    }

    let before = item.erosion(kind);
    match item.erode(kind) {
        ErodeResult::Eroded => {
            let adverb = if before + 1 == MAX_ERODE {
                " completely"
            } else if before > 0 {
                " further"
            } else {
                ""
            };
            let verb = kind.verb();
            let verb = if item.quantity > 1 {
                verb.trim_end_matches('s')
            } else {
                verb
            };
            ctx.say(MsgChannel::ItemLoss, format!("{name} {verb}{adverb}!"));
            true
        }
        ErodeResult::AtLimit => {
            ctx.say(
                MsgChannel::Info,
                format!(
                    "{name} {} completely {}.",
                    if item.quantity > 1 { "look" } else { "looks" },
                    kind.adjective()
                ),
            );
            false
        }
        ErodeResult::Protected | ErodeResult::Immune => false,
    }
}

fn erode_slot(
    target: &mut Combatant,
    slot: EquipSlot,
    whose: &str,
    kind: ErosionKind,
    ctx: &mut CombatContext<'_>,
) -> Option<bool> {
    let item = target.equipment.get_mut(slot)?;
    Some(erode_obj(item, whose, kind, true, ctx))
}

/// Damage a random piece of worn armor. The body roll always ends the
/// search, so this terminates even on a naked target.
pub fn hurtarmor(target: &mut Combatant, kind: ErosionKind, ctx: &mut CombatContext<'_>) {
    let whose = possessive(target);
    loop {
        let slot = match ctx.rn2(5) {
            0 => EquipSlot::Helmet,
            1 => {
                for slot in [EquipSlot::Cloak, EquipSlot::Body, EquipSlot::Shirt] {
                    if erode_slot(target, slot, &whose, kind, ctx).is_some() {
                        break;
                    }
                }
                return;
            }
            2 => EquipSlot::Shield,
            3 => EquipSlot::Gloves,
            _ => EquipSlot::Boots,
        };
        if erode_slot(target, slot, &whose, kind, ctx) == Some(true) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::test_support::test_hero;
    use crate::config::RulesOptions;
    use crate::message::MessageLog;
    use crate::object::{ItemId, StaticCatalog, otyp};
    use crate::world::Field;
    use nh_rng::{RngChannel, ScriptedRng};

    #[test]
    fn test_erode_messages() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut sword = Item::from_catalog(ItemId(1), otyp::LONG_SWORD, &cat);
        assert!(erode_obj(&mut sword, "your", ErosionKind::Rust, true, &mut ctx));
        assert!(erode_obj(&mut sword, "your", ErosionKind::Rust, true, &mut ctx));
        assert!(erode_obj(&mut sword, "your", ErosionKind::Rust, true, &mut ctx));
        assert!(!erode_obj(&mut sword, "your", ErosionKind::Rust, true, &mut ctx));
        assert!(!erode_obj(&mut sword, "your", ErosionKind::Burn, true, &mut ctx));
        drop(ctx);
        let lines: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            lines,
            [
                "Your long sword rusts!",
                "Your long sword rusts further!",
                "Your long sword rusts completely!",
                "Your long sword looks completely rusty.",
                "Your long sword is not affected.",
            ]
        );
    }

    #[test]
    fn test_grease_absorbs_erosion() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        // grease survives the first 1-in-2 roll
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut sword = Item::from_catalog(ItemId(1), otyp::LONG_SWORD, &cat);
        sword.greased = true;
        assert!(erode_obj(&mut sword, "your", ErosionKind::Rust, true, &mut ctx));
        assert_eq!(sword.erosion1, 0);
        assert!(sword.greased);
    }

    #[test]
    fn test_hurtarmor_on_naked_target_terminates() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0, 2, 3, 4, 1]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hurtarmor(&mut hero, ErosionKind::Rust, &mut ctx);
        drop(ctx);
        assert!(log.is_empty());
    }

    #[test]
    fn test_hurtarmor_hits_helmet() {
        let cat = StaticCatalog::standard();
        let opts = RulesOptions::default();
        let mut log = MessageLog::new();
        let mut field = Field::new();
        let mut rng = ScriptedRng::new(5).with(RngChannel::Main, [0]);
        let mut ctx = CombatContext::new(&mut rng, &cat, &mut log, &opts, &mut field);

        let mut hero = test_hero();
        hero.equipment
            .equip(EquipSlot::Helmet, Item::from_catalog(ItemId(9), otyp::HELMET, &cat))
            .unwrap();
        hurtarmor(&mut hero, ErosionKind::Rust, &mut ctx);
        assert_eq!(hero.equipment.get(EquipSlot::Helmet).map(|h| h.erosion1), Some(1));
    }
}
