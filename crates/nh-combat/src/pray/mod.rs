//! Prayer, divine favor and sacrifice
//!
//! A prayer runs in two steps. [`pray`] settles what kind of prayer it is
//! (see [`can_pray`]) and leaves the hero helpless for three turns; the
//! game loop then calls [`prayer_done`] to hand down the answer. Offerings
//! go through [`offer_sacrifice`] instead.

mod deity;
mod favor;
mod sacrifice;
mod trouble;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::combat::CombatContext;
use crate::combatant::{AlignmentType, Combatant, ConductKind, DeathCause};
use crate::consts::{MAJOR_TROUBLE_TIMEOUT, MINOR_TROUBLE_TIMEOUT};
use crate::message::MsgChannel;
use crate::world::Altar;

pub use deity::{
    Pantheon, StandardPantheon, align_god_name, altar_wrath, angry_gods, god_title, god_voice, god_zaps_you,
    gods_angry, gods_upset, rndcurse, water_prayer,
};
pub use favor::{crown_hero, favor_tier, pleased};
pub use sacrifice::{corpse_value, offer_sacrifice};
pub use trouble::{
    ItemSpot, Trouble, diagnose, fix_worst_trouble, troubles, uncurse_and_announce, worst_cursed_item,
};

/// How a god will receive a prayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PrayerType {
    /// Prayed again before the timeout ran down
    TooSoon,
    Anger,
    /// Prayed on another god's altar in good standing
    Conversion,
    Favor,
    /// An undead hero called on a lawful (or sometimes neutral) god
    SmiteUndead,
}

/// Everything settled when the prayer began
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerState {
    /// The god prayed to: the altar's owner, or the hero's own god
    pub alignment: AlignmentType,
    pub trouble: Option<Trouble>,
    pub kind: PrayerType,
    /// The altar under the hero, if any
    pub altar: Option<Altar>,
}

/// Work out how a prayer would be answered. `None` when the hero cannot
/// bring themselves to pray at all.
pub fn can_pray(you: &Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) -> Option<PrayerState> {
    let Some(hero) = you.hero() else {
        warn!(who = %you.the_name(), "only the hero prays");
        return None;
    };
    let altar = ctx.field.altar_at(you.position);
    let own = you.alignment.kind;
    let alignment = altar.map_or(own, |a| a.alignment);

    if you.species.is_demon() && alignment != AlignmentType::Chaotic {
        let which = if alignment == AlignmentType::Neutral { "neutral" } else { "lawful" };
        ctx.say(
            MsgChannel::Info,
            format!("The very idea of praying to a {which} god is repugnant to you."),
        );
        return None;
    }

    let trouble = diagnose(you, ctx.field, ctx.catalog);
    let god = align_god_name(gods, you, alignment);
    ctx.say(MsgChannel::Info, format!("You begin praying to {god}."));

    let record = you.alignment.record;
    let standing = if own.is_opposite(alignment) {
        -record
    } else if own != alignment {
        record / 2
    } else {
        record
    };
    let patience = match trouble {
        Some(t) if t.is_major() => MAJOR_TROUBLE_TIMEOUT,
        Some(_) => MINOR_TROUBLE_TIMEOUT,
        None => 0,
    };

    let mut kind = if hero.prayer_timeout > patience {
        PrayerType::TooSoon
    } else if you.luck(ctx.catalog) < 0 || hero.god_anger > 0 || standing < 0 {
        PrayerType::Anger
    } else if altar.is_some() && own != alignment {
        PrayerType::Conversion
    } else {
        PrayerType::Favor
    };

    if you.species.is_undead()
        && !ctx.field.in_gehennom
        && (alignment == AlignmentType::Lawful || (alignment == AlignmentType::Neutral && ctx.rn2(10) == 0))
    {
        kind = PrayerType::SmiteUndead;
    }

    debug!(%kind, ?trouble, %alignment, standing, "prayer evaluated");
    Some(PrayerState {
        alignment,
        trouble,
        kind,
        altar,
    })
}

/// Begin praying. The hero is helpless until [`prayer_done`] runs.
pub fn pray(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) -> Option<PrayerState> {
    let state = can_pray(you, gods, ctx)?;
    you.conduct.violate(ConductKind::Gnostic);

    if state.kind == PrayerType::Favor && !ctx.field.in_gehennom {
        if you.status.can_see() {
            ctx.say(MsgChannel::StatusGood, "You are surrounded by a shimmering light.");
        }
        if let Some(hero) = you.hero_mut() {
            hero.invulnerable = true;
        }
    }
    you.status.paralyze(3);
    Some(state)
}

/// The god answers
pub fn prayer_done(you: &mut Combatant, gods: &dyn Pantheon, state: &PrayerState, ctx: &mut CombatContext<'_>) {
    let own = you.alignment.kind;
    if let Some(hero) = you.hero_mut() {
        hero.invulnerable = false;
    }
    let foreign_altar = state.altar.is_some() && own != state.alignment;

    if state.kind == PrayerType::SmiteUndead {
        let words = if state.alignment == AlignmentType::Lawful {
            "Vile creature, thou durst call upon me?"
        } else {
            "Walk no more, perversion of nature!"
        };
        god_voice(you, gods, state.alignment, Some(words), ctx);
        ctx.say(MsgChannel::StatusBad, "You feel like you are falling apart.");
        trouble::return_to_natural_form(you, ctx);
        let damage = ctx.rnd_i(20);
        if you.hp.damage(damage) {
            ctx.kill(you, DeathCause::Killed("a residual undead turning effect".into()));
        }
        return;
    }

    if ctx.field.in_gehennom {
        let god = align_god_name(gods, you, state.alignment);
        ctx.say(
            MsgChannel::AlignBad,
            format!("Since you are in Gehennom, {god} won't help you."),
        );
        let record = you.alignment.record;
        let luck = you.luck(ctx.catalog);
        if record <= 0 || ctx.rnl(record as u32, luck) != 0 {
            angry_gods(you, gods, own, ctx);
        }
        return;
    }

    match state.kind {
        PrayerType::TooSoon => {
            if foreign_altar {
                water_prayer(you, false, ctx);
            }
            prayed_too_soon(you, gods, ctx);
        }
        PrayerType::Anger => {
            if foreign_altar {
                water_prayer(you, false, ctx);
            }
            angry_gods(you, gods, own, ctx);
        }
        PrayerType::Conversion => {
            // cursing water on another god's altar costs the favor
            if water_prayer(you, false, ctx) {
                prayed_too_soon(you, gods, ctx);
            } else {
                pleased(you, gods, state, ctx);
            }
        }
        PrayerType::Favor => {
            if state.altar.is_some() {
                water_prayer(you, true, ctx);
            }
            pleased(you, gods, state, ctx);
        }
        PrayerType::SmiteUndead => {}
    }
}

fn prayed_too_soon(you: &mut Combatant, gods: &dyn Pantheon, ctx: &mut CombatContext<'_>) {
    let extra = ctx.rnz(250, you.level);
    if let Some(hero) = you.hero_mut() {
        hero.prayer_timeout += extra;
        hero.change_luck(-3);
    }
    let own = you.alignment.kind;
    gods_upset(you, gods, own, ctx);
}
