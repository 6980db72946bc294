//! Melee combat resolution
//!
//! An attack enters through [`resolve_attack`] (or [`resolve_throw`] for a
//! thrown object). The to-hit roll is made in [`tohit`]; a hit is assembled
//! in [`hmon`], typed effects are applied by the resolver, and the
//! defender's passive response runs last against the attacker.
//!
//! Nothing here owns state. Side effects that need the wider game (monster
//! creation, level changes) come back as [`Event`]s on the context.

mod attack;
mod attack_type;
mod context;
mod damage_type;
pub mod erosion;
mod hit;
mod hmon;
mod passive;
mod potion;
mod resolver;
mod tohit;
pub mod weapon;

use serde::{Deserialize, Serialize};

pub use attack::{Attack, AttackSet, attk_protection, empty_attacks, is_protected, magic_negation};
pub use attack_type::AttackType;
pub use context::{CombatContext, Event, MAX_ATTACK_DEPTH};
pub use damage_type::DamageType;
pub use hit::{resolve_attack, resolve_throw};
pub use hmon::{Strike, strike};
pub use passive::{passive_item_damage, trigger_passive};
pub(crate) use passive::lose_level;
pub use resolver::{Damage, apply_typed_damage, engulf, explode_on};
pub use tohit::{knight_caitiff, roll_to_hit};

/// How an attack ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The defender got out of the way before any roll
    Dodged,
    /// The attack never started
    Cancelled,
    Missed,
    Hit { defender_died: bool },
    /// Something other than a normal hit happened (a summoned pet, the
    /// attacker exploding)
    Special,
}

impl AttackOutcome {
    pub const fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit { .. })
    }

    pub const fn killed(&self) -> bool {
        matches!(self, AttackOutcome::Hit { defender_died: true })
    }
}
