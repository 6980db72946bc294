//! nh-combat: melee combat resolution and divine intervention
//!
//! The crate owns no global state. Every operation takes the combatants it
//! touches, a [`combat::CombatContext`] carrying the injected collaborators
//! (random service, object catalog, message log, rules options), and the
//! [`world::Field`] the fight happens on.
//!
//! Two engines live here:
//! - [`combat`]: to-hit, damage assembly, the typed damage resolver and
//!   passive counterattacks.
//! - [`pray`]: trouble diagnosis, the favor/anger state machine, sacrifice
//!   and crowning.

pub mod combat;
pub mod combatant;
pub mod config;
pub mod consts;
pub mod error;
pub mod message;
pub mod monster;
pub mod object;
pub mod pray;
pub mod world;

pub use config::{PuddingSplit, RulesOptions};
pub use error::{InventoryError, OptionsError};
pub use message::{Message, MessageLog, MsgChannel};

pub use nh_rng::{ChannelRng, RngChannel, RngService, ScriptedRng};
