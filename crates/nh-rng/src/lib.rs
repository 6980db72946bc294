//! Named-channel random number service
//!
//! Game systems never hold a generator directly; they take an
//! [`RngService`] and name the [`RngChannel`] they draw from.

mod chacha;
mod channel;
mod scripted;
mod service;

pub use chacha::{ChannelRng, RngTraceEntry};
pub use channel::RngChannel;
pub use scripted::{ScriptedDraw, ScriptedRng};
pub use service::RngService;
