//! Temporary conditions
//!
//! Counters are turns remaining; zero means the condition is off. Mutate them
//! through the methods here so the caps hold.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::consts::{MAX_BLIND, MAX_WEB_SLOW};

/// What a combatant is stuck in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Snare {
    Pit,
    Web,
    BearTrap,
    Lava,
    /// Frozen into a block of ice
    Ice,
    /// Buried ball and chain
    Buried,
}

/// Temporary status flags and counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub stunned: u16,
    pub confused: u16,
    pub blinded: u16,
    pub hallucinating: u16,
    /// Frozen in place (paralysis); counts down
    pub frozen: u16,
    pub slowed: u16,
    /// Cream or venom on the face; part of `blinded`
    pub creamed: u16,
    pub fleeing: bool,
    /// 0 with `fleeing` set means flee until something changes
    pub flee_timer: u16,
    pub sleeping: bool,
    /// False while helpless for any reason
    pub can_move: bool,
    /// Cancelled monsters lose their special attacks
    pub cancelled: bool,
    pub trapped: Option<Snare>,
}

impl Status {
    pub fn new() -> Self {
        Self {
            can_move: true,
            ..Self::default()
        }
    }

    pub fn can_see(&self) -> bool {
        self.blinded == 0
    }

    /// Add blindness, saturating at the cap
    pub fn add_blindness(&mut self, turns: u16) {
        self.blinded = self.blinded.saturating_add(turns).min(MAX_BLIND);
    }

    pub fn add_stun(&mut self, turns: u16) {
        self.stunned = self.stunned.saturating_add(turns);
    }

    pub fn add_confusion(&mut self, turns: u16) {
        self.confused = self.confused.saturating_add(turns);
    }

    /// Web slow stacks up to a cap
    pub fn add_web_slow(&mut self, turns: u16) {
        self.slowed = self.slowed.saturating_add(turns).min(MAX_WEB_SLOW);
    }

    /// Paralyse for `turns`; longer paralysis wins
    pub fn paralyze(&mut self, turns: u16) {
        if turns == 0 {
            return;
        }
        self.can_move = false;
        self.frozen = self.frozen.max(turns);
    }

    pub fn fall_asleep(&mut self, turns: u16) {
        self.sleeping = true;
        self.paralyze(turns);
    }

    /// Cannot fight back at the moment
    pub fn is_helpless(&self) -> bool {
        !self.can_move || self.sleeping
    }

    /// Wake up, ending sleep but not paralysis
    pub fn wake(&mut self) {
        self.sleeping = false;
        if self.frozen == 0 {
            self.can_move = true;
        }
    }

    /// Start fleeing. With `first`, an existing flee is kept as is.
    /// A zero timer means open-ended.
    pub fn flee(&mut self, timer: u16, first: bool) {
        if first && self.fleeing {
            return;
        }
        if !self.fleeing || self.flee_timer != 0 {
            if timer == 0 {
                self.flee_timer = 0;
            } else {
                self.flee_timer = self.flee_timer.max(timer);
            }
        }
        self.fleeing = true;
    }

    /// Clear every counter the golden glow cures
    pub fn cure_sight(&mut self) {
        self.blinded = 0;
        self.creamed = 0;
    }
}
