//! Collaborators threaded through one resolution step

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::RulesOptions;
use crate::combatant::{AlignmentType, Combatant, CombatantId, DeathCause};
use crate::message::{MessageLog, MsgChannel};
use crate::object::{ItemId, ObjectCatalog};
use crate::world::Field;
use nh_rng::{RngChannel, RngService};

/// Nesting limit for attacks launched from inside another attack (cleaves)
pub const MAX_ATTACK_DEPTH: u8 = 2;

/// Side effects the engines hand back to the game loop
///
/// Anything that needs machinery outside this crate (monster creation,
/// level changes, shop and temple bookkeeping) is reported here instead of
/// being performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Killed { id: CombatantId, cause: DeathCause },
    /// Teleported away at random
    Teleported { id: CombatantId },
    /// A demon answered the hero's call
    DemonSummoned,
    /// A deity sent a servant
    MinionSummoned { alignment: AlignmentType, hostile: bool },
    /// A pudding divided; the clone is in `Field::bystanders`
    Split { original: CombatantId, clone: CombatantId },
    ItemDestroyed { owner: CombatantId, item: ItemId },
    /// The town watch turned hostile
    GuardsAngered,
    PriestAngered { priest: CombatantId },
    /// A temple priest called down their god's wrath
    TempleGodWrath { priest: CombatantId },
    /// Knocked back one square
    Knockback { id: CombatantId },
    LevelLost { id: CombatantId },
    /// The hero's polymorphed form blew itself up
    HeroExploded,
    GiftGranted { item: ItemId, artifact: bool },
    Crowned,
    AltarConverted { alignment: AlignmentType },
    /// The defender swapped places with the hero
    Displaced { id: CombatantId },
    /// A cloud of stinking gas was released
    GasCloud { id: CombatantId },
    Polymorphed { id: CombatantId, into: String },
}

/// Everything an attack needs besides the two combatants
pub struct CombatContext<'a> {
    pub rng: &'a mut dyn RngService,
    pub catalog: &'a dyn ObjectCatalog,
    pub log: &'a mut MessageLog,
    pub options: &'a RulesOptions,
    pub field: &'a mut Field,
    /// Side effects collected during the step
    pub events: Vec<Event>,
    /// Set while resolving a cleave hit; conduct is not touched
    pub sub_attack: bool,
    pub depth: u8,
    /// An axe swing is already in progress
    pub(crate) axe_in_use: bool,
}

impl<'a> CombatContext<'a> {
    pub fn new(
        rng: &'a mut dyn RngService,
        catalog: &'a dyn ObjectCatalog,
        log: &'a mut MessageLog,
        options: &'a RulesOptions,
        field: &'a mut Field,
    ) -> Self {
        Self {
            rng,
            catalog,
            log,
            options,
            field,
            events: Vec::new(),
            sub_attack: false,
            depth: 0,
            axe_in_use: false,
        }
    }

    /// `0..x` on the main channel
    pub fn rn2(&mut self, x: u32) -> u32 {
        self.rn2_on(RngChannel::Main, x)
    }

    pub fn rn2_on(&mut self, channel: RngChannel, x: u32) -> u32 {
        let r = self.rng.rn2(channel, x);
        trace!(%channel, x, r, "rn2");
        r
    }

    /// `1..=x` on the main channel
    pub fn rnd(&mut self, x: u32) -> u32 {
        let r = self.rng.rnd(RngChannel::Main, x);
        trace!(x, r, "rnd");
        r
    }

    /// `rnd` taking a signed argument; non-positive sides roll nothing
    pub fn rnd_i(&mut self, x: i32) -> i32 {
        if x <= 0 {
            return 0;
        }
        self.rnd(x as u32) as i32
    }

    pub fn rn1(&mut self, x: u32, y: i32) -> i32 {
        let r = self.rng.rn1(RngChannel::Main, x, y);
        trace!(x, y, r, "rn1");
        r
    }

    pub fn dice(&mut self, n: u32, x: u32) -> i32 {
        let r = self.rng.dice(RngChannel::Main, n, x);
        trace!(n, x, r, "dice");
        r as i32
    }

    pub fn rnl(&mut self, x: u32, luck: i32) -> u32 {
        let r = self.rng.rnl(RngChannel::Main, x, luck);
        trace!(x, luck, r, "rnl");
        r
    }

    /// Wide spread around `i` on the main channel
    pub fn rnz(&mut self, i: i32, level: u8) -> i32 {
        self.rnz_on(RngChannel::Main, i, level)
    }

    pub fn rnz_on(&mut self, channel: RngChannel, i: i32, level: u8) -> i32 {
        let r = self.rng.rnz(channel, i, u32::from(level));
        trace!(%channel, i, r, "rnz");
        r
    }

    /// True with probability `1/n`
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    pub fn say(&mut self, channel: MsgChannel, text: impl Into<String>) {
        self.log.push(channel, text);
    }

    pub fn emit(&mut self, event: Event) {
        tracing::debug!(?event, "combat event");
        self.events.push(event);
    }

    /// Kill a combatant and report it. False if it was already dead, in
    /// which case no event is raised.
    pub fn kill(&mut self, victim: &mut Combatant, cause: DeathCause) -> bool {
        if !victim.kill(cause.clone()) {
            return false;
        }
        self.emit(Event::Killed {
            id: victim.id,
            cause,
        });
        true
    }

    /// Run `f` as a nested attack. Returns `None` once the nesting limit is
    /// reached.
    pub fn with_sub_attack<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.depth >= MAX_ATTACK_DEPTH {
            tracing::warn!(depth = self.depth, "sub-attack depth limit reached");
            return None;
        }
        let saved = self.sub_attack;
        self.sub_attack = true;
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        self.sub_attack = saved;
        Some(out)
    }
}

/// First-person or third-person phrasing for a line about `who`
pub(crate) fn pov(who: &Combatant, you: &str, them: impl FnOnce(&str) -> String) -> String {
    if who.is_player() {
        you.to_string()
    } else {
        them(&who.cap_name())
    }
}
