//! Scripted draws for deterministic scenarios.

use std::collections::VecDeque;

use strum::EnumCount;

use crate::{ChannelRng, RngChannel, RngService};

/// A draw taken from a [`ScriptedRng`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedDraw {
    pub channel: RngChannel,
    pub arg: u32,
    pub result: u32,
    /// False when the value came from the fallback generator
    pub scripted: bool,
}

/// Replays queued `rn2` results per channel
///
/// Queued values are raw `rn2` results: to make `rnd(20)` come up 10, queue
/// 9. A value that does not fit the requested modulus is clamped to `x - 1`.
/// Once a channel's queue is empty, draws fall through to a seeded
/// [`ChannelRng`], so a script only needs to pin the draws a test cares about.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    queues: Vec<VecDeque<u32>>,
    fallback: ChannelRng,
    log: Vec<ScriptedDraw>,
}

impl ScriptedRng {
    pub fn new(seed: u64) -> Self {
        Self {
            queues: vec![VecDeque::new(); RngChannel::COUNT],
            fallback: ChannelRng::new(seed),
            log: Vec::new(),
        }
    }

    /// Queue raw `rn2` results on a channel
    pub fn push(&mut self, channel: RngChannel, values: impl IntoIterator<Item = u32>) -> &mut Self {
        self.queues[channel.index()].extend(values);
        self
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, channel: RngChannel, values: impl IntoIterator<Item = u32>) -> Self {
        self.push(channel, values);
        self
    }

    /// Scripted values not yet consumed on a channel
    pub fn remaining(&self, channel: RngChannel) -> usize {
        self.queues[channel.index()].len()
    }

    /// Every draw taken so far, in order
    pub fn draws(&self) -> &[ScriptedDraw] {
        &self.log
    }

    /// Draws taken on one channel
    pub fn draws_on(&self, channel: RngChannel) -> impl Iterator<Item = &ScriptedDraw> {
        self.log.iter().filter(move |d| d.channel == channel)
    }
}

impl RngService for ScriptedRng {
    fn rn2(&mut self, channel: RngChannel, x: u32) -> u32 {
        if x == 0 {
            return 0;
        }
        let (result, scripted) = match self.queues[channel.index()].pop_front() {
            Some(v) => (v.min(x - 1), true),
            None => (self.fallback.rn2(channel, x), false),
        };
        self.log.push(ScriptedDraw {
            channel,
            arg: x,
            result,
            scripted,
        });
        result
    }
}
