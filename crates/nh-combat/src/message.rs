//! Channel-tagged narration
//!
//! The engines never format for a screen. They push text tagged with a
//! [`MsgChannel`] and the front end decides how (and whether) to show it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Category of a narration line
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum MsgChannel {
    /// Neutral information
    #[default]
    Info,
    /// An attack connected
    CombatHit,
    /// An attack missed or slipped off
    CombatMiss,
    /// The target shrugged the effect off
    CombatImmune,
    /// Something died
    CombatKill,
    /// A notable combat event (shatter, joust, backstab)
    CombatAlert,
    /// An item was lost, broken or used up
    ItemLoss,
    /// An item got better
    ItemGain,
    /// A status got worse
    StatusBad,
    /// A status got better
    StatusGood,
    /// Hit points restored
    StatusHeal,
    /// Alignment record went up
    AlignGood,
    /// Alignment record went down
    AlignBad,
    /// A deity is speaking
    Divine,
    /// Gameplay hint
    Hint,
    /// Something lethal is happening to the hero
    Fatal,
}

/// One narration line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub channel: MsgChannel,
    pub text: String,
}

/// Ordered narration buffer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, channel: MsgChannel, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(%channel, %text, "message");
        self.messages.push(Message { channel, text });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True if any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }

    /// Lines on one channel
    pub fn on_channel(&self, channel: MsgChannel) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.channel == channel)
    }

    /// Hand every buffered line to the caller
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}
