//! Named random streams.
//!
//! Each subsystem draws from its own channel so that, for example, the
//! number of combat rolls made this turn never shifts which gift an altar
//! hands out.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// A named random stream
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumCount,
)]
#[repr(u8)]
pub enum RngChannel {
    /// General gameplay: combat rolls, remedies, object creation
    #[default]
    Main = 0,
    /// Response chosen by an angry deity
    GodAnger = 1,
    /// Prayer timeout reset after a successful prayer
    PrayerTimeout = 2,
    /// Sacrifice gifts
    AltarGift = 3,
    /// Converting a cross-aligned altar
    AltarConvert = 4,
    /// First divine protection grant
    FirstProtection = 5,
    /// Spellbook handed out by a pleased deity
    SpellbookGift = 6,
    /// Draws that only affect presentation
    Display = 7,
}

impl RngChannel {
    /// Stream index used to separate the channel's keystream
    pub const fn stream(self) -> u64 {
        self as u64
    }

    /// Array index for per-channel state
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_channel_indices_are_dense() {
        for (i, ch) in RngChannel::iter().enumerate() {
            assert_eq!(ch.index(), i);
        }
        assert_eq!(RngChannel::iter().count(), RngChannel::COUNT);
    }
}
