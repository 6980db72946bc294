//! Alignment and the alignment record

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::align_limit;

/// Alignment type. `Unaligned` belongs to Moloch and his altars.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AlignmentType {
    Lawful,
    #[default]
    Neutral,
    Chaotic,
    Unaligned,
}

impl AlignmentType {
    /// Numeric value: 1, 0, -1; unaligned counts as -128
    pub const fn value(&self) -> i32 {
        match self {
            AlignmentType::Lawful => 1,
            AlignmentType::Neutral => 0,
            AlignmentType::Chaotic => -1,
            AlignmentType::Unaligned => -128,
        }
    }

    /// Alignment of a species' signed alignment score
    pub const fn from_sign(v: i32) -> Self {
        match v {
            1.. => AlignmentType::Lawful,
            0 => AlignmentType::Neutral,
            _ => AlignmentType::Chaotic,
        }
    }

    /// Lawful against chaotic
    pub const fn is_opposite(&self, other: AlignmentType) -> bool {
        matches!(
            (self, other),
            (AlignmentType::Lawful, AlignmentType::Chaotic)
                | (AlignmentType::Chaotic, AlignmentType::Lawful)
        )
    }

    pub const fn adjective(&self) -> &'static str {
        match self {
            AlignmentType::Lawful => "lawful",
            AlignmentType::Neutral => "neutral",
            AlignmentType::Chaotic => "chaotic",
            AlignmentType::Unaligned => "unaligned",
        }
    }
}

/// Alignment type plus record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub kind: AlignmentType,
    pub record: i32,
}

impl Alignment {
    pub const fn new(kind: AlignmentType) -> Self {
        Self { kind, record: 0 }
    }

    pub const fn with_record(kind: AlignmentType, record: i32) -> Self {
        Self { kind, record }
    }

    /// Adjust the record (adjalign). Gains are capped by the alignment limit
    /// for the current turn; losses are not. Returns true when a loss was
    /// recorded.
    pub fn adjust(&mut self, delta: i32, moves: u64) -> bool {
        let new = self.record.saturating_add(delta);
        if delta < 0 {
            if new < self.record {
                self.record = new;
                return true;
            }
        } else if new > self.record {
            self.record = new.min(align_limit(moves));
        }
        false
    }

    /// The deity is angry with anyone whose record went negative
    pub const fn god_is_angry(&self) -> bool {
        self.record < 0
    }
}
