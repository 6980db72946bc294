//! Attribute scores (STR, INT, WIS, DEX, CON, CHA)
//!
//! Strength above 18 uses the 18/xx encoding: 19 is 18/01 and 118 is 18/**.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[repr(u8)]
pub enum Attribute {
    Strength = 0,
    Intelligence = 1,
    Wisdom = 2,
    Dexterity = 3,
    Constitution = 4,
    Charisma = 5,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Intelligence,
        Attribute::Wisdom,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Charisma,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// 18/xx strength as a plain number
pub const fn str18(x: i32) -> i32 {
    18 + x
}

/// Lowest and highest score a non-strength attribute can hold
const ATTR_MIN: i32 = 3;
const ATTR_MAX: i32 = 25;
const STR_MAX: i32 = 125;

/// Current and peak scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    current: [i32; 6],
    max: [i32; 6],
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new([10; 6])
    }
}

impl Attributes {
    pub const fn new(values: [i32; 6]) -> Self {
        Self {
            current: values,
            max: values,
        }
    }

    pub const fn get(&self, attr: Attribute) -> i32 {
        self.current[attr as usize]
    }

    pub const fn max(&self, attr: Attribute) -> i32 {
        self.max[attr as usize]
    }

    fn cap(attr: Attribute) -> i32 {
        if attr == Attribute::Strength {
            STR_MAX
        } else {
            ATTR_MAX
        }
    }

    /// Set the current score; raising it past the peak raises the peak
    pub fn set(&mut self, attr: Attribute, value: i32) {
        let value = value.clamp(ATTR_MIN, Self::cap(attr));
        self.current[attr.index()] = value;
        if value > self.max[attr.index()] {
            self.max[attr.index()] = value;
        }
    }

    /// Change the current score by `delta`. With `lower_max` a loss also
    /// drops the peak (permanent drain). Returns whether anything changed.
    pub fn adjust(&mut self, attr: Attribute, delta: i32, lower_max: bool) -> bool {
        let old = self.get(attr);
        let new = (old + delta).clamp(ATTR_MIN, Self::cap(attr));
        if new == old {
            return false;
        }
        self.current[attr.index()] = new;
        if delta > 0 && new > self.max[attr.index()] {
            self.max[attr.index()] = new;
        }
        if delta < 0 && lower_max {
            self.max[attr.index()] = (self.max[attr.index()] + delta).max(new);
        }
        true
    }

    /// Restore a drained attribute to its peak
    pub fn restore(&mut self, attr: Attribute) {
        self.current[attr.index()] = self.max[attr.index()];
    }

    /// Restore up to `amount` points of a drained attribute
    pub fn restore_by(&mut self, attr: Attribute, amount: i32) {
        let idx = attr.index();
        self.current[idx] = (self.current[idx] + amount).min(self.max[idx]);
    }

    /// Any attribute below its peak
    pub fn any_drained(&self) -> bool {
        Attribute::ALL
            .iter()
            .any(|a| self.current[a.index()] < self.max[a.index()])
    }

    /// To-hit bonus from strength and dexterity (abon). Low-level heroes get
    /// a +1 nudge.
    pub fn hit_bonus(&self, level: u8) -> i32 {
        let str = self.get(Attribute::Strength);
        let dex = self.get(Attribute::Dexterity);
        let mut sbon = if str < 6 {
            -2
        } else if str < 8 {
            -1
        } else if str < 17 {
            0
        } else if str <= str18(50) {
            1
        } else if str < str18(100) {
            2
        } else {
            3
        };
        if level < 3 {
            sbon += 1;
        }
        if dex < 4 {
            sbon - 3
        } else if dex < 6 {
            sbon - 2
        } else if dex < 8 {
            sbon - 1
        } else if dex < 14 {
            sbon
        } else {
            sbon + dex - 14
        }
    }

    /// Damage bonus from strength (dbon)
    pub fn damage_bonus(&self) -> i32 {
        let str = self.get(Attribute::Strength);
        if str < 6 {
            -1
        } else if str < 16 {
            0
        } else if str < 18 {
            1
        } else if str == 18 {
            2
        } else if str <= str18(75) {
            3
        } else if str <= str18(90) {
            4
        } else if str < str18(100) {
            5
        } else {
            6
        }
    }
}
