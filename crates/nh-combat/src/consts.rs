//! Shared numeric contracts

/// Attack slots per species
pub const NATTK: usize = 6;

/// Blindness counters saturate here
pub const MAX_BLIND: u16 = 127;

/// Longest slow a web attack can stack up
pub const MAX_WEB_SLOW: u16 = 50;

/// Cap on a pudding's split counter
pub const MAX_SPLIT_COUNT: u16 = u16::MAX;

/// Alignment record thresholds
pub const PIOUS: i32 = 20;
pub const DEVOUT: i32 = 14;
pub const FERVENT: i32 = 9;
pub const STRIDENT: i32 = 4;

/// Sacrifice value ceiling
pub const MAX_SACRIFICE_VALUE: i32 = 24;

/// Luck bounds before luck items
pub const LUCK_MAX: i32 = 10;
pub const LUCK_MIN: i32 = -10;
/// Luck bounds including a luckstone
pub const LUCK_MAX_BONUS: i32 = 13;

/// Erosion counters never go past this
pub const MAX_ERODE: u8 = 3;

/// Prayer timeout ceilings by trouble severity
pub const MAJOR_TROUBLE_TIMEOUT: i32 = 200;
pub const MINOR_TROUBLE_TIMEOUT: i32 = 100;

/// Hunger value the gods restore you to
pub const NOT_HUNGRY: i32 = 900;

/// Blindfold and blindness counters at or below this are ignored by prayer
pub const TRIVIAL_BLINDNESS: u16 = 1;

/// Near-death thresholds: `hp <= 5` or `hp * 7 <= max`
pub const LOW_HP_FLOOR: i32 = 5;
pub const LOW_HP_FRACTION: i32 = 7;

/// Fixed-point log2 of a positive integer, scaled by 1024
///
/// The integer part is the position of the top bit; the fraction is the
/// linear interpolation to the next power of two.
pub const fn ilog2_fixed(x: u32) -> i32 {
    if x == 0 {
        return 0;
    }
    let msb = 31 - x.leading_zeros();
    let base = 1u32 << msb;
    (1024 * msb + (((x - base) as u64 * 1024) >> msb) as u32) as i32
}

/// Alignment limit after `moves` turns
pub const fn align_limit(moves: u64) -> i32 {
    10 + (moves / 200) as i32
}
