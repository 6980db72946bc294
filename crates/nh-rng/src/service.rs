//! The random service seam.
//!
//! Only [`RngService::rn2`] is required; every other distribution is built
//! from it so scripted and seeded implementations consume draws identically.

use crate::RngChannel;

/// Channel-keyed random draws
pub trait RngService {
    /// Uniform value in `0..x`. Returns 0 when `x` is 0.
    fn rn2(&mut self, channel: RngChannel, x: u32) -> u32;

    /// Uniform value in `1..=x`. Returns 0 when `x` is 0.
    fn rnd(&mut self, channel: RngChannel, x: u32) -> u32 {
        if x == 0 {
            return 0;
        }
        self.rn2(channel, x) + 1
    }

    /// `rn2(x) + y`
    fn rn1(&mut self, channel: RngChannel, x: u32, y: i32) -> i32 {
        self.rn2(channel, x) as i32 + y
    }

    /// Sum of `n` dice with `x` sides
    fn dice(&mut self, channel: RngChannel, n: u32, x: u32) -> u32 {
        if x == 0 {
            return 0;
        }
        let mut total = n;
        for _ in 0..n {
            total += self.rn2(channel, x);
        }
        total
    }

    /// Luck-adjusted draw in `0..x`; good luck pulls toward 0
    fn rnl(&mut self, channel: RngChannel, x: u32, luck: i32) -> u32 {
        if x == 0 {
            return 0;
        }
        let mut i = self.rn2(channel, x) as i32;
        let adjustment = if x <= 15 {
            (luck.abs() + 1) / 3 * luck.signum()
        } else {
            luck
        };
        if adjustment != 0 && self.rn2(channel, 37 + adjustment.unsigned_abs()) != 0 {
            i = (i - adjustment).clamp(0, x as i32 - 1);
        }
        i as u32
    }

    /// Truncated geometric distribution, capped by experience level
    fn rne(&mut self, channel: RngChannel, x: u32, level: u32) -> u32 {
        let cap = if level < 15 { 5 } else { level / 3 };
        let mut tmp = 1;
        while tmp < cap && self.rn2(channel, x) == 0 {
            tmp += 1;
        }
        tmp
    }

    /// Wide log-symmetric spread around `i`
    fn rnz(&mut self, channel: RngChannel, i: i32, level: u32) -> i32 {
        let mut x = i64::from(i);
        let mut tmp = 1000 + i64::from(self.rn2(channel, 1000));
        tmp *= i64::from(self.rne(channel, 4, level));
        if self.rn2(channel, 2) != 0 {
            x = x * tmp / 1000;
        } else {
            x = x * 1000 / tmp;
        }
        x as i32
    }

    /// True with probability `1/n`
    fn one_in(&mut self, channel: RngChannel, n: u32) -> bool {
        self.rn2(channel, n) == 0
    }
}

impl<R: RngService + ?Sized> RngService for &mut R {
    fn rn2(&mut self, channel: RngChannel, x: u32) -> u32 {
        (**self).rn2(channel, x)
    }
}

impl<R: RngService + ?Sized> RngService for Box<R> {
    fn rn2(&mut self, channel: RngChannel, x: u32) -> u32 {
        (**self).rn2(channel, x)
    }
}
