// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::ops::{Add, AddAssign};

/// A discrete simulation tick.
///
/// The semantic unit is fixed by the caller: microseconds for the DCQCN
/// reaction-point model, nanoseconds for the calendar-queue scheduler.
/// `Tick` never wraps; arithmetic saturates at `u64::MAX` rather than
/// panicking, since a simulation horizon is always far below that bound.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, offset: u64) -> Self {
        Self(self.0.saturating_add(offset))
    }

    /// An ascending range of ticks `[self, end)`, for driving a simulation
    /// loop one tick at a time.
    #[inline]
    pub fn range_to(self, end: Tick) -> impl Iterator<Item = Tick> {
        (self.0..end.0).map(Tick)
    }
}

impl fmt::Debug for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.saturating_add(rhs)
    }
}

impl AddAssign<u64> for Tick {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        *self = *self + rhs;
    }
}

impl From<u64> for Tick {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_instead_of_wrapping() {
        let t = Tick::new(u64::MAX - 1);
        assert_eq!((t + 10).get(), u64::MAX);
    }

    #[test]
    fn range_to_is_half_open() {
        let ticks: Vec<u64> = Tick::new(3).range_to(Tick::new(6)).map(Tick::get).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
    }
}
