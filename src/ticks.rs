// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::*;
use std::time::Duration;

pub type TicksRepr = u16;

/// Ticks efficiently stores an unsigned duration, counted in heartbeats.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Ticks(pub TicksRepr);

impl Ticks {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const MAX: Self = Self(TicksRepr::MAX);
    /// Heartbeats per second.
    pub const RATE: Ticks = Ticks(20);
    pub const PERIOD: f32 = 1.0 / (Self::RATE.0 as f32);

    /// Converts whole seconds to a duration in ticks.
    pub const fn from_whole_secs(secs: TicksRepr) -> Self {
        Self(secs * Self::RATE.0)
    }

    /// Converts fractional seconds to a duration, which can be quite lossy.
    pub fn from_secs(secs: f32) -> Self {
        Self((secs * Self::RATE.0 as f32) as TicksRepr)
    }

    /// Returns the duration as fractional seconds.
    pub fn to_secs(self) -> f32 {
        self.0 as f32 * Self::PERIOD
    }

    /// Converts the duration in ticks to a formal `Duration`.
    pub fn to_duration(self) -> Duration {
        Duration::from_secs_f32(self.to_secs())
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn wrapping_add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Default for Ticks {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Ticks {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Ticks {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Ticks {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Ticks {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul for Ticks {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 * other.0)
    }
}

impl Div for Ticks {
    type Output = Self;

    fn div(self, other: Self) -> Self::Output {
        Self(self.0 / other.0)
    }
}

impl Rem for Ticks {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        Self(self.0 % rhs.0)
    }
}

impl fmt::Debug for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} seconds", self.to_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::Ticks;
    use std::time::Duration;

    #[test]
    fn conversions() {
        assert_eq!(Ticks::from_whole_secs(5), Ticks(5 * Ticks::RATE.0));
        assert_eq!(Ticks::from_secs(1.0), Ticks::RATE);
        assert_eq!(Ticks::RATE.to_secs(), 1.0);
        assert_eq!(Ticks::RATE.to_duration(), Duration::from_secs(1));
    }

    #[test]
    fn saturation() {
        assert_eq!(Ticks::ZERO.saturating_sub(Ticks::ONE), Ticks::ZERO);
        assert_eq!(Ticks::MAX.saturating_add(Ticks::ONE), Ticks::MAX);
        assert_eq!(Ticks::MAX.wrapping_add(Ticks::ONE), Ticks::ZERO);
    }
}
