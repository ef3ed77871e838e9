// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use arrayvec::ArrayString;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::time::{SystemTime, UNIX_EPOCH};

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ArenaId(pub NonZeroU32);

impl ArenaId {
    pub fn generate() -> Self {
        Self(generate_id())
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub NonZeroU32);

impl PlayerId {
    pub fn generate() -> Self {
        Self(generate_id())
    }
}

const DAY_BITS: u32 = 10;

/// Generates a random 32 bit id.
/// To check if unique, only need to check against items created in the last 24 hours (and items must not
/// be able to live more than 2.8 years).
pub fn generate_id() -> NonZeroU32 {
    let unix_days = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() / (24 * 60 * 60))
        .unwrap_or(0) as u32;
    let mut r: u32 = rand::thread_rng().gen();
    if r == 0 {
        // Preserve non-zero guarantee.
        r = 1;
    }
    // Top 10 bits are from day, bottom.
    NonZeroU32::new(unix_days.wrapping_shl(32 - DAY_BITS) | (r & ((1 << (32 - DAY_BITS)) - 1)))
        .unwrap()
}

/// An alias, e.g. "mrbig", is NOT a real name.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerAlias(pub ArrayString<12>);

impl PlayerAlias {
    /// Truncates to capacity on a character boundary.
    pub fn new(s: &str) -> Self {
        let s = s.trim();
        let mut end = s.len().min(Self(ArrayString::new()).0.capacity());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        Self(ArrayString::from(&s[..end]).unwrap())
    }
}

impl Display for PlayerAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_truncates() {
        assert_eq!(PlayerAlias::new("  mrbig "), PlayerAlias::new("mrbig"));
        assert_eq!(PlayerAlias::new("exactlytwelve").0.as_str(), "exactlytwelv");
        // Must not split a multi-byte character.
        assert!(PlayerAlias::new("ééééééééééé").0.len() <= 12);
    }

    #[test]
    fn ids_are_non_zero() {
        for _ in 0..100 {
            assert_ne!(generate_id().get(), 0);
        }
    }
}
