// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::microgame::{Microgame, MicrogameRegistry};
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// MicrogameScheduler owns the play order of one session: a uniformly random
/// permutation of the full normal catalog followed by exactly one boss microgame
/// chosen uniformly at random.
///
/// The cursor never decreases; once past the last slot, [`Self::peek_next`]
/// returns `None` forever, signaling that the session is exhausted.
pub struct MicrogameScheduler {
    upcoming: VecDeque<Box<dyn Microgame>>,
    played: usize,
    total: usize,
}

impl MicrogameScheduler {
    pub fn new<R: Rng>(registry: &MicrogameRegistry, rng: &mut R) -> Self {
        let mut keys: Vec<usize> = (0..registry.normal_len()).collect();
        keys.shuffle(rng);
        let mut upcoming: VecDeque<Box<dyn Microgame>> = keys
            .into_iter()
            .map(|index| registry.instantiate_normal(index))
            .collect();

        if registry.boss_len() == 0 {
            // A data problem, not a fault; the session simply has no boss round.
            warn!("no boss microgames registered");
        } else {
            upcoming.push_back(registry.instantiate_boss(rng.gen_range(0..registry.boss_len())));
        }

        let total = upcoming.len();
        Self {
            upcoming,
            played: 0,
            total,
        }
    }

    /// Peek at the next unplayed microgame without consuming it.
    pub fn peek_next(&self) -> Option<&dyn Microgame> {
        self.upcoming.front().map(|game| game.as_ref())
    }

    /// Hands ownership of the next microgame to the caller and advances the
    /// cursor. The caller is responsible for making it current and starting it.
    pub fn advance(&mut self) -> Option<Box<dyn Microgame>> {
        let game = self.upcoming.pop_front();
        if game.is_some() {
            self.played += 1;
        }
        game
    }

    /// How many microgames have been consumed so far.
    pub fn played(&self) -> usize {
        self.played
    }

    /// Queue length at construction (normal catalog plus the boss).
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.upcoming.is_empty()
    }
}
