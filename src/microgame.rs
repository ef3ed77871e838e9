// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::collaborator::{ArenaMap, PlayerDelegate, WorldHandle};
use crate::id::{PlayerAlias, PlayerId};
use crate::points::PointHolder;
use crate::ticks::Ticks;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Points awarded to each winner unless a microgame overrides them.
pub const DEFAULT_RECOMPENSE_POINTS: u32 = 10;

/// Classification of a microgame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Level {
    Normal,
    Boss,
}

/// Borrowed view of the arena handed to microgame callbacks, so concrete
/// microgames never reach for globals.
pub struct GameContext<'a> {
    pub world: &'a WorldHandle,
    pub map: &'a dyn ArenaMap,
    pub delegate: &'a dyn PlayerDelegate,
    pub roster: &'a HashMap<PlayerId, PlayerAlias>,
    pub points: &'a PointHolder,
}

/// The contract every concrete microgame satisfies. Concrete sub-games are
/// external plug-ins; their internal rules are opaque to the engine.
///
/// Exactly one instance exists per queue slot, created at session construction
/// and never reused. After `end`, the winner and loser sets are frozen and
/// disjoint, and players who left the session are excluded from both.
pub trait Microgame: Send {
    fn name(&self) -> &'static str;

    fn level(&self) -> Level;

    /// Called exactly once per activation. Sets the running flag and may
    /// teleport or initialize players through the context.
    fn start(&mut self, ctx: &mut GameContext);

    /// Called once per scheduler tick while running.
    fn tick(&mut self, ctx: &mut GameContext);

    /// Called exactly once to finalize. Clears the running flag and fixes the
    /// final winner/loser sets.
    fn end(&mut self, ctx: &mut GameContext);

    fn is_running(&self) -> bool;

    fn winners(&self) -> &HashSet<PlayerId>;

    fn losers(&self) -> &HashSet<PlayerId>;

    fn is_winner(&self, player: PlayerId) -> bool {
        self.winners().contains(&player)
    }

    fn is_loser(&self, player: PlayerId) -> bool {
        self.losers().contains(&player)
    }

    fn recompense_points(&self) -> u32 {
        DEFAULT_RECOMPENSE_POINTS
    }

    /// Advertised round duration; seeds the in-game countdown.
    fn game_time(&self) -> Ticks {
        Ticks::from_whole_secs(15)
    }
}

pub type MicrogameFactory = Box<dyn Fn() -> Box<dyn Microgame> + Send + Sync>;

/// Catalog of microgame types, keyed by a stable name. The queue is built by
/// permuting keys, not instances, then instantiating.
pub struct MicrogameRegistry {
    normal: Vec<(&'static str, MicrogameFactory)>,
    boss: Vec<(&'static str, MicrogameFactory)>,
}

impl MicrogameRegistry {
    pub fn new() -> Self {
        Self {
            normal: Vec::new(),
            boss: Vec::new(),
        }
    }

    pub fn register_normal(&mut self, key: &'static str, factory: MicrogameFactory) {
        debug_assert!(self.normal.iter().all(|(k, _)| *k != key));
        self.normal.push((key, factory));
    }

    pub fn register_boss(&mut self, key: &'static str, factory: MicrogameFactory) {
        debug_assert!(self.boss.iter().all(|(k, _)| *k != key));
        self.boss.push((key, factory));
    }

    pub fn normal_len(&self) -> usize {
        self.normal.len()
    }

    pub fn boss_len(&self) -> usize {
        self.boss.len()
    }

    pub(crate) fn instantiate_normal(&self, index: usize) -> Box<dyn Microgame> {
        (self.normal[index].1)()
    }

    pub(crate) fn instantiate_boss(&self, index: usize) -> Box<dyn Microgame> {
        (self.boss[index].1)()
    }
}

impl Default for MicrogameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
