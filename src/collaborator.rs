// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interfaces of the external collaborators an arena is constructed with. The
//! engine never reaches for globals; every world mutation, teleport, message and
//! scoreboard update goes through these handles.

use crate::id::{ArenaId, PlayerId};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle to a generated world, e.g. its folder name.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WorldHandle(pub String);

/// The two cage structures players are held in after a round.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cage {
    Winners,
    Losers,
}

/// The subset of game modes the engine sets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameMode {
    Adventure,
    Spectator,
}

/// World/map provider. Must return a usable world handle or fail before the
/// arena is constructed; partial construction is not supported.
pub trait ArenaMap: Send {
    fn name(&self) -> &str;
    fn generate_world(&self, id: ArenaId) -> WorldHandle;
    fn spawns(&self) -> &[Vec3];
    fn winners_cage(&self) -> Vec3;
    fn losers_cage(&self) -> Vec3;
    /// Materializes a cage structure in the world.
    fn build_cage(&self, world: &WorldHandle, cage: Cage);
    /// Replaces a cage structure with air.
    fn clear_cage(&self, world: &WorldHandle, cage: Cage);
    fn delete_world(&self, world: &WorldHandle);
}

/// Player lifecycle collaborator.
pub trait PlayerDelegate: Send {
    /// Resets inventory, effects and health.
    fn init_player(&self, player: PlayerId);
    fn teleport(&self, player: PlayerId, world: &WorldHandle, position: Vec3);
    fn set_game_mode(&self, player: PlayerId, mode: GameMode);
    fn send_message(&self, player: PlayerId, message: &str);
    fn send_title(&self, player: PlayerId, title: &str, subtitle: &str);
    /// Despawns all non-player entities a microgame left in the world.
    fn despawn_world_entities(&self, world: &WorldHandle);
}

/// Messaging/translation collaborator. `args` are substitution pairs, e.g.
/// `("player", "mrbig")` for a `{%player}` placeholder.
pub trait Translator: Send {
    fn translate(&self, player: PlayerId, key: &str, args: &[(&str, String)]) -> String;
}

/// Per-player line-based display, rebuilt from scratch on every update.
pub trait Scoreboard: Send {
    fn set_lines(&self, player: PlayerId, title: &str, lines: &[String]);
    fn remove(&self, player: PlayerId);
}

/// The collaborator handles one arena is constructed with.
pub struct Collaborators {
    pub map: Box<dyn ArenaMap>,
    pub delegate: Box<dyn PlayerDelegate>,
    pub translator: Box<dyn Translator>,
    pub scoreboard: Box<dyn Scoreboard>,
}
