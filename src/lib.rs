// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session engine for a party-style minigame. One [`arena::Arena`] takes a group
//! of players through a randomized queue of short microgames plus one boss round,
//! tracking scores and advancing through lifecycle phases, while surviving joins,
//! quits and disconnects at arbitrary points. Each arena is driven by a single
//! fixed-cadence heartbeat and owned by one actor, so all mutations to one
//! arena's state are serialized.

pub mod actor;
pub mod arena;
pub mod collaborator;
pub mod driver;
pub mod id;
pub mod microgame;
pub mod phase;
pub mod points;
pub mod scheduler;
pub mod ticks;
