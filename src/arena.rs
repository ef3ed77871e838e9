// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::collaborator::{Cage, Collaborators, GameMode, WorldHandle};
use crate::id::{ArenaId, PlayerAlias, PlayerId};
use crate::microgame::{
    GameContext, Level, Microgame, MicrogameRegistry, DEFAULT_RECOMPENSE_POINTS,
};
use crate::phase::Phase;
use crate::points::PointHolder;
use crate::scheduler::MicrogameScheduler;
use crate::ticks::Ticks;
use glam::Vec3;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Contract-violation faults, distinct from ordinary control flow. Calling code
/// is expected to check whether a microgame is active before assuming one.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ArenaError {
    #[error("no microgame is currently active")]
    NoActiveMicrogame,
    #[error("the microgame queue is exhausted")]
    NoNextMicrogame,
    #[error("arena roster is full")]
    ArenaFull,
}

/// A player-triggered event funneled into the arena's execution context.
#[derive(Clone, Debug)]
pub enum ArenaEvent {
    Disconnected { player: PlayerId },
    ChangedWorld { player: PlayerId, to: WorldHandle },
    Damaged { player: PlayerId },
    DroppedItem { player: PlayerId },
    Exhausted { player: PlayerId },
}

/// Whether a player-triggered event is allowed to proceed or suppressed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventVerdict {
    Allow,
    Cancel,
}

/// Arena owns one session: phase, roster, point ledger, microgame queue and the
/// currently active microgame. All mutations are serialized by the owning actor;
/// nothing here suspends or blocks.
pub struct Arena {
    id: ArenaId,
    world: WorldHandle,
    phase: Phase,
    players: HashMap<PlayerId, PlayerAlias>,
    points: PointHolder,
    scheduler: MicrogameScheduler,
    current: Option<Box<dyn Microgame>>,
    pub starting_time: Ticks,
    pub inbetween_time: Ticks,
    pub ending_time: Ticks,
    winners_cage_built: bool,
    losers_cage_built: bool,
    collaborators: Collaborators,
}

impl Arena {
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 12;

    pub const STARTING_TIME: Ticks = Ticks(121 * Ticks::RATE.0);
    pub const INBETWEEN_TIME: Ticks = Ticks(5 * Ticks::RATE.0);
    pub const ENDING_TIME: Ticks = Ticks(10 * Ticks::RATE.0);

    /// Regular rounds per session when the full catalog is registered.
    pub const NORMAL_MICROGAMES: usize = 15;

    pub fn new(id: ArenaId, registry: &MicrogameRegistry, collaborators: Collaborators) -> Self {
        let world = collaborators.map.generate_world(id);
        if registry.normal_len() != Self::NORMAL_MICROGAMES {
            debug!(
                "normal catalog has {} microgames, expected {}",
                registry.normal_len(),
                Self::NORMAL_MICROGAMES
            );
        }
        let scheduler = MicrogameScheduler::new(registry, &mut rand::thread_rng());
        info!(
            "arena {:?} created on map {} with {} microgames",
            id,
            collaborators.map.name(),
            scheduler.total()
        );
        Self {
            id,
            world,
            phase: Phase::Waiting,
            players: HashMap::new(),
            points: PointHolder::new(),
            scheduler,
            current: None,
            starting_time: Self::STARTING_TIME,
            // The first in-between is longer than the usual five seconds.
            inbetween_time: Ticks(11 * Ticks::RATE.0),
            ending_time: Self::ENDING_TIME,
            winners_cage_built: false,
            losers_cage_built: false,
            collaborators,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn world(&self) -> &WorldHandle {
        &self.world
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &HashMap<PlayerId, PlayerAlias> {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn points(&self) -> &PointHolder {
        &self.points
    }

    /// Write access to the ledger, e.g. for microgames awarding mid-round
    /// bonuses.
    pub fn points_mut(&mut self) -> &mut PointHolder {
        &mut self.points
    }

    pub fn scheduler(&self) -> &MicrogameScheduler {
        &self.scheduler
    }

    pub fn in_game(&self, player: PlayerId) -> bool {
        self.players.contains_key(&player)
    }

    /// Moves the session to `phase`, logging the transition.
    pub fn set_phase(&mut self, phase: Phase) {
        debug_assert!(
            self.phase.can_transition_to(phase),
            "illegal transition {:?} -> {:?}",
            self.phase,
            phase
        );
        debug!("arena {:?}: {:?} -> {:?}", self.id, self.phase, phase);
        self.phase = phase;
    }

    /// Adds a player to the roster, announces the join to all members, and
    /// places the player at a random spawn of the map.
    pub fn join(&mut self, player: PlayerId, alias: PlayerAlias) -> Result<(), ArenaError> {
        if self.players.len() >= Self::MAX_PLAYERS {
            warn!("arena {:?}: join rejected, roster full", self.id);
            return Err(ArenaError::ArenaFull);
        }
        self.players.insert(player, alias);
        self.points.add_player(player);

        let count = format!("{}/{}", self.players.len(), Self::MAX_PLAYERS);
        for &member in self.players.keys() {
            let message = self.collaborators.translator.translate(
                member,
                "game.player.join",
                &[("player", alias.to_string()), ("count", count.clone())],
            );
            self.collaborators.delegate.send_message(member, &message);
        }

        if let Some(&spawn) = self
            .collaborators
            .map
            .spawns()
            .choose(&mut rand::thread_rng())
        {
            self.collaborators
                .delegate
                .teleport(player, &self.world, spawn);
        }
        self.collaborators.delegate.init_player(player);
        self.collaborators
            .delegate
            .set_game_mode(player, GameMode::Adventure);

        info!("arena {:?}: {} joined ({})", self.id, alias, count);
        Ok(())
    }

    /// Removes a player from the roster and point ledger. Safe to call even
    /// mid-microgame; the active microgame keeps running and simply stops
    /// counting this player.
    pub fn quit(&mut self, player: PlayerId) {
        let alias = match self.players.remove(&player) {
            Some(alias) => alias,
            None => return,
        };
        self.points.remove_player(player);

        let count = format!("{}/{}", self.players.len(), Self::MAX_PLAYERS);
        for &member in self.players.keys() {
            let message = self.collaborators.translator.translate(
                member,
                "game.player.quit",
                &[("player", alias.to_string()), ("count", count.clone())],
            );
            self.collaborators.delegate.send_message(member, &message);
        }

        info!("arena {:?}: {} quit ({})", self.id, alias, count);
    }

    /// Sends the same raw message to every roster member.
    pub fn broadcast(&self, message: &str) {
        for &member in self.players.keys() {
            self.collaborators.delegate.send_message(member, message);
        }
    }

    /// Safe accessor; `None` when no microgame is active.
    pub fn current_microgame(&self) -> Option<&dyn Microgame> {
        self.current.as_deref()
    }

    /// Fallible accessor for callers that assume a microgame is active.
    pub fn expect_current_microgame(&self) -> Result<&dyn Microgame, ArenaError> {
        self.current.as_deref().ok_or(ArenaError::NoActiveMicrogame)
    }

    /// Peek at the next unplayed microgame without consuming it.
    pub fn next_microgame(&self) -> Option<&dyn Microgame> {
        self.scheduler.peek_next()
    }

    pub fn expect_next_microgame(&self) -> Result<&dyn Microgame, ArenaError> {
        self.scheduler
            .peek_next()
            .ok_or(ArenaError::NoNextMicrogame)
    }

    fn game_context(&self) -> GameContext {
        GameContext {
            world: &self.world,
            map: self.collaborators.map.as_ref(),
            delegate: self.collaborators.delegate.as_ref(),
            roster: &self.players,
            points: &self.points,
        }
    }

    /// Forwards one tick to the current microgame if one is active and running.
    pub fn tick_current_microgame(&mut self) {
        if let Some(mut game) = self.current.take() {
            if game.is_running() {
                let mut ctx = self.game_context();
                game.tick(&mut ctx);
            }
            self.current = Some(game);
        }
    }

    /// Pulls the next microgame from the scheduler, makes it current and starts
    /// it. `None` signals that the session's microgame sequence is exhausted and
    /// should transition toward ending.
    pub fn start_next_microgame(&mut self) -> Option<&dyn Microgame> {
        let mut game = self.scheduler.advance()?;
        {
            let mut ctx = self.game_context();
            game.start(&mut ctx);
        }
        info!(
            "arena {:?}: starting microgame {} ({}/{})",
            self.id,
            game.name(),
            self.scheduler.played(),
            self.scheduler.total()
        );
        self.current = Some(game);
        self.current.as_deref()
    }

    /// Finalizes the current microgame: result messages, rewards, titles,
    /// world cleanup and cage teardown. A no-op when no microgame is active or
    /// the active one is not running.
    pub fn end_current_microgame(&mut self) {
        let mut game = match self.current.take() {
            Some(game) => game,
            None => return,
        };
        if !game.is_running() {
            self.current = Some(game);
            return;
        }

        // Players who left mid-round are not counted in the result tiers.
        let winners: HashSet<PlayerId> = game
            .winners()
            .iter()
            .copied()
            .filter(|player| self.players.contains_key(player))
            .collect();
        let winners_count = winners.len();
        let players_count = self.players.len();
        let mut winner_names: Vec<String> = self
            .players
            .iter()
            .filter(|(id, _)| winners.contains(id))
            .map(|(_, alias)| alias.to_string())
            .collect();
        winner_names.sort();

        for &member in self.players.keys() {
            self.collaborators
                .delegate
                .send_message(member, &format!("\n{}", game.name()));
            let message = if winners_count >= players_count {
                self.collaborators
                    .translator
                    .translate(member, "microgame.nolosers", &[])
            } else if winners_count == 0 {
                self.collaborators.translator.translate(
                    member,
                    "microgame.nowinners",
                    &[("count", players_count.to_string())],
                )
            } else if winners_count <= 3 {
                self.collaborators.translator.translate(
                    member,
                    "microgame.winners",
                    &[("players", winner_names.join(", "))],
                )
            } else {
                self.collaborators.translator.translate(
                    member,
                    "microgame.winners2",
                    &[
                        ("winners_count", winners_count.to_string()),
                        ("players_count", players_count.to_string()),
                    ],
                )
            };
            self.collaborators.delegate.send_message(member, &message);
        }

        {
            let mut ctx = self.game_context();
            game.end(&mut ctx);
        }

        let recompense = game.recompense_points();
        let show_worth = recompense > DEFAULT_RECOMPENSE_POINTS;
        for &member in self.players.keys() {
            self.collaborators.delegate.init_player(member);
            self.collaborators
                .delegate
                .set_game_mode(member, GameMode::Adventure);
            if game.is_winner(member) {
                self.points.add_player_point(member, recompense);
                let subtitle =
                    self.collaborators
                        .translator
                        .translate(member, "microgame.success", &[]);
                self.collaborators
                    .delegate
                    .send_title(member, "", &subtitle);
            } else if game.is_loser(member) {
                let subtitle =
                    self.collaborators
                        .translator
                        .translate(member, "microgame.failed", &[]);
                self.collaborators
                    .delegate
                    .send_title(member, "", &subtitle);
            }
            if show_worth {
                let message = self.collaborators.translator.translate(
                    member,
                    "microgame.worth",
                    &[("points", recompense.to_string())],
                );
                self.collaborators.delegate.send_message(member, &message);
            }
        }

        info!(
            "arena {:?}: microgame {} ended, {}/{} winners",
            self.id,
            game.name(),
            winners_count,
            players_count
        );

        self.collaborators
            .delegate
            .despawn_world_entities(&self.world);
        drop(game);
        self.unset_winners_cage();
        self.unset_losers_cage();
    }

    /// Ends the session: terminal phase, tie-grouped top-3 leaderboard and the
    /// closing winner message.
    pub fn end(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.set_phase(Phase::Ending);

        let tops: Vec<(u32, Vec<PlayerId>)> =
            self.points.chunked_by_score().into_iter().take(3).collect();
        let separator = "-".repeat(31);

        for &member in self.players.keys() {
            self.collaborators.delegate.send_message(member, &separator);
            for (rank, (score, group)) in tops.iter().enumerate() {
                let names: Vec<String> = group
                    .iter()
                    .filter_map(|id| self.players.get(id))
                    .map(|alias| alias.to_string())
                    .collect();
                let message = self.collaborators.translator.translate(
                    member,
                    &format!("game.arena.top{}", rank + 1),
                    &[("players", names.join(", ")), ("points", score.to_string())],
                );
                self.collaborators.delegate.send_message(member, &message);
            }
            self.collaborators.delegate.send_message(member, &separator);
            if tops.iter().any(|(_, group)| group.contains(&member)) {
                let message =
                    self.collaborators
                        .translator
                        .translate(member, "game.arena.youwin", &[]);
                self.collaborators.delegate.send_message(member, &message);
            }
        }

        info!("arena {:?}: session over", self.id);
    }

    pub fn is_winners_cage_built(&self) -> bool {
        self.winners_cage_built
    }

    pub fn is_losers_cage_built(&self) -> bool {
        self.losers_cage_built
    }

    pub fn build_winners_cage(&mut self) {
        self.collaborators.map.build_cage(&self.world, Cage::Winners);
        self.winners_cage_built = true;
    }

    pub fn unset_winners_cage(&mut self) {
        self.collaborators.map.clear_cage(&self.world, Cage::Winners);
        self.winners_cage_built = false;
    }

    pub fn build_losers_cage(&mut self) {
        self.collaborators.map.build_cage(&self.world, Cage::Losers);
        self.losers_cage_built = true;
    }

    pub fn unset_losers_cage(&mut self) {
        self.collaborators.map.clear_cage(&self.world, Cage::Losers);
        self.losers_cage_built = false;
    }

    /// Holds a round winner above the winners cage, materializing it on first
    /// use.
    pub fn send_to_winners_cage(&mut self, player: PlayerId) {
        if !self.winners_cage_built {
            self.build_winners_cage();
        }
        let position = self.collaborators.map.winners_cage() + Vec3::new(0.0, 2.0, 0.0);
        self.send_to_cage(player, position);
    }

    pub fn send_to_losers_cage(&mut self, player: PlayerId) {
        if !self.losers_cage_built {
            self.build_losers_cage();
        }
        let position = self.collaborators.map.losers_cage() + Vec3::new(0.0, 2.0, 0.0);
        self.send_to_cage(player, position);
    }

    fn send_to_cage(&self, player: PlayerId, position: Vec3) {
        self.collaborators.delegate.init_player(player);
        self.collaborators
            .delegate
            .set_game_mode(player, GameMode::Adventure);
        self.collaborators
            .delegate
            .teleport(player, &self.world, position);
    }

    /// Rebuilds the per-player scoreboard from the current phase and ledger.
    pub fn update_scoreboard(&self) {
        let is_boss = self
            .current
            .as_ref()
            .map_or(false, |game| game.level() == Level::Boss);

        for (&member, alias) in &self.players {
            if !self.phase.displays_scoreboard() {
                self.collaborators.scoreboard.remove(member);
                continue;
            }
            let mut lines: Vec<String> = Vec::new();
            match self.phase {
                Phase::Waiting | Phase::Starting => {
                    let map_label =
                        self.collaborators
                            .translator
                            .translate(member, "text.map", &[]);
                    lines.push(format!("{}:", map_label));
                    lines.push(self.collaborators.map.name().to_string());
                    lines.push(String::new());
                    let players_label =
                        self.collaborators
                            .translator
                            .translate(member, "text.players", &[]);
                    lines.push(format!("{}:", players_label));
                    lines.push(format!("{}/{}", self.players.len(), Self::MAX_PLAYERS));
                }
                Phase::InBetween | Phase::InGame => {
                    let scores_label =
                        self.collaborators
                            .translator
                            .translate(member, "text.scores", &[]);
                    lines.push(format!("{}:", scores_label));
                    let mut on_top = false;
                    for (i, (id, score)) in self.points.ordered_by_higher_score().enumerate() {
                        let row = i + 1;
                        if id == member {
                            lines.push(format!("{} {}", score, alias));
                            on_top = true;
                        } else if row == 5 && !on_top {
                            // Pin the viewer into the last row when off the top.
                            lines.push(format!("{} {}", self.points.player_points(member), alias));
                        } else if let Some(name) = self.players.get(&id) {
                            lines.push(format!("{} {}", score, name));
                        }
                        if row == 5 {
                            break;
                        }
                    }
                    lines.push(String::new());
                    lines.push("Microgame:".to_string());
                    let game_name = if self.phase == Phase::InBetween {
                        "In-between".to_string()
                    } else {
                        self.current
                            .as_ref()
                            .map(|game| game.name().to_string())
                            .unwrap_or_else(|| "In-between".to_string())
                    };
                    lines.push(game_name);
                    lines.push(if is_boss {
                        "(Bossgame)".to_string()
                    } else {
                        format!(
                            "({}/{})",
                            self.scheduler.played(),
                            self.scheduler.total().saturating_sub(1)
                        )
                    });
                }
                Phase::Ending => unreachable!(),
            }
            lines.truncate(15);
            self.collaborators
                .scoreboard
                .set_lines(member, "PartyWare", &lines);
        }
    }

    /// Applies a player-triggered event under the arena's single-writer
    /// discipline and reports whether the underlying action may proceed.
    pub fn handle_event(&mut self, event: ArenaEvent) -> EventVerdict {
        match event {
            ArenaEvent::Disconnected { player } => {
                self.quit(player);
                EventVerdict::Allow
            }
            ArenaEvent::ChangedWorld { player, to } => {
                if to != self.world {
                    self.quit(player);
                }
                EventVerdict::Allow
            }
            ArenaEvent::Damaged { player } => {
                // Damage flows to microgame-specific handling only while a
                // microgame is active.
                if self.in_game(player) && self.current.is_none() {
                    EventVerdict::Cancel
                } else {
                    EventVerdict::Allow
                }
            }
            ArenaEvent::DroppedItem { player } | ArenaEvent::Exhausted { player } => {
                if self.in_game(player) {
                    EventVerdict::Cancel
                } else {
                    EventVerdict::Allow
                }
            }
        }
    }

    /// Final teardown once the ending countdown expires.
    pub fn teardown(&mut self) {
        for &member in self.players.keys() {
            self.collaborators.scoreboard.remove(member);
        }
        self.collaborators.map.delete_world(&self.world);
        info!("arena {:?}: world deleted", self.id);
    }
}
