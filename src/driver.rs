// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::arena::Arena;
use crate::phase::Phase;
use crate::ticks::Ticks;
use log::debug;

/// How often the active microgame receives its own tick, in heartbeats.
pub const MICROGAME_TICK_INTERVAL: Ticks = Ticks(3);

/// Smallest counter period both [`MICROGAME_TICK_INTERVAL`] and [`Ticks::RATE`]
/// divide evenly; wrapping here keeps both cadences exact.
const CADENCE_CYCLE: Ticks = Ticks(60);

/// Returned by [`ArenaTimerDriver::heartbeat`]; `Stop` means no further ticks
/// may be scheduled for this arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// ArenaTimerDriver advances one arena from a single fixed-cadence heartbeat.
///
/// The microgame tick and the phase countdowns are both derived from one
/// counter, so the two cadences can never race or observe half-updated state.
pub struct ArenaTimerDriver {
    /// Heartbeat counter, wrapped at [`CADENCE_CYCLE`].
    counter: Ticks,
    /// Countdown for the round in progress, seeded from the microgame's
    /// advertised duration.
    ingame_time: Ticks,
}

impl ArenaTimerDriver {
    pub fn new() -> Self {
        Self {
            counter: Ticks::ZERO,
            ingame_time: Ticks::ZERO,
        }
    }

    /// Runs one heartbeat: forwards the microgame tick at its cadence, advances
    /// the phase countdown, and refreshes the scoreboard once per second.
    pub fn heartbeat(&mut self, arena: &mut Arena) -> TickControl {
        self.counter = (self.counter + Ticks::ONE) % CADENCE_CYCLE;

        if self.counter % MICROGAME_TICK_INTERVAL == Ticks::ZERO {
            arena.tick_current_microgame();
        }

        let control = self.advance_phase(arena);

        if self.counter % Ticks::RATE == Ticks::ZERO {
            arena.update_scoreboard();
        }

        control
    }

    fn advance_phase(&mut self, arena: &mut Arena) -> TickControl {
        match arena.phase() {
            Phase::Waiting => {
                arena.starting_time = Arena::STARTING_TIME;
                if arena.player_count() >= Arena::MIN_PLAYERS {
                    arena.set_phase(Phase::Starting);
                }
            }
            Phase::Starting => {
                if arena.player_count() < Arena::MIN_PLAYERS {
                    // Not enough players anymore; abort the countdown.
                    debug!("arena {:?}: starting aborted", arena.id());
                    arena.set_phase(Phase::Waiting);
                    arena.starting_time = Arena::STARTING_TIME;
                } else {
                    arena.starting_time = arena.starting_time.saturating_sub(Ticks::ONE);
                    if arena.starting_time == Ticks::ZERO {
                        arena.set_phase(Phase::InBetween);
                    }
                }
            }
            Phase::InBetween => {
                arena.inbetween_time = arena.inbetween_time.saturating_sub(Ticks::ONE);
                if arena.inbetween_time == Ticks::ZERO {
                    arena.inbetween_time = Arena::INBETWEEN_TIME;
                    let game_time = arena.start_next_microgame().map(|game| game.game_time());
                    match game_time {
                        Some(game_time) => {
                            arena.set_phase(Phase::InGame);
                            self.ingame_time = game_time;
                        }
                        None => arena.end(),
                    }
                }
            }
            Phase::InGame => {
                self.ingame_time = self.ingame_time.saturating_sub(Ticks::ONE);
                if self.ingame_time == Ticks::ZERO {
                    arena.end_current_microgame();
                    if arena.next_microgame().is_none() {
                        arena.end();
                    } else {
                        arena.set_phase(Phase::InBetween);
                        arena.inbetween_time = Arena::INBETWEEN_TIME;
                    }
                }
            }
            Phase::Ending => {
                arena.ending_time = arena.ending_time.saturating_sub(Ticks::ONE);
                if arena.ending_time == Ticks::ZERO {
                    arena.teardown();
                    return TickControl::Stop;
                }
            }
        }
        TickControl::Continue
    }
}

impl Default for ArenaTimerDriver {
    fn default() -> Self {
        Self::new()
    }
}
