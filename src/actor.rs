// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::arena::{Arena, ArenaError, ArenaEvent, EventVerdict};
use crate::driver::{ArenaTimerDriver, TickControl};
use crate::id::{PlayerAlias, PlayerId};
use crate::phase::Phase;
use crate::ticks::Ticks;
use actix::prelude::*;
use log::info;

/// One actor per arena. The actor mailbox serializes player events against the
/// repeating heartbeat, so a tick and a concurrent quit can never observe a
/// half-updated roster. Multiple arena actors are fully independent.
pub struct ArenaActor {
    arena: Arena,
    driver: ArenaTimerDriver,
    tick_handle: Option<SpawnHandle>,
}

impl ArenaActor {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            driver: ArenaTimerDriver::new(),
            tick_handle: None,
        }
    }

    fn tick(&mut self, ctx: &mut Context<Self>) {
        if self.driver.heartbeat(&mut self.arena) == TickControl::Stop {
            // Terminal; further ticks would be a resource leak.
            if let Some(handle) = self.tick_handle.take() {
                ctx.cancel_future(handle);
            }
            ctx.stop();
        }
    }
}

impl Actor for ArenaActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("arena {:?} actor started", self.arena.id());
        self.tick_handle = Some(ctx.run_interval(Ticks::ONE.to_duration(), Self::tick));
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("arena {:?} actor stopped", self.arena.id());
    }
}

#[derive(Message)]
#[rtype(result = "Result<(), ArenaError>")]
pub struct Join {
    pub player: PlayerId,
    pub alias: PlayerAlias,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Quit {
    pub player: PlayerId,
}

/// A reactive player event; replies with whether the action may proceed.
#[derive(Message)]
#[rtype(result = "EventVerdict")]
pub struct PlayerEvent(pub ArenaEvent);

#[derive(Message)]
#[rtype(result = "Phase")]
pub struct GetPhase;

/// Ledger snapshot for the UI boundary, ordered by descending score.
#[derive(Message)]
#[rtype(result = "Vec<(PlayerId, u32)>")]
pub struct GetScores;

impl Handler<Join> for ArenaActor {
    type Result = Result<(), ArenaError>;

    fn handle(&mut self, msg: Join, _ctx: &mut Context<Self>) -> Self::Result {
        self.arena.join(msg.player, msg.alias)
    }
}

impl Handler<Quit> for ArenaActor {
    type Result = ();

    fn handle(&mut self, msg: Quit, _ctx: &mut Context<Self>) -> Self::Result {
        self.arena.quit(msg.player);
    }
}

impl Handler<PlayerEvent> for ArenaActor {
    type Result = MessageResult<PlayerEvent>;

    fn handle(&mut self, msg: PlayerEvent, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.arena.handle_event(msg.0))
    }
}

impl Handler<GetPhase> for ArenaActor {
    type Result = MessageResult<GetPhase>;

    fn handle(&mut self, _msg: GetPhase, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.arena.phase())
    }
}

impl Handler<GetScores> for ArenaActor {
    type Result = MessageResult<GetScores>;

    fn handle(&mut self, _msg: GetScores, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.arena.points().ordered_by_higher_score().collect())
    }
}
