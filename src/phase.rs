// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Phase is the lifecycle stage of one arena session.
///
/// Transitions are strictly forward, except that `Starting` may abort back to
/// `Waiting` when the roster drops below the minimum, and the session alternates
/// `InBetween` <-> `InGame` once per microgame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Waiting,
    Starting,
    InBetween,
    InGame,
    Ending,
}

impl Phase {
    /// Whether the transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: Self) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Waiting, Starting)
                | (Starting, Waiting)
                | (Starting, InBetween)
                | (InBetween, InGame)
                | (InBetween, Ending)
                | (InGame, InBetween)
                | (InGame, Ending)
        )
    }

    /// `Ending` is terminal; no further ticks are processed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ending)
    }

    /// Whether the scoreboard is shown during this phase.
    pub fn displays_scoreboard(self) -> bool {
        !self.is_terminal()
    }
}
