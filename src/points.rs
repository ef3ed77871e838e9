// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::id::PlayerId;
use std::collections::HashMap;

/// PointHolder is the per-session score ledger, keyed by player identity.
///
/// Ties are broken by insertion order (first-added player ranks higher), which
/// keeps ranking deterministic despite `HashMap` iteration order.
pub struct PointHolder {
    points: HashMap<PlayerId, u32>,
    /// Insertion order, for tie-breaking.
    order: Vec<PlayerId>,
}

impl PointHolder {
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Creates a zero-score entry unless one exists.
    pub fn add_player(&mut self, player: PlayerId) {
        if !self.points.contains_key(&player) {
            self.points.insert(player, 0);
            self.order.push(player);
        }
    }

    /// Adds to the player's running total, creating the entry if absent.
    pub fn add_player_point(&mut self, player: PlayerId, points: u32) {
        self.add_player(player);
        if let Some(total) = self.points.get_mut(&player) {
            *total = total.saturating_add(points);
        }
    }

    /// Deletes the entry; the score is lost, not archived.
    pub fn remove_player(&mut self, player: PlayerId) {
        if self.points.remove(&player).is_some() {
            self.order.retain(|p| *p != player);
        }
    }

    /// Returns 0 for an unknown player, never fails.
    pub fn player_points(&self, player: PlayerId) -> u32 {
        self.points.get(&player).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Entries sorted non-increasing by score; equal scores keep insertion order.
    pub fn ordered_by_higher_score(&self) -> impl Iterator<Item = (PlayerId, u32)> {
        let mut entries: Vec<(PlayerId, u32)> = self
            .order
            .iter()
            .map(|&player| (player, self.points[&player]))
            .collect();
        // Stable sort preserves insertion order among equal scores.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.into_iter()
    }

    /// Groups the ordered sequence into equal-score buckets, highest first.
    /// Used to compute joint 1st/2nd/3rd place when scores tie.
    pub fn chunked_by_score(&self) -> Vec<(u32, Vec<PlayerId>)> {
        let mut chunks: Vec<(u32, Vec<PlayerId>)> = Vec::new();
        for (player, score) in self.ordered_by_higher_score() {
            match chunks.last_mut() {
                Some((chunk_score, players)) if *chunk_score == score => players.push(player),
                _ => chunks.push((score, vec![player])),
            }
        }
        chunks
    }
}

impl Default for PointHolder {
    fn default() -> Self {
        Self::new()
    }
}
