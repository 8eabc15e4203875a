//! Row track: generation, despawn scheduling and eviction
//!
//! Rows are held in creation order. A row the player is done with is first
//! scheduled (it stays visible for a while) and later evicted, either when its
//! timer runs out or when too many scheduled rows pile up. Every eviction is
//! followed by a replacement row while the level still has rows to give.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use super::state::{RenderIntent, Row, Side};
use crate::settings::{LevelSettings, SpawnWeights};

/// A row waiting to be evicted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDespawn {
    pub row: u32,
    /// Seconds left before eviction
    pub timer: f32,
}

/// A row removed by `age_and_evict`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub index: u32,
    /// Position the row held in the track at the moment it was removed
    pub slot: usize,
}

/// The managed window of materialized rows
#[derive(Debug, Clone)]
pub struct RowTrack {
    rows: VecDeque<Row>,
    pending: VecDeque<PendingDespawn>,
    /// Rows generated since the last initialize
    generated: u32,
    total_weight: f32,
    weights: SpawnWeights,
    offset: Vec3,
    total_rows: Option<u32>,
    initial_rows: usize,
    max_active_passed_rows: usize,
}

impl RowTrack {
    /// Create an empty track; call `initialize` to populate it
    pub fn new(level: &LevelSettings) -> Self {
        Self {
            rows: VecDeque::with_capacity(level.initial_rows()),
            pending: VecDeque::new(),
            generated: 0,
            total_weight: level.spawn_weights.total(),
            weights: level.spawn_weights,
            offset: level.position_offset,
            total_rows: level.total_rows,
            initial_rows: level.initial_rows(),
            max_active_passed_rows: level.max_active_passed_rows,
        }
    }

    /// Drop every row and build a fresh window starting with the wall
    pub fn initialize<R: Rng>(&mut self, rng: &mut R, intents: &mut Vec<RenderIntent>) {
        for row in self.rows.drain(..) {
            intents.push(RenderIntent::DestroyRow { index: row.index });
        }
        self.pending.clear();
        self.generated = 0;

        for _ in 0..self.initial_rows {
            self.generate_next_row(rng, intents);
        }
        log::debug!("Track initialized with {} rows", self.rows.len());
    }

    /// Whether the level still has rows left to generate
    pub fn can_generate(&self) -> bool {
        self.total_rows.is_none_or(|limit| self.generated < limit)
    }

    /// Append the next row. Row 0 is always the wall; later rows follow the
    /// weighted layout policy. Returns `None` once the level is exhausted.
    pub fn generate_next_row<R: Rng>(
        &mut self,
        rng: &mut R,
        intents: &mut Vec<RenderIntent>,
    ) -> Option<Row> {
        if !self.can_generate() {
            return None;
        }

        let index = self.generated;
        let row = if index == 0 {
            Row::wall()
        } else {
            let roll = if self.total_weight > 0.0 {
                rng.random_range(0.0..self.total_weight)
            } else {
                0.0
            };
            let (left, right) = choose_layout(&self.weights, self.total_weight, roll);
            Row { index, left, right }
        };

        self.rows.push_back(row);
        self.generated += 1;
        log::debug!("Row {} generated (left={}, right={})", index, row.left, row.right);

        intents.push(RenderIntent::CreateRow {
            index,
            left: row.left.then(|| self.pillar_position(index, Side::Left)),
            right: row.right.then(|| self.pillar_position(index, Side::Right)),
        });
        Some(row)
    }

    /// World position of a pillar
    pub fn pillar_position(&self, index: u32, side: Side) -> Vec3 {
        let n = index as f32;
        Vec3::new(side.sign() * self.offset.x, self.offset.y * n, self.offset.z * n)
    }

    /// Queue a row for eviction after `delay` seconds. Unknown or already
    /// queued rows are ignored.
    pub fn schedule_despawn(&mut self, index: u32, delay: f32) {
        if self.slot_of(index).is_none() || self.pending.iter().any(|p| p.row == index) {
            return;
        }
        self.pending.push_back(PendingDespawn { row: index, timer: delay });
    }

    /// Age every pending despawn by `dt` and evict the ones that are due, plus
    /// the oldest entries beyond the backlog cap. Each eviction is topped up
    /// with a replacement row while the level allows it.
    pub fn age_and_evict<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        intents: &mut Vec<RenderIntent>,
    ) -> Vec<Eviction> {
        let queued = self.pending.len();
        let cap = self.max_active_passed_rows;

        // Mark first, evict afterwards
        let mut due = Vec::new();
        for (i, entry) in self.pending.iter_mut().enumerate() {
            entry.timer -= dt;
            if entry.timer <= 0.0 || queued - i > cap {
                due.push(entry.row);
            }
        }
        if due.is_empty() {
            return Vec::new();
        }
        self.pending.retain(|entry| !due.contains(&entry.row));

        let mut evicted = Vec::with_capacity(due.len());
        for index in due {
            let Some(slot) = self.slot_of(index) else {
                continue;
            };
            self.rows.remove(slot);
            intents.push(RenderIntent::DestroyRow { index });
            log::debug!("Row {} evicted from slot {}", index, slot);
            evicted.push(Eviction { index, slot });

            self.generate_next_row(rng, intents);
        }
        evicted
    }

    /// Whether the row with this index has a pillar on `side`. Evicted rows
    /// report no pillar.
    pub fn occupied(&self, index: u32, side: Side) -> bool {
        self.row(index).is_some_and(|row| row.occupied(side))
    }

    /// Same as `occupied`, addressed by position in the track
    pub fn occupied_at_slot(&self, slot: usize, side: Side) -> bool {
        self.rows.get(slot).is_some_and(|row| row.occupied(side))
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.slot_of(index).map(|slot| &self.rows[slot])
    }

    pub fn row_at_slot(&self, slot: usize) -> Option<&Row> {
        self.rows.get(slot)
    }

    pub fn slot_of(&self, index: u32) -> Option<usize> {
        self.rows.iter().position(|row| row.index == index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingDespawn> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn generated(&self) -> u32 {
        self.generated
    }

    pub fn total_rows(&self) -> Option<u32> {
        self.total_rows
    }
}

/// Pick a layout for `roll` in `[0, total)`. The range is split from the top
/// down into a left-only band, then a right-only band, and the remainder at
/// the bottom is both.
pub fn choose_layout(weights: &SpawnWeights, total: f32, roll: f32) -> (bool, bool) {
    if total - weights.left_only <= roll {
        (true, false)
    } else if total - weights.left_only - weights.right_only <= roll {
        (false, true)
    } else {
        (true, true)
    }
}
