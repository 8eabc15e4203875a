//! Simulation value types
//!
//! Rows, sides, player phases and the intents/events the simulation emits.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Lateral side of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One depth slot of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Creation order, also the depth from the start
    pub index: u32,
    pub left: bool,
    pub right: bool,
}

impl Row {
    /// The starting wall, solid on both sides
    pub fn wall() -> Self {
        Self {
            index: 0,
            left: true,
            right: true,
        }
    }

    pub fn occupied(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Player state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Standing on a row, ready to jump
    Idle,
    /// Mid-air between two rows
    Jumping,
    /// Falling after a missed pillar or a collapsed row
    Dying,
    /// Cleared every row of a finite level; the simulation stays frozen
    Won,
    /// Fall finished, run over
    Ended,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Landed where no pillar stands
    MissedPillar,
    /// The row under the player was evicted
    RowCollapsed,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::MissedPillar => "missed_pillar",
            DeathCause::RowCollapsed => "row_collapsed",
        }
    }
}

/// Instruction for the renderer; the simulation never touches visuals directly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderIntent {
    /// Materialize a row; `None` means no pillar on that side
    CreateRow {
        index: u32,
        left: Option<Vec3>,
        right: Option<Vec3>,
    },
    DestroyRow { index: u32 },
    SpawnPlayer { position: Vec3 },
    MovePlayer { position: Vec3 },
    DestroyPlayer,
    /// Stop the camera following the player
    DetachCamera,
    ScoreChanged { current: u32, high_score: u32 },
}

/// Gameplay event routed to score keeping and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Points earned by a jump
    Scored(u32),
    /// Player started dying on the given logical row
    Died { row: u32, cause: DeathCause },
    /// Every row of a finite level was cleared
    Won { row: u32 },
}

/// RNG seed record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
