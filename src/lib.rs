//! Column - an endless pillar-hopping runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (row track, player state machine)
//! - `game`: Host-facing facade tying the simulation to score and analytics
//! - `highscores`: Current score and persisted high score
//! - `persistence`: High score storage backends
//! - `analytics`: Fire-and-forget event sink
//! - `settings`: Level and player configuration
//! - `platform`: Browser/native platform abstraction

pub mod analytics;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StoreError};
pub use game::Game;
pub use highscores::{ScoreSnapshot, ScoreTracker};
pub use settings::{DespawnPolicy, GameSettings, LevelSettings, PlayerSettings, SpawnWeights};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the bundled hosts (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default distance the player falls when dying
    pub const DEATH_DROP: f32 = 6.0;
}
