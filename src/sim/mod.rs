//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies; visuals are requested
//!   through queued `RenderIntent`s

pub mod arc;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;

pub use arc::{ArcKey, JumpArc};
pub use player::{JumpOutcome, MotionEvent, Player};
pub use state::{DeathCause, GameEvent, PlayerPhase, RenderIntent, RngState, Row, Side};
pub use tick::{GameState, initialize, jump, tick};
pub use track::{Eviction, PendingDespawn, RowTrack, choose_layout};
