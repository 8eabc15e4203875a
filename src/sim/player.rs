//! Player state machine
//!
//! `Idle -> Jumping -> Idle | Dying`, `Idle -> Won`, `Dying -> Ended`.
//! The player only reads the track; scheduling and eviction are driven by the
//! tick, which routes what the player reports back into the track.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arc::JumpArc;
use super::state::{PlayerPhase, RenderIntent, Side};
use super::track::{Eviction, RowTrack};
use crate::settings::PlayerSettings;

/// Result of a jump command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Not idle or not alive, nothing changed
    Ignored,
    /// Jumped past the last row of a finite level
    Won,
    /// Jump started; `alive` is false when no pillar waits at the destination
    Jumped { alive: bool },
}

/// Notable moment reached while advancing motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// A jump finished
    Landed { vacated: u32, landed: u32, alive: bool },
    /// The death fall finished and the player was destroyed
    FallFinished,
}

/// Logical player state plus the motion needed to animate it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Rows successfully jumped to since the start
    pub logical_row: u32,
    /// Position of the player's row inside the track
    pub slot: usize,
    pub side: Side,
    pub phase: PlayerPhase,
    /// Progress of the current jump or fall, in [0, 1]
    pub progress: f32,
    pub alive: bool,
    pub position: Vec3,
    start: Vec3,
    destination: Vec3,
    /// Row left by the current jump
    vacated_row: u32,

    jump_duration: f32,
    jump_arc: JumpArc,
    player_height: f32,
    death_drop: f32,
    offset: Vec3,
}

impl Player {
    /// Place a fresh player on the wall row
    pub fn spawn(settings: &PlayerSettings, offset: Vec3, side: Side) -> Self {
        let mut player = Self {
            logical_row: 0,
            slot: 0,
            side,
            phase: PlayerPhase::Idle,
            progress: 0.0,
            alive: true,
            position: Vec3::ZERO,
            start: Vec3::ZERO,
            destination: Vec3::ZERO,
            vacated_row: 0,
            jump_duration: settings.jump_duration,
            jump_arc: settings.jump_arc.clone(),
            player_height: settings.player_height,
            death_drop: settings.death_drop,
            offset,
        };
        player.position = player.standing_position(0, side);
        player.start = player.position;
        player.destination = player.position;
        player
    }

    /// Where the player stands on row `row`, side `side`
    pub fn standing_position(&self, row: u32, side: Side) -> Vec3 {
        let n = row as f32;
        Vec3::new(
            side.sign() * self.offset.x,
            self.player_height + n * self.offset.y,
            n * self.offset.z,
        )
    }

    pub fn can_jump(&self) -> bool {
        self.phase == PlayerPhase::Idle && self.alive
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    /// Start a jump to the next row, optionally switching sides
    pub fn jump(&mut self, switch_side: bool, track: &RowTrack) -> JumpOutcome {
        if !self.can_jump() {
            return JumpOutcome::Ignored;
        }

        self.phase = PlayerPhase::Jumping;
        self.progress = 0.0;
        self.start = self.position;
        self.vacated_row = self.logical_row;
        self.logical_row += 1;
        self.slot += 1;

        if self.slot >= track.len() {
            self.phase = PlayerPhase::Won;
            return JumpOutcome::Won;
        }

        if switch_side {
            self.side = self.side.flipped();
        }
        self.alive = track.occupied(self.logical_row, self.side);
        self.destination = self.standing_position(self.logical_row, self.side);

        JumpOutcome::Jumped { alive: self.alive }
    }

    /// Advance the jump or fall by `dt` seconds
    pub fn advance(&mut self, dt: f32, intents: &mut Vec<RenderIntent>) -> Option<MotionEvent> {
        match self.phase {
            PlayerPhase::Jumping => {
                self.progress += dt / self.jump_duration;
                if self.progress < 1.0 {
                    self.position = self.start.lerp(self.destination, self.progress)
                        + Vec3::Y * self.jump_arc.evaluate(self.progress);
                    intents.push(RenderIntent::MovePlayer { position: self.position });
                    return None;
                }

                self.position = self.destination;
                intents.push(RenderIntent::MovePlayer { position: self.position });
                self.phase = PlayerPhase::Idle;
                self.progress = 0.0;
                let landing = MotionEvent::Landed {
                    vacated: self.vacated_row,
                    landed: self.logical_row,
                    alive: self.alive,
                };
                if !self.alive {
                    self.begin_death(intents);
                }
                Some(landing)
            }
            PlayerPhase::Dying => {
                self.progress += dt / self.jump_duration;
                if self.progress < 1.0 {
                    self.position = self.start.lerp(self.destination, self.progress);
                    intents.push(RenderIntent::MovePlayer { position: self.position });
                    return None;
                }

                self.position = self.destination;
                self.progress = 1.0;
                self.phase = PlayerPhase::Ended;
                intents.push(RenderIntent::MovePlayer { position: self.position });
                intents.push(RenderIntent::DestroyPlayer);
                Some(MotionEvent::FallFinished)
            }
            PlayerPhase::Idle | PlayerPhase::Won | PlayerPhase::Ended => None,
        }
    }

    /// Start falling straight down from the current position. Returns false if
    /// the player is already dying, won or gone.
    pub fn begin_death(&mut self, intents: &mut Vec<RenderIntent>) -> bool {
        if !matches!(self.phase, PlayerPhase::Idle | PlayerPhase::Jumping) {
            return false;
        }
        self.alive = false;
        self.phase = PlayerPhase::Dying;
        self.progress = 0.0;
        self.start = self.position;
        self.destination = self.position - Vec3::Y * self.death_drop;
        intents.push(RenderIntent::DetachCamera);
        true
    }

    /// Keep `slot` aligned after the track dropped a row. Returns true when the
    /// evicted row was the one the player stands on.
    pub fn on_row_evicted(&mut self, eviction: Eviction) -> bool {
        if eviction.slot <= self.slot {
            self.slot = self.slot.saturating_sub(1);
        }
        eviction.index == self.logical_row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LevelSettings, SpawnWeights};
    use crate::sim::RngState;

    fn track(visible: usize, total: Option<u32>, weights: (f32, f32, f32)) -> RowTrack {
        let level = LevelSettings {
            visible_rows: visible,
            total_rows: total,
            spawn_weights: SpawnWeights {
                left_only: weights.0,
                right_only: weights.1,
                both: weights.2,
            },
            ..Default::default()
        };
        let mut track = RowTrack::new(&level);
        track.initialize(&mut RngState::new(1).to_rng(), &mut Vec::new());
        track
    }

    fn player(side: Side) -> Player {
        let settings = PlayerSettings {
            jump_duration: 1.0,
            jump_arc: JumpArc::Flat,
            player_height: 1.0,
            death_drop: 6.0,
        };
        Player::spawn(&settings, Vec3::new(1.0, 0.5, 2.0), side)
    }

    #[test]
    fn test_spawn_on_wall() {
        let p = player(Side::Right);
        assert_eq!(p.position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p.phase, PlayerPhase::Idle);
        assert!(p.can_jump());
    }

    #[test]
    fn test_jump_to_missing_pillar_kills() {
        let t = track(6, None, (1.0, 0.0, 0.0));
        let mut p = player(Side::Left);
        assert_eq!(p.jump(true, &t), JumpOutcome::Jumped { alive: false });
        assert_eq!(p.side, Side::Right);
        assert!(!p.alive);
        assert_eq!(p.logical_row, 1);
        assert_eq!(p.slot, 1);
    }

    #[test]
    fn test_jump_then_land() {
        let t = track(6, None, (1.0, 0.0, 0.0));
        let mut p = player(Side::Left);
        assert_eq!(p.jump(false, &t), JumpOutcome::Jumped { alive: true });

        let mut intents = Vec::new();
        assert_eq!(p.advance(0.5, &mut intents), None);
        assert_eq!(p.phase, PlayerPhase::Jumping);
        assert_eq!(p.progress, 0.5);
        assert_eq!(
            p.advance(0.5, &mut intents),
            Some(MotionEvent::Landed { vacated: 0, landed: 1, alive: true })
        );
        assert_eq!(p.phase, PlayerPhase::Idle);
        assert_eq!(p.progress, 0.0);
        assert_eq!(p.position, Vec3::new(-1.0, 1.5, 2.0));
        assert_eq!(intents.len(), 2);
    }

    #[test]
    fn test_parabola_lifts_player_mid_jump() {
        let t = track(6, None, (1.0, 0.0, 0.0));
        let settings = PlayerSettings {
            jump_duration: 1.0,
            jump_arc: JumpArc::Parabola { height: 2.0 },
            player_height: 1.0,
            death_drop: 6.0,
        };
        let mut p = Player::spawn(&settings, Vec3::new(1.0, 0.5, 2.0), Side::Left);
        let start = p.position;
        p.jump(false, &t);
        assert_eq!(p.destination(), Vec3::new(-1.0, 1.5, 2.0));

        let mut intents = Vec::new();
        p.advance(0.5, &mut intents);
        let straight = start.lerp(p.destination(), 0.5);
        assert_eq!(p.position, straight + Vec3::Y * 2.0);
        assert_eq!(p.position, Vec3::new(-1.0, 3.25, 1.0));
        assert_eq!(intents, vec![RenderIntent::MovePlayer { position: p.position }]);

        p.advance(0.5, &mut intents);
        assert_eq!(p.position, p.destination());
    }

    #[test]
    fn test_jump_ignored_unless_idle() {
        let t = track(6, None, (0.0, 0.0, 1.0));
        let mut p = player(Side::Left);
        p.jump(false, &t);
        let before = (p.logical_row, p.slot, p.side, p.progress);
        assert_eq!(p.jump(true, &t), JumpOutcome::Ignored);
        assert_eq!(before, (p.logical_row, p.slot, p.side, p.progress));
    }

    #[test]
    fn test_landing_dead_starts_fall_then_ends() {
        let t = track(6, None, (1.0, 0.0, 0.0));
        let mut p = player(Side::Left);
        p.jump(true, &t);

        let mut intents = Vec::new();
        p.advance(1.0, &mut intents);
        assert_eq!(p.phase, PlayerPhase::Dying);
        assert!(intents.contains(&RenderIntent::DetachCamera));
        let landed = p.position;

        assert_eq!(p.advance(0.5, &mut intents), None);
        assert_eq!(p.advance(0.5, &mut intents), Some(MotionEvent::FallFinished));
        assert_eq!(p.phase, PlayerPhase::Ended);
        assert_eq!(p.position, landed - Vec3::Y * 6.0);
        assert_eq!(intents.last(), Some(&RenderIntent::DestroyPlayer));
        assert_eq!(p.advance(1.0, &mut intents), None);
    }

    #[test]
    fn test_jump_past_last_row_wins() {
        let t = track(10, Some(2), (0.0, 0.0, 1.0));
        let mut p = player(Side::Left);
        p.jump(false, &t);
        p.advance(1.0, &mut Vec::new());
        assert_eq!(p.jump(false, &t), JumpOutcome::Won);
        assert_eq!(p.phase, PlayerPhase::Won);
        assert!(p.alive);
        assert_eq!(p.jump(false, &t), JumpOutcome::Ignored);
    }

    #[test]
    fn test_eviction_shifts_slot() {
        let mut p = player(Side::Left);
        p.slot = 3;
        p.logical_row = 3;
        assert!(!p.on_row_evicted(Eviction { index: 0, slot: 0 }));
        assert_eq!(p.slot, 2);
        assert!(p.on_row_evicted(Eviction { index: 3, slot: 2 }));
        assert_eq!(p.slot, 1);
    }

    #[test]
    fn test_begin_death_only_once() {
        let mut p = player(Side::Left);
        let mut intents = Vec::new();
        assert!(p.begin_death(&mut intents));
        assert!(!p.begin_death(&mut intents));
        assert_eq!(intents, vec![RenderIntent::DetachCamera]);
    }
}
