//! Simulation state and the per-frame tick
//!
//! Wires the row track and the player together. Everything produced between
//! two drains (row creation, motion, deaths, scoring) is queued on the state.

use rand::Rng;
use rand_pcg::Pcg32;

use super::player::{JumpOutcome, MotionEvent, Player};
use super::state::{DeathCause, GameEvent, PlayerPhase, RenderIntent, RngState, Side};
use super::track::RowTrack;
use crate::error::ConfigError;
use crate::settings::{DespawnPolicy, GameSettings};

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng_state: RngState,
    pub settings: GameSettings,
    pub track: RowTrack,
    pub player: Player,
    /// Seconds simulated since the current run started
    pub run_time: f32,
    rng: Pcg32,
    intents: Vec<RenderIntent>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Validate the settings and start the first run
    pub fn new(settings: &GameSettings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let rng_state = RngState::new(seed);
        let mut state = Self {
            rng: rng_state.to_rng(),
            rng_state,
            settings: settings.clone(),
            track: RowTrack::new(&settings.level),
            player: Player::spawn(&settings.player, settings.level.position_offset, Side::Left),
            run_time: 0.0,
            intents: Vec::new(),
            events: Vec::new(),
        };
        start_run(&mut state);
        Ok(state)
    }

    /// Swap in new settings and restart. Invalid settings leave the state untouched.
    pub fn reconfigure(&mut self, settings: &GameSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings.clone();
        self.clear_run();
        self.track = RowTrack::new(&settings.level);
        start_run(self);
        Ok(())
    }

    pub fn phase(&self) -> PlayerPhase {
        self.player.phase
    }

    pub fn push_intent(&mut self, intent: RenderIntent) {
        self.intents.push(intent);
    }

    pub fn drain_intents(&mut self) -> Vec<RenderIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tell the renderer to drop everything belonging to the current run
    fn clear_run(&mut self) {
        for row in self.track.rows() {
            self.intents.push(RenderIntent::DestroyRow { index: row.index });
        }
        if self.player.phase != PlayerPhase::Ended {
            self.intents.push(RenderIntent::DestroyPlayer);
        }
    }
}

/// Throw away the current run and start over with the same settings
pub fn initialize(state: &mut GameState) {
    if state.player.phase != PlayerPhase::Ended {
        state.intents.push(RenderIntent::DestroyPlayer);
    }
    start_run(state);
}

fn start_run(state: &mut GameState) {
    state.track.initialize(&mut state.rng, &mut state.intents);

    let side = if state.rng.random_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };
    state.player = Player::spawn(
        &state.settings.player,
        state.settings.level.position_offset,
        side,
    );
    state.run_time = 0.0;
    state.intents.push(RenderIntent::SpawnPlayer {
        position: state.player.position,
    });

    log::info!(
        "Run started: {} rows, limit {:?}, player on {:?}",
        state.track.len(),
        state.track.total_rows(),
        side
    );
}

/// Jump to the next row. Silently ignored unless the player is idle and alive.
pub fn jump(state: &mut GameState, switch_side: bool) {
    if !state.player.can_jump() {
        return;
    }

    // The player may have outrun eviction; give them a row to land on if the
    // level has one left
    if state.player.slot + 1 >= state.track.len() {
        state.track.generate_next_row(&mut state.rng, &mut state.intents);
    }

    match state.player.jump(switch_side, &state.track) {
        JumpOutcome::Ignored => {}
        JumpOutcome::Won => {
            log::info!("All {} rows cleared", state.player.logical_row);
            state.events.push(GameEvent::Won {
                row: state.player.logical_row,
            });
        }
        JumpOutcome::Jumped { alive } => {
            if !alive {
                log::debug!(
                    "Jumping to row {} {:?}: no pillar there",
                    state.player.logical_row,
                    state.player.side
                );
            }
            state.events.push(GameEvent::Scored(1));
        }
    }
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) {
    // Won freezes the run until restart
    if matches!(state.player.phase, PlayerPhase::Won | PlayerPhase::Ended) {
        return;
    }
    let dt = dt.max(0.0);
    state.run_time += dt;

    let GameState {
        settings,
        track,
        player,
        rng,
        intents,
        events,
        run_time,
        ..
    } = state;

    match player.advance(dt, intents) {
        Some(MotionEvent::Landed {
            vacated,
            landed,
            alive,
        }) => {
            let row = match settings.level.despawn_policy {
                DespawnPolicy::Vacated => vacated,
                DespawnPolicy::Landed => landed,
            };
            track.schedule_despawn(row, settings.level.despawn_delay);

            if !alive {
                log::info!("Player missed the pillar on row {}", landed);
                events.push(GameEvent::Died {
                    row: landed,
                    cause: DeathCause::MissedPillar,
                });
            }
        }
        Some(MotionEvent::FallFinished) => {
            log::info!(
                "Run ended on row {} after {:.1}s",
                player.logical_row,
                run_time
            );
        }
        None => {}
    }

    if !player.alive {
        return;
    }

    for eviction in track.age_and_evict(dt, rng, intents) {
        if player.on_row_evicted(eviction) && player.begin_death(intents) {
            log::info!("Row {} collapsed under the player", eviction.index);
            events.push(GameEvent::Died {
                row: eviction.index,
                cause: DeathCause::RowCollapsed,
            });
        }
    }
}
