//! Host-facing game facade
//!
//! Owns the simulation, the score tracker and the collaborators, and routes
//! simulation events to score keeping and analytics.

use serde_json::json;

use crate::analytics::{Analytics, EventFields, event_fields};
use crate::error::ConfigError;
use crate::highscores::{ScoreSnapshot, ScoreTracker};
use crate::persistence::HighScoreStore;
use crate::settings::GameSettings;
use crate::sim::{self, GameEvent, GameState, PlayerPhase, RenderIntent};

pub struct Game {
    state: GameState,
    score: ScoreTracker,
    analytics: Box<dyn Analytics>,
}

impl Game {
    /// Validate `settings`, start the first run and report `app_start`
    pub fn new(
        settings: &GameSettings,
        seed: u64,
        store: Box<dyn HighScoreStore>,
        mut analytics: Box<dyn Analytics>,
    ) -> Result<Self, ConfigError> {
        let state = GameState::new(settings, seed)?;
        analytics.log_event("app_start", &EventFields::new());

        let mut game = Self {
            state,
            score: ScoreTracker::new(store),
            analytics,
        };
        game.push_score();
        log::info!("Game created with seed {}", seed);
        Ok(game)
    }

    /// Replace the settings and start over. Rejected settings leave the game as it was.
    pub fn initialize(&mut self, settings: &GameSettings) -> Result<(), ConfigError> {
        self.state.reconfigure(settings)?;
        self.score.reset();
        self.push_score();
        Ok(())
    }

    /// Start a new run with the current settings
    pub fn restart(&mut self) {
        sim::initialize(&mut self.state);
        self.score.reset();
        self.push_score();
        log::info!("Game restarted");
    }

    /// Jump to the next row, switching sides if asked. No-op unless idle.
    pub fn jump(&mut self, switch_side: bool) {
        sim::jump(&mut self.state, switch_side);
        self.route_events();
    }

    /// Advance by `dt` seconds and return every intent queued since the last drain
    pub fn tick(&mut self, dt: f32) -> Vec<RenderIntent> {
        sim::tick(&mut self.state, dt);
        self.route_events();
        self.state.drain_intents()
    }

    pub fn drain_intents(&mut self) -> Vec<RenderIntent> {
        self.state.drain_intents()
    }

    pub fn score(&self) -> ScoreSnapshot {
        self.score.snapshot()
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn route_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Scored(points) => {
                    if self.score.award(points) {
                        log::debug!("New high score {}", self.score.high_score());
                    }
                    self.push_score();
                }
                GameEvent::Died { row, cause } => {
                    log::info!("Player died on row {} ({})", row, cause.as_str());
                    self.analytics.log_event(
                        "player_death",
                        &event_fields([
                            ("score", json!(self.score.current())),
                            ("row", json!(row)),
                            ("cause", json!(cause.as_str())),
                        ]),
                    );
                }
                GameEvent::Won { row } => {
                    log::info!("Level won on row {}", row);
                    self.analytics.log_event(
                        "level_won",
                        &event_fields([("score", json!(self.score.current()))]),
                    );
                }
            }
        }
    }

    fn push_score(&mut self) {
        let snapshot = self.score.snapshot();
        self.state.push_intent(RenderIntent::ScoreChanged {
            current: snapshot.current,
            high_score: snapshot.high_score,
        });
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{NullAnalytics, RecordingAnalytics};
    use crate::persistence::MemoryStore;
    use crate::settings::{LevelSettings, PlayerSettings, SpawnWeights};
    use crate::sim::{JumpArc, Side};

    fn left_only() -> GameSettings {
        GameSettings {
            level: LevelSettings {
                visible_rows: 6,
                spawn_weights: SpawnWeights {
                    left_only: 1.0,
                    right_only: 0.0,
                    both: 0.0,
                },
                ..Default::default()
            },
            player: PlayerSettings {
                jump_duration: 1.0,
                jump_arc: JumpArc::Flat,
                ..Default::default()
            },
        }
    }

    fn game(store: MemoryStore, analytics: RecordingAnalytics) -> Game {
        Game::new(&left_only(), 11, Box::new(store), Box::new(analytics)).unwrap()
    }

    /// Switch flag that lands on the left pillar
    fn to_left(game: &Game) -> bool {
        game.state().player.side == Side::Right
    }

    #[test]
    fn test_new_logs_app_start_and_score() {
        let analytics = RecordingAnalytics::new();
        let mut game = game(MemoryStore::with_value(7), analytics.clone());
        assert_eq!(analytics.names(), vec!["app_start"]);
        assert_eq!(game.score(), ScoreSnapshot { current: 0, high_score: 7 });
        assert!(game.drain_intents().contains(&RenderIntent::ScoreChanged {
            current: 0,
            high_score: 7
        }));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = left_only();
        settings.level.spawn_weights.both = -2.0;
        let result = Game::new(
            &settings,
            1,
            Box::new(MemoryStore::new()),
            Box::new(NullAnalytics),
        );
        assert!(matches!(result, Err(ConfigError::InvalidWeight { .. })));

        let mut settings = left_only();
        settings.level.spawn_weights.left_only = f32::MAX;
        settings.level.spawn_weights.both = f32::MAX;
        let result = Game::new(
            &settings,
            1,
            Box::new(MemoryStore::new()),
            Box::new(NullAnalytics),
        );
        assert!(matches!(result, Err(ConfigError::NonFiniteTotalWeight(_))));
    }

    #[test]
    fn test_jumps_award_and_persist() {
        let store = MemoryStore::new();
        let mut game = game(store.clone(), RecordingAnalytics::new());
        for _ in 0..3 {
            let switch = to_left(&game);
            game.jump(switch);
            game.tick(0.5);
            game.tick(0.5);
        }
        assert_eq!(game.phase(), PlayerPhase::Idle);
        assert_eq!(game.score(), ScoreSnapshot { current: 3, high_score: 3 });
        assert_eq!(store.get(), Some(3));
    }

    #[test]
    fn test_death_reports_and_restart_resets() {
        let analytics = RecordingAnalytics::new();
        let store = MemoryStore::new();
        let mut game = game(store.clone(), analytics.clone());

        let switch = to_left(&game);
        game.jump(switch);
        game.tick(1.0);
        let switch = !to_left(&game);
        game.jump(switch);
        let intents = game.tick(1.0);
        assert_eq!(game.phase(), PlayerPhase::Dying);
        assert!(intents.contains(&RenderIntent::DetachCamera));

        let (name, fields) = analytics.events().last().cloned().unwrap();
        assert_eq!(name, "player_death");
        assert_eq!(fields.get("row"), Some(&json!(2)));
        assert_eq!(fields.get("cause"), Some(&json!("missed_pillar")));

        let intents = game.tick(1.0);
        assert_eq!(game.phase(), PlayerPhase::Ended);
        assert!(intents.contains(&RenderIntent::DestroyPlayer));

        game.restart();
        assert_eq!(game.phase(), PlayerPhase::Idle);
        assert_eq!(game.score(), ScoreSnapshot { current: 0, high_score: 2 });
        let intents = game.drain_intents();
        assert!(matches!(intents.first(), Some(RenderIntent::DestroyRow { .. })));
        assert!(!intents.contains(&RenderIntent::DestroyPlayer));
    }

    #[test]
    fn test_jump_while_jumping_is_noop() {
        let mut game = game(MemoryStore::new(), RecordingAnalytics::new());
        game.jump(false);
        let score = game.score();
        let row = game.state().player.logical_row;
        game.jump(true);
        game.jump(false);
        assert_eq!(game.score(), score);
        assert_eq!(game.state().player.logical_row, row);
    }

    #[test]
    fn test_initialize_swaps_settings() {
        let mut game = game(MemoryStore::new(), RecordingAnalytics::new());
        let mut settings = left_only();
        settings.level.visible_rows = 3;
        game.initialize(&settings).unwrap();
        assert_eq!(game.state().track.len(), 3);

        settings.player.jump_duration = 0.0;
        assert!(game.initialize(&settings).is_err());
        assert_eq!(game.state().track.len(), 3);
    }
}
