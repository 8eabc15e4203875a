//! JavaScript-facing handle for browser hosts
//!
//! Intents cross the boundary as a JSON array string.

use wasm_bindgen::prelude::*;

use crate::analytics::LogAnalytics;
use crate::game::Game;
use crate::persistence::LocalStorageStore;
use crate::settings::GameSettings;

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Build a game from a settings JSON document (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, seed: u64) -> Result<WebGame, JsValue> {
        super::init_logging();
        let settings = if settings_json.trim().is_empty() {
            GameSettings::default()
        } else {
            GameSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let game = Game::new(
            &settings,
            seed,
            Box::new(LocalStorageStore),
            Box::new(LogAnalytics),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebGame { game })
    }

    /// Advance by `dt` seconds; returns the queued intents as JSON
    pub fn tick(&mut self, dt: f32) -> String {
        let intents = self.game.tick(dt);
        serde_json::to_string(&intents).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn jump(&mut self, switch_side: bool) {
        self.game.jump(switch_side);
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    pub fn score(&self) -> u32 {
        self.game.score().current
    }

    pub fn high_score(&self) -> u32 {
        self.game.score().high_score
    }
}
