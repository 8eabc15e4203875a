//! Level and player configuration
//!
//! Immutable for the lifetime of a level. Loaded from JSON by the host or built
//! from defaults, and validated before any row is generated.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::JumpArc;

/// Relative weights for the three row layouts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    /// Only the left pillar exists
    pub left_only: f32,
    /// Only the right pillar exists
    pub right_only: f32,
    /// Both pillars exist
    pub both: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            left_only: 1.0,
            right_only: 1.0,
            both: 2.0,
        }
    }
}

impl SpawnWeights {
    pub fn total(&self) -> f32 {
        self.left_only + self.right_only + self.both
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("left_only", self.left_only),
            ("right_only", self.right_only),
            ("both", self.both),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let total = self.total();
        if !total.is_finite() {
            return Err(ConfigError::NonFiniteTotalWeight(total));
        }
        if total <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }
        Ok(())
    }
}

/// Which row gets scheduled for despawn when a jump lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DespawnPolicy {
    /// The row the player just left
    #[default]
    Vacated,
    /// The row the player just landed on; it crumbles unless the player moves on
    Landed,
}

/// Track layout and despawn tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Rows kept materialized ahead of the player
    pub visible_rows: usize,
    /// Finite number of rows in the level, `None` for an endless track
    pub total_rows: Option<u32>,
    /// Lateral (x), vertical (y) and depth (z) spacing between rows
    pub position_offset: Vec3,
    pub spawn_weights: SpawnWeights,
    /// Seconds a scheduled row stays before eviction
    pub despawn_delay: f32,
    /// Pending despawns allowed before the oldest are evicted regardless of timer
    pub max_active_passed_rows: usize,
    pub despawn_policy: DespawnPolicy,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            visible_rows: 12,
            total_rows: None,
            position_offset: Vec3::new(1.5, 0.5, 2.0),
            spawn_weights: SpawnWeights::default(),
            despawn_delay: 5.0,
            max_active_passed_rows: 4,
            despawn_policy: DespawnPolicy::Vacated,
        }
    }
}

impl LevelSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_weights.validate()?;
        if self.visible_rows == 0 {
            return Err(ConfigError::NoVisibleRows);
        }
        if self.total_rows == Some(0) {
            return Err(ConfigError::ZeroTotalRows);
        }
        if !self.despawn_delay.is_finite() || self.despawn_delay < 0.0 {
            return Err(ConfigError::NegativeDuration {
                name: "despawn_delay",
                value: self.despawn_delay,
            });
        }
        for (name, value) in [
            ("position_offset.x", self.position_offset.x),
            ("position_offset.y", self.position_offset.y),
            ("position_offset.z", self.position_offset.z),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }

    /// Rows generated up front by initialize
    pub fn initial_rows(&self) -> usize {
        match self.total_rows {
            Some(limit) => self.visible_rows.min(limit as usize),
            None => self.visible_rows,
        }
    }
}

/// Player motion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Seconds per jump (also used for the death fall)
    pub jump_duration: f32,
    pub jump_arc: JumpArc,
    /// Height of the player above the pillar top it stands on
    pub player_height: f32,
    /// How far the player falls when dying
    pub death_drop: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            jump_duration: 0.35,
            jump_arc: JumpArc::default(),
            player_height: 1.0,
            death_drop: crate::consts::DEATH_DROP,
        }
    }
}

impl PlayerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jump_duration.is_finite() || self.jump_duration <= 0.0 {
            return Err(ConfigError::NonPositiveJumpDuration(self.jump_duration));
        }
        if !self.death_drop.is_finite() || self.death_drop < 0.0 {
            return Err(ConfigError::NegativeDuration {
                name: "death_drop",
                value: self.death_drop,
            });
        }
        if !self.player_height.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "player_height",
                value: self.player_height,
            });
        }
        Ok(())
    }
}

/// Complete configuration for one level
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameSettings {
    pub level: LevelSettings,
    pub player: PlayerSettings,
}

impl GameSettings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        self.player.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut settings = GameSettings::default();
        settings.level.spawn_weights.right_only = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidWeight { name: "right_only", .. })
        ));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut settings = GameSettings::default();
        settings.level.spawn_weights = SpawnWeights {
            left_only: 0.0,
            right_only: 0.0,
            both: 0.0,
        };
        assert!(matches!(settings.validate(), Err(ConfigError::ZeroTotalWeight)));
    }

    #[test]
    fn test_overflowing_weight_total_rejected() {
        let mut settings = GameSettings::default();
        settings.level.spawn_weights = SpawnWeights {
            left_only: 3e38,
            right_only: 3e38,
            both: 0.0,
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFiniteTotalWeight(_))
        ));
        assert!(crate::sim::GameState::new(&settings, 1).is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut settings = GameSettings::default();
        settings.player.jump_duration = f32::INFINITY;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveJumpDuration(_))
        ));
        assert!(crate::sim::GameState::new(&settings, 1).is_err());

        let mut settings = GameSettings::default();
        settings.level.despawn_delay = f32::INFINITY;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeDuration { name: "despawn_delay", .. })
        ));

        let mut settings = GameSettings::default();
        settings.player.death_drop = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeDuration { name: "death_drop", .. })
        ));

        let mut settings = GameSettings::default();
        settings.level.position_offset.y = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonFinite { name: "position_offset.y", .. })
        ));
    }

    #[test]
    fn test_bad_durations_rejected() {
        let mut settings = GameSettings::default();
        settings.level.despawn_delay = -0.5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeDuration { name: "despawn_delay", .. })
        ));

        let mut settings = GameSettings::default();
        settings.player.jump_duration = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveJumpDuration(_))
        ));
    }

    #[test]
    fn test_row_counts_rejected() {
        let mut settings = GameSettings::default();
        settings.level.visible_rows = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::NoVisibleRows)));

        let mut settings = GameSettings::default();
        settings.level.total_rows = Some(0);
        assert!(matches!(settings.validate(), Err(ConfigError::ZeroTotalRows)));
    }

    #[test]
    fn test_initial_rows_capped_by_total() {
        let mut level = LevelSettings::default();
        level.visible_rows = 10;
        level.total_rows = Some(5);
        assert_eq!(level.initial_rows(), 5);
        level.total_rows = None;
        assert_eq!(level.initial_rows(), 10);
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "level": {
                "visible_rows": 6,
                "total_rows": 20,
                "spawn_weights": { "left_only": 1.0, "right_only": 0.0, "both": 0.0 },
                "despawn_policy": "landed"
            },
            "player": { "jump_duration": 0.5, "jump_arc": { "kind": "flat" } }
        }"#;
        let settings = GameSettings::from_json(json).unwrap();
        assert_eq!(settings.level.visible_rows, 6);
        assert_eq!(settings.level.total_rows, Some(20));
        assert_eq!(settings.level.despawn_policy, DespawnPolicy::Landed);
        assert_eq!(settings.level.despawn_delay, 5.0);
        assert_eq!(settings.player.jump_arc, JumpArc::Flat);
        assert_eq!(settings.player.death_drop, 6.0);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            GameSettings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameSettings::from_json(r#"{"player": {"jump_duration": -1.0}}"#),
            Err(ConfigError::NonPositiveJumpDuration(_))
        ));
    }
}
