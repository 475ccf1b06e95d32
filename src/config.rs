// Game configuration loaded from RON

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use ron::Options;
use serde::{Deserialize, Serialize};

use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::game::characters::stats::{EnemyStats, HitboxStats, PlayerStats};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Everything tunable about a simulation run. Missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed tick duration (seconds)
    pub timestep: f32,
    pub player: PlayerStats,
    pub enemy: EnemyStats,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timestep: FIXED_TIMESTEP,
            player: PlayerStats::default(),
            enemy: EnemyStats::default(),
        }
    }
}

/// RON options with implicit `Some` so optional fields can be written bare
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

impl GameConfig {
    /// Parse and validate a configuration from RON text
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron_options().from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ron_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("timestep", self.timestep)?;
        validate_player(&self.player)?;
        validate_enemy(&self.enemy)?;
        Ok(())
    }
}

fn validate_player(stats: &PlayerStats) -> Result<(), ConfigError> {
    non_negative("player.move_speed", stats.move_speed)?;
    non_negative("player.jump_power", stats.jump_power)?;
    non_negative("player.dash_power", stats.dash_power)?;
    positive("player.dash_duration", stats.dash_duration)?;
    non_negative("player.dash_cooldown", stats.dash_cooldown)?;
    positive("player.combo_window", stats.combo_window)?;
    non_negative("player.attack_push", stats.attack_push)?;
    fraction("player.dash_attack_decay", stats.dash_attack_decay)?;
    health("player.max_health", stats.max_health)?;
    if let Some(recovery) = stats.hurt_recovery {
        positive("player.hurt_recovery", recovery)?;
    }
    validate_hitbox("player.hitbox", &stats.hitbox)?;
    positive("player.ground_ray_length", stats.ground_ray_length)?;
    non_negative("player.ground_overlap_radius", stats.ground_overlap_radius)?;
    extents("player.size", stats.size)?;
    Ok(())
}

fn validate_enemy(stats: &EnemyStats) -> Result<(), ConfigError> {
    non_negative("enemy.speed", stats.speed)?;
    non_negative("enemy.stop_distance", stats.stop_distance)?;
    non_negative("enemy.chase_range", stats.chase_range)?;
    if stats.chase_range < stats.stop_distance {
        return Err(invalid(
            "enemy.chase_range",
            format!(
                "must not be shorter than stop_distance ({})",
                stats.stop_distance
            ),
        ));
    }
    positive("enemy.vertical_tolerance", stats.vertical_tolerance)?;
    non_negative("enemy.attack_cooldown", stats.attack_cooldown)?;
    positive("enemy.ground_check_distance", stats.ground_check_distance)?;
    fraction("enemy.ledge_probe_inset", stats.ledge_probe_inset)?;
    health("enemy.max_health", stats.max_health)?;
    if let Some(recovery) = stats.hurt_recovery {
        positive("enemy.hurt_recovery", recovery)?;
    }
    validate_hitbox("enemy.hitbox", &stats.hitbox)?;
    extents("enemy.size", stats.size)?;
    Ok(())
}

fn validate_hitbox(field: &str, stats: &HitboxStats) -> Result<(), ConfigError> {
    if stats.damage < 0 {
        return Err(invalid(&format!("{field}.damage"), "must not be negative"));
    }
    non_negative(&format!("{field}.knockback"), stats.knockback)?;
    extents(&format!("{field}.half_extents"), stats.half_extents)?;
    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn fraction(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within 0..=1, got {value}")))
    }
}

fn health(field: &str, value: i32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be at least 1, got {value}")))
    }
}

fn extents(field: &str, value: Vec2) -> Result<(), ConfigError> {
    positive(&format!("{field}.x"), value.x)?;
    positive(&format!("{field}.y"), value.y)
}
