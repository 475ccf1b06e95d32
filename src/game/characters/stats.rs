// Character tuning
//
// Every value is a tunable constant. The presets below are the shipped
// defaults; a RON config file can override any field.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

/// Damage dealt by an attack hitbox and where it sits on its owner.
///
/// Missing fields in a config fall back to the owner's preset
/// (`PLAYER_HITBOX` or `ENEMY_HITBOX`), not to a shared default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxStats {
    /// Health removed per hit
    pub damage: i32,
    /// Knockback impulse magnitude
    pub knockback: f32,
    /// Center offset for a right-facing owner (mirrored when facing left)
    pub offset: Vec2,
    /// Half size of the detection box
    pub half_extents: Vec2,
}

pub const PLAYER_HITBOX: HitboxStats = HitboxStats {
    damage: 1,
    knockback: 5.0,
    offset: Vec2::new(0.6, 0.0),
    half_extents: Vec2::new(0.4, 0.4),
};

pub const ENEMY_HITBOX: HitboxStats = HitboxStats {
    damage: 1,
    knockback: 5.0,
    offset: Vec2::new(0.55, 0.0),
    half_extents: Vec2::new(0.35, 0.4),
};

/// Partial hitbox as written in a config file
#[derive(Deserialize)]
struct HitboxOverride {
    damage: Option<i32>,
    knockback: Option<f32>,
    offset: Option<Vec2>,
    half_extents: Option<Vec2>,
}

impl HitboxOverride {
    fn over(self, preset: HitboxStats) -> HitboxStats {
        HitboxStats {
            damage: self.damage.unwrap_or(preset.damage),
            knockback: self.knockback.unwrap_or(preset.knockback),
            offset: self.offset.unwrap_or(preset.offset),
            half_extents: self.half_extents.unwrap_or(preset.half_extents),
        }
    }
}

fn player_hitbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HitboxStats, D::Error> {
    HitboxOverride::deserialize(deserializer).map(|partial| partial.over(PLAYER_HITBOX))
}

fn enemy_hitbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HitboxStats, D::Error> {
    HitboxOverride::deserialize(deserializer).map(|partial| partial.over(ENEMY_HITBOX))
}

/// Player movement, dash and combo tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    // Movement
    /// Horizontal speed at full axis (units/second)
    pub move_speed: f32,
    /// Upward jump impulse
    pub jump_power: f32,

    // Dash
    /// Horizontal speed forced while dashing
    pub dash_power: f32,
    /// How long a dash lasts (seconds)
    pub dash_duration: f32,
    /// Minimum time between two dash starts (seconds)
    pub dash_cooldown: f32,

    // Combat
    /// Time after the first hit during which a second input chains the combo
    pub combo_window: f32,
    /// Forward impulse applied when an attack swing starts
    pub attack_push: f32,
    /// Horizontal velocity kept per tick during a dash attack
    pub dash_attack_decay: f32,
    pub max_health: i32,
    /// Fallback Hurt duration when the host never reports the hurt animation end
    pub hurt_recovery: Option<f32>,
    #[serde(deserialize_with = "player_hitbox")]
    pub hitbox: HitboxStats,

    // Ground check
    /// Length of the downward ray cast from the feet
    pub ground_ray_length: f32,
    /// Fallback overlap circle center, relative to the body, for a right-facing player
    pub ground_overlap_offset: Vec2,
    pub ground_overlap_radius: f32,

    // Dimensions (for physics collider)
    pub size: Vec2,
}

pub const PLAYER_STATS: PlayerStats = PlayerStats {
    move_speed: 5.0,
    jump_power: 10.0,

    dash_power: 15.0,
    dash_duration: 0.2,
    dash_cooldown: 1.0,

    combo_window: 0.6,
    attack_push: 2.0,
    dash_attack_decay: 0.9,
    max_health: 3,
    hurt_recovery: None,
    hitbox: PLAYER_HITBOX,

    ground_ray_length: 0.1,
    // The circle trails the facing direction
    ground_overlap_offset: Vec2::new(-0.235, -0.65),
    ground_overlap_radius: 0.2,

    size: Vec2::new(0.5, 1.2),
};

impl Default for PlayerStats {
    fn default() -> Self {
        PLAYER_STATS
    }
}

/// Enemy patrol, chase and attack tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// Patrol and chase speed (units/second)
    pub speed: f32,
    /// Horizontal distance under which the enemy chases its target
    pub chase_range: f32,
    /// Horizontal distance under which the enemy stops and attacks
    pub stop_distance: f32,
    /// Vertical distance under which the target counts as on the same floor
    pub vertical_tolerance: f32,
    /// Minimum time between two attack triggers (seconds)
    pub attack_cooldown: f32,
    /// Length of the ledge probe cast down from the leading edge
    pub ground_check_distance: f32,
    /// Fraction of the half width where the ledge probe starts
    pub ledge_probe_inset: f32,
    pub max_health: i32,
    pub hurt_recovery: Option<f32>,
    #[serde(deserialize_with = "enemy_hitbox")]
    pub hitbox: HitboxStats,
    pub size: Vec2,
}

pub const ENEMY_STATS: EnemyStats = EnemyStats {
    speed: 2.0,
    chase_range: 5.0,
    stop_distance: 1.2,
    vertical_tolerance: 1.0,
    attack_cooldown: 1.5,
    ground_check_distance: 0.2,
    ledge_probe_inset: 0.9,
    max_health: 3,
    hurt_recovery: None,
    hitbox: ENEMY_HITBOX,
    size: Vec2::new(0.6, 1.0),
};

impl Default for EnemyStats {
    fn default() -> Self {
        ENEMY_STATS
    }
}
