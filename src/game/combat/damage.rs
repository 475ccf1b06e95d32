// Damage contract shared by every hittable entity

use glam::Vec2;

use crate::engine::physics::CollisionLayer;
use crate::game::characters::CharacterId;

/// Anything that can be hit by a hitbox
pub trait Damageable {
    /// Apply damage and a knockback impulse. Ignored once dead.
    fn take_damage(&mut self, amount: i32, knockback: Vec2);

    /// World position used to orient knockback
    fn position(&self) -> Vec2;

    /// Body layer, checked against a hitbox's target mask
    fn layer(&self) -> CollisionLayer;

    fn is_alive(&self) -> bool;
}

/// Health pool, always within `0..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Remove `amount` health, clamped to the pool. Returns the health left.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.current = self.current.saturating_sub(amount).clamp(0, self.max);
        self.current
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// Damage delivered by one overlap-enter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub amount: i32,
    pub knockback: Vec2,
}

/// Record of a resolved hit, handed to the host (scoring, drops, effects)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub attacker: CharacterId,
    pub target: CharacterId,
    pub damage: DamageEvent,
    /// Whether this hit killed the target
    pub lethal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_starts_full() {
        let health = Health::new(3);
        assert_eq!(health.current(), 3);
        assert_eq!(health.max(), 3);
        assert!(!health.is_depleted());
    }

    #[test]
    fn test_health_never_negative() {
        let mut health = Health::new(3);
        assert_eq!(health.apply_damage(10), 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_negative_damage_never_overheals() {
        let mut health = Health::new(3);
        health.apply_damage(1);
        assert_eq!(health.apply_damage(-5), 3);
    }

    #[test]
    fn test_health_extreme_values() {
        let mut health = Health::new(3);
        assert_eq!(health.apply_damage(i32::MIN), 3);
        assert_eq!(health.apply_damage(i32::MAX), 0);
    }

    #[test]
    fn test_zero_max_is_raised() {
        let health = Health::new(0);
        assert_eq!(health.max(), 1);
    }
}
