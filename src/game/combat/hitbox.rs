// Attack hitbox: an owner-attached detection volume active only during a swing

use glam::Vec2;

use super::damage::{DamageEvent, Damageable};
use crate::core::math;
use crate::engine::physics::{CollisionLayer, LayerMask};
use crate::game::characters::stats::HitboxStats;

/// Activatable damage volume owned by a character.
///
/// Created disabled. Damage is only resolved on overlap-enter events, so a
/// target standing inside an active hitbox is hit once per entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    stats: HitboxStats,
    target_mask: LayerMask,
    enabled: bool,
}

impl Hitbox {
    /// Hitbox for a character on `owner_layer`, targeting the opposing side.
    /// Returns `None` for layers that cannot own a hitbox.
    pub fn for_owner(owner_layer: CollisionLayer, stats: HitboxStats) -> Option<Self> {
        let attack_layer = owner_layer.attack_layer()?;
        Some(Self::with_target_mask(
            owner_layer,
            stats,
            attack_layer.interacts_with(),
        ))
    }

    /// Hitbox with an explicit target mask. The owner's own layer is always
    /// removed from the mask.
    pub fn with_target_mask(
        owner_layer: CollisionLayer,
        stats: HitboxStats,
        target_mask: LayerMask,
    ) -> Self {
        if target_mask.contains(owner_layer) {
            log::warn!(
                "Hitbox target mask includes its owner's layer {:?}, removing it",
                owner_layer
            );
        }
        Self {
            stats,
            target_mask: target_mask.without(owner_layer),
            enabled: false,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop resolving immediately, even mid-overlap
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn target_mask(&self) -> LayerMask {
        self.target_mask
    }

    pub fn stats(&self) -> &HitboxStats {
        &self.stats
    }

    /// Offset of the volume relative to its owner for the given facing
    pub fn offset(&self, facing: f32) -> Vec2 {
        math::mirror_x(self.stats.offset, facing)
    }

    /// Resolve one overlap-enter against `target`.
    ///
    /// Deals damage exactly once when the hitbox is enabled, the target's
    /// layer is in the target mask and the target is still alive.
    pub fn resolve_enter(
        &self,
        owner_position: Vec2,
        target: &mut dyn Damageable,
    ) -> Option<DamageEvent> {
        if !self.enabled {
            return None;
        }
        if !self.target_mask.contains(target.layer()) || !target.is_alive() {
            return None;
        }

        let event = DamageEvent {
            amount: self.stats.damage,
            knockback: math::knockback(owner_position, target.position(), self.stats.knockback),
        };
        target.take_damage(event.amount, event.knockback);
        Some(event)
    }
}
