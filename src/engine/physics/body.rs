use super::collision::CollisionLayer;
use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Motion command emitted by the action state machine for one body.
///
/// Commands are applied to the physics host in the order they were emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    /// Overwrite horizontal velocity, keep vertical
    SetVelocityX(f32),
    /// Overwrite the whole linear velocity
    SetVelocity(Vec2),
    /// Multiply horizontal velocity (used for decaying slides)
    ScaleVelocityX(f32),
    /// Instantaneous velocity change scaled by mass
    Impulse(Vec2),
    /// Stop simulating the body and its colliders for good
    Deactivate,
}

/// Common body and collider configurations for platformer objects
pub mod presets {
    use super::*;

    /// Character body: dynamic, upright, always awake
    pub fn character_body(position: Vec2) -> RigidBody {
        RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .lock_rotations()
            .can_sleep(false)
            .build()
    }

    /// Character collider: a frictionless box of the given size with unit mass,
    /// so impulses map 1:1 to velocity changes
    pub fn character_collider(layer: CollisionLayer, size: Vec2) -> Collider {
        on_layer(ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0), layer)
            .friction(0.0)
            .mass(1.0)
            .build()
    }

    /// Hitbox sensor attached to its owner's body. Massless.
    pub fn hitbox_sensor(layer: CollisionLayer, half_extents: Vec2, offset: Vec2) -> Collider {
        on_layer(ColliderBuilder::cuboid(half_extents.x, half_extents.y), layer)
            .translation(vector![offset.x, offset.y])
            .sensor(true)
            .density(0.0)
            .build()
    }

    /// Static platform body
    pub fn platform_body(center: Vec2) -> RigidBody {
        RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build()
    }

    /// Platform collider on the ground layer
    pub fn platform_collider(size: Vec2) -> Collider {
        on_layer(
            ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0),
            CollisionLayer::Ground,
        )
        .friction(0.3)
        .build()
    }

    /// Collision filtering and event reporting shared by every game collider
    fn on_layer(builder: ColliderBuilder, layer: CollisionLayer) -> ColliderBuilder {
        builder
            .collision_groups(layer.to_interaction_groups())
            .restitution(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
    }
}
