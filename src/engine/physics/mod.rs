// Physics host built on rapier2d
//
// The gameplay core never talks to rapier directly: it queries ground through
// `GroundQueries` and emits `BodyCommand`s. `PhysicsWorld` is the concrete
// host used by the simulation and the headless demo.

pub mod body;
mod collision;
mod world;

pub use body::{BodyCommand, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionLayer, LayerMask};
pub use world::{ColliderOwner, ColliderRole, PhysicsWorld};

use glam::Vec2;
use rapier2d::prelude::{Real, Vector};

/// Ground sensing capability the character controllers depend on
pub trait GroundQueries {
    /// Cast a ray from `origin` and report whether ground lies within `max_distance`
    fn is_ground_at(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool;

    /// Report whether a circle at `center` overlaps ground
    fn overlaps_ground(&self, center: Vec2, radius: f32) -> bool;
}

pub(crate) fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

pub(crate) fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}
