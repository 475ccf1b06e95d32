use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::BodyCommand;
use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue, CollisionLayer};
use super::{to_vec2, to_vector, GroundQueries};
use crate::engine::game_loop::FIXED_TIMESTEP;

/// What a collider represents for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderRole {
    /// The character's own body (hurtbox)
    Body,
    /// An attack hitbox owned by the character
    Hitbox,
}

/// Game entity that owns a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderOwner {
    pub entity: u32,
    pub role: ColliderRole,
}

/// rapier2d host for the gameplay core.
///
/// Owns the rapier pipeline, answers ground queries and records which game
/// entity owns each collider so overlap events can be routed to characters.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,

    // rapier pipeline state
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    bodies: RigidBodySet,
    colliders: ColliderSet,

    /// Collision events of the last step
    events: CollisionEventQueue,
    /// Game entity owning each character collider
    collider_owners: HashMap<ColliderHandle, ColliderOwner>,
}

impl PhysicsWorld {
    /// Create a new physics world with platformer gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec2::new(0.0, -9.81))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIMESTEP;

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            events: CollisionEventQueue::new(),
            collider_owners: HashMap::new(),
        }
    }

    /// Advance one fixed tick. Collision events of the previous tick are discarded.
    pub fn step(&mut self) {
        self.events.clear();

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );
    }

    /// Sync ground queries with the current colliders.
    /// Needed after adding colliders if queries run before the next step.
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.bodies, &self.colliders);
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent_handle, &mut self.bodies)
    }

    /// Add a collider and record which entity owns it
    pub fn add_owned_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
        owner: ColliderOwner,
    ) -> ColliderHandle {
        let handle = self.add_collider(collider, parent_handle);
        self.collider_owners.insert(handle, owner);
        handle
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.bodies.get(handle) {
            for collider in body.colliders() {
                self.collider_owners.remove(collider);
            }
        }
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Entity owning a collider
    pub fn collider_owner(&self, handle: ColliderHandle) -> Option<ColliderOwner> {
        self.collider_owners.get(&handle).copied()
    }

    /// Body position and linear velocity
    pub fn kinematics(&self, handle: RigidBodyHandle) -> Option<(Vec2, Vec2)> {
        self.bodies
            .get(handle)
            .map(|body| (to_vec2(body.translation()), to_vec2(body.linvel())))
    }

    /// Apply a motion command to a body
    pub fn apply(&mut self, handle: RigidBodyHandle, command: BodyCommand) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };

        match command {
            BodyCommand::SetVelocityX(vx) => {
                let vy = body.linvel().y;
                body.set_linvel(vector![vx, vy], true);
            }
            BodyCommand::SetVelocity(velocity) => {
                body.set_linvel(to_vector(velocity), true);
            }
            BodyCommand::ScaleVelocityX(factor) => {
                let velocity = *body.linvel();
                body.set_linvel(vector![velocity.x * factor, velocity.y], true);
            }
            BodyCommand::Impulse(impulse) => {
                body.apply_impulse(to_vector(impulse), true);
            }
            BodyCommand::Deactivate => {
                body.set_linvel(Vector::zeros(), false);
                body.set_enabled(false);
                let colliders: Vec<ColliderHandle> = body.colliders().to_vec();
                for collider in colliders {
                    self.set_collider_enabled(collider, false);
                }
            }
        }
    }

    /// Enable or disable a collider (hitbox activation)
    pub fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.colliders.get_mut(handle) {
            if collider.is_enabled() != enabled {
                collider.set_enabled(enabled);
            }
        }
    }

    /// Move a collider relative to its parent body
    pub fn set_collider_offset(&mut self, handle: ColliderHandle, offset: Vec2) {
        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.set_position_wrt_parent(Isometry::translation(offset.x, offset.y));
        }
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        ray_origin: Vector<Real>,
        ray_dir: Vector<Real>,
        max_toi: Real,
        solid: bool,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, Real)> {
        let ray = Ray::new(point![ray_origin.x, ray_origin.y], ray_dir);
        self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_toi,
            solid,
            filter,
        )
    }

    /// Query filter that only sees ground geometry
    fn ground_filter() -> QueryFilter<'static> {
        QueryFilter::default().groups(InteractionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(CollisionLayer::Ground.bits()),
        ))
    }

    /// Get all collision events from the last step
    pub fn get_collision_events(&self) -> Vec<GameCollisionEvent> {
        self.events.events()
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec2 {
        to_vec2(&self.gravity)
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl GroundQueries for PhysicsWorld {
    fn is_ground_at(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return false;
        }
        self.raycast(
            to_vector(origin),
            to_vector(direction),
            max_distance,
            true,
            Self::ground_filter(),
        )
        .is_some()
    }

    fn overlaps_ground(&self, center: Vec2, radius: f32) -> bool {
        let shape = Ball::new(radius);
        let position = Isometry::translation(center.x, center.y);
        self.query_pipeline
            .intersection_with_shape(
                &self.bodies,
                &self.colliders,
                &position,
                &shape,
                Self::ground_filter(),
            )
            .is_some()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
