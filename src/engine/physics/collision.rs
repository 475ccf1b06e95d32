use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Collision layers for filtering which colliders can touch each other
///
/// Attack layers are kept separate from body layers so that an attacker's
/// hitbox never targets its own body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionLayer {
    /// Static level geometry the ground probes look for
    Ground = 0b0000_0001,

    /// Player character bodies
    Player = 0b0000_0010,

    /// Enemy character bodies
    Enemy = 0b0000_0100,

    /// Hitboxes owned by the player
    PlayerAttack = 0b0000_1000,

    /// Hitboxes owned by enemies
    EnemyAttack = 0b0001_0000,
}

impl CollisionLayer {
    pub const ALL: [CollisionLayer; 5] = [
        CollisionLayer::Ground,
        CollisionLayer::Player,
        CollisionLayer::Enemy,
        CollisionLayer::PlayerAttack,
        CollisionLayer::EnemyAttack,
    ];

    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Layers this layer interacts with
    pub fn interacts_with(self) -> LayerMask {
        match self {
            // Bodies rest on ground and receive the opposing side's attacks,
            // they pass through each other
            CollisionLayer::Player => {
                LayerMask::from_layers(&[CollisionLayer::Ground, CollisionLayer::EnemyAttack])
            }
            CollisionLayer::Enemy => {
                LayerMask::from_layers(&[CollisionLayer::Ground, CollisionLayer::PlayerAttack])
            }

            CollisionLayer::Ground => {
                LayerMask::from_layers(&[CollisionLayer::Player, CollisionLayer::Enemy])
            }

            CollisionLayer::PlayerAttack => LayerMask::single(CollisionLayer::Enemy),
            CollisionLayer::EnemyAttack => LayerMask::single(CollisionLayer::Player),
        }
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.bits()),
            Group::from_bits_truncate(self.interacts_with().bits()),
        )
    }

    /// Hitbox layer for characters on this body layer
    pub fn attack_layer(self) -> Option<CollisionLayer> {
        match self {
            CollisionLayer::Player => Some(CollisionLayer::PlayerAttack),
            CollisionLayer::Enemy => Some(CollisionLayer::EnemyAttack),
            _ => None,
        }
    }
}

/// Set of collision layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    pub fn single(layer: CollisionLayer) -> Self {
        Self(layer.bits())
    }

    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        Self(layers.iter().fold(0, |bits, layer| bits | layer.bits()))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & layer.bits() != 0
    }

    pub fn with(self, layer: CollisionLayer) -> Self {
        Self(self.0 | layer.bits())
    }

    pub fn without(self, layer: CollisionLayer) -> Self {
        Self(self.0 & !layer.bits())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Contact or overlap change between two colliders, as reported by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// The pair started touching (overlap-enter for sensors)
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// The pair separated, or one of them was disabled
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl From<rapier2d::prelude::CollisionEvent> for CollisionEvent {
    fn from(event: rapier2d::prelude::CollisionEvent) -> Self {
        match event {
            rapier2d::prelude::CollisionEvent::Started(collider1, collider2, _) => {
                Self::Started {
                    collider1,
                    collider2,
                }
            }
            rapier2d::prelude::CollisionEvent::Stopped(collider1, collider2, _) => {
                Self::Stopped {
                    collider1,
                    collider2,
                }
            }
        }
    }
}

/// Collects the collision events rapier reports during one step, in report order
#[derive(Default)]
pub struct CollisionEventQueue {
    events: Mutex<Vec<CollisionEvent>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous step's events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<CollisionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => {
                log::warn!("Collision event queue poisoned, dropping events");
                Vec::new()
            }
        }
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.into());
        }
    }

    // Contact forces are not used by the gameplay core
    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_layer_bits() {
        // Ensure each layer has a unique bit
        for (i, layer1) in CollisionLayer::ALL.iter().enumerate() {
            for (j, layer2) in CollisionLayer::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(layer1.bits(), layer2.bits(), "Layers must have unique bits");
                }
            }
        }
    }

    #[test]
    fn test_attack_layers_never_target_their_owner() {
        for body in [CollisionLayer::Player, CollisionLayer::Enemy] {
            let attack = body.attack_layer().unwrap();
            assert!(!attack.interacts_with().contains(body));
        }
    }

    #[test]
    fn test_interactions_are_symmetric() {
        for a in CollisionLayer::ALL {
            for b in CollisionLayer::ALL {
                assert_eq!(
                    a.interacts_with().contains(b),
                    b.interacts_with().contains(a),
                    "{:?} / {:?} interaction must be mutual",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_player_doesnt_collide_with_enemy_body() {
        let groups = CollisionLayer::Player.to_interaction_groups();
        let enemy_bit = Group::from_bits_truncate(CollisionLayer::Enemy.bits());
        assert!(!groups.filter.contains(enemy_bit));
    }

    #[test]
    fn test_layer_mask_ops() {
        let mask = LayerMask::single(CollisionLayer::Enemy).with(CollisionLayer::Player);
        assert!(mask.contains(CollisionLayer::Enemy));
        assert!(mask.contains(CollisionLayer::Player));
        assert!(!mask.contains(CollisionLayer::Ground));

        let mask = mask.without(CollisionLayer::Player);
        assert!(!mask.contains(CollisionLayer::Player));
        assert!(LayerMask::NONE.is_empty());
    }
}
