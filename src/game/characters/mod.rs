// Character system
//
// This module contains everything related to characters:
// - Character data structure and the arena that owns them
// - Character stats and tuning
// - The action state machine shared by players and enemies
// - Player input controller and enemy AI
// - Animation signals exchanged with the host

pub mod character;
pub mod enemy;
pub mod player;
pub mod signals;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use character::{Character, CharacterArena, CharacterId, Controller};
pub use enemy::{EnemyBrain, EnemyIntent};
pub use player::PlayerController;
pub use signals::{AnimationEvent, AnimationParams, AnimationSink, AnimationTrigger, SignalRecorder};
pub use state::{ActionState, ActionStateMachine, AttackKind, HitOutcome, Locomotion};
pub use stats::{EnemyStats, HitboxStats, PlayerStats, ENEMY_STATS, PLAYER_STATS};
