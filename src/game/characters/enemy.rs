// Enemy AI: distance thresholds feed synthetic intent into the action state machine

use glam::Vec2;

use super::character::CharacterId;
use super::state::{ActionState, ActionStateMachine, AttackKind, Locomotion};
use super::stats::EnemyStats;
use crate::engine::physics::{BodyCommand, GroundQueries};

/// What the enemy wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyIntent {
    /// Walk in the facing direction, turning at ledges
    Patrol,
    /// Run toward the target (signed horizontal direction)
    Chase { direction: f32 },
    /// Stand and strike
    Attack,
}

/// Decision layer for an AI-controlled enemy
#[derive(Debug)]
pub struct EnemyBrain {
    stats: EnemyStats,
    target: Option<CharacterId>,
}

impl EnemyBrain {
    pub fn new(stats: EnemyStats) -> Self {
        Self {
            stats,
            target: None,
        }
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn target(&self) -> Option<CharacterId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<CharacterId>) {
        self.target = target;
    }

    /// Pick an intent from the distance to the target. Attack wins over chase.
    pub fn decide(&self, position: Vec2, target: Option<Vec2>) -> EnemyIntent {
        let Some(target) = target else {
            return EnemyIntent::Patrol;
        };

        let dx = (target.x - position.x).abs();
        let dy = (target.y - position.y).abs();
        let same_floor = dy < self.stats.vertical_tolerance;

        if dx <= self.stats.stop_distance && same_floor {
            EnemyIntent::Attack
        } else if dx <= self.stats.chase_range && same_floor {
            EnemyIntent::Chase {
                direction: target.x - position.x,
            }
        } else {
            EnemyIntent::Patrol
        }
    }

    /// Probe below the leading edge of the body for ground
    pub fn ground_ahead(&self, ground: &dyn GroundQueries, position: Vec2, facing: f32) -> bool {
        let half = self.stats.size / 2.0;
        let origin = Vec2::new(
            position.x + facing * half.x * self.stats.ledge_probe_inset,
            position.y - half.y,
        );
        ground.is_ground_at(origin, Vec2::NEG_Y, self.stats.ground_check_distance)
    }

    /// Grounded when the probe straight below the body center hits ground
    pub fn sense_ground(&self, ground: &dyn GroundQueries, position: Vec2) -> bool {
        let feet = Vec2::new(position.x, position.y - self.stats.size.y / 2.0);
        ground.is_ground_at(feet, Vec2::NEG_Y, self.stats.ground_check_distance)
    }

    /// Feed one tick of intent into the state machine. Hurt and Dead enemies do not think.
    pub fn think(
        &self,
        machine: &mut ActionStateMachine,
        ground: &dyn GroundQueries,
        position: Vec2,
        target: Option<Vec2>,
    ) -> Option<EnemyIntent> {
        if !machine.state().can_act() {
            return None;
        }

        let intent = self.decide(position, target);
        match intent {
            EnemyIntent::Patrol => {
                machine.steer(Locomotion::Patrol);
                if !self.ground_ahead(ground, position, machine.facing()) {
                    log::debug!("Ledge ahead, turning around");
                    machine.reverse_facing();
                }
            }
            EnemyIntent::Chase { direction } => {
                machine.steer(Locomotion::Chase);
                machine.turn_toward(direction);
            }
            EnemyIntent::Attack => {
                if machine.strike() {
                    log::debug!("Enemy strike");
                }
            }
        }
        Some(intent)
    }

    /// Per-state horizontal motion for this tick
    pub fn motion(&self, machine: &ActionStateMachine) -> Option<BodyCommand> {
        match machine.state() {
            ActionState::Move(_) => Some(BodyCommand::SetVelocityX(
                machine.facing() * self.stats.speed,
            )),
            ActionState::Attack(AttackKind::Strike) => Some(BodyCommand::SetVelocityX(0.0)),
            _ => None,
        }
    }
}
