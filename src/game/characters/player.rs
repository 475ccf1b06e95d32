// Player controller: drives the action state machine from the input stream

use glam::Vec2;

use super::state::{ActionState, ActionStateMachine, AttackKind, Locomotion};
use super::stats::PlayerStats;
use crate::core::math;
use crate::engine::input::{clamp_axis, InputEvent, InputStream};
use crate::engine::physics::{BodyCommand, GroundQueries};

/// Input-driven controller for a player character
#[derive(Debug)]
pub struct PlayerController {
    stats: PlayerStats,
    /// Last horizontal axis received, kept while busy so it applies once control returns
    move_axis: f32,
    input: InputStream,
}

impl PlayerController {
    pub fn new(stats: PlayerStats) -> Self {
        Self {
            stats,
            move_axis: 0.0,
            input: InputStream::new(),
        }
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn move_axis(&self) -> f32 {
        self.move_axis
    }

    /// Queue an input event for the next tick
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Grounded when the foot ray hits ground, or the trailing overlap circle touches it
    pub fn sense_ground(&self, ground: &dyn GroundQueries, position: Vec2, facing: f32) -> bool {
        let feet = Vec2::new(position.x, position.y - self.stats.size.y / 2.0);
        if ground.is_ground_at(feet, Vec2::NEG_Y, self.stats.ground_ray_length) {
            return true;
        }

        let circle = position + math::mirror_x(self.stats.ground_overlap_offset, facing);
        ground.overlaps_ground(circle, self.stats.ground_overlap_radius)
    }

    /// Resolve every queued input event against the state machine
    pub fn resolve_input(
        &mut self,
        machine: &mut ActionStateMachine,
        grounded: bool,
        commands: &mut Vec<BodyCommand>,
    ) {
        for event in self.input.drain() {
            self.handle_event(event, machine, grounded, commands);
        }

        // Locomotion follows the axis whenever control allows it
        let locomotion = if self.move_axis != 0.0 {
            Locomotion::Walk
        } else {
            Locomotion::Idle
        };
        if matches!(machine.state(), ActionState::Move(_)) {
            machine.steer(locomotion);
        }
    }

    fn handle_event(
        &mut self,
        event: InputEvent,
        machine: &mut ActionStateMachine,
        grounded: bool,
        commands: &mut Vec<BodyCommand>,
    ) {
        match event {
            InputEvent::Move(axis) => {
                if !machine.state().is_dead() {
                    self.move_axis = clamp_axis(axis);
                }
            }
            InputEvent::Jump => {
                if machine.can_jump(grounded) {
                    log::debug!("Jump (impulse {})", self.stats.jump_power);
                    commands.push(BodyCommand::Impulse(Vec2::new(0.0, self.stats.jump_power)));
                }
            }
            InputEvent::Attack => {
                if machine.attack(grounded) {
                    log::debug!(
                        "Attack -> {:?} (combo {})",
                        machine.state(),
                        machine.combo_index()
                    );
                }
            }
            InputEvent::Dash => {
                if machine.dash(grounded) {
                    log::debug!("Dash (facing {})", machine.facing());
                }
            }
        }
    }

    /// Per-state horizontal motion for this tick
    pub fn motion(&self, machine: &ActionStateMachine) -> Option<BodyCommand> {
        match machine.state() {
            ActionState::Move(_) => Some(BodyCommand::SetVelocityX(
                self.move_axis * self.stats.move_speed,
            )),
            ActionState::Dash => Some(BodyCommand::SetVelocityX(
                machine.facing() * self.stats.dash_power,
            )),
            ActionState::Attack(AttackKind::Dash) => {
                Some(BodyCommand::ScaleVelocityX(self.stats.dash_attack_decay))
            }
            ActionState::Attack(_) => Some(BodyCommand::SetVelocityX(0.0)),
            ActionState::Hurt | ActionState::Dead => None,
        }
    }

    /// Commands for the start of an attack's active window: stop, then push forward
    pub fn attack_push(&self, machine: &ActionStateMachine) -> Vec<BodyCommand> {
        let mut commands = Vec::with_capacity(2);
        if machine.state() != ActionState::Attack(AttackKind::Dash) {
            commands.push(BodyCommand::SetVelocityX(0.0));
        }
        commands.push(BodyCommand::Impulse(Vec2::new(
            machine.facing() * self.stats.attack_push,
            0.0,
        )));
        commands
    }

    /// Late pass: face the input direction
    pub fn update_facing(&self, machine: &mut ActionStateMachine) {
        machine.turn_toward(self.move_axis);
    }

    /// Animation speed parameter
    pub fn animation_speed(&self) -> f32 {
        self.move_axis.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::signals::AnimationTrigger;
    use crate::game::characters::stats::PLAYER_STATS;

    const DT: f32 = 1.0 / 60.0;

    /// Ground everywhere below y = 0
    struct FlatGround;

    impl GroundQueries for FlatGround {
        fn is_ground_at(&self, origin: Vec2, _direction: Vec2, max_distance: f32) -> bool {
            origin.y - max_distance <= 0.0
        }

        fn overlaps_ground(&self, center: Vec2, radius: f32) -> bool {
            center.y - radius <= 0.0
        }
    }

    /// Only the overlap circle sees ground
    struct OverlapOnly;

    impl GroundQueries for OverlapOnly {
        fn is_ground_at(&self, _origin: Vec2, _direction: Vec2, _max_distance: f32) -> bool {
            false
        }

        fn overlaps_ground(&self, _center: Vec2, _radius: f32) -> bool {
            true
        }
    }

    fn setup() -> (PlayerController, ActionStateMachine) {
        (
            PlayerController::new(PLAYER_STATS),
            ActionStateMachine::for_player(&PLAYER_STATS),
        )
    }

    fn feed(
        controller: &mut PlayerController,
        machine: &mut ActionStateMachine,
        events: &[InputEvent],
        grounded: bool,
    ) -> Vec<BodyCommand> {
        let mut commands = Vec::new();
        for event in events {
            controller.push_input(*event);
        }
        controller.resolve_input(machine, grounded, &mut commands);
        commands
    }

    #[test]
    fn test_grounded_by_foot_ray() {
        let (controller, _) = setup();
        let standing = Vec2::new(0.0, PLAYER_STATS.size.y / 2.0);
        assert!(controller.sense_ground(&FlatGround, standing, 1.0));

        let airborne = Vec2::new(0.0, 3.0);
        assert!(!controller.sense_ground(&FlatGround, airborne, 1.0));
    }

    #[test]
    fn test_grounded_by_overlap_fallback() {
        let (controller, _) = setup();
        assert!(controller.sense_ground(&OverlapOnly, Vec2::ZERO, -1.0));
    }

    #[test]
    fn test_move_sets_walk_and_velocity() {
        let (mut controller, mut machine) = setup();
        feed(&mut controller, &mut machine, &[InputEvent::Move(-1.0)], true);

        assert_eq!(machine.state(), ActionState::Move(Locomotion::Walk));
        assert_eq!(
            controller.motion(&machine),
            Some(BodyCommand::SetVelocityX(-PLAYER_STATS.move_speed))
        );

        controller.update_facing(&mut machine);
        assert_eq!(machine.facing(), -1.0);
        assert_eq!(controller.animation_speed(), 1.0);

        feed(&mut controller, &mut machine, &[InputEvent::Move(0.0)], true);
        assert_eq!(machine.state(), ActionState::Move(Locomotion::Idle));
        controller.update_facing(&mut machine);
        assert_eq!(machine.facing(), -1.0, "Zero axis keeps facing");
    }

    #[test]
    fn test_raw_axis_is_sanitised() {
        let (mut controller, mut machine) = setup();
        feed(&mut controller, &mut machine, &[InputEvent::Move(f32::NAN)], true);
        assert_eq!(controller.move_axis(), 0.0);
        assert_eq!(machine.state(), ActionState::Move(Locomotion::Idle));
        assert_eq!(controller.motion(&machine), Some(BodyCommand::SetVelocityX(0.0)));

        feed(&mut controller, &mut machine, &[InputEvent::Move(3.0)], true);
        assert_eq!(controller.move_axis(), 1.0);
        assert_eq!(
            controller.motion(&machine),
            Some(BodyCommand::SetVelocityX(PLAYER_STATS.move_speed))
        );
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let (mut controller, mut machine) = setup();
        let commands = feed(&mut controller, &mut machine, &[InputEvent::Jump], false);
        assert!(commands.is_empty());

        let commands = feed(&mut controller, &mut machine, &[InputEvent::Jump], true);
        assert_eq!(
            commands,
            vec![BodyCommand::Impulse(Vec2::new(0.0, PLAYER_STATS.jump_power))]
        );
    }

    #[test]
    fn test_no_jump_while_attacking() {
        let (mut controller, mut machine) = setup();
        let commands = feed(
            &mut controller,
            &mut machine,
            &[InputEvent::Attack, InputEvent::Jump],
            true,
        );
        assert!(commands.is_empty());
        assert_eq!(machine.state(), ActionState::Attack(AttackKind::Combo));
    }

    #[test]
    fn test_combo_holds_still() {
        let (mut controller, mut machine) = setup();
        feed(
            &mut controller,
            &mut machine,
            &[InputEvent::Move(1.0), InputEvent::Attack],
            true,
        );
        assert_eq!(controller.motion(&machine), Some(BodyCommand::SetVelocityX(0.0)));
    }

    #[test]
    fn test_dash_forces_velocity_then_dash_attack_decays() {
        let (mut controller, mut machine) = setup();
        machine.turn_toward(-1.0);
        feed(&mut controller, &mut machine, &[InputEvent::Dash], true);
        assert_eq!(
            controller.motion(&machine),
            Some(BodyCommand::SetVelocityX(-PLAYER_STATS.dash_power))
        );

        machine.tick(DT);
        feed(&mut controller, &mut machine, &[InputEvent::Attack], false);
        assert_eq!(machine.state(), ActionState::Attack(AttackKind::Dash));
        assert_eq!(
            controller.motion(&machine),
            Some(BodyCommand::ScaleVelocityX(PLAYER_STATS.dash_attack_decay))
        );
        assert_eq!(
            machine.drain_triggers(),
            vec![AnimationTrigger::Dash, AnimationTrigger::DashAttack]
        );
    }

    #[test]
    fn test_attack_push_keeps_dash_momentum() {
        let (mut controller, mut machine) = setup();
        feed(&mut controller, &mut machine, &[InputEvent::Attack], true);
        assert_eq!(
            controller.attack_push(&machine),
            vec![
                BodyCommand::SetVelocityX(0.0),
                BodyCommand::Impulse(Vec2::new(PLAYER_STATS.attack_push, 0.0)),
            ]
        );

        let (mut controller, mut machine) = setup();
        feed(&mut controller, &mut machine, &[InputEvent::Dash], true);
        feed(&mut controller, &mut machine, &[InputEvent::Attack], true);
        assert_eq!(
            controller.attack_push(&machine),
            vec![BodyCommand::Impulse(Vec2::new(PLAYER_STATS.attack_push, 0.0))]
        );
    }

    #[test]
    fn test_hurt_blocks_input_but_keeps_axis() {
        let (mut controller, mut machine) = setup();
        machine.apply_hit(false);
        let commands = feed(
            &mut controller,
            &mut machine,
            &[InputEvent::Move(1.0), InputEvent::Jump, InputEvent::Attack, InputEvent::Dash],
            true,
        );
        assert!(commands.is_empty());
        assert_eq!(controller.pending_input(), 0);
        assert_eq!(machine.state(), ActionState::Hurt);
        assert_eq!(controller.motion(&machine), None);

        machine.finish_hurt();
        feed(&mut controller, &mut machine, &[], true);
        assert_eq!(machine.state(), ActionState::Move(Locomotion::Walk));
    }

    #[test]
    fn test_dead_ignores_move() {
        let (mut controller, mut machine) = setup();
        machine.apply_hit(true);
        feed(&mut controller, &mut machine, &[InputEvent::Move(1.0)], true);
        assert_eq!(controller.move_axis(), 0.0);
        assert_eq!(controller.motion(&machine), None);
    }
}
