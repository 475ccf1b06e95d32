// Fixed-tick simulation: characters, physics host and hit resolution

use glam::Vec2;

use crate::config::GameConfig;
use crate::engine::input::InputEvent;
use crate::engine::physics::{
    body::presets, CollisionEvent, ColliderRole, PhysicsWorld, RigidBodyHandle,
};
use crate::game::characters::{
    AnimationEvent, AnimationSink, Character, CharacterArena, CharacterId,
};
use crate::game::combat::HitReport;

/// Errors raised by the simulation's host-facing API
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    #[error("Character {0} is not player-controlled")]
    NotPlayerControlled(CharacterId),

    #[error("Character {0} is not an enemy")]
    NotAnEnemy(CharacterId),
}

/// Owns every character and the physics host, and runs them one fixed tick at a time.
///
/// A tick runs, in order:
/// 1. input and AI intents
/// 2. state machine timers
/// 3. motion commands, the physics step and hitbox resolution
/// 4. late pass: facing, hitbox placement, animation signals
pub struct Simulation {
    physics: PhysicsWorld,
    characters: CharacterArena,
    config: GameConfig,
    tick_count: u64,
    hits: Vec<HitReport>,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.set_timestep(config.timestep);

        Self {
            physics,
            characters: CharacterArena::new(),
            config,
            tick_count: 0,
            hits: Vec::new(),
        }
    }

    /// Add a static platform
    pub fn add_platform(&mut self, center: Vec2, size: Vec2) -> RigidBodyHandle {
        let body = self.physics.add_rigid_body(presets::platform_body(center));
        self.physics
            .add_collider(presets::platform_collider(size), body);
        self.physics.sync_query_pipeline();
        body
    }

    /// Spawn a player with the configured stats
    pub fn spawn_player(&mut self, name: &str, position: Vec2) -> CharacterId {
        self.characters
            .spawn_player(name, self.config.player, &mut self.physics, position)
    }

    /// Spawn an enemy with the configured stats
    pub fn spawn_enemy(&mut self, name: &str, position: Vec2) -> CharacterId {
        self.characters
            .spawn_enemy(name, self.config.enemy, &mut self.physics, position)
    }

    /// Remove a character and its body
    pub fn despawn(&mut self, id: CharacterId) -> Result<Character, SimulationError> {
        let character = self
            .characters
            .remove(id)
            .ok_or(SimulationError::UnknownCharacter(id))?;
        self.physics.remove_rigid_body(character.body_handle);
        Ok(character)
    }

    /// Assign (or clear) the character an enemy chases
    pub fn set_target(
        &mut self,
        enemy: CharacterId,
        target: Option<CharacterId>,
    ) -> Result<(), SimulationError> {
        if let Some(target) = target {
            if self.characters.get(target).is_none() {
                return Err(SimulationError::UnknownCharacter(target));
            }
        }

        self.character_mut(enemy)?
            .enemy_mut()
            .ok_or(SimulationError::NotAnEnemy(enemy))?
            .set_target(target);
        Ok(())
    }

    /// Queue a player input event for the next tick
    pub fn push_input(&mut self, id: CharacterId, event: InputEvent) -> Result<(), SimulationError> {
        self.character_mut(id)?
            .player_mut()
            .ok_or(SimulationError::NotPlayerControlled(id))?
            .push_input(event);
        Ok(())
    }

    /// Deliver an animation callback to a character
    pub fn animation_event(
        &mut self,
        id: CharacterId,
        event: AnimationEvent,
    ) -> Result<(), SimulationError> {
        self.character_mut(id)?.handle_animation_event(event);
        Ok(())
    }

    /// Advance the whole simulation by one fixed tick
    pub fn tick(&mut self, sink: &mut dyn AnimationSink) {
        let dt = self.config.timestep;

        self.sync_bodies();
        for character in self.characters.all_mut() {
            character.sense_ground(&self.physics);
        }

        // 1. Intents
        let targets: Vec<Option<Vec2>> = self
            .characters
            .all()
            .iter()
            .map(|character| self.characters.target_position(character.target()))
            .collect();
        for (character, target) in self.characters.all_mut().iter_mut().zip(targets) {
            character.resolve_intents(&self.physics, target);
        }

        // 2. Timers
        for character in self.characters.all_mut() {
            character.advance_timers(dt);
        }

        // 3. Motion, physics and hits
        for character in self.characters.all_mut() {
            character.emit_motion();
            for command in character.take_commands() {
                self.physics.apply(character.body_handle, command);
            }
            if let Some(sensor) = character.hitbox_collider {
                self.physics
                    .set_collider_enabled(sensor, character.hitbox_active());
            }
        }

        self.physics.step();
        self.sync_bodies();
        self.resolve_hits();

        // Knockback and death from this tick's hits
        for character in self.characters.all_mut() {
            for command in character.take_commands() {
                self.physics.apply(character.body_handle, command);
            }
        }

        // 4. Late pass
        for character in self.characters.all_mut() {
            character.late_update();
            if let (Some(sensor), Some(offset)) =
                (character.hitbox_collider, character.hitbox_offset())
            {
                self.physics.set_collider_offset(sensor, offset);
            }

            for trigger in character.drain_triggers() {
                sink.trigger(character.id, trigger);
            }
            sink.set_params(character.id, character.animation_params());
        }

        self.tick_count += 1;
    }

    fn sync_bodies(&mut self) {
        for character in self.characters.all_mut() {
            if let Some((position, velocity)) = self.physics.kinematics(character.body_handle) {
                character.sync_body(position, velocity);
            }
        }
    }

    /// Turn this step's hitbox overlap-enter events into damage
    fn resolve_hits(&mut self) {
        for event in self.physics.get_collision_events() {
            let CollisionEvent::Started {
                collider1,
                collider2,
            } = event
            else {
                continue;
            };

            // Colliders without an owner are level geometry
            let (Some(first), Some(second)) = (
                self.physics.collider_owner(collider1),
                self.physics.collider_owner(collider2),
            ) else {
                continue;
            };

            let (attacker, target) = match (first.role, second.role) {
                (ColliderRole::Hitbox, ColliderRole::Body) => (first.entity, second.entity),
                (ColliderRole::Body, ColliderRole::Hitbox) => (second.entity, first.entity),
                _ => continue,
            };

            if let Some(report) = self.characters.resolve_hit(attacker, target) {
                self.hits.push(report);
            }
        }
    }

    /// Take every hit resolved since the last call
    pub fn drain_hits(&mut self) -> Vec<HitReport> {
        std::mem::take(&mut self.hits)
    }

    pub fn character(&self, id: CharacterId) -> Result<&Character, SimulationError> {
        self.characters
            .get(id)
            .ok_or(SimulationError::UnknownCharacter(id))
    }

    fn character_mut(&mut self, id: CharacterId) -> Result<&mut Character, SimulationError> {
        self.characters
            .get_mut(id)
            .ok_or(SimulationError::UnknownCharacter(id))
    }

    pub fn characters(&self) -> &CharacterArena {
        &self.characters
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time since creation
    pub fn elapsed(&self) -> f32 {
        self.tick_count as f32 * self.config.timestep
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::{
        ActionState, AnimationTrigger, AttackKind, Locomotion, SignalRecorder,
    };
    use crate::game::combat::Damageable;

    /// Floor spanning x in [-half_width, half_width], top surface at y = 0
    fn sim_with_floor(half_width: f32) -> Simulation {
        let mut sim = Simulation::default();
        sim.add_platform(Vec2::new(0.0, -0.5), Vec2::new(half_width * 2.0, 1.0));
        sim
    }

    fn run(sim: &mut Simulation, recorder: &mut SignalRecorder, ticks: u32) {
        for _ in 0..ticks {
            sim.tick(recorder);
        }
    }

    #[test]
    fn test_unknown_character_errors() {
        let mut sim = sim_with_floor(5.0);
        let enemy = sim.spawn_enemy("Slime", Vec2::new(0.0, 0.5));

        assert!(matches!(
            sim.push_input(42, InputEvent::Jump),
            Err(SimulationError::UnknownCharacter(42))
        ));
        assert!(matches!(
            sim.push_input(enemy, InputEvent::Jump),
            Err(SimulationError::NotPlayerControlled(id)) if id == enemy
        ));
        assert!(matches!(
            sim.set_target(enemy, Some(99)),
            Err(SimulationError::UnknownCharacter(99))
        ));
        assert_eq!(
            SimulationError::UnknownCharacter(3).to_string(),
            "Unknown character: 3"
        );
    }

    #[test]
    fn test_player_lands_and_walks() {
        let mut sim = sim_with_floor(20.0);
        let mut recorder = SignalRecorder::new();
        let player = sim.spawn_player("Hero", Vec2::new(0.0, 0.7));

        run(&mut sim, &mut recorder, 20);
        assert!(sim.character(player).unwrap().is_grounded());

        sim.push_input(player, InputEvent::Move(1.0)).unwrap();
        run(&mut sim, &mut recorder, 30);

        let hero = sim.character(player).unwrap();
        assert_eq!(hero.state(), ActionState::Move(Locomotion::Walk));
        assert!(hero.position().x > 1.0);
        assert_eq!(hero.facing(), 1.0);

        let params = recorder.last_params(player).unwrap();
        assert_eq!(params.speed, 1.0);
        assert!(params.grounded);
        assert_eq!(sim.tick_count(), 50);
    }

    #[test]
    fn test_attack_window_hits_enemy_once() {
        let mut sim = sim_with_floor(20.0);
        let mut recorder = SignalRecorder::new();
        let player = sim.spawn_player("Hero", Vec2::new(0.0, 0.6));
        let enemy = sim.spawn_enemy("Slime", Vec2::new(1.0, 0.5));

        run(&mut sim, &mut recorder, 5);
        sim.push_input(player, InputEvent::Attack).unwrap();
        sim.tick(&mut recorder);
        assert_eq!(
            sim.character(player).unwrap().state(),
            ActionState::Attack(AttackKind::Combo)
        );
        assert_eq!(recorder.triggers_for(player), vec![AnimationTrigger::Attack]);

        sim.animation_event(player, AnimationEvent::AttackWindowStart)
            .unwrap();
        sim.tick(&mut recorder);

        let hits = sim.drain_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].attacker, player);
        assert_eq!(hits[0].target, enemy);
        assert!(hits[0].damage.knockback.x > 0.0);

        let slime = sim.character(enemy).unwrap();
        assert_eq!(slime.state(), ActionState::Hurt);
        assert_eq!(slime.health().current(), 2);
        assert_eq!(recorder.triggers_for(enemy), vec![AnimationTrigger::Hurt]);

        // One enter, one hit: the window stays open but nothing new enters
        run(&mut sim, &mut recorder, 10);
        assert!(sim.drain_hits().is_empty());

        sim.animation_event(player, AnimationEvent::AttackWindowEnd)
            .unwrap();
        run(&mut sim, &mut recorder, 40);
        assert_eq!(
            sim.character(player).unwrap().state(),
            ActionState::Move(Locomotion::Idle)
        );
    }

    #[test]
    fn test_enemy_turns_at_ledge() {
        let mut sim = sim_with_floor(2.0);
        let mut recorder = SignalRecorder::new();
        let enemy = sim.spawn_enemy("Slime", Vec2::new(1.5, 0.5));

        run(&mut sim, &mut recorder, 90);

        let slime = sim.character(enemy).unwrap();
        assert_eq!(slime.facing(), -1.0);
        assert!(slime.position().x > -2.0 && slime.position().x < 2.0);
        assert!(slime.is_alive());
    }

    #[test]
    fn test_enemy_chases_target() {
        let mut sim = sim_with_floor(20.0);
        let mut recorder = SignalRecorder::new();
        let player = sim.spawn_player("Hero", Vec2::new(-4.0, 0.6));
        let enemy = sim.spawn_enemy("Slime", Vec2::new(0.0, 0.5));
        sim.set_target(enemy, Some(player)).unwrap();

        run(&mut sim, &mut recorder, 10);
        let slime = sim.character(enemy).unwrap();
        assert_eq!(slime.state(), ActionState::Move(Locomotion::Chase));
        assert_eq!(slime.facing(), -1.0);
        assert!(slime.position().x < 0.0);
    }

    #[test]
    fn test_deterministic_replay() {
        fn script() -> Vec2 {
            let mut sim = sim_with_floor(20.0);
            let mut recorder = SignalRecorder::new();
            let player = sim.spawn_player("Hero", Vec2::new(0.0, 0.6));
            run(&mut sim, &mut recorder, 5);
            sim.push_input(player, InputEvent::Move(-1.0)).unwrap();
            sim.push_input(player, InputEvent::Dash).unwrap();
            run(&mut sim, &mut recorder, 30);
            sim.character(player).unwrap().position()
        }

        assert_eq!(script(), script());
    }

    #[test]
    fn test_despawn_removes_body() {
        let mut sim = sim_with_floor(5.0);
        let enemy = sim.spawn_enemy("Slime", Vec2::new(0.0, 0.5));
        let body = sim.character(enemy).unwrap().body_handle;

        assert!(sim.despawn(enemy).is_ok());
        assert!(sim.physics().get_rigid_body(body).is_none());
        assert!(matches!(
            sim.despawn(enemy),
            Err(SimulationError::UnknownCharacter(_))
        ));
    }
}
