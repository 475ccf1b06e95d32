// Character entity and management

use glam::Vec2;

use crate::engine::physics::{
    body::presets, BodyCommand, ColliderHandle, ColliderOwner, ColliderRole, CollisionLayer,
    GroundQueries, PhysicsWorld, RigidBodyHandle,
};
use crate::game::combat::{Damageable, Health, HitReport, Hitbox};

use super::enemy::EnemyBrain;
use super::player::PlayerController;
use super::signals::{AnimationEvent, AnimationParams, AnimationTrigger};
use super::state::{ActionState, ActionStateMachine, HitOutcome};
use super::stats::{EnemyStats, HitboxStats, PlayerStats};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Source of a character's intent
#[derive(Debug)]
pub enum Controller {
    Player(PlayerController),
    Enemy(EnemyBrain),
}

/// A player-controlled or AI-controlled character
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Character name (for logs)
    pub name: String,

    // Physics
    /// Handle to the character's rigid body in the physics world
    pub body_handle: RigidBodyHandle,
    /// Handle to the character's body collider
    pub collider_handle: ColliderHandle,
    /// Handle to the attack sensor, if the character has a hitbox
    pub hitbox_collider: Option<ColliderHandle>,

    layer: CollisionLayer,
    size: Vec2,

    // Combat state
    health: Health,
    hitbox: Option<Hitbox>,

    /// State machine for character behavior
    machine: ActionStateMachine,
    controller: Controller,

    // Snapshot of the body, refreshed from the physics host every tick
    position: Vec2,
    velocity: Vec2,
    grounded: bool,

    /// Motion commands waiting to be applied to the body
    commands: Vec<BodyCommand>,
    /// Commands from animation callbacks, applied after this tick's motion
    deferred: Vec<BodyCommand>,
}

impl Character {
    /// Create a player and add its body to the physics world
    pub fn new_player(
        id: CharacterId,
        name: &str,
        stats: PlayerStats,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Self {
        let machine = ActionStateMachine::for_player(&stats);
        Self::spawn(
            id,
            name,
            CollisionLayer::Player,
            stats.size,
            stats.max_health,
            stats.hitbox,
            machine,
            Controller::Player(PlayerController::new(stats)),
            physics,
            position,
        )
    }

    /// Create an enemy and add its body to the physics world
    pub fn new_enemy(
        id: CharacterId,
        name: &str,
        stats: EnemyStats,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Self {
        let machine = ActionStateMachine::for_enemy(&stats);
        Self::spawn(
            id,
            name,
            CollisionLayer::Enemy,
            stats.size,
            stats.max_health,
            stats.hitbox,
            machine,
            Controller::Enemy(EnemyBrain::new(stats)),
            physics,
            position,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn(
        id: CharacterId,
        name: &str,
        layer: CollisionLayer,
        size: Vec2,
        max_health: i32,
        hitbox_stats: HitboxStats,
        machine: ActionStateMachine,
        controller: Controller,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> Self {
        let body_handle = physics.add_rigid_body(presets::character_body(position));
        let collider_handle = physics.add_owned_collider(
            presets::character_collider(layer, size),
            body_handle,
            ColliderOwner {
                entity: id,
                role: ColliderRole::Body,
            },
        );

        let hitbox = Hitbox::for_owner(layer, hitbox_stats);
        let hitbox_collider = match (hitbox, layer.attack_layer()) {
            (Some(hitbox), Some(attack_layer)) => {
                let sensor = presets::hitbox_sensor(
                    attack_layer,
                    hitbox.stats().half_extents,
                    hitbox.offset(machine.facing()),
                );
                let handle = physics.add_owned_collider(
                    sensor,
                    body_handle,
                    ColliderOwner {
                        entity: id,
                        role: ColliderRole::Hitbox,
                    },
                );
                // Created disabled
                physics.set_collider_enabled(handle, false);
                Some(handle)
            }
            _ => {
                log::warn!("{} spawned without an attack hitbox", name);
                None
            }
        };

        log::debug!("Spawned {} (id {}) on {:?} at {}", name, id, layer, position);

        Self {
            id,
            name: name.to_string(),
            body_handle,
            collider_handle,
            hitbox_collider,
            layer,
            size,
            health: Health::new(max_health),
            hitbox,
            machine,
            controller,
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            commands: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, Controller::Player(_))
    }

    /// Player controller, if this character is player-driven
    pub fn player_mut(&mut self) -> Option<&mut PlayerController> {
        match &mut self.controller {
            Controller::Player(player) => Some(player),
            Controller::Enemy(_) => None,
        }
    }

    /// Enemy brain, if this character is AI-driven
    pub fn enemy_mut(&mut self) -> Option<&mut EnemyBrain> {
        match &mut self.controller {
            Controller::Enemy(brain) => Some(brain),
            Controller::Player(_) => None,
        }
    }

    /// Enemy target, if any
    pub fn target(&self) -> Option<CharacterId> {
        match &self.controller {
            Controller::Enemy(brain) => brain.target(),
            Controller::Player(_) => None,
        }
    }

    // -----------------------
    // Tick phases
    // -----------------------

    /// Refresh the body snapshot from the physics host
    pub fn sync_body(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Re-evaluate whether the character stands on ground
    pub fn sense_ground(&mut self, ground: &dyn GroundQueries) {
        self.grounded = match &self.controller {
            Controller::Player(player) => {
                player.sense_ground(ground, self.position, self.machine.facing())
            }
            Controller::Enemy(brain) => brain.sense_ground(ground, self.position),
        };
    }

    /// Phase 1: turn input or AI decisions into state machine intents
    pub fn resolve_intents(&mut self, ground: &dyn GroundQueries, target: Option<Vec2>) {
        match &mut self.controller {
            Controller::Player(player) => {
                player.resolve_input(&mut self.machine, self.grounded, &mut self.commands);
            }
            Controller::Enemy(brain) => {
                brain.think(&mut self.machine, ground, self.position, target);
            }
        }
        self.disarm_if_idle();
    }

    /// Phase 2: advance timers by one tick
    pub fn advance_timers(&mut self, dt: f32) {
        let before = self.machine.state();
        self.machine.tick(dt);
        if self.machine.state() != before {
            log::debug!("{}: {:?} -> {:?}", self.name, before, self.machine.state());
        }
        self.disarm_if_idle();
    }

    /// Phase 3: per-state motion, followed by any callback commands
    pub fn emit_motion(&mut self) {
        let motion = match &self.controller {
            Controller::Player(player) => player.motion(&self.machine),
            Controller::Enemy(brain) => brain.motion(&self.machine),
        };
        self.commands.extend(motion);
        self.commands.append(&mut self.deferred);
    }

    /// Take every pending body command in emission order
    pub fn take_commands(&mut self) -> Vec<BodyCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Phase 4: facing follows the controller
    pub fn late_update(&mut self) {
        if let Controller::Player(player) = &self.controller {
            player.update_facing(&mut self.machine);
        }
    }

    /// Take the animation triggers fired since the last call
    pub fn drain_triggers(&mut self) -> Vec<AnimationTrigger> {
        self.machine.drain_triggers()
    }

    /// Continuous animation parameters for this tick
    pub fn animation_params(&self) -> AnimationParams {
        AnimationParams {
            speed: self.current_speed(),
            grounded: self.grounded,
            combo_index: i32::from(self.machine.combo_index()),
        }
    }

    // -----------------------
    // Animation callbacks
    // -----------------------

    pub fn handle_animation_event(&mut self, event: AnimationEvent) {
        match event {
            AnimationEvent::AttackWindowStart => self.on_attack_window_start(),
            AnimationEvent::AttackWindowEnd => self.on_attack_window_end(),
            AnimationEvent::HurtAnimationEnd => self.on_hurt_animation_end(),
        }
    }

    /// The swing reached its active frames: push forward (players) and arm the hitbox
    pub fn on_attack_window_start(&mut self) {
        if !self.machine.state().is_attacking() || !self.machine.can_arm_hitbox() {
            return;
        }

        if let Controller::Player(player) = &self.controller {
            self.deferred.extend(player.attack_push(&self.machine));
        }
        if let Some(hitbox) = &mut self.hitbox {
            hitbox.enable();
        }
    }

    /// The swing ended
    pub fn on_attack_window_end(&mut self) {
        if let Some(hitbox) = &mut self.hitbox {
            hitbox.disable();
        }
        self.machine.finish_attack();
    }

    pub fn on_hurt_animation_end(&mut self) {
        if self.health.is_depleted() {
            return;
        }
        if self.machine.finish_hurt() {
            log::debug!("{} recovered", self.name);
        }
    }

    fn disarm_if_idle(&mut self) {
        if self.machine.state().is_attacking() {
            return;
        }
        if let Some(hitbox) = &mut self.hitbox {
            hitbox.disable();
        }
    }

    // -----------------------
    // Queries
    // -----------------------

    /// Speed reported to the animation layer
    pub fn current_speed(&self) -> f32 {
        match &self.controller {
            Controller::Player(player) => player.animation_speed(),
            Controller::Enemy(_) => self.velocity.x.abs(),
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn combo_index(&self) -> u8 {
        self.machine.combo_index()
    }

    pub fn state(&self) -> ActionState {
        self.machine.state()
    }

    pub fn state_machine(&self) -> &ActionStateMachine {
        &self.machine
    }

    pub fn facing(&self) -> f32 {
        self.machine.facing()
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    /// Hitbox offset relative to the body for the current facing
    pub fn hitbox_offset(&self) -> Option<Vec2> {
        self.hitbox.map(|hitbox| hitbox.offset(self.machine.facing()))
    }

    /// Whether the attack sensor should currently detect overlaps
    pub fn hitbox_active(&self) -> bool {
        self.is_alive() && self.hitbox.map_or(false, |hitbox| hitbox.is_enabled())
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

impl Damageable for Character {
    fn take_damage(&mut self, amount: i32, knockback: Vec2) {
        if self.machine.state().is_dead() {
            return;
        }

        let remaining = self.health.apply_damage(amount);

        // Taking a hit cancels our own swing
        if let Some(hitbox) = &mut self.hitbox {
            hitbox.disable();
        }
        self.deferred.clear();

        let outcome = self.machine.apply_hit(self.health.is_depleted());

        self.commands.push(BodyCommand::SetVelocity(Vec2::ZERO));
        self.commands.push(BodyCommand::Impulse(knockback));

        match outcome {
            HitOutcome::Killed => {
                self.commands.push(BodyCommand::Deactivate);
                log::info!("{} died", self.name);
            }
            HitOutcome::Hurt => {
                log::debug!("{} hurt ({} hp left)", self.name, remaining);
            }
            HitOutcome::Ignored => {}
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn layer(&self) -> CollisionLayer {
        self.layer
    }

    fn is_alive(&self) -> bool {
        !self.machine.state().is_dead()
    }
}

/// Manages all characters in the game
#[derive(Debug, Default)]
pub struct CharacterArena {
    characters: Vec<Character>,
    next_id: CharacterId,
}

impl CharacterArena {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            next_id: 0,
        }
    }

    fn allocate_id(&mut self) -> CharacterId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a player-controlled character
    pub fn spawn_player(
        &mut self,
        name: &str,
        stats: PlayerStats,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> CharacterId {
        let id = self.allocate_id();
        let character = Character::new_player(id, name, stats, physics, position);
        self.characters.push(character);
        id
    }

    /// Spawn an AI-controlled enemy
    pub fn spawn_enemy(
        &mut self,
        name: &str,
        stats: EnemyStats,
        physics: &mut PhysicsWorld,
        position: Vec2,
    ) -> CharacterId {
        let id = self.allocate_id();
        let character = Character::new_enemy(id, name, stats, physics, position);
        self.characters.push(character);
        id
    }

    /// Get a character by ID
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Get a mutable character by ID
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Get all characters
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Get all characters mutably
    pub fn all_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }

    /// Position of a living character, used as an enemy target
    pub fn target_position(&self, id: Option<CharacterId>) -> Option<Vec2> {
        self.get(id?)
            .filter(|character| character.is_alive())
            .map(|character| character.position())
    }

    /// Resolve one overlap-enter between `attacker`'s hitbox and `target`'s body
    pub fn resolve_hit(&mut self, attacker: CharacterId, target: CharacterId) -> Option<HitReport> {
        if attacker == target {
            return None;
        }

        let (hitbox, origin) = {
            let attacker = self.get(attacker)?;
            (*attacker.hitbox()?, attacker.position())
        };

        let victim = self.get_mut(target)?;
        let damage = hitbox.resolve_enter(origin, victim)?;
        let lethal = !victim.is_alive();

        log::debug!(
            "Hit: {} -> {} ({} damage{})",
            attacker,
            target,
            damage.amount,
            if lethal { ", lethal" } else { "" }
        );

        Some(HitReport {
            attacker,
            target,
            damage,
            lethal,
        })
    }

    /// Remove a character by ID
    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(pos))
    }

    /// Get the number of characters
    pub fn count(&self) -> usize {
        self.characters.len()
    }

    /// Get the number of alive characters
    pub fn alive_count(&self) -> usize {
        self.characters.iter().filter(|c| c.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputEvent;
    use crate::game::characters::stats::{ENEMY_STATS, PLAYER_STATS};
    use crate::game::characters::state::{AttackKind, Locomotion};

    fn arena_with_pair() -> (CharacterArena, PhysicsWorld, CharacterId, CharacterId) {
        let mut physics = PhysicsWorld::new();
        let mut arena = CharacterArena::new();
        let player = arena.spawn_player("Hero", PLAYER_STATS, &mut physics, Vec2::new(0.0, 1.0));
        let enemy = arena.spawn_enemy("Slime", ENEMY_STATS, &mut physics, Vec2::new(1.0, 1.0));
        (arena, physics, player, enemy)
    }

    fn start_player_attack(arena: &mut CharacterArena, id: CharacterId) {
        let character = arena.get_mut(id).unwrap();
        character.grounded = true;
        character.player_mut().unwrap().push_input(InputEvent::Attack);
        let physics = PhysicsWorld::new();
        character.resolve_intents(&physics, None);
        character.on_attack_window_start();
    }

    #[test]
    fn test_character_arena_new() {
        let arena = CharacterArena::new();
        assert_eq!(arena.count(), 0);
        assert_eq!(arena.alive_count(), 0);
    }

    #[test]
    fn test_spawn_assigns_ids_and_colliders() {
        let (arena, physics, player, enemy) = arena_with_pair();
        assert_ne!(player, enemy);

        let hero = arena.get(player).unwrap();
        assert!(hero.is_player());
        assert_eq!(hero.layer(), CollisionLayer::Player);
        assert_eq!(
            physics.collider_owner(hero.collider_handle),
            Some(ColliderOwner {
                entity: player,
                role: ColliderRole::Body
            })
        );

        let sensor = hero.hitbox_collider.unwrap();
        assert!(!physics.get_collider(sensor).unwrap().is_enabled());
        assert!(!hero.hitbox().unwrap().is_enabled());
    }

    #[test]
    fn test_take_damage_emits_knockback() {
        let (mut arena, _physics, player, _) = arena_with_pair();
        let hero = arena.get_mut(player).unwrap();
        hero.take_damage(1, Vec2::new(-5.0, 0.0));

        assert_eq!(hero.health().current(), 2);
        assert_eq!(hero.state(), ActionState::Hurt);
        assert_eq!(
            hero.take_commands(),
            vec![
                BodyCommand::SetVelocity(Vec2::ZERO),
                BodyCommand::Impulse(Vec2::new(-5.0, 0.0)),
            ]
        );
        assert_eq!(hero.drain_triggers(), vec![AnimationTrigger::Hurt]);
    }

    #[test]
    fn test_lethal_damage_deactivates_body() {
        let (mut arena, _physics, _, enemy) = arena_with_pair();
        let slime = arena.get_mut(enemy).unwrap();
        slime.take_damage(5, Vec2::X);

        assert_eq!(slime.health().current(), 0);
        assert!(!slime.is_alive());
        assert_eq!(slime.take_commands().last(), Some(&BodyCommand::Deactivate));

        // Dead characters ignore everything
        slime.take_damage(1, Vec2::X);
        slime.on_hurt_animation_end();
        assert!(slime.take_commands().is_empty());
        assert_eq!(slime.state(), ActionState::Dead);
        assert_eq!(arena.alive_count(), 1);
    }

    #[test]
    fn test_window_start_pushes_and_arms_hitbox() {
        let (mut arena, _physics, player, _) = arena_with_pair();
        start_player_attack(&mut arena, player);

        let hero = arena.get_mut(player).unwrap();
        assert!(hero.hitbox().unwrap().is_enabled());
        assert!(hero.hitbox_active());

        hero.emit_motion();
        assert_eq!(
            hero.take_commands(),
            vec![
                BodyCommand::SetVelocityX(0.0),
                BodyCommand::SetVelocityX(0.0),
                BodyCommand::Impulse(Vec2::new(PLAYER_STATS.attack_push, 0.0)),
            ]
        );

        hero.on_attack_window_end();
        assert!(!hero.hitbox().unwrap().is_enabled());
    }

    #[test]
    fn test_window_start_ignored_outside_attack() {
        let (mut arena, _physics, player, _) = arena_with_pair();
        let hero = arena.get_mut(player).unwrap();
        hero.on_attack_window_start();
        assert!(!hero.hitbox().unwrap().is_enabled());
        hero.emit_motion();
        assert_eq!(hero.take_commands(), vec![BodyCommand::SetVelocityX(0.0)]);
    }

    #[test]
    fn test_resolve_hit_reports_damage() {
        let (mut arena, _physics, player, enemy) = arena_with_pair();
        start_player_attack(&mut arena, player);

        let report = arena.resolve_hit(player, enemy).unwrap();
        assert_eq!(report.attacker, player);
        assert_eq!(report.target, enemy);
        assert_eq!(report.damage.amount, PLAYER_STATS.hitbox.damage);
        assert!(report.damage.knockback.x > 0.0);
        assert!(!report.lethal);
        assert_eq!(arena.get(enemy).unwrap().state(), ActionState::Hurt);
    }

    #[test]
    fn test_no_self_hit() {
        let (mut arena, _physics, player, _) = arena_with_pair();
        start_player_attack(&mut arena, player);
        assert!(arena.resolve_hit(player, player).is_none());
        assert_eq!(arena.get(player).unwrap().health().current(), 3);
    }

    #[test]
    fn test_hit_cancels_attacker_swing() {
        let (mut arena, _physics, player, enemy) = arena_with_pair();
        start_player_attack(&mut arena, player);
        assert_eq!(
            arena.get(player).unwrap().state(),
            ActionState::Attack(AttackKind::Combo)
        );

        // The enemy strikes first within the same tick
        {
            let slime = arena.get_mut(enemy).unwrap();
            slime.machine.strike();
            slime.on_attack_window_start();
        }
        assert!(arena.resolve_hit(enemy, player).is_some());

        // The player's hitbox was cancelled: its overlap in the same tick deals nothing
        assert!(arena.resolve_hit(player, enemy).is_none());
        let hero = arena.get(player).unwrap();
        assert_eq!(hero.state(), ActionState::Hurt);
        assert_eq!(hero.combo_index(), 0);
        assert_eq!(arena.get(enemy).unwrap().health().current(), 3);
    }

    #[test]
    fn test_strike_survives_target_leaving_range() {
        let (mut arena, physics, _, enemy) = arena_with_pair();
        let slime = arena.get_mut(enemy).unwrap();

        slime.resolve_intents(&physics, Some(Vec2::new(1.5, 1.0)));
        assert_eq!(slime.state(), ActionState::Attack(AttackKind::Strike));
        assert_eq!(slime.drain_triggers(), vec![AnimationTrigger::Attack]);

        // The target backs off before the swing reaches its active frames
        slime.advance_timers(1.0 / 60.0);
        slime.resolve_intents(&physics, Some(Vec2::new(3.0, 1.0)));
        assert_eq!(slime.state(), ActionState::Attack(AttackKind::Strike));

        slime.on_attack_window_start();
        assert!(slime.hitbox_active());

        slime.on_attack_window_end();
        assert!(!slime.hitbox_active());
        slime.resolve_intents(&physics, Some(Vec2::new(3.0, 1.0)));
        assert_eq!(slime.state(), ActionState::Move(Locomotion::Chase));
    }

    #[test]
    fn test_hurt_end_returns_to_rest() {
        let (mut arena, _physics, _, enemy) = arena_with_pair();
        let slime = arena.get_mut(enemy).unwrap();
        slime.take_damage(1, Vec2::X);
        slime.handle_animation_event(AnimationEvent::HurtAnimationEnd);
        assert_eq!(slime.state(), ActionState::Move(Locomotion::Patrol));
        assert!(!slime.state_machine().state().is_dead());
    }

    #[test]
    fn test_target_position_skips_dead() {
        let (mut arena, _physics, player, _) = arena_with_pair();
        assert_eq!(arena.target_position(Some(player)), Some(Vec2::new(0.0, 1.0)));
        arena.get_mut(player).unwrap().take_damage(10, Vec2::ZERO);
        assert_eq!(arena.target_position(Some(player)), None);
        assert_eq!(arena.target_position(None), None);
    }

    #[test]
    fn test_remove() {
        let (mut arena, _physics, player, enemy) = arena_with_pair();
        assert!(arena.remove(player).is_some());
        assert!(arena.remove(player).is_none());
        assert_eq!(arena.count(), 1);
        assert!(arena.get(enemy).is_some());
    }
}
