use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;

use platformer_action_core::engine::game_loop::GameLoop;
use platformer_action_core::engine::input::InputEvent;
use platformer_action_core::game::characters::{
    AnimationEvent, AnimationParams, AnimationSink, AnimationTrigger, CharacterId,
};
use platformer_action_core::{GameConfig, Simulation};

/// Length of the headless run (seconds)
const RUN_SECONDS: f32 = 8.0;

/// Stand-in for an animation player: turns triggers into clip-timed callbacks
#[derive(Debug, Default)]
struct ClipTimer {
    pending: Vec<(CharacterId, f32, AnimationEvent)>,
    params: Vec<(CharacterId, AnimationParams)>,
}

impl ClipTimer {
    /// Active frames start this long into an attack clip
    const ATTACK_WINDOW_START: f32 = 0.1;
    /// Attack clip length
    const ATTACK_CLIP: f32 = 0.35;
    /// Hurt clip length
    const HURT_CLIP: f32 = 0.3;

    fn schedule(&mut self, character: CharacterId, delay: f32, event: AnimationEvent) {
        self.pending.push((character, delay, event));
    }

    /// Advance clip time and return the callbacks that are due, in schedule order
    fn advance(&mut self, dt: f32) -> Vec<(CharacterId, AnimationEvent)> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(character, remaining, event)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                due.push((*character, *event));
                false
            } else {
                true
            }
        });
        due
    }
}

impl AnimationSink for ClipTimer {
    fn trigger(&mut self, character: CharacterId, trigger: AnimationTrigger) {
        log::debug!("[anim] {} <- {:?}", character, trigger);
        match trigger {
            AnimationTrigger::Attack | AnimationTrigger::DashAttack => {
                // A new swing interrupts the callbacks of the previous one
                self.pending.retain(|(id, _, event)| {
                    *id != character || *event == AnimationEvent::HurtAnimationEnd
                });
                self.schedule(
                    character,
                    Self::ATTACK_WINDOW_START,
                    AnimationEvent::AttackWindowStart,
                );
                self.schedule(character, Self::ATTACK_CLIP, AnimationEvent::AttackWindowEnd);
            }
            AnimationTrigger::Hurt => {
                // Getting hit interrupts the current clip
                self.pending.retain(|(id, _, _)| *id != character);
                self.schedule(character, Self::HURT_CLIP, AnimationEvent::HurtAnimationEnd);
            }
            AnimationTrigger::Dead => {
                self.pending.retain(|(id, _, _)| *id != character);
            }
            AnimationTrigger::Dash => {}
        }
    }

    fn set_params(&mut self, character: CharacterId, params: AnimationParams) {
        match self.params.iter_mut().find(|(id, _)| *id == character) {
            Some(entry) => entry.1 = params,
            None => self.params.push((character, params)),
        }
    }
}

/// Player inputs keyed by tick
fn scripted_input(tick: u64) -> &'static [InputEvent] {
    match tick {
        30 => &[InputEvent::Move(1.0)],
        110 => &[InputEvent::Move(0.0), InputEvent::Attack],
        130 => &[InputEvent::Attack],
        200 => &[InputEvent::Attack],
        260 => &[InputEvent::Move(-1.0)],
        290 => &[InputEvent::Jump],
        340 => &[InputEvent::Move(1.0), InputEvent::Dash],
        346 => &[InputEvent::Attack],
        400 => &[InputEvent::Move(0.0), InputEvent::Attack],
        420 => &[InputEvent::Attack],
        _ => &[],
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting platformer simulation...");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("Could not load config {}", path))?,
        None => GameConfig::default(),
    };

    let mut sim = Simulation::new(config);
    sim.add_platform(Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0));
    sim.add_platform(Vec2::new(12.0, 1.5), Vec2::new(4.0, 1.0));

    let player = sim.spawn_player("Hero", Vec2::new(0.0, 0.6));
    let enemy = sim.spawn_enemy("Slime", Vec2::new(5.0, 0.5));
    let lookout = sim.spawn_enemy("Lookout", Vec2::new(12.0, 2.5));
    sim.set_target(enemy, Some(player))?;
    sim.set_target(lookout, Some(player))?;

    let mut animator = ClipTimer::default();
    let mut game_loop = GameLoop::with_timestep(config.timestep);
    let frame = Duration::from_secs_f32(config.timestep);

    while game_loop.simulated_secs() < RUN_SECONDS {
        let ticks = game_loop.advance(frame);
        for _ in 0..ticks {
            for event in scripted_input(sim.tick_count()) {
                sim.push_input(player, *event)?;
            }

            sim.tick(&mut animator);

            for (character, event) in animator.advance(config.timestep) {
                sim.animation_event(character, event)?;
            }

            for hit in sim.drain_hits() {
                info!(
                    "t={:.2}s {} hit {} for {}{}",
                    sim.elapsed(),
                    hit.attacker,
                    hit.target,
                    hit.damage.amount,
                    if hit.lethal { " (lethal)" } else { "" }
                );
            }
        }
    }

    for character in sim.characters().all() {
        info!(
            "{}: {:?}, {}/{} hp, facing {}",
            character.name,
            character.state(),
            character.health().current(),
            character.health().max(),
            character.facing()
        );
    }
    info!(
        "Simulated {} ticks ({:.2}s), {} alive",
        sim.tick_count(),
        sim.elapsed(),
        sim.characters().alive_count()
    );

    Ok(())
}
