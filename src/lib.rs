// Platformer action core
//
// Deterministic, tick-driven character controllers for a 2D platformer:
// - `core`: small math helpers and countdown timers
// - `engine`: fixed-timestep loop, abstract input stream, rapier2d physics host
// - `game`: action state machine, player/enemy controllers, hitboxes, simulation
// - `config`: tuning loaded from RON

pub mod config;
pub mod core;
pub mod engine;
pub mod game;

pub use config::{ConfigError, GameConfig};
pub use game::simulation::{Simulation, SimulationError};
