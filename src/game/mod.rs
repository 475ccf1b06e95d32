// Gameplay: characters, combat and the per-tick simulation

pub mod characters;
pub mod combat;
pub mod simulation;
