// Engine modules: fixed-timestep loop, input stream, physics host

pub mod game_loop;
pub mod input;
pub mod physics;
