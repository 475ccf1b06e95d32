// Input handling
//
// Device binding belongs to the host. The core only sees an abstract stream of
// discrete input events per player-controlled character.
//
// ## Architecture
//
// - `action`: the input events a player can produce
// - `stream`: per-player queue drained once per tick
//
// ## Usage Example
//
// ```rust
// use platformer_action_core::engine::input::{InputEvent, InputStream};
//
// let mut stream = InputStream::new();
// stream.push(InputEvent::movement(1.0));
// stream.push(InputEvent::Attack);
//
// // At the start of each tick the controller drains everything queued so far
// for event in stream.drain() {
//     // hand the event to the action state machine
//     let _ = event;
// }
// ```

pub mod action;
pub mod stream;

// Re-export commonly used types
pub use action::{clamp_axis, InputEvent};
pub use stream::InputStream;
