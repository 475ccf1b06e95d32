//! Fixed timestep driver
//!
//! Converts variable frame durations supplied by the host into a whole
//! number of fixed simulation ticks. Gameplay timers only ever advance by
//! the tick length, never by wall-clock time.
use std::time::Duration;

/// Default tick length in seconds (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Upper bound on ticks run for a single frame. Time beyond it is dropped.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Accumulates frame time and hands it back as whole ticks
#[derive(Debug)]
pub struct GameLoop {
    tick: Duration,
    /// Frame time received but not yet simulated
    backlog: Duration,
    paused: bool,
    frames: u64,
    ticks: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::with_timestep(FIXED_TIMESTEP)
    }

    /// Loop with a configured tick length in seconds
    pub fn with_timestep(seconds: f32) -> Self {
        Self {
            tick: Duration::from_secs_f32(seconds.max(f32::EPSILON)),
            backlog: Duration::ZERO,
            paused: false,
            frames: 0,
            ticks: 0,
        }
    }

    /// Feed one frame's elapsed time. Returns how many ticks the host should run now.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frames += 1;
        if self.paused {
            return 0;
        }

        self.backlog += frame_time;
        let available = self.backlog.as_nanos() / self.tick.as_nanos();
        let due = available.min(MAX_TICKS_PER_FRAME as u128) as u32;

        if available > due as u128 {
            log::warn!(
                "Simulation falling behind, dropping {:.3}s of frame time",
                (self.backlog - self.tick * due).as_secs_f32()
            );
            self.backlog = Duration::ZERO;
        } else {
            self.backlog -= self.tick * due;
        }

        self.ticks += due as u64;
        due
    }

    /// Tick length in seconds
    pub fn timestep(&self) -> f32 {
        self.tick.as_secs_f32()
    }

    /// Fraction of a tick left in the backlog, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.backlog.as_secs_f32() / self.tick.as_secs_f32()
    }

    pub fn simulated_secs(&self) -> f32 {
        self.ticks as f32 * self.timestep()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.backlog = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
