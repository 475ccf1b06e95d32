// Countdown timers driven by the fixed tick

/// A duration counting down to zero, decremented once per tick.
///
/// Used for cooldowns, the combo window and the dash duration. A countdown
/// that is not running is "ready".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A countdown that is not running
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    /// (Re)start the countdown
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Stop the countdown immediately
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by one tick. Returns true only on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_ready(&self) -> bool {
        !self.is_running()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_ready() {
        let timer = Countdown::idle();
        assert!(timer.is_ready());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_expires_once() {
        let mut timer = Countdown::idle();
        timer.start(0.5);
        assert!(!timer.tick(0.3));
        assert!(timer.is_running());
        assert!(timer.tick(0.3));
        assert!(timer.is_ready());
        // Already expired, no second edge
        assert!(!timer.tick(0.3));
    }

    #[test]
    fn test_clear() {
        let mut timer = Countdown::idle();
        timer.start(1.0);
        timer.clear();
        assert!(timer.is_ready());
        assert!(!timer.tick(0.1));
    }

    #[test]
    fn test_negative_duration_is_idle() {
        let mut timer = Countdown::idle();
        timer.start(-1.0);
        assert!(timer.is_ready());
    }
}
