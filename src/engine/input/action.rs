// Player input events

/// Represents all discrete input events a player can produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Horizontal movement axis changed (-1.0 to 1.0, 0.0 = released)
    Move(f32),
    Jump,
    Attack,
    Dash,
}

impl InputEvent {
    /// Create a movement event with the axis clamped to [-1, 1]
    pub fn movement(axis: f32) -> Self {
        Self::Move(clamp_axis(axis))
    }

    /// Whether this event asks for a one-shot action (jump, attack, dash)
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::Move(_))
    }
}

/// Clamp a movement axis to [-1, 1]. Non-finite values read as released.
pub fn clamp_axis(axis: f32) -> f32 {
    if axis.is_finite() {
        axis.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
