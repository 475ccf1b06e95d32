// Animation signals exchanged with the host animation layer

use super::character::CharacterId;

/// One-shot animation triggers fired by the action state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    Attack,
    DashAttack,
    Dash,
    Hurt,
    Dead,
}

/// Continuous animation parameters, synced once per tick in the late pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationParams {
    pub speed: f32,
    pub grounded: bool,
    pub combo_index: i32,
}

/// Callbacks the host animation layer invokes at specific clip frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationEvent {
    /// The swing reached its active frames
    AttackWindowStart,
    /// The swing ended
    AttackWindowEnd,
    /// The hurt clip finished playing
    HurtAnimationEnd,
}

/// Fire-and-forget receiver of animation signals. The core never reads back.
pub trait AnimationSink {
    fn trigger(&mut self, character: CharacterId, trigger: AnimationTrigger);

    fn set_params(&mut self, character: CharacterId, params: AnimationParams);
}

/// Sink that keeps everything it receives, for tests and headless runs
#[derive(Debug, Default)]
pub struct SignalRecorder {
    triggers: Vec<(CharacterId, AnimationTrigger)>,
    params: Vec<(CharacterId, AnimationParams)>,
}

impl SignalRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> &[(CharacterId, AnimationTrigger)] {
        &self.triggers
    }

    /// Triggers fired for one character, in order
    pub fn triggers_for(&self, character: CharacterId) -> Vec<AnimationTrigger> {
        self.triggers
            .iter()
            .filter(|(id, _)| *id == character)
            .map(|(_, trigger)| *trigger)
            .collect()
    }

    /// Most recent parameters synced for one character
    pub fn last_params(&self, character: CharacterId) -> Option<AnimationParams> {
        self.params
            .iter()
            .rev()
            .find(|(id, _)| *id == character)
            .map(|(_, params)| *params)
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
        self.params.clear();
    }
}

impl AnimationSink for SignalRecorder {
    fn trigger(&mut self, character: CharacterId, trigger: AnimationTrigger) {
        self.triggers.push((character, trigger));
    }

    fn set_params(&mut self, character: CharacterId, params: AnimationParams) {
        self.params.push((character, params));
    }
}
