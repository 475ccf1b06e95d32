// Character action state machine

use super::signals::AnimationTrigger;
use super::stats::{EnemyStats, PlayerStats};
use crate::core::math;
use crate::core::Countdown;

/// Voluntary movement mode while no action is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locomotion {
    /// Player standing still
    Idle,
    /// Player walking
    Walk,
    /// Enemy wandering along its platform
    Patrol,
    /// Enemy running at its target
    Chase,
}

/// Which attack is being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// Player ground combo (see `ActionStateMachine::combo_index`)
    Combo,
    /// Player attack launched out of a dash
    Dash,
    /// Enemy single strike
    Strike,
}

/// Represents the current action of a character. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionState {
    Move(Locomotion),
    Attack(AttackKind),
    Dash,
    Hurt,
    /// Terminal
    Dead,
}

impl Default for ActionState {
    fn default() -> Self {
        Self::Move(Locomotion::Idle)
    }
}

impl ActionState {
    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Check if the character accepts voluntary input (move, attack, dash, jump)
    pub fn can_act(&self) -> bool {
        !matches!(self, Self::Hurt | Self::Dead)
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self, Self::Attack(_))
    }

    /// Check if the facing direction may change
    pub fn can_turn(&self) -> bool {
        !matches!(self, Self::Attack(_) | Self::Dash | Self::Dead)
    }
}

/// Durations driving the state machine's timers (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionTiming {
    pub combo_window: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub attack_cooldown: f32,
    pub hurt_recovery: Option<f32>,
}

impl From<&PlayerStats> for ActionTiming {
    fn from(stats: &PlayerStats) -> Self {
        Self {
            combo_window: stats.combo_window,
            dash_duration: stats.dash_duration,
            dash_cooldown: stats.dash_cooldown,
            attack_cooldown: 0.0,
            hurt_recovery: stats.hurt_recovery,
        }
    }
}

impl From<&EnemyStats> for ActionTiming {
    fn from(stats: &EnemyStats) -> Self {
        Self {
            combo_window: 0.0,
            dash_duration: 0.0,
            dash_cooldown: 0.0,
            attack_cooldown: stats.attack_cooldown,
            hurt_recovery: stats.hurt_recovery,
        }
    }
}

/// Result of a damage event reaching the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already dead, nothing happened
    Ignored,
    Hurt,
    Killed,
}

/// Last combo step; further attack input is ignored until the combo resets
const FINAL_COMBO_STEP: u8 = 2;

/// State machine that handles character action transitions.
///
/// Every intent method is a guarded transition: calling it when the action is
/// illegal does nothing and returns false. Timers only advance through `tick`.
#[derive(Debug)]
pub struct ActionStateMachine {
    current_state: ActionState,
    previous_state: ActionState,
    state_time: f32,
    /// Locomotion entered when an action ends
    rest: Locomotion,
    facing: f32,

    combo_index: u8,
    /// The current swing reported its end while the combo window is still open
    swing_finished: bool,
    /// The combo window opened during this tick's intents and waits for the next tick
    combo_window_fresh: bool,
    /// An enemy strike fired its trigger and has not reported its end
    strike_in_flight: bool,

    combo_window: Countdown,
    attack_cooldown: Countdown,
    dash_time: Countdown,
    dash_cooldown: Countdown,
    hurt_time: Countdown,

    timing: ActionTiming,
    triggers: Vec<AnimationTrigger>,
}

impl ActionStateMachine {
    pub fn new(timing: ActionTiming, rest: Locomotion) -> Self {
        Self {
            current_state: ActionState::Move(rest),
            previous_state: ActionState::Move(rest),
            state_time: 0.0,
            rest,
            facing: 1.0,
            combo_index: 0,
            swing_finished: false,
            combo_window_fresh: false,
            strike_in_flight: false,
            combo_window: Countdown::idle(),
            attack_cooldown: Countdown::idle(),
            dash_time: Countdown::idle(),
            dash_cooldown: Countdown::idle(),
            hurt_time: Countdown::idle(),
            timing,
            triggers: Vec::new(),
        }
    }

    /// State machine for a player
    pub fn for_player(stats: &PlayerStats) -> Self {
        Self::new(ActionTiming::from(stats), Locomotion::Idle)
    }

    /// State machine for an enemy
    pub fn for_enemy(stats: &EnemyStats) -> Self {
        Self::new(ActionTiming::from(stats), Locomotion::Patrol)
    }

    /// Get the current state
    pub fn state(&self) -> ActionState {
        self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> ActionState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Check if state just changed this tick
    pub fn state_just_changed(&self) -> bool {
        self.state_time == 0.0
    }

    /// Horizontal orientation, +1 right / -1 left
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// 0 = no combo, 1 = first hit, 2 = second hit
    pub fn combo_index(&self) -> u8 {
        self.combo_index
    }

    pub fn combo_window_remaining(&self) -> f32 {
        self.combo_window.remaining()
    }

    pub fn dash_ready(&self) -> bool {
        self.dash_cooldown.is_ready()
    }

    pub fn attack_ready(&self) -> bool {
        self.attack_cooldown.is_ready()
    }

    /// Take the animation triggers fired since the last call
    pub fn drain_triggers(&mut self) -> Vec<AnimationTrigger> {
        std::mem::take(&mut self.triggers)
    }

    pub fn pending_triggers(&self) -> &[AnimationTrigger] {
        &self.triggers
    }

    fn transition(&mut self, new_state: ActionState) {
        if self.current_state != new_state {
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_time = 0.0;
        }
    }

    fn reset_combo(&mut self) {
        self.combo_index = 0;
        self.combo_window.clear();
        self.combo_window_fresh = false;
        self.swing_finished = false;
    }

    /// Advance every timer by one tick and apply timer-driven transitions
    pub fn tick(&mut self, dt: f32) {
        self.state_time += dt;

        // A window opened this tick keeps its full length
        if !std::mem::take(&mut self.combo_window_fresh) {
            self.combo_window.tick(dt);
        }
        let dash_over = self.dash_time.tick(dt);
        self.dash_cooldown.tick(dt);
        self.attack_cooldown.tick(dt);
        let hurt_over = self.hurt_time.tick(dt);

        // A first hit left unanswered drops the combo
        if self.combo_index == 1 && self.combo_window.is_ready() {
            self.combo_index = 0;
        }

        match self.current_state {
            ActionState::Attack(AttackKind::Combo)
                if self.combo_index == 0 && self.swing_finished =>
            {
                self.swing_finished = false;
                self.transition(ActionState::Move(self.rest));
            }
            ActionState::Dash if dash_over => {
                self.transition(ActionState::Move(self.rest));
            }
            ActionState::Hurt if hurt_over => {
                self.transition(ActionState::Move(self.rest));
            }
            _ => {}
        }
    }

    /// Change locomotion. Legal while moving, and for enemies holding their
    /// strike stance between swings. A strike in flight ends only through
    /// `finish_attack`.
    pub fn steer(&mut self, locomotion: Locomotion) -> bool {
        match self.current_state {
            ActionState::Move(_) => {}
            ActionState::Attack(AttackKind::Strike) if !self.strike_in_flight => {}
            _ => return false,
        }
        self.transition(ActionState::Move(locomotion));
        true
    }

    /// Face toward a signed direction if turning is currently allowed
    pub fn turn_toward(&mut self, direction: f32) {
        if self.current_state.can_turn() {
            self.facing = math::facing_from(direction, self.facing);
        }
    }

    /// Flip facing (ledge turn-around)
    pub fn reverse_facing(&mut self) {
        if self.current_state.can_turn() {
            self.facing = -self.facing;
        }
    }

    /// Player attack intent: starts, chains or converts a dash into an attack
    pub fn attack(&mut self, grounded: bool) -> bool {
        match self.current_state {
            // Dash attack supersedes the dash, grounded or not
            ActionState::Dash => {
                self.dash_time.clear();
                self.swing_finished = false;
                self.transition(ActionState::Attack(AttackKind::Dash));
                self.triggers.push(AnimationTrigger::DashAttack);
                true
            }
            ActionState::Move(_) if grounded => {
                self.begin_combo();
                true
            }
            ActionState::Attack(AttackKind::Combo) => match self.combo_index {
                1 if self.combo_window.is_running() => {
                    self.combo_index = FINAL_COMBO_STEP;
                    self.combo_window.clear();
                    self.swing_finished = false;
                    self.triggers.push(AnimationTrigger::Attack);
                    true
                }
                // Combo was dropped, this is a fresh first hit
                0 if grounded => {
                    self.begin_combo();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn begin_combo(&mut self) {
        self.combo_index = 1;
        self.combo_window.start(self.timing.combo_window);
        self.combo_window_fresh = true;
        self.swing_finished = false;
        self.transition(ActionState::Attack(AttackKind::Combo));
        self.triggers.push(AnimationTrigger::Attack);
    }

    /// Player dash intent
    pub fn dash(&mut self, grounded: bool) -> bool {
        let ActionState::Move(_) = self.current_state else {
            return false;
        };
        if !grounded || self.dash_cooldown.is_running() {
            return false;
        }

        self.dash_time.start(self.timing.dash_duration);
        self.dash_cooldown.start(self.timing.dash_cooldown);
        self.transition(ActionState::Dash);
        self.triggers.push(AnimationTrigger::Dash);
        true
    }

    /// Check if a jump is legal right now
    pub fn can_jump(&self, grounded: bool) -> bool {
        grounded && matches!(self.current_state, ActionState::Move(_))
    }

    /// Enemy attack intent: hold the strike stance, swing when the cooldown allows
    /// and no previous swing is still playing
    pub fn strike(&mut self) -> bool {
        match self.current_state {
            ActionState::Move(_) | ActionState::Attack(AttackKind::Strike) => {
                self.transition(ActionState::Attack(AttackKind::Strike));
            }
            _ => return false,
        }

        if self.strike_in_flight || self.attack_cooldown.is_running() {
            return false;
        }
        self.attack_cooldown.start(self.timing.attack_cooldown);
        self.strike_in_flight = true;
        self.triggers.push(AnimationTrigger::Attack);
        true
    }

    /// Check if an attack window may arm a hitbox
    pub fn can_arm_hitbox(&self) -> bool {
        self.current_state.can_act()
    }

    /// End-of-attack callback from the animation layer
    pub fn finish_attack(&mut self) {
        match self.current_state {
            ActionState::Attack(AttackKind::Dash) | ActionState::Attack(AttackKind::Strike) => {
                self.strike_in_flight = false;
                self.transition(ActionState::Move(self.rest));
            }
            ActionState::Attack(AttackKind::Combo) => {
                if self.combo_index == 1 && self.combo_window.is_running() {
                    // Stay in the swing until the window closes or the combo chains
                    self.swing_finished = true;
                } else {
                    self.reset_combo();
                    self.transition(ActionState::Move(self.rest));
                }
            }
            _ => {}
        }
    }

    /// Damage reached this character. `lethal` when health is now depleted.
    pub fn apply_hit(&mut self, lethal: bool) -> HitOutcome {
        if self.current_state.is_dead() {
            return HitOutcome::Ignored;
        }

        self.reset_combo();
        self.dash_time.clear();
        self.strike_in_flight = false;

        if lethal {
            self.hurt_time.clear();
            self.transition(ActionState::Dead);
            self.triggers.push(AnimationTrigger::Dead);
            return HitOutcome::Killed;
        }

        // Repeated hits restart the hurt state
        self.previous_state = self.current_state;
        self.current_state = ActionState::Hurt;
        self.state_time = 0.0;
        if let Some(recovery) = self.timing.hurt_recovery {
            self.hurt_time.start(recovery);
        }
        self.triggers.push(AnimationTrigger::Hurt);
        HitOutcome::Hurt
    }

    /// Hurt-animation-end callback
    pub fn finish_hurt(&mut self) -> bool {
        if self.current_state != ActionState::Hurt {
            return false;
        }
        self.hurt_time.clear();
        self.transition(ActionState::Move(self.rest));
        true
    }
}
