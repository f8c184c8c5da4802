//! Player motion
//!
//! Jumping is a small state machine stepped by the frame tick: every
//! `jump_step_ms` of simulated time the player moves `jump_step_px` toward the
//! current target (peak or ground). The player never moves horizontally; the
//! world scrolls instead.

use glam::Vec2;
use serde::Serialize;

use crate::consts::PLAYER_X;
use crate::tuning::Tuning;

/// Vertical motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JumpState {
    #[default]
    Grounded,
    /// Rising toward the first jump's peak
    Ascending,
    /// Rising toward a secondary peak (double or triple jump)
    DoubleAscending,
    /// Falling back to the ground
    Descending,
}

/// Result of a jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Jump refused (no ascents left)
    Ignored,
    /// Took off from the ground
    Jumped,
    /// Second ascent in the air
    DoubleJumped,
    /// Third ascent, only with the triple jump ability
    ExtraJumped,
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    /// Bottom-left corner; `y` is the height above the ground
    pub pos: Vec2,
    pub jump_state: JumpState,
    pub can_double_jump: bool,
    pub has_double_jumped: bool,
    /// Ascents started since the last ground contact
    ascents: u8,
    /// Height the current ascent stops at
    peak: f32,
    /// Simulated time not yet converted into motion steps
    step_accum_ms: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, 0.0),
            jump_state: JumpState::Grounded,
            can_double_jump: false,
            has_double_jumped: false,
            ascents: 0,
            peak: 0.0,
            step_accum_ms: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.jump_state != JumpState::Grounded
    }

    /// Height the current ascent is heading for (0 when grounded)
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Start a jump if the ascent budget allows it
    pub fn jump(&mut self, max_ascents: u8, tuning: &Tuning) -> JumpOutcome {
        if self.jump_state == JumpState::Grounded {
            self.jump_state = JumpState::Ascending;
            self.peak = tuning.jump_height;
            self.ascents = 1;
            self.can_double_jump = true;
            self.has_double_jumped = false;
            self.step_accum_ms = 0.0;
            return JumpOutcome::Jumped;
        }

        if self.ascents >= max_ascents {
            return JumpOutcome::Ignored;
        }

        // Cancel the current trajectory and climb again from here
        let outcome = if self.ascents == 1 {
            JumpOutcome::DoubleJumped
        } else {
            JumpOutcome::ExtraJumped
        };
        self.jump_state = JumpState::DoubleAscending;
        self.peak = self.pos.y + tuning.double_jump_height;
        self.ascents += 1;
        self.can_double_jump = false;
        self.has_double_jumped = true;
        outcome
    }

    /// Advance vertical motion. Returns true on the tick the player lands.
    pub fn update(&mut self, dt_ms: f32, tuning: &Tuning) -> bool {
        if self.jump_state == JumpState::Grounded {
            self.step_accum_ms = 0.0;
            return false;
        }

        self.step_accum_ms += dt_ms;
        while self.step_accum_ms >= tuning.jump_step_ms {
            self.step_accum_ms -= tuning.jump_step_ms;
            if self.step(tuning.jump_step_px) {
                return true;
            }
        }
        false
    }

    /// One motion step. Returns true when it lands.
    fn step(&mut self, step_px: f32) -> bool {
        match self.jump_state {
            JumpState::Ascending | JumpState::DoubleAscending => {
                self.pos.y = (self.pos.y + step_px).min(self.peak);
                if self.pos.y >= self.peak {
                    self.jump_state = JumpState::Descending;
                }
                false
            }
            JumpState::Descending => {
                self.pos.y = (self.pos.y - step_px).max(0.0);
                if self.pos.y <= 0.0 {
                    self.land();
                    return true;
                }
                false
            }
            JumpState::Grounded => false,
        }
    }

    fn land(&mut self) {
        self.pos.y = 0.0;
        self.jump_state = JumpState::Grounded;
        self.can_double_jump = false;
        self.has_double_jumped = false;
        self.ascents = 0;
        self.peak = 0.0;
        self.step_accum_ms = 0.0;
    }
}
