//! Character special abilities
//!
//! Granted by skins, triggered by the player, gated by a cooldown measured on
//! the session clock. Abilities with a duration occupy their own effect slot
//! (independent of power-ups); instantaneous ones apply and revert at once.

use serde::Serialize;

use super::effects::{EffectSlot, TimedEffect};
use super::state::Modifiers;
use crate::skins::AbilitySpec;

/// World scroll applied by a dash
pub const DASH_DISTANCE: f32 = 150.0;
/// World scroll applied by a teleport
pub const TELEPORT_DISTANCE: f32 = 200.0;
/// Obstacle motion multiplier during a time warp
pub const TIME_WARP_SCALE: f32 = 1.0 / 3.0;
/// Extra horizontal reach for power-up pickup while the magnet is active
pub const MAGNET_REACH: f32 = 100.0;

/// Ability types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AbilityKind {
    /// Player hitbox halved
    SizeChange,
    /// Short burst forward
    Dash,
    /// Collisions ignored
    Shield,
    /// Pull power-ups off obstacles
    Magnet,
    /// Obstacles crawl
    TimeWarp,
    /// One more ascent before landing
    TripleJump,
    /// Jump ahead in the world
    Teleport,
}

impl AbilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityKind::SizeChange => "size_change",
            AbilityKind::Dash => "dash",
            AbilityKind::Shield => "shield",
            AbilityKind::Magnet => "magnet",
            AbilityKind::TimeWarp => "time_warp",
            AbilityKind::TripleJump => "triple_jump",
            AbilityKind::Teleport => "teleport",
        }
    }
}

impl TimedEffect for AbilityKind {
    type Target = Modifiers;

    fn apply(self, m: &mut Modifiers) {
        match self {
            AbilityKind::SizeChange => m.small_player = true,
            AbilityKind::Dash => m.pending_shift += DASH_DISTANCE,
            AbilityKind::Shield => m.shielded = true,
            AbilityKind::Magnet => m.magnet = true,
            AbilityKind::TimeWarp => m.warp_scale = TIME_WARP_SCALE,
            AbilityKind::TripleJump => m.triple_jump = true,
            AbilityKind::Teleport => m.pending_shift += TELEPORT_DISTANCE,
        }
    }

    fn revert(self, m: &mut Modifiers) {
        match self {
            AbilityKind::SizeChange => m.small_player = false,
            // Distance already travelled stays travelled
            AbilityKind::Dash | AbilityKind::Teleport => {}
            AbilityKind::Shield => m.shielded = false,
            AbilityKind::Magnet => m.magnet = false,
            AbilityKind::TimeWarp => m.warp_scale = 1.0,
            AbilityKind::TripleJump => m.triple_jump = false,
        }
    }
}

/// Why an ability request was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityRefusal {
    /// The ability is still running
    AlreadyActive,
    /// Cooldown not finished; milliseconds left
    CoolingDown(f32),
}

/// Ability slot plus cooldown bookkeeping
#[derive(Debug, Clone, Default, Serialize)]
pub struct AbilityTracker {
    slot: EffectSlot<AbilityKind>,
    /// Session clock time of the last activation
    last_used_at: Option<f64>,
}

impl AbilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<AbilityKind> {
        self.slot.current()
    }

    pub fn remaining_ms(&self) -> Option<f32> {
        self.slot.remaining_ms()
    }

    pub fn last_used_at(&self) -> Option<f64> {
        self.last_used_at
    }

    /// Cooldown left at `now_ms` (0 when ready)
    pub fn cooldown_remaining(&self, spec: &AbilitySpec, now_ms: f64) -> f32 {
        match self.last_used_at {
            Some(last) => (spec.cooldown_ms as f64 - (now_ms - last)).max(0.0) as f32,
            None => 0.0,
        }
    }

    /// Trigger the ability described by `spec`
    pub fn activate(
        &mut self,
        spec: &AbilitySpec,
        now_ms: f64,
        m: &mut Modifiers,
    ) -> Result<(), AbilityRefusal> {
        if self.slot.is_active() {
            return Err(AbilityRefusal::AlreadyActive);
        }
        let cooldown = self.cooldown_remaining(spec, now_ms);
        if cooldown > 0.0 {
            return Err(AbilityRefusal::CoolingDown(cooldown));
        }

        match spec.duration_ms {
            Some(duration) => {
                self.slot.activate(spec.kind, duration, m);
            }
            None => {
                spec.kind.apply(m);
                spec.kind.revert(m);
            }
        }
        self.last_used_at = Some(now_ms);
        Ok(())
    }

    /// Advance the duration timer. Returns the ability that just ended.
    pub fn tick(&mut self, dt_ms: f32, m: &mut Modifiers) -> Option<AbilityKind> {
        self.slot.tick(dt_ms, m)
    }
}
