//! Shared simulation types
//!
//! Phase, the event feed consumed by audio/UI, and the modifier block that
//! power-ups and abilities toggle.

use serde::Serialize;

use super::ability::AbilityKind;
use super::powerup::{Gun, PowerupKind};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Nothing running, waiting for start
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Frozen; all timers suspended
    Paused,
    /// Run ended by a collision; final score still visible
    GameOver,
}

/// Things that happened during a command or tick, for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Jumped,
    DoubleJumped,
    ObstaclePassed { id: u32 },
    ObstacleDestroyed { id: u32 },
    ShotFired,
    PowerupCollected(PowerupKind),
    PowerupExpired(PowerupKind),
    AbilityUsed(AbilityKind),
    AbilityEnded(AbilityKind),
    LevelUp { level: u32 },
    SkinUnlocked { id: &'static str },
    GameOver { score: u64, new_high_score: bool },
}

/// Gameplay modifiers toggled by power-ups and abilities
///
/// Power-ups and abilities write disjoint fields, so both effect slots can
/// share this block without undoing each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifiers {
    // === Power-ups ===
    /// Collisions ignored
    pub invisible: bool,
    /// Obstacles drawn (and optionally hit-tested) smaller
    pub shrink_obstacles: bool,
    /// Score multiplier
    pub points_multiplier: u64,
    /// Obstacle speed multiplier from slow-time
    pub slow_scale: f32,
    /// Gun and projectile slot
    pub gun: Gun,

    // === Abilities ===
    /// Collisions ignored
    pub shielded: bool,
    /// Obstacle speed multiplier from time warp
    pub warp_scale: f32,
    /// Player hitbox halved
    pub small_player: bool,
    /// Power-ups collectable from the ground with extended reach
    pub magnet: bool,
    /// Third ascent allowed before landing
    pub triple_jump: bool,
    /// World scroll requested by dash/teleport, consumed next tick
    pub pending_shift: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            invisible: false,
            shrink_obstacles: false,
            points_multiplier: 1,
            slow_scale: 1.0,
            gun: Gun::Holstered,
            shielded: false,
            warp_scale: 1.0,
            small_player: false,
            magnet: false,
            triple_jump: false,
            pending_shift: 0.0,
        }
    }
}

impl Modifiers {
    /// Combined multiplier the session applies to obstacle speed
    pub fn speed_scale(&self) -> f32 {
        self.slow_scale * self.warp_scale
    }

    /// Whether obstacle collisions currently end the run
    pub fn collisions_enabled(&self) -> bool {
        !self.invisible && !self.shielded
    }

    /// Ascents allowed between two ground contacts
    pub fn max_ascents(&self) -> u8 {
        if self.triple_jump { 3 } else { 2 }
    }
}
