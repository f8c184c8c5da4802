//! Power-ups carried by obstacles
//!
//! Each kind is a fixed-duration buff applied to `Modifiers` through the
//! shared effect slot. The gun owns the single projectile slot.

use glam::Vec2;
use serde::Serialize;

use super::effects::TimedEffect;
use super::state::Modifiers;
use crate::consts::*;

/// Obstacle motion multiplier while slow-time is active
pub const SLOW_TIME_SCALE: f32 = 0.5;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PowerupKind {
    /// Obstacles pass through the player
    Invisibility,
    /// Obstacles move at half speed
    SlowTime,
    /// Player may fire one projectile at a time
    Gun,
    /// Obstacles shrink
    ShrinkObstacles,
    /// Points are doubled
    DoublePoints,
}

impl PowerupKind {
    /// Every kind, in spawn-table order
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Invisibility,
        PowerupKind::SlowTime,
        PowerupKind::Gun,
        PowerupKind::ShrinkObstacles,
        PowerupKind::DoublePoints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Invisibility => "invisibility",
            PowerupKind::SlowTime => "slowTime",
            PowerupKind::Gun => "gun",
            PowerupKind::ShrinkObstacles => "shrinkObstacles",
            PowerupKind::DoublePoints => "doublePoints",
        }
    }
}

impl TimedEffect for PowerupKind {
    type Target = Modifiers;

    fn apply(self, m: &mut Modifiers) {
        match self {
            PowerupKind::Invisibility => m.invisible = true,
            PowerupKind::SlowTime => m.slow_scale = SLOW_TIME_SCALE,
            PowerupKind::Gun => m.gun = Gun::Ready,
            PowerupKind::ShrinkObstacles => m.shrink_obstacles = true,
            PowerupKind::DoublePoints => m.points_multiplier = 2,
        }
    }

    fn revert(self, m: &mut Modifiers) {
        match self {
            PowerupKind::Invisibility => m.invisible = false,
            PowerupKind::SlowTime => m.slow_scale = 1.0,
            PowerupKind::Gun => m.gun = Gun::Holstered,
            PowerupKind::ShrinkObstacles => m.shrink_obstacles = false,
            PowerupKind::DoublePoints => m.points_multiplier = 1,
        }
    }
}

/// A bullet fired by the gun power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projectile {
    /// Bottom-left corner
    pub pos: Vec2,
}

impl Projectile {
    /// Fired from the front of the player, at half height
    pub fn from_player(player_pos: Vec2) -> Self {
        Self {
            pos: player_pos + Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT / 2.0),
        }
    }

    /// Move right. Returns false once it has left the play field.
    pub fn advance(&mut self, distance: f32) -> bool {
        self.pos.x += distance;
        self.pos.x <= GAME_WIDTH
    }
}

/// Gun state; at most one projectile exists, and only while the gun is active
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Gun {
    /// No gun power-up
    #[default]
    Holstered,
    /// Gun active, nothing in flight
    Ready,
    /// Gun active, one projectile in flight
    Firing(Projectile),
}

impl Gun {
    pub fn projectile(&self) -> Option<&Projectile> {
        match self {
            Gun::Firing(projectile) => Some(projectile),
            _ => None,
        }
    }

    /// Fire from the player's position. Only works when `Ready`.
    pub fn fire(&mut self, player_pos: Vec2) -> bool {
        if *self != Gun::Ready {
            return false;
        }
        *self = Gun::Firing(Projectile::from_player(player_pos));
        true
    }

    /// Projectile hit something or left the screen
    pub fn clear_projectile(&mut self) {
        if matches!(self, Gun::Firing(_)) {
            *self = Gun::Ready;
        }
    }

    /// Move the projectile, clearing it once off screen
    pub fn advance(&mut self, distance: f32) {
        if let Gun::Firing(projectile) = self {
            if !projectile.advance(distance) {
                *self = Gun::Ready;
            }
        }
    }
}
