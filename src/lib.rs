//! Obstacle Jumper - a side-scrolling obstacle jumping game
//!
//! Core modules:
//! - `sim`: Frame-deterministic simulation (jumping, obstacles, power-ups, scoring)
//! - `skins`: Static catalog of unlockable characters
//! - `profile`: Progress that outlives a session (high score, unlocked skins)
//! - `persistence`: Key-value storage abstraction and JSON helpers
//! - `platform`: Fixed-step frame clock and browser bindings
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod sim;
pub mod skins;
pub mod tuning;

pub use error::{Error, Result};
pub use profile::Profile;
pub use sim::{GameEvent, GamePhase, GameSession, TickInput};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Duration of one simulation frame in milliseconds (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Width of the visible play field
    pub const GAME_WIDTH: f32 = 800.0;

    /// Player hitbox; the player stands at a fixed x near the left edge
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_X: f32 = 150.0;

    /// Projectile hitbox (gun power-up)
    pub const PROJECTILE_WIDTH: f32 = 10.0;
    pub const PROJECTILE_HEIGHT: f32 = 5.0;

    /// Points awarded per passed or destroyed obstacle, before multipliers
    pub const BASE_POINTS: u64 = 10;
    /// Every time the score crosses a multiple of this, the level goes up
    pub const POINTS_PER_LEVEL: u64 = 100;
}
