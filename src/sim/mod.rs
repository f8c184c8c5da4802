//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (advanced by `GameSession::tick`)
//! - Seeded RNG only
//! - Stable iteration order (by obstacle id)
//! - No rendering or platform dependencies

pub mod ability;
pub mod collision;
pub mod effects;
pub mod obstacles;
pub mod player;
pub mod powerup;
pub mod progress;
pub mod session;
pub mod state;

pub use ability::{AbilityKind, AbilityRefusal, AbilityTracker};
pub use collision::Rect;
pub use effects::{EffectSlot, EffectToken, TimedEffect};
pub use obstacles::{Obstacle, ObstacleField};
pub use player::{JumpOutcome, JumpState, Player};
pub use powerup::{Gun, PowerupKind, Projectile};
pub use progress::Progression;
pub use session::{GameSession, TickInput};
pub use state::{GameEvent, GamePhase, Modifiers};
