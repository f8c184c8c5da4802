//! Game balance parameters
//!
//! Every gameplay constant that a designer might want to tweak lives here.
//! Defaults reproduce the classic feel; a JSON override can be stored next to
//! the player profile.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persistence::{self, Storage};

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty curve ===
    /// Obstacle speed at level 1 (pixels per frame)
    pub base_obstacle_speed: f32,
    /// Speed added on every level-up
    pub speed_per_level: f32,
    /// Spawn interval at level 1
    pub base_spawn_interval_ms: u32,
    /// Spawn interval removed on every level-up
    pub spawn_interval_step_ms: u32,
    /// Spawn interval never drops below this
    pub min_spawn_interval_ms: u32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Shortest obstacle at level 0; the random range starts here
    pub obstacle_min_height: f32,
    /// Size of the random height range
    pub obstacle_height_range: f32,
    /// Both ends of the height range grow by this much per level
    pub obstacle_height_per_level: f32,

    // === Jumping ===
    /// Peak of the first jump
    pub jump_height: f32,
    /// Extra height gained by a double jump, measured from where it started
    pub double_jump_height: f32,
    /// Vertical distance covered per motion step
    pub jump_step_px: f32,
    /// Simulated time between motion steps
    pub jump_step_ms: f32,

    // === Power-ups ===
    /// Chance that a freshly spawned obstacle carries a power-up (0.0 - 1.0)
    pub powerup_chance: f64,
    pub powerup_duration_ms: f32,
    /// Size multiplier applied to obstacles while shrink is active
    pub shrink_scale: f32,
    /// Whether shrink also shrinks the collision box, not just the visuals
    pub shrink_affects_hitbox: bool,
    /// Projectile speed (pixels per frame)
    pub projectile_speed: f32,
    /// Whether level-ups gained during slow-time or time warp still count
    /// once the slowdown ends. Off: the speed from before it is restored.
    pub slowdown_keeps_level_ups: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_obstacle_speed: 5.0,
            speed_per_level: 1.0,
            base_spawn_interval_ms: 1500,
            spawn_interval_step_ms: 100,
            min_spawn_interval_ms: 500,

            obstacle_width: 30.0,
            obstacle_min_height: 30.0,
            obstacle_height_range: 40.0,
            obstacle_height_per_level: 5.0,

            jump_height: 180.0,
            double_jump_height: 120.0,
            jump_step_px: 10.0,
            jump_step_ms: 20.0,

            powerup_chance: 0.3,
            powerup_duration_ms: 10_000.0,
            shrink_scale: 0.6,
            shrink_affects_hitbox: true,
            projectile_speed: 10.0,
            slowdown_keeps_level_ups: false,
        }
    }
}

impl Tuning {
    /// Storage key for tuning overrides
    pub const STORAGE_KEY: &'static str = "obstacle-jumping-tuning";

    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<()> {
        if self.base_obstacle_speed <= 0.0 {
            return Err(Error::InvalidTuning("base_obstacle_speed must be positive"));
        }
        if self.min_spawn_interval_ms == 0 {
            return Err(Error::InvalidTuning("min_spawn_interval_ms must be positive"));
        }
        if self.min_spawn_interval_ms > self.base_spawn_interval_ms {
            return Err(Error::InvalidTuning(
                "min_spawn_interval_ms exceeds base_spawn_interval_ms",
            ));
        }
        if self.obstacle_width <= 0.0 || self.obstacle_min_height <= 0.0 {
            return Err(Error::InvalidTuning("obstacle dimensions must be positive"));
        }
        if self.obstacle_height_range < 1.0 {
            return Err(Error::InvalidTuning("obstacle_height_range must be at least 1"));
        }
        if self.jump_step_px <= 0.0 || self.jump_step_ms <= 0.0 {
            return Err(Error::InvalidTuning("jump cadence must be positive"));
        }
        if self.jump_height <= 0.0 || self.double_jump_height <= 0.0 {
            return Err(Error::InvalidTuning("jump heights must be positive"));
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(Error::InvalidTuning("powerup_chance must be within 0..=1"));
        }
        if self.powerup_duration_ms <= 0.0 {
            return Err(Error::InvalidTuning("powerup_duration_ms must be positive"));
        }
        if self.shrink_scale <= 0.0 {
            return Err(Error::InvalidTuning("shrink_scale must be positive"));
        }
        if self.projectile_speed <= 0.0 {
            return Err(Error::InvalidTuning("projectile_speed must be positive"));
        }
        Ok(())
    }

    /// Obstacle speed for a given level (1-based)
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.base_obstacle_speed + self.speed_per_level * level.saturating_sub(1) as f32
    }

    /// Spawn interval for a given level (1-based), floored at the minimum
    pub fn spawn_interval_for_level(&self, level: u32) -> u32 {
        let reduction = self
            .spawn_interval_step_ms
            .saturating_mul(level.saturating_sub(1));
        self.base_spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms)
    }

    /// Height range `[min, max)` of obstacles spawned at `level`
    pub fn obstacle_height_range(&self, level: u32) -> (f32, f32) {
        let min = self.obstacle_min_height + self.obstacle_height_per_level * level as f32;
        (min, min + self.obstacle_height_range)
    }

    /// Load tuning overrides, falling back to defaults on any problem
    pub fn load(storage: &impl Storage) -> Self {
        match persistence::load_json::<Tuning>(storage, Self::STORAGE_KEY) {
            Ok(Some(tuning)) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default tuning");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Store this tuning as the active override
    pub fn save(&self, storage: &mut impl Storage) -> Result<()> {
        self.validate()?;
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Tuning saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_difficulty_curve() {
        let t = Tuning::default();
        assert_eq!(t.speed_for_level(1), 5.0);
        assert_eq!(t.speed_for_level(2), 6.0);
        assert_eq!(t.spawn_interval_for_level(1), 1500);
        assert_eq!(t.spawn_interval_for_level(2), 1400);
        assert_eq!(t.spawn_interval_for_level(11), 500);
        assert_eq!(t.spawn_interval_for_level(40), 500);
    }

    #[test]
    fn test_height_range_grows_with_level() {
        let t = Tuning::default();
        assert_eq!(t.obstacle_height_range(1), (35.0, 75.0));
        assert_eq!(t.obstacle_height_range(3), (45.0, 85.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{"base_obstacle_speed": 7.5}"#).unwrap();
        assert_eq!(t.base_obstacle_speed, 7.5);
        assert_eq!(t.base_spawn_interval_ms, 1500);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{"powerup_chance": 2.0}"#),
            Err(Error::InvalidTuning(_))
        ));
        assert!(matches!(Tuning::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Tuning::STORAGE_KEY, "not json")
            .unwrap();
        assert_eq!(Tuning::load(&storage), Tuning::default());

        let custom = Tuning {
            projectile_speed: 14.0,
            ..Default::default()
        };
        custom.save(&mut storage).unwrap();
        assert_eq!(Tuning::load(&storage), custom);
    }
}
