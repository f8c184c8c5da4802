//! Session score and difficulty
//!
//! The lifetime total lives in the profile; this tracks what resets when a
//! new run starts.

use serde::Serialize;

use crate::consts::POINTS_PER_LEVEL;
use crate::tuning::Tuning;

/// Score, level and the difficulty derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub score: u64,
    pub level: u32,
    /// Speed given to newly spawned obstacles (pixels per frame), scaled
    /// down while slow-time or time warp runs
    pub obstacle_speed: f32,
    pub spawn_interval_ms: u32,
}

impl Progression {
    /// Fresh run at level 1
    pub fn new(tuning: &Tuning, start_score: u64) -> Self {
        Self {
            score: start_score,
            level: 1,
            obstacle_speed: tuning.base_obstacle_speed,
            spawn_interval_ms: tuning.base_spawn_interval_ms,
        }
    }

    /// Add points; returns the new level if a multiple of 100 was crossed
    pub fn add_points(&mut self, points: u64, tuning: &Tuning) -> Option<u32> {
        let before = self.score;
        self.score = self.score.saturating_add(points);
        if self.score / POINTS_PER_LEVEL > before / POINTS_PER_LEVEL {
            self.increase_level(tuning);
            Some(self.level)
        } else {
            None
        }
    }

    /// Harder: faster obstacles, spawned more often
    pub fn increase_level(&mut self, tuning: &Tuning) {
        self.level += 1;
        self.obstacle_speed += tuning.speed_per_level;
        self.spawn_interval_ms = self
            .spawn_interval_ms
            .saturating_sub(tuning.spawn_interval_step_ms)
            .max(tuning.min_spawn_interval_ms);
        log::info!(
            "Level {} (speed {}, spawn every {}ms)",
            self.level,
            self.obstacle_speed,
            self.spawn_interval_ms
        );
    }
}
