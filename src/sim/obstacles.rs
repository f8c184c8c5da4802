//! Obstacle spawning, motion and resolution
//!
//! Obstacles stand on the ground and scroll left. Each one is resolved once
//! per tick in a fixed precedence order, and removed once it is fully past the
//! left edge. Ids come from a monotonic counter and are never reused.

use rand::Rng;
use serde::Serialize;

use super::ability::MAGNET_REACH;
use super::collision::{Rect, obstacle_hitbox};
use super::powerup::PowerupKind;
use crate::consts::GAME_WIDTH;
use crate::tuning::Tuning;

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame. Level-ups leave it alone; slow-time and time warp
    /// rescale it.
    pub speed: f32,
    /// Scored; flips once
    pub passed: bool,
    /// Shot down; keeps scrolling but no longer collides
    pub destroyed: bool,
    /// Power-up waiting on top of this obstacle
    pub powerup: Option<PowerupKind>,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Collision box, scaled about the ground-left corner
    pub fn hitbox(&self, scale: f32) -> Rect {
        obstacle_hitbox(self.x, self.width, self.height, scale)
    }

    /// Entirely past the left edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.right() <= 0.0
    }
}

/// Per-tick inputs for resolving obstacles
#[derive(Debug, Clone)]
pub struct PassContext {
    pub player: Rect,
    pub airborne: bool,
    pub magnet: bool,
    /// A power-up is already running; nothing can be picked up
    pub has_active_powerup: bool,
    pub projectile: Option<Rect>,
    /// Scale applied to obstacle hitboxes
    pub hitbox_scale: f32,
    /// Frames elapsed this tick
    pub frames: f32,
}

/// One obstacle's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Shot down (also scored)
    Destroyed(u32),
    /// Scored by passing the player
    Passed(u32),
    /// Power-up collected from the top of an obstacle
    Pickup { id: u32, kind: PowerupKind },
}

/// What happened during one resolution pass, in obstacle order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub resolutions: Vec<Resolution>,
}

impl PassReport {
    pub fn projectile_hit(&self) -> bool {
        self.resolutions
            .iter()
            .any(|r| matches!(r, Resolution::Destroyed(_)))
    }
}

#[cfg(test)]
impl PassReport {
    pub fn passed(&self) -> Vec<u32> {
        self.resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Passed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<u32> {
        self.resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Destroyed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn pickups(&self) -> Vec<PowerupKind> {
        self.resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Pickup { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Number of score awards earned this pass
    pub fn awards(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| matches!(r, Resolution::Destroyed(_) | Resolution::Passed(_)))
            .count()
    }
}

/// The live obstacle collection
#[derive(Debug, Clone, Serialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
        }
    }
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Drop every obstacle. Ids keep counting up.
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Insert a fully specified obstacle at the right edge
    pub fn push(&mut self, width: f32, height: f32, speed: f32, powerup: Option<PowerupKind>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            x: GAME_WIDTH,
            width,
            height,
            speed,
            passed: false,
            destroyed: false,
            powerup,
        });
        id
    }

    /// Spawn a random obstacle for `level`. Power-ups roll only when allowed.
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        tuning: &Tuning,
        level: u32,
        speed: f32,
        allow_powerup: bool,
    ) -> u32 {
        let (min_height, max_height) = tuning.obstacle_height_range(level);
        let height = rng.random_range(min_height..max_height).floor();

        let powerup = if allow_powerup && rng.random_bool(tuning.powerup_chance) {
            let index = rng.random_range(0..PowerupKind::ALL.len());
            Some(PowerupKind::ALL[index])
        } else {
            None
        };

        let id = self.push(tuning.obstacle_width, height, speed, powerup);
        log::debug!(
            "Spawned obstacle {} (h={}, v={}, powerup={:?})",
            id,
            height,
            speed,
            powerup
        );
        id
    }

    /// Multiply every live obstacle's speed by `factor`
    pub fn scale_speeds(&mut self, factor: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.speed *= factor;
        }
    }

    /// Scroll every obstacle left by `distance` without resolving anything
    pub fn shift(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= distance;
        }
    }

    /// Resolve and advance every obstacle once
    pub fn advance(&mut self, ctx: &PassContext) -> PassReport {
        let mut report = PassReport::default();
        let mut projectile = ctx.projectile;

        let pickup_zone = if ctx.magnet {
            Rect::new(
                ctx.player.min.x - MAGNET_REACH,
                ctx.player.min.y,
                ctx.player.size.x + 2.0 * MAGNET_REACH,
                ctx.player.size.y,
            )
        } else {
            ctx.player
        };
        let can_pick_up = ctx.airborne || ctx.magnet;
        // At most one power-up runs at a time
        let mut pickup_open = !ctx.has_active_powerup;

        for obstacle in &mut self.obstacles {
            let distance = obstacle.speed * ctx.frames;

            if obstacle.destroyed {
                obstacle.x -= distance;
                continue;
            }

            if let Some(shot) = projectile {
                if shot.overlaps(&obstacle.hitbox(ctx.hitbox_scale)) {
                    obstacle.destroyed = true;
                    obstacle.passed = true;
                    report.resolutions.push(Resolution::Destroyed(obstacle.id));
                    projectile = None;
                    obstacle.x -= distance;
                    continue;
                }
            }

            if !obstacle.passed && obstacle.right() < ctx.player.min.x {
                obstacle.passed = true;
                report.resolutions.push(Resolution::Passed(obstacle.id));
                obstacle.x -= distance;
                continue;
            }

            if can_pick_up && pickup_open {
                if let Some(kind) = obstacle.powerup {
                    let reachable = pickup_zone.overlaps_x(&obstacle.hitbox(1.0))
                        && (ctx.magnet || ctx.player.min.y >= obstacle.height);
                    if reachable {
                        obstacle.powerup = None;
                        pickup_open = false;
                        report.resolutions.push(Resolution::Pickup {
                            id: obstacle.id,
                            kind,
                        });
                        log::debug!("Power-up {} collected from obstacle {}", kind.as_str(), obstacle.id);
                    }
                }
            }

            obstacle.x -= distance;
        }

        report
    }

    /// Remove obstacles that have scrolled off the left edge
    pub fn cull(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_off_screen());
        before - self.obstacles.len()
    }

    /// First live obstacle overlapping the player, if any
    pub fn first_collision(&self, player: &Rect, hitbox_scale: f32) -> Option<u32> {
        self.obstacles
            .iter()
            .filter(|o| !o.destroyed)
            .find(|o| player.overlaps(&o.hitbox(hitbox_scale)))
            .map(|o| o.id)
    }

    /// Mutable access for tests that need to stage a scene
    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }
}
