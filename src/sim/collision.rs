//! Collision detection for axis-aligned boxes
//!
//! World space: x grows to the right, y grows upward from the ground line.
//! Every box is anchored at its bottom-left corner.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;

/// Axis-aligned rectangle, `min` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test; touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Horizontal overlap only
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.min.x < other.max().x && self.max().x > other.min.x
    }
}

/// Player hitbox at a given position
pub fn player_hitbox(pos: Vec2, small: bool) -> Rect {
    let scale = if small { 0.5 } else { 1.0 };
    Rect::new(pos.x, pos.y, PLAYER_WIDTH * scale, PLAYER_HEIGHT * scale)
}

/// Hitbox of a ground obstacle, scaled about its bottom-left corner
pub fn obstacle_hitbox(x: f32, width: f32, height: f32, scale: f32) -> Rect {
    Rect::new(x, 0.0, width * scale, height * scale)
}

/// Projectile hitbox at a given position
pub fn projectile_hitbox(pos: Vec2) -> Rect {
    Rect::new(pos.x, pos.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_player_above_obstacle_is_clear() {
        let obstacle = obstacle_hitbox(PLAYER_X, 30.0, 60.0, 1.0);
        assert!(player_hitbox(Vec2::new(PLAYER_X, 0.0), false).overlaps(&obstacle));
        assert!(!player_hitbox(Vec2::new(PLAYER_X, 60.0), false).overlaps(&obstacle));
    }

    #[test]
    fn test_shrunk_obstacle_keeps_ground_left_anchor() {
        let hitbox = obstacle_hitbox(100.0, 30.0, 50.0, 0.6);
        assert_eq!(hitbox.min, Vec2::new(100.0, 0.0));
        assert_eq!(hitbox.max(), Vec2::new(118.0, 30.0));
    }

    #[test]
    fn test_small_player_hitbox() {
        let hitbox = player_hitbox(Vec2::new(PLAYER_X, 0.0), true);
        assert_eq!(hitbox.size, Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0));
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in rect(), b in rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_rect_overlaps_itself(a in rect()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_overlap_implies_horizontal_overlap(a in rect(), b in rect()) {
            if a.overlaps(&b) {
                prop_assert!(a.overlaps_x(&b));
            }
        }
    }
}
