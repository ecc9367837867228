//! Kinematic body: gravity integration and axis-separated collision
//!
//! Bodies resolve against static geometry in two independent passes
//! (horizontal, then vertical) instead of a swept test. At 60 Hz the speeds
//! involved never cross a full segment in one step.

use serde::{Deserialize, Serialize};

use super::animation::Animator;
use super::geometry::Rect;
use crate::consts::GRAVITY;

/// Base movable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    pub rect: Rect,
    /// Vertical velocity (px/s, positive is downward)
    pub velocity_y: f32,
    /// Horizontal direction: -1, 0 or +1
    pub direction: i8,
    pub facing_right: bool,
    /// Set only by a downward collision resolution
    pub grounded: bool,
    /// Set when the vertical pass found an overlap with no vertical motion
    pub hit_wall: bool,
    pub animator: Animator,
}

impl KinematicBody {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity_y: 0.0,
            direction: 0,
            facing_right: true,
            grounded: false,
            hit_wall: false,
            animator: Animator::default(),
        }
    }

    /// Horizontal direction as a multiplier
    #[inline]
    pub fn dir(&self) -> f32 {
        self.direction.signum() as f32
    }

    pub fn set_direction(&mut self, direction: i8) {
        self.direction = direction.signum();
        if self.direction != 0 {
            self.facing_right = self.direction > 0;
        }
    }

    pub fn is_falling(&self) -> bool {
        self.velocity_y > 0.0
    }

    /// Integrate gravity and move vertically
    pub fn apply_gravity(&mut self, dt: f32) {
        self.velocity_y += GRAVITY * dt;
        self.rect.y += self.velocity_y * dt;
    }

    /// Vertical pass: land on tops when falling, bump heads when rising.
    ///
    /// Overlaps are tested against the pre-pass rect, then resolved in order.
    pub fn resolve_vertical<'a>(&mut self, solids: impl IntoIterator<Item = &'a Rect>) {
        self.hit_wall = false;
        let probe = self.rect;
        for solid in solids {
            if !probe.overlaps(solid) {
                continue;
            }
            if self.velocity_y > 0.0 {
                self.rect.set_bottom(solid.top());
                self.velocity_y = 0.0;
                self.grounded = true;
            } else if self.velocity_y < 0.0 {
                self.rect.set_top(solid.bottom());
                self.velocity_y = 0.0;
            } else {
                self.hit_wall = true;
            }
        }
    }

    /// Horizontal pass: clamp against segment sides by movement direction
    pub fn resolve_horizontal<'a>(&mut self, solids: impl IntoIterator<Item = &'a Rect>) {
        let probe = self.rect;
        for solid in solids {
            if !probe.overlaps(solid) {
                continue;
            }
            if self.direction > 0 {
                self.rect.set_right(solid.left());
            } else if self.direction < 0 {
                self.rect.set_left(solid.right());
            }
        }
    }

    /// Gravity followed by the vertical pass; grounded is recomputed here
    pub fn fall_and_land<'a>(&mut self, dt: f32, solids: impl IntoIterator<Item = &'a Rect>) {
        self.apply_gravity(dt);
        self.grounded = false;
        self.resolve_vertical(solids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn ground() -> Rect {
        Rect::new(-1000.0, 650.0, 3000.0, 200.0)
    }

    #[test]
    fn test_lands_on_ground() {
        let mut body = KinematicBody::new(Rect::new(0.0, 500.0, 50.0, 100.0));
        let solids = [ground()];
        for _ in 0..120 {
            body.fall_and_land(SIM_DT, &solids);
        }
        assert!(body.grounded);
        assert_eq!(body.rect.bottom(), 650.0);
        assert_eq!(body.velocity_y, 0.0);
    }

    #[test]
    fn test_grounded_cleared_each_pass() {
        let mut body = KinematicBody::new(Rect::new(0.0, 550.0, 50.0, 100.0));
        let solids = [ground()];
        body.fall_and_land(SIM_DT, &solids);
        assert!(body.grounded);
        // Walk off into nothing
        body.fall_and_land(SIM_DT, std::iter::empty());
        assert!(!body.grounded);
    }

    #[test]
    fn test_head_bump_stops_rise() {
        let ceiling = Rect::new(-100.0, 400.0, 300.0, 40.0);
        let mut body = KinematicBody::new(Rect::new(0.0, 441.0, 50.0, 100.0));
        body.velocity_y = -600.0;
        body.fall_and_land(SIM_DT, &[ceiling]);
        assert_eq!(body.rect.top(), 440.0);
        assert_eq!(body.velocity_y, 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_horizontal_clamps_by_direction() {
        let wall = Rect::new(100.0, 0.0, 50.0, 1000.0);
        let mut body = KinematicBody::new(Rect::new(60.0, 500.0, 50.0, 100.0));
        body.set_direction(1);
        body.resolve_horizontal(&[wall]);
        assert_eq!(body.rect.right(), 100.0);

        let mut body = KinematicBody::new(Rect::new(140.0, 500.0, 50.0, 100.0));
        body.set_direction(-1);
        body.resolve_horizontal(&[wall]);
        assert_eq!(body.rect.left(), 150.0);
        assert!(!body.facing_right);
    }

    #[test]
    fn test_resting_overlap_flags_wall() {
        let block = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut body = KinematicBody::new(Rect::new(50.0, 50.0, 10.0, 10.0));
        body.resolve_vertical(&[block]);
        assert!(body.hit_wall);
    }
}
