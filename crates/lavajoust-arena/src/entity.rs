use serde::{Deserialize, Serialize};

use lavajoust_core::geometry::Rect;

/// Physical state shared by every simulated object.
///
/// The bounding box is never stored; `rect()` derives it from the float
/// position so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: i32,
    pub height: i32,
    /// `y` at the start of the current tick, used by landing checks.
    pub prev_y: f32,
    pub active: bool,
    pub facing_right: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            prev_y: y,
            active: true,
            facing_right: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position(self.x, self.y, self.width, self.height)
    }

    /// Float bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height as f32
    }

    /// Bottom edge at the start of the tick.
    pub fn prev_bottom(&self) -> f32 {
        self.prev_y + self.height as f32
    }

    /// Record the pre-move position. Call once per tick before moving.
    pub fn begin_tick(&mut self) {
        self.prev_y = self.y;
    }

    /// Joust dominance: this body's bottom edge is strictly higher on screen
    /// than the other's vertical center.
    pub fn is_above(&self, other: &Body) -> bool {
        self.rect().bottom() < other.rect().center_y()
    }

    /// Both bodies are active and their boxes intersect.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.active && other.active && self.rect().intersects(&other.rect())
    }

    /// Wrap around the side walls once fully off screen.
    pub fn wrap_horizontal(&mut self, screen_width: f32) {
        if self.x < -(self.width as f32) {
            self.x = screen_width;
        } else if self.x > screen_width {
            self.x = -(self.width as f32);
        }
    }

    /// Face the direction of horizontal travel. Standing still keeps the
    /// current facing.
    pub fn face_velocity(&mut self) {
        if self.vx > 0.0 {
            self.facing_right = true;
        } else if self.vx < 0.0 {
            self.facing_right = false;
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_tracks_truncated_position() {
        let mut b = Body::new(10.7, 20.2, 64, 64);
        assert_eq!(b.rect(), Rect::new(10, 20, 64, 64));
        b.x += 5.5;
        b.y -= 0.5;
        assert_eq!(b.rect(), Rect::new(16, 19, 64, 64));
    }

    #[test]
    fn above_means_bottom_over_center() {
        // Bottom 100 against center 150.
        let rider = Body::new(0.0, 36.0, 64, 64);
        let enemy = Body::new(0.0, 118.0, 64, 64);
        assert_eq!(rider.rect().bottom(), 100);
        assert_eq!(enemy.rect().center_y(), 150);
        assert!(rider.is_above(&enemy));
        assert!(!enemy.is_above(&rider));
    }

    #[test]
    fn level_bodies_are_not_above_each_other() {
        let a = Body::new(0.0, 100.0, 64, 64);
        let b = Body::new(30.0, 100.0, 64, 64);
        assert!(!a.is_above(&b));
        assert!(!b.is_above(&a));
    }

    #[test]
    fn inactive_bodies_never_overlap() {
        let a = Body::new(0.0, 0.0, 64, 64);
        let mut b = Body::new(10.0, 10.0, 64, 64);
        assert!(a.overlaps(&b));
        b.deactivate();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn wraps_only_after_fully_leaving() {
        let mut b = Body::new(-64.0, 0.0, 64, 64);
        b.wrap_horizontal(1280.0);
        assert_eq!(b.x, -64.0, "still touching the left edge");
        b.x = -64.5;
        b.wrap_horizontal(1280.0);
        assert_eq!(b.x, 1280.0);
        b.x = 1280.5;
        b.wrap_horizontal(1280.0);
        assert_eq!(b.x, -64.0);
    }

    #[test]
    fn facing_follows_velocity_sign() {
        let mut b = Body::new(0.0, 0.0, 8, 8);
        b.vx = -1.0;
        b.face_velocity();
        assert!(!b.facing_right);
        b.vx = 0.0;
        b.face_velocity();
        assert!(!b.facing_right, "zero velocity keeps facing");
        b.vx = 2.0;
        b.face_velocity();
        assert!(b.facing_right);
    }
}
