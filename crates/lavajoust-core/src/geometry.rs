use serde::{Deserialize, Serialize};

/// Integer axis-aligned rectangle in screen space (y grows downward).
///
/// Edges follow the half-open convention: a rectangle covers
/// `[x, x + w)` horizontally and `[y, y + h)` vertically, so two rectangles
/// that only touch along an edge do not intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at a float position, truncated toward zero.
    pub fn from_position(x: f32, y: f32, w: i32, h: i32) -> Self {
        Self {
            x: x as i32,
            y: y as i32,
            w,
            h,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Whether the two rectangles share any interior area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: i32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + margin * 2,
            h: self.h + margin * 2,
        }
    }
}
