use rand::Rng;
use serde::{Deserialize, Serialize};

use lavajoust_core::geometry::Rect;

use crate::config::LayoutConfig;

/// A static ledge. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    rect: Rect,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: i32) -> Self {
        Self {
            rect: Rect::new(x as i32, y as i32, width as i32, height),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn top(&self) -> i32 {
        self.rect.top()
    }
}

/// Floating ledges plus the floor sections for `wave`.
///
/// Wave 0 (before the first wave starts) uses the wave 1 floor; waves past
/// the last configured floor reuse it.
pub fn build_layout(layout: &LayoutConfig, screen_width: f32, wave: u32) -> Vec<Platform> {
    let mut platforms: Vec<Platform> = layout
        .ledges
        .iter()
        .map(|l| Platform::new(l.x, l.y, l.width, layout.platform_height))
        .collect();

    let index = (wave.max(1) as usize - 1).min(layout.floors.len().saturating_sub(1));
    if let Some(sections) = layout.floors.get(index) {
        platforms.extend(sections.iter().map(|s| {
            Platform::new(
                s.start * screen_width,
                layout.floor_y,
                s.width * screen_width,
                layout.platform_height,
            )
        }));
    }
    platforms
}

/// Frames between new lava bubbles.
const BUBBLE_INTERVAL: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub size: i32,
    pub speed: f32,
}

/// The lava pool along the bottom of the screen. Bubbles are cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lava {
    pub top: f32,
    pub width: f32,
    pub height: f32,
    timer: u32,
    bubbles: Vec<Bubble>,
}

impl Lava {
    pub fn new(top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            width,
            height,
            timer: 0,
            bubbles: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position(0.0, self.top, self.width as i32, self.height.max(0.0) as i32)
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Rise existing bubbles and periodically add one near the bottom.
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.timer = self.timer.wrapping_add(1);
        if self.timer % BUBBLE_INTERVAL == 0 && self.width >= 1.0 {
            self.bubbles.push(Bubble {
                x: rng.random_range(0.0..=self.width),
                y: self.top + self.height - 5.0,
                size: rng.random_range(3..=8),
                speed: rng.random_range(0.5..=1.5),
            });
        }

        for b in &mut self.bubbles {
            b.y -= b.speed;
        }
        let top = self.top;
        self.bubbles.retain(|b| b.y >= top);
    }
}
