use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// RGB colour used for placeholder art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const PLAYER_ONE: Color = Color::rgb(255, 200, 0);
    pub const PLAYER_TWO: Color = Color::rgb(0, 200, 255);
    pub const BOUNDER: Color = Color::rgb(255, 0, 0);
    pub const HUNTER: Color = Color::rgb(128, 128, 128);
    pub const SHADOW_LORD: Color = Color::rgb(0, 0, 255);
    pub const PTERODACTYL: Color = Color::rgb(128, 0, 128);
    pub const PLATFORM: Color = Color::rgb(139, 69, 19);
    pub const LAVA: Color = Color::rgb(255, 69, 0);
    pub const BUBBLE: Color = Color::rgb(255, 200, 100);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Opaque handle to something the display layer knows how to draw.
///
/// The simulation never inspects image data; it only passes handles back
/// to the `Surface` it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drawable {
    /// A loaded image, identified by the display layer's own handle.
    Image { handle: u32, width: u32, height: u32 },
    /// Stand-in drawn as a solid rectangle when an image is missing.
    Placeholder { color: Color },
}

/// Image lookup by symbolic name. Must never fail: a miss returns a
/// placeholder.
pub trait ImageLookup {
    fn image(&self, name: &str) -> Drawable;
}

/// Drawing target handed to `ArenaGame::render` once per frame.
pub trait Surface {
    /// Draw a drawable stretched into `dest`, mirrored horizontally when
    /// `flip_x` is set.
    fn draw(&mut self, drawable: &Drawable, dest: Rect, flip_x: bool);

    /// Fill a rectangle with a solid colour.
    fn fill_rect(&mut self, dest: Rect, color: Color);
}

/// Lookup that answers every name with a coloured placeholder, optionally
/// backed by registered image handles.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderImages {
    registered: HashMap<String, Drawable>,
}

impl PlaceholderImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a real image handle under a symbolic name.
    pub fn register(&mut self, name: impl Into<String>, drawable: Drawable) {
        self.registered.insert(name.into(), drawable);
    }

    /// Placeholder colour for the sprite names the arena uses.
    pub fn placeholder_color(name: &str) -> Color {
        match name {
            "player1" => Color::PLAYER_ONE,
            "player2" => Color::PLAYER_TWO,
            "bounder" => Color::BOUNDER,
            "hunter" => Color::HUNTER,
            "shadow_lord" => Color::SHADOW_LORD,
            "pterodactyl" => Color::PTERODACTYL,
            "platform" => Color::PLATFORM,
            "lava" => Color::LAVA,
            _ => Color::WHITE,
        }
    }
}

impl ImageLookup for PlaceholderImages {
    fn image(&self, name: &str) -> Drawable {
        match self.registered.get(name) {
            Some(d) => d.clone(),
            None => Drawable::Placeholder {
                color: Self::placeholder_color(name),
            },
        }
    }
}
