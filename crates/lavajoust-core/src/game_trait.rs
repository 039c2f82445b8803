use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::input::KeyState;
use crate::render::Surface;

/// Identifier for a rider. Riders are numbered from 1 in slot order.
pub type PlayerId = u64;

/// Identifier for any non-player entity (enemy, egg, special flyer).
/// Never reused within a round.
pub type EntityId = u64;

/// The interface the game-state layer drives.
///
/// The runtime owns the window, the frame clock, menus and persistence;
/// the arena only simulates and draws the playfield.
pub trait ArenaGame {
    /// Game metadata for the title screen.
    fn metadata(&self) -> GameMetadata;

    /// Discard every entity and start a fresh round for `player_count`
    /// riders (clamped to 1..=2).
    fn reset(&mut self, player_count: usize);

    /// Add a wave of enemies.
    fn spawn_enemies(&mut self, bounders: u32, hunters: u32, shadow_lords: u32);

    /// Bring in the special flyer now, if one is not already present.
    fn spawn_special_flyer(&mut self);

    /// Advance one fixed tick. Returns the events raised during the tick.
    fn update(&mut self, keys: &KeyState) -> Vec<GameEvent>;

    /// Draw the playfield.
    fn render(&self, surface: &mut dyn Surface);

    /// Riders that still have lives left.
    fn active_player_count(&self) -> usize;

    /// True when no egg remains in the arena.
    fn all_eggs_collected(&self) -> bool;

    /// True once every rider is out of lives.
    fn is_game_over(&self) -> bool;

    /// Fixed simulation rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Called when the game-state layer pauses play.
    fn pause(&mut self);

    /// Called when play resumes.
    fn resume(&mut self);
}

/// Game metadata for the title screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}
