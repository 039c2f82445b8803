use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the arena listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Space,
    A,
    D,
    W,
}

/// Snapshot of the keys held down during one frame.
///
/// The display loop fills this from its event queue before calling
/// `ArenaGame::update`; the simulation never reads the keyboard directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    keys_down: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of held keys.
    pub fn pressed(keys: &[Key]) -> Self {
        Self {
            keys_down: keys.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, key: Key) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Merge another snapshot into this one (used when several drivers
    /// contribute keys to the same frame).
    pub fn merge(&mut self, other: &KeyState) {
        self.keys_down.extend(other.keys_down.iter().copied());
    }
}

/// The three keys a rider answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBinding {
    pub left: Key,
    pub right: Key,
    pub flap: Key,
}

impl ControlBinding {
    /// Arrow keys and space.
    pub const PLAYER_ONE: ControlBinding = ControlBinding {
        left: Key::Left,
        right: Key::Right,
        flap: Key::Space,
    };

    /// A / D / W.
    pub const PLAYER_TWO: ControlBinding = ControlBinding {
        left: Key::A,
        right: Key::D,
        flap: Key::W,
    };

    /// Binding for a zero-based player slot. Slots past the second reuse
    /// the second binding.
    pub fn for_slot(slot: usize) -> ControlBinding {
        if slot == 0 {
            Self::PLAYER_ONE
        } else {
            Self::PLAYER_TWO
        }
    }

    /// Resolve the held keys into a rider command.
    ///
    /// Left wins when both directions are held.
    pub fn read(&self, keys: &KeyState) -> RiderCommand {
        let move_dir = if keys.is_down(self.left) {
            -1.0
        } else if keys.is_down(self.right) {
            1.0
        } else {
            0.0
        };
        RiderCommand {
            move_dir,
            flap: keys.is_down(self.flap),
        }
    }
}

/// Per-frame intent for one rider, decoded from its binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiderCommand {
    pub move_dir: f32, // -1 (left), 0, +1 (right)
    pub flap: bool,
}
