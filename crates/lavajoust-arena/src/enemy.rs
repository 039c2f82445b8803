use rand::Rng;
use serde::{Deserialize, Serialize};

use lavajoust_core::events::Archetype;
use lavajoust_core::game_trait::EntityId;
use lavajoust_core::geometry::Rect;

use crate::config::{AiConfig, ArchetypeStats};
use crate::entity::Body;
use crate::physics::BASE_MOMENTUM;

/// Archetype-specific AI state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Temperament {
    Bounder,
    Hunter {
        /// Chance per tick of committing to a chase.
        aggression: f32,
    },
    ShadowLord {
        /// Scales the per-tick flap-or-dive chance.
        erratic: f32,
        dash_timer: i32,
    },
    Pterodactyl,
}

impl Temperament {
    pub fn roll(archetype: Archetype, ai: &AiConfig, rng: &mut impl Rng) -> Self {
        match archetype {
            Archetype::Bounder => Temperament::Bounder,
            Archetype::Hunter => Temperament::Hunter {
                aggression: rng.random_range(ai.hunter_aggression[0]..=ai.hunter_aggression[1]),
            },
            Archetype::ShadowLord => Temperament::ShadowLord {
                erratic: rng.random_range(ai.erratic_factor[0]..=ai.erratic_factor[1]),
                dash_timer: 0,
            },
            Archetype::Pterodactyl => Temperament::Pterodactyl,
        }
    }
}

/// Timers shared by every archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    pub flap: i32,
    pub change_direction: i32,
}

/// An AI-driven enemy, including the special flyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub archetype: Archetype,
    pub body: Body,
    pub speed: f32,
    pub points: u32,
    pub momentum: f32,
    pub grounded: bool,
    pub timers: Timers,
    pub temperament: Temperament,
}

impl Enemy {
    /// A fresh enemy drifting at half speed in a random direction. Both
    /// timers start expired so it acts on its first tick.
    pub fn spawn(
        id: EntityId,
        archetype: Archetype,
        x: f32,
        y: f32,
        stats: ArchetypeStats,
        ai: &AiConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut body = Body::new(x, y, stats.width, stats.height);
        let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        body.vx = dir * stats.speed * 0.5;
        body.facing_right = body.vx > 0.0;
        Self {
            id,
            archetype,
            body,
            speed: stats.speed,
            points: stats.points,
            momentum: BASE_MOMENTUM,
            grounded: false,
            timers: Timers::default(),
            temperament: Temperament::roll(archetype, ai, rng),
        }
    }

    pub fn is_special_flyer(&self) -> bool {
        self.archetype == Archetype::Pterodactyl
    }

    /// The only spot where the special flyer can be struck: a square on the
    /// leading edge of its box, vertically centered.
    pub fn mouth(&self, size: i32) -> Rect {
        let rect = self.body.rect();
        let x = if self.body.facing_right {
            rect.right() - size
        } else {
            rect.left()
        };
        Rect::new(x, rect.center_y() - size / 2, size, size)
    }
}
