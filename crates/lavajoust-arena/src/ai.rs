//! Per-archetype enemy behaviour.
//!
//! Each archetype is a function from the enemy's own state, its timers and
//! the live riders to a [`Steering`] decision. Archetypes share
//! [`base_tick`] and call it explicitly. Nothing here moves a body; the
//! arena applies the decision through the physics module.

use rand::Rng;

use crate::config::AiConfig;
use crate::enemy::{Enemy, Temperament, Timers};
use crate::entity::Body;
use crate::player::Rider;

/// One tick's decision for an enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    /// New horizontal velocity, if the enemy changes course.
    pub vx: Option<f32>,
    /// Flaps to perform this tick.
    pub flaps: u8,
    /// Extra downward kick.
    pub dive: bool,
}

impl Steering {
    fn flap(&mut self) {
        self.flaps = self.flaps.saturating_add(1);
    }
}

/// What an enemy can perceive.
#[derive(Debug, Clone, Copy)]
pub struct Senses<'a> {
    pub riders: &'a [Rider],
    pub lava_y: f32,
}

/// Decide what `enemy` does this tick. Advances its timers.
pub fn think(
    enemy: &mut Enemy,
    senses: &Senses<'_>,
    ai: &AiConfig,
    rng: &mut impl Rng,
) -> Steering {
    let Enemy {
        body,
        timers,
        temperament,
        speed,
        grounded,
        ..
    } = enemy;
    let speed = *speed;
    let grounded = *grounded;

    let mut steer = match temperament {
        Temperament::Bounder => bounder(timers, grounded, speed, ai, rng),
        Temperament::Hunter { aggression } => {
            hunter(body, timers, *aggression, grounded, speed, senses, ai, rng)
        },
        Temperament::ShadowLord {
            erratic,
            dash_timer,
        } => shadow_lord(timers, *erratic, dash_timer, grounded, speed, ai, rng),
        Temperament::Pterodactyl => pterodactyl(body, timers, grounded, speed, senses, ai, rng),
    };

    if body.bottom() > senses.lava_y - ai.lava_flap_margin && body.vy > 0.0 && steer.flaps == 0 {
        steer.flap();
    }
    steer
}

/// Shared behaviour: periodic flap, periodic random course change.
pub fn base_tick(timers: &mut Timers, speed: f32, ai: &AiConfig, rng: &mut impl Rng) -> Steering {
    let mut steer = Steering::default();
    timers.flap -= 1;
    timers.change_direction -= 1;

    if timers.flap <= 0 {
        steer.flap();
        timers.flap = interval(ai.flap_interval, rng);
    }
    if timers.change_direction <= 0 {
        steer.vx = Some(random_sign(rng) * speed * rng.random_range(0.5f32..=1.0));
        timers.change_direction = interval(ai.direction_interval, rng);
    }
    steer
}

fn bounder(
    timers: &mut Timers,
    grounded: bool,
    speed: f32,
    ai: &AiConfig,
    rng: &mut impl Rng,
) -> Steering {
    let mut steer = base_tick(timers, speed, ai, rng);
    if grounded && roll(rng, ai.bounder_takeoff_chance) {
        steer.flap();
    }
    steer
}

#[allow(clippy::too_many_arguments)]
fn hunter(
    body: &Body,
    timers: &mut Timers,
    aggression: f32,
    grounded: bool,
    speed: f32,
    senses: &Senses<'_>,
    ai: &AiConfig,
    rng: &mut impl Rng,
) -> Steering {
    let mut steer = base_tick(timers, speed, ai, rng);
    if grounded && roll(rng, ai.hunter_takeoff_chance) {
        steer.flap();
    }

    if let Some(target) = nearest_rider(body, senses.riders)
        && roll(rng, aggression)
    {
        let target = &target.body;
        steer.vx = Some(if target.x < body.x { -speed } else { speed });
        if target.y < body.y - ai.hunter_climb_gap && roll(rng, ai.hunter_climb_chance) {
            steer.flap();
        }
    }
    steer
}

fn shadow_lord(
    timers: &mut Timers,
    erratic: f32,
    dash_timer: &mut i32,
    grounded: bool,
    speed: f32,
    ai: &AiConfig,
    rng: &mut impl Rng,
) -> Steering {
    let mut steer = base_tick(timers, speed, ai, rng);
    if grounded && roll(rng, ai.shadow_lord_takeoff_chance) {
        steer.flap();
    }

    *dash_timer -= 1;
    if *dash_timer <= 0 {
        steer.vx = Some(random_sign(rng) * speed * ai.dash_multiplier);
        steer.flap();
        *dash_timer = interval(ai.dash_interval, rng);
    }

    if roll(rng, ai.erratic_chance * erratic) {
        if roll(rng, 0.5) {
            steer.flap();
        } else {
            steer.dive = true;
        }
    }
    steer
}

fn pterodactyl(
    body: &Body,
    timers: &mut Timers,
    grounded: bool,
    speed: f32,
    senses: &Senses<'_>,
    ai: &AiConfig,
    rng: &mut impl Rng,
) -> Steering {
    let Some(target) = nearest_rider(body, senses.riders) else {
        let mut steer = base_tick(timers, speed, ai, rng);
        if grounded {
            steer.flaps = steer.flaps.max(2);
        }
        return steer;
    };

    // Timers keep running while chasing; the chase replaces their steering.
    base_tick(timers, speed, ai, rng);
    let mut steer = Steering::default();
    if grounded {
        steer.flaps = 2;
    }

    let target = &target.body;
    let chase = speed * ai.pterodactyl_chase_multiplier;
    steer.vx = Some(if target.x < body.x { -chase } else { chase });

    let band = ai.pterodactyl_hover_band;
    if target.y < body.y - band {
        steer.flap();
    } else if target.y <= body.y + band && roll(rng, ai.pterodactyl_hover_chance) {
        steer.flap();
    }
    steer
}

/// Closest rider that is alive and on the field, by straight-line distance
/// between top-left corners. Looked up fresh every tick.
pub fn nearest_rider<'a>(body: &Body, riders: &'a [Rider]) -> Option<&'a Rider> {
    riders
        .iter()
        .filter(|r| r.is_present())
        .map(|r| {
            let dx = r.body.x - body.x;
            let dy = r.body.y - body.y;
            (r, dx * dx + dy * dy)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(r, _)| r)
}

fn roll(rng: &mut impl Rng, chance: f32) -> bool {
    rng.random::<f32>() < chance
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if roll(rng, 0.5) { 1.0 } else { -1.0 }
}

fn interval(range: [u32; 2], rng: &mut impl Rng) -> i32 {
    let lo = range[0].min(range[1]);
    let hi = range[0].max(range[1]);
    rng.random_range(lo..=hi) as i32
}
