use lavajoust_core::geometry::Rect;

use crate::config::{EggConfig, PhysicsConfig};
use crate::entity::Body;
use crate::platform::Platform;

/// Whether a body that was at `prev_bottom` last tick may land on a
/// platform whose top edge is `top`.
fn from_above(prev_bottom: f32, top: i32, margin: f32) -> bool {
    prev_bottom <= top as f32 + margin
}

fn snap_onto(body: &mut Body, top: i32) {
    body.y = (top - body.height) as f32;
    body.vy = 0.0;
}

/// Land a flying body on the first platform it came down onto this tick.
///
/// The primary check tests with the box inflated on every side. If that
/// misses and the body fell faster than `fast_fall_threshold`, the tick's
/// travel is replayed in sub-steps with the exact box so thin platforms
/// cannot be skipped. Returns true when the body landed.
pub fn resolve_landing(body: &mut Body, platforms: &[Platform], physics: &PhysicsConfig) -> bool {
    if !body.active || body.vy <= 0.0 {
        return false;
    }

    let prev_bottom = body.prev_bottom();
    let inflated = body.rect().inflate(physics.collision_inflate);
    let margin = physics.landing_margin;

    if let Some(p) = platforms
        .iter()
        .find(|p| inflated.intersects(&p.rect()) && from_above(prev_bottom, p.top(), margin))
    {
        snap_onto(body, p.top());
        return true;
    }

    if body.vy > physics.fast_fall_threshold
        && let Some(top) = sweep(body, platforms, physics)
    {
        snap_onto(body, top);
        return true;
    }

    false
}

/// Sub-stepped replay of this tick's vertical travel. Returns the top of
/// the first platform hit.
fn sweep(body: &Body, platforms: &[Platform], physics: &PhysicsConfig) -> Option<i32> {
    let steps = ((body.vy / physics.substep_divisor) as u32).max(1);
    let travel = body.y - body.prev_y;
    let prev_bottom = body.prev_bottom();
    let x = body.rect().x;

    (1..=steps).find_map(|step| {
        let test_y = body.prev_y + travel * step as f32 / steps as f32;
        let test = Rect::new(x, test_y as i32, body.width, body.height);
        platforms
            .iter()
            .find(|p| {
                test.intersects(&p.rect())
                    && from_above(prev_bottom, p.top(), physics.landing_margin)
            })
            .map(Platform::top)
    })
}

/// What happened to a falling egg this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggContact {
    /// Still airborne.
    None,
    /// Hit a platform and bounced back up.
    Bounced,
    /// Out of bounces; now at rest.
    Settled,
}

/// Simplified landing for eggs: plain box, bounce with energy loss up to
/// `max_bounces` times, then settle.
pub fn resolve_egg_contact(
    body: &mut Body,
    bounces: &mut u32,
    platforms: &[Platform],
    physics: &PhysicsConfig,
    egg: &EggConfig,
) -> EggContact {
    if !body.active || body.vy <= 0.0 {
        return EggContact::None;
    }
    let rect = body.rect();
    let prev_bottom = body.prev_bottom();
    let Some(p) = platforms
        .iter()
        .find(|p| rect.intersects(&p.rect()) && from_above(prev_bottom, p.top(), physics.landing_margin))
    else {
        return EggContact::None;
    };

    body.y = (p.top() - body.height) as f32;
    if *bounces < egg.max_bounces {
        body.vy = -body.vy * egg.restitution;
        *bounces += 1;
        EggContact::Bounced
    } else {
        body.vy = 0.0;
        EggContact::Settled
    }
}

/// Whether something rests directly on top of a platform.
pub fn is_supported(body: &Body, platforms: &[Platform]) -> bool {
    let feet = Rect::new(body.rect().x, body.rect().bottom(), body.width, 1);
    platforms.iter().any(|p| feet.intersects(&p.rect()))
}
