use rand::Rng;

use lavajoust_core::input::KeyState;

use crate::LavaArena;
use crate::entity::Body;

/// Flap key is held for half of each period, so every period is one press.
const FLAP_PERIOD: u64 = 4;

/// Height above the lava where the autopilot starts climbing regardless of
/// its target.
const LAVA_MARGIN: f32 = 120.0;

/// How far above a threat's center the rider's feet should be.
const CLEARANCE: f32 = 12.0;

/// Horizontal distance treated as "on top of" the target.
const ALIGN_TOLERANCE: f32 = 8.0;

/// Keys for a computer-driven rider in `slot`.
///
/// Chases the nearest enemy (special flyer included) and tries to stay above
/// it; with no enemy left, picks up the nearest egg. Climbs away from the
/// lava first.
pub fn drive<R: Rng>(arena: &LavaArena<R>, slot: usize) -> KeyState {
    let mut keys = KeyState::new();
    let Some(rider) = arena.riders().get(slot) else {
        return keys;
    };
    if !rider.is_present() {
        return keys;
    }
    let body = &rider.body;
    let screen_w = arena.config().screen.width;
    let lava_y = arena.config().screen.lava_y;

    let threat = arena
        .enemies()
        .iter()
        .chain(arena.special_flyer())
        .map(|e| &e.body)
        .min_by(|a, b| distance_sq(body, a, screen_w).total_cmp(&distance_sq(body, b, screen_w)));
    let egg = arena
        .eggs()
        .iter()
        .map(|e| &e.body)
        .min_by(|a, b| distance_sq(body, a, screen_w).total_cmp(&distance_sq(body, b, screen_w)));

    let mut want_flap = false;
    let target = match (threat, egg) {
        (Some(t), _) => {
            want_flap = body.bottom() > t.rect().center_y() as f32 - CLEARANCE;
            Some(t)
        },
        (None, Some(e)) => {
            want_flap = body.bottom() > e.bottom() + CLEARANCE;
            Some(e)
        },
        (None, None) => None,
    };

    if let Some(t) = target {
        let dx = wrapped_dx(body, t, screen_w);
        if dx > ALIGN_TOLERANCE {
            keys.press(rider.binding.right);
        } else if dx < -ALIGN_TOLERANCE {
            keys.press(rider.binding.left);
        }
    }

    if body.bottom() > lava_y - LAVA_MARGIN && body.vy >= 0.0 {
        want_flap = true;
    }
    if want_flap && pulse(arena.frame()) {
        keys.press(rider.binding.flap);
    }
    keys
}

/// Keys for every rider, merged into one snapshot.
pub fn drive_all<R: Rng>(arena: &LavaArena<R>) -> KeyState {
    let mut keys = KeyState::new();
    for rider in arena.riders() {
        keys.merge(&drive(arena, rider.slot));
    }
    keys
}

fn pulse(frame: u64) -> bool {
    frame % FLAP_PERIOD < FLAP_PERIOD / 2
}

/// Signed horizontal offset from `from` to `to`, the short way round the
/// wrapping screen.
fn wrapped_dx(from: &Body, to: &Body, screen_w: f32) -> f32 {
    let dx = (to.x + to.width as f32 / 2.0) - (from.x + from.width as f32 / 2.0);
    if screen_w <= 0.0 {
        return dx;
    }
    if dx > screen_w / 2.0 {
        dx - screen_w
    } else if dx < -screen_w / 2.0 {
        dx + screen_w
    } else {
        dx
    }
}

fn distance_sq(from: &Body, to: &Body, screen_w: f32) -> f32 {
    let dx = wrapped_dx(from, to, screen_w);
    let dy = to.y - from.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use lavajoust_core::events::Archetype;
    use lavajoust_core::input::Key;

    use super::*;
    use crate::config::ArenaConfig;

    fn arena() -> LavaArena {
        LavaArena::new(ArenaConfig::default())
    }

    #[test]
    fn heads_toward_the_nearest_enemy() {
        let mut game = arena();
        game.spawn_enemy_at(Archetype::Bounder, 700.0, 250.0);
        let keys = drive(&game, 0);
        assert!(keys.is_down(Key::Right));
        assert!(!keys.is_down(Key::Left));
    }

    #[test]
    fn takes_the_short_way_round() {
        let mut game = arena();
        // Rider at x 400; enemy near the right edge is closer going left.
        game.spawn_enemy_at(Archetype::Bounder, 1200.0, 250.0);
        let keys = drive(&game, 0);
        assert!(keys.is_down(Key::Left));
    }

    #[test]
    fn climbs_when_below_a_threat() {
        let mut game = arena();
        game.spawn_enemy_at(Archetype::Bounder, 400.0, 100.0);
        // Frame 0 is inside the pressed half of the pulse.
        assert!(drive(&game, 0).is_down(Key::Space));
    }

    #[test]
    fn flap_key_is_released_between_pulses() {
        let pattern: Vec<bool> = (0..8).map(pulse).collect();
        assert_eq!(
            pattern,
            [true, true, false, false, true, true, false, false]
        );
    }

    #[test]
    fn idles_without_targets() {
        let game = arena();
        let keys = drive(&game, 0);
        assert!(!keys.is_down(Key::Left));
        assert!(!keys.is_down(Key::Right));
    }

    #[test]
    fn missing_slot_yields_no_keys() {
        let game = arena();
        assert_eq!(drive(&game, 1), KeyState::new());
    }

    #[test]
    fn drive_all_uses_each_riders_binding() {
        let mut game = arena();
        lavajoust_core::game_trait::ArenaGame::reset(&mut game, 2);
        game.spawn_enemy_at(Archetype::Bounder, 600.0, 250.0);
        let keys = drive_all(&game);
        // Rider one (x 400) goes right, rider two (x 800) goes left.
        assert!(keys.is_down(Key::Right));
        assert!(keys.is_down(Key::A));
    }
}
