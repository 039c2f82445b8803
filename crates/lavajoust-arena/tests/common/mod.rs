use lavajoust_arena::LavaArena;
use lavajoust_arena::config::ArenaConfig;
use lavajoust_core::events::GameEvent;
use lavajoust_core::game_trait::ArenaGame;
use lavajoust_core::input::KeyState;
use lavajoust_core::test_helpers::ConstRng;
use rand::Rng;

/// Arena whose rolls all fail, so enemies keep their spawn drift and
/// never take off on their own.
pub fn still_arena(config: ArenaConfig) -> LavaArena<ConstRng> {
    LavaArena::with_rng(config, ConstRng::high())
}

/// Put rider `slot` at a position with no motion.
pub fn place_rider<R: Rng>(arena: &mut LavaArena<R>, slot: usize, x: f32, y: f32) {
    let body = &mut arena.riders_mut()[slot].body;
    body.x = x;
    body.y = y;
    body.prev_y = y;
    body.vx = 0.0;
    body.vy = 0.0;
}

/// Keep every enemy's flap and turn timers from expiring during a test.
pub fn freeze_enemy_timers<R: Rng>(arena: &mut LavaArena<R>) {
    for e in arena.enemies_mut() {
        e.timers.flap = 10_000;
        e.timers.change_direction = 10_000;
    }
}

/// One idle tick.
pub fn idle<R: Rng>(arena: &mut LavaArena<R>) -> Vec<GameEvent> {
    arena.update(&KeyState::new())
}

pub fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
