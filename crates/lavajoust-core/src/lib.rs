pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod render;
pub mod sound;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use rand::RngCore;

    use crate::game_trait::ArenaGame;
    use crate::geometry::Rect;
    use crate::input::{Key, KeyState};
    use crate::render::{Color, Drawable, Surface};

    /// RNG that returns the same word forever.
    ///
    /// `ConstRng::low()` makes every probability roll succeed and every
    /// range pick its lower bound; `ConstRng::high()` makes rolls below
    /// 0.9 fail and ranges pick near their upper bound.
    #[derive(Debug, Clone, Copy)]
    pub struct ConstRng {
        word: u32,
    }

    impl ConstRng {
        pub fn low() -> Self {
            Self { word: 0 }
        }

        pub fn high() -> Self {
            Self { word: 0xF000_0000 }
        }
    }

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.word
        }

        fn next_u64(&mut self) -> u64 {
            ((self.word as u64) << 32) | self.word as u64
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(4) {
                let bytes = self.word.to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    /// One recorded drawing call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Draw {
            drawable: Drawable,
            dest: Rect,
            flip_x: bool,
        },
        Fill {
            dest: Rect,
            color: Color,
        },
    }

    /// Surface that records every call, for asserting on render output.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl Surface for RecordingSurface {
        fn draw(&mut self, drawable: &Drawable, dest: Rect, flip_x: bool) {
            self.calls.push(DrawCall::Draw {
                drawable: drawable.clone(),
                dest,
                flip_x,
            });
        }

        fn fill_rect(&mut self, dest: Rect, color: Color) {
            self.calls.push(DrawCall::Fill { dest, color });
        }
    }

    /// Render a game into a fresh recording surface.
    pub fn render_calls(game: &dyn ArenaGame) -> Vec<DrawCall> {
        let mut surface = RecordingSurface::default();
        game.render(&mut surface);
        surface.calls
    }

    /// Key snapshot holding the given keys.
    pub fn keys(held: &[Key]) -> KeyState {
        KeyState::pressed(held)
    }

    /// Run `n` ticks with no keys held, returning every event raised.
    pub fn run_idle_ticks(
        game: &mut dyn ArenaGame,
        n: usize,
    ) -> Vec<crate::events::GameEvent> {
        let idle = KeyState::new();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(&idle));
        }
        all_events
    }

    // ================================================================
    // ArenaGame contract tests
    // ================================================================
    // Every ArenaGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// reset(n) must leave exactly min(max(n, 1), 2) riders with lives.
    pub fn contract_reset_creates_players(game: &mut dyn ArenaGame, player_count: usize) {
        game.reset(player_count);
        assert_eq!(
            game.active_player_count(),
            player_count.clamp(1, 2),
            "reset must create one rider per requested slot"
        );
        assert!(!game.is_game_over(), "a fresh round is not over");
    }

    /// A fresh round has no eggs.
    pub fn contract_fresh_round_has_no_eggs(game: &mut dyn ArenaGame) {
        game.reset(1);
        assert!(
            game.all_eggs_collected(),
            "no eggs exist before any enemy is defeated"
        );
    }

    /// spawn_enemies must add something visible to the playfield.
    pub fn contract_spawn_enemies_visible(game: &mut dyn ArenaGame) {
        game.reset(1);
        let before = render_calls(game).len();
        game.spawn_enemies(2, 1, 1);
        let after = render_calls(game).len();
        assert!(
            after >= before + 4,
            "four spawned enemies must be drawn: before={before}, after={after}"
        );
    }

    /// pause() must freeze the playfield, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn ArenaGame) {
        game.reset(1);
        game.spawn_enemies(3, 0, 0);
        game.pause();
        let before = render_calls(game);
        let events = run_idle_ticks(game, 10);
        assert!(events.is_empty(), "no events while paused");
        assert_eq!(before, render_calls(game), "playfield must not move while paused");

        game.resume();
        run_idle_ticks(game, 10);
        assert_ne!(before, render_calls(game), "playfield must move after resume");
    }
}
