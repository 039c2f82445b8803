pub mod ai;
pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod config;
pub mod egg;
pub mod enemy;
pub mod entity;
pub mod physics;
pub mod platform;
pub mod player;
pub mod scoring;
pub mod waves;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lavajoust_core::events::{Archetype, DeathCause, GameEvent};
use lavajoust_core::game_trait::{ArenaGame, EntityId, GameMetadata};
use lavajoust_core::geometry::Rect;
use lavajoust_core::input::KeyState;
use lavajoust_core::render::{Color, ImageLookup, PlaceholderImages, Surface};
use lavajoust_core::sound::{Silence, SoundEvent, SoundSink};

use ai::Senses;
use combat::{FlyerStrike, Joust};
use config::ArenaConfig;
use egg::{Egg, EggTick};
use enemy::Enemy;
use physics::FlightProfile;
use platform::{Lava, Platform};
use player::{LifeState, Rider};
use waves::WaveCounts;

/// Invincible riders are drawn for the first half of each blink period.
const BLINK_PERIOD: u64 = 12;

/// The entity manager: owns every rider, enemy, egg and platform and runs
/// the fixed per-tick update order.
///
/// Randomness comes only from `R`, so a seeded generator replays a round
/// exactly.
pub struct LavaArena<R: Rng = StdRng> {
    config: ArenaConfig,
    rng: R,
    images: Box<dyn ImageLookup>,
    sound: Box<dyn SoundSink>,
    riders: Vec<Rider>,
    enemies: Vec<Enemy>,
    eggs: Vec<Egg>,
    platforms: Vec<Platform>,
    lava: Lava,
    flyer: Option<Enemy>,
    flyer_timer: u32,
    next_id: EntityId,
    wave: u32,
    frame: u64,
    paused: bool,
    game_over_signaled: bool,
    /// Events raised outside `update`, delivered with the next tick.
    pending: Vec<GameEvent>,
}

impl LavaArena<StdRng> {
    /// Arena seeded from `config.seed`.
    pub fn new(config: ArenaConfig) -> Self {
        let seed = config.seed;
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for LavaArena<StdRng> {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

impl<R: Rng> LavaArena<R> {
    /// Arena with an injected random source, set up for one rider.
    pub fn with_rng(config: ArenaConfig, rng: R) -> Self {
        let config = config.sanitized();
        let lava = Lava::new(
            config.screen.lava_y,
            config.screen.width,
            config.screen.height - config.screen.lava_y,
        );
        let mut arena = Self {
            config,
            rng,
            images: Box::new(PlaceholderImages::new()),
            sound: Box::new(Silence),
            riders: Vec::new(),
            enemies: Vec::new(),
            eggs: Vec::new(),
            platforms: Vec::new(),
            lava,
            flyer: None,
            flyer_timer: 0,
            next_id: 1,
            wave: 0,
            frame: 0,
            paused: false,
            game_over_signaled: false,
            pending: Vec::new(),
        };
        arena.reset(1);
        arena
    }

    pub fn with_images(mut self, images: Box<dyn ImageLookup>) -> Self {
        self.images = images;
        self
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundSink>) -> Self {
        self.sound = sound;
        self
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    pub fn riders_mut(&mut self) -> &mut [Rider] {
        &mut self.riders
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn eggs(&self) -> &[Egg] {
        &self.eggs
    }

    pub fn eggs_mut(&mut self) -> &mut [Egg] {
        &mut self.eggs
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn lava(&self) -> &Lava {
        &self.lava
    }

    pub fn special_flyer(&self) -> Option<&Enemy> {
        self.flyer.as_ref()
    }

    pub fn special_flyer_mut(&mut self) -> Option<&mut Enemy> {
        self.flyer.as_mut()
    }

    /// Ticks left before the special flyer arrives.
    pub fn flyer_timer(&self) -> u32 {
        self.flyer_timer
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn egg_count(&self) -> usize {
        self.eggs.len()
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Same as `ArenaGame::is_game_over`, without the trait in scope.
    pub fn is_over(&self) -> bool {
        !self.riders.is_empty() && self.riders.iter().all(|r| r.state == LifeState::Eliminated)
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place one enemy. Returns its id.
    pub fn spawn_enemy_at(&mut self, archetype: Archetype, x: f32, y: f32) -> EntityId {
        let id = self.alloc_id();
        let stats = self.config.enemies.stats(archetype);
        let enemy = Enemy::spawn(id, archetype, x, y, stats, &self.config.ai, &mut self.rng);
        tracing::debug!(id, ?archetype, x, y, "Enemy spawned");
        self.enemies.push(enemy);
        id
    }

    /// Drop an egg carrying `archetype`. Returns its id.
    pub fn lay_egg_at(&mut self, archetype: Archetype, x: f32, y: f32) -> EntityId {
        let id = self.alloc_id();
        self.eggs.push(Egg::lay(id, archetype, x, y, &self.config.egg));
        id
    }

    /// Rebuild the floor for `wave` and spawn its enemies.
    pub fn begin_wave(&mut self, wave: u32, counts: WaveCounts) -> Vec<GameEvent> {
        self.wave = wave;
        self.platforms = platform::build_layout(&self.config.layout, self.config.screen.width, wave);
        self.spawn_enemies(counts.bounders, counts.hunters, counts.shadow_lords);
        self.sound.play(SoundEvent::WaveStart);
        vec![GameEvent::WaveStarted { wave }]
    }

    /// Credit every rider still on the field.
    pub fn award_bonus(&mut self, points: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for i in 0..self.riders.len() {
            if self.riders[i].is_present() {
                self.credit(i, points, &mut events);
            }
        }
        if !events.is_empty() {
            self.sound.play(SoundEvent::Bonus);
        }
        events
    }

    fn credit(&mut self, rider: usize, points: u32, events: &mut Vec<GameEvent>) {
        let threshold = self.config.player.extra_life_score;
        let r = &mut self.riders[rider];
        let earned = r.add_score(points, threshold);
        events.push(GameEvent::ScoreUpdate {
            player_id: r.id,
            score: r.score,
        });
        if earned > 0 {
            tracing::info!(player_id = r.id, lives = r.lives, "Extra life");
            events.push(GameEvent::ExtraLife {
                player_id: r.id,
                lives: r.lives,
            });
            self.sound.play(SoundEvent::ExtraLife);
        }
    }

    fn kill_rider(&mut self, rider: usize, cause: DeathCause, events: &mut Vec<GameEvent>) {
        let r = &mut self.riders[rider];
        let Some(death) = r.kill(cause, &self.config.player) else {
            return;
        };
        tracing::debug!(player_id = r.id, ?cause, lives_left = death.lives_left, "Rider died");
        events.push(GameEvent::PlayerDied {
            player_id: r.id,
            cause,
            lives_left: death.lives_left,
        });
        self.sound.play(SoundEvent::PlayerDeath);
    }

    fn update_riders(&mut self, keys: &KeyState, events: &mut Vec<GameEvent>) {
        let physics = &self.config.physics;
        let screen = &self.config.screen;
        let mut burned = Vec::new();

        for (i, r) in self.riders.iter_mut().enumerate() {
            match r.state {
                LifeState::Eliminated => continue,
                LifeState::RespawnPending { .. } => {
                    if r.tick_respawn(&self.config.player) {
                        tracing::debug!(player_id = r.id, "Rider respawned");
                        events.push(GameEvent::PlayerRespawned { player_id: r.id });
                    }
                    continue;
                },
                LifeState::Alive => {},
            }

            r.tick_invincibility();
            r.body.begin_tick();
            r.apply_command(r.binding.read(keys), physics);
            physics::apply_gravity(&mut r.body, physics, 1.0);
            physics::integrate(&mut r.body, physics, screen.width);
            physics::clamp_to_ceiling(&mut r.body);

            if r.body.bottom() > screen.lava_y {
                if r.is_invincible() {
                    r.body.vy = -physics.flap_power;
                } else {
                    burned.push(i);
                }
            }
        }

        for i in burned {
            self.kill_rider(i, DeathCause::Lava, events);
        }
    }

    fn update_enemies(&mut self, events: &mut Vec<GameEvent>) {
        for i in 0..self.enemies.len() {
            if !self.enemies[i].body.active {
                continue;
            }
            advance_enemy(
                &mut self.enemies[i],
                &self.riders,
                &self.platforms,
                &self.config,
                &mut self.rng,
            );
            self.joust(i, events);
        }
        self.enemies.retain(|e| e.body.active);
    }

    fn joust(&mut self, enemy: usize, events: &mut Vec<GameEvent>) {
        for r in 0..self.riders.len() {
            if !self.enemies[enemy].body.active {
                return;
            }
            if !self.riders[r].is_vulnerable()
                || !self.riders[r].body.overlaps(&self.enemies[enemy].body)
            {
                continue;
            }
            match combat::joust(&self.riders[r].body, &self.enemies[enemy].body) {
                Joust::RiderWins => self.defeat_enemy(r, enemy, events),
                Joust::EnemyWins => self.kill_rider(r, DeathCause::Joust, events),
                Joust::Tie => {
                    combat::bounce_apart(&mut self.riders[r].body, &mut self.enemies[enemy].body);
                    self.sound.play(SoundEvent::Bounce);
                    events.push(GameEvent::JoustTie {
                        player_id: self.riders[r].id,
                        enemy_id: self.enemies[enemy].id,
                    });
                },
            }
        }
    }

    fn defeat_enemy(&mut self, rider: usize, enemy: usize, events: &mut Vec<GameEvent>) {
        let e = &mut self.enemies[enemy];
        e.body.deactivate();
        let (enemy_id, archetype, points, x, y) = (e.id, e.archetype, e.points, e.body.x, e.body.y);
        let egg_id = self.lay_egg_at(archetype, x, y);

        let r = &mut self.riders[rider];
        r.body.vy = -self.config.player.joust_boost;
        let player_id = r.id;
        tracing::debug!(player_id, enemy_id, egg_id, ?archetype, "Enemy unseated");

        self.sound.play(SoundEvent::EnemyDefeat);
        events.push(GameEvent::EnemyDefeated {
            player_id,
            enemy_id,
            archetype,
            points,
        });
        self.credit(rider, points, events);
    }

    fn update_eggs(&mut self, events: &mut Vec<GameEvent>) {
        let mut hatched = Vec::new();

        for i in 0..self.eggs.len() {
            let egg = &mut self.eggs[i];
            if !egg.body.active {
                continue;
            }
            let cfg = &self.config;
            let outcome = egg.tick(&self.platforms, &cfg.physics, &cfg.egg, &cfg.screen);
            if outcome == EggTick::Lost {
                tracing::debug!(egg_id = egg.id, "Egg lost in lava");
                events.push(GameEvent::EggLost { egg_id: egg.id });
                continue;
            }

            if let Some(r) = self
                .riders
                .iter()
                .position(|r| r.is_present() && r.body.overlaps(&self.eggs[i].body))
            {
                self.collect_egg(r, i, events);
                continue;
            }

            if outcome == EggTick::Ripe {
                let egg = &mut self.eggs[i];
                let archetype = egg.hatch();
                hatched.push((egg.id, archetype, egg.body.x, egg.body.bottom()));
            }
        }
        self.eggs.retain(|e| e.body.active);

        for (egg_id, archetype, x, bottom) in hatched {
            // Stand on whatever the egg rested on.
            let height = self.config.enemies.stats(archetype).height as f32;
            let enemy_id = self.spawn_enemy_at(archetype, x, bottom - height);
            tracing::debug!(egg_id, enemy_id, ?archetype, "Egg hatched");
            self.sound.play(SoundEvent::EggHatch);
            events.push(GameEvent::EggHatched {
                egg_id,
                enemy_id,
                archetype,
            });
        }
    }

    fn collect_egg(&mut self, rider: usize, egg: usize, events: &mut Vec<GameEvent>) {
        let e = &mut self.eggs[egg];
        e.body.deactivate();
        let egg_id = e.id;
        let points = self.config.egg.points;
        events.push(GameEvent::EggCollected {
            player_id: self.riders[rider].id,
            egg_id,
            points,
        });
        self.sound.play(SoundEvent::EggCollect);
        self.credit(rider, points, events);
    }

    fn update_flyer(&mut self, events: &mut Vec<GameEvent>) {
        let Some(mut flyer) = self.flyer.take() else {
            return;
        };
        advance_enemy(
            &mut flyer,
            &self.riders,
            &self.platforms,
            &self.config,
            &mut self.rng,
        );

        let mouth_size = self.config.special_flyer.mouth_size;
        for r in 0..self.riders.len() {
            if !flyer.body.active {
                break;
            }
            if !self.riders[r].is_vulnerable() || !self.riders[r].body.overlaps(&flyer.body) {
                continue;
            }
            match combat::strike_flyer(&self.riders[r].body, &flyer.body, flyer.mouth(mouth_size)) {
                FlyerStrike::FlyerDefeated => {
                    flyer.body.deactivate();
                    let player_id = self.riders[r].id;
                    tracing::info!(player_id, "Special flyer defeated");
                    self.sound.play(SoundEvent::PterodactylDefeat);
                    events.push(GameEvent::SpecialFlyerDefeated {
                        player_id,
                        points: flyer.points,
                    });
                    self.credit(r, flyer.points, events);
                },
                FlyerStrike::RiderDies => self.kill_rider(r, DeathCause::SpecialFlyer, events),
            }
        }

        if flyer.body.active {
            self.flyer = Some(flyer);
        }
    }

    /// The flyer clock runs only while ordinary enemies remain and no
    /// flyer is out.
    fn tick_flyer_spawn(&mut self, events: &mut Vec<GameEvent>) {
        if self.enemies.is_empty() || self.flyer.is_some() {
            return;
        }
        self.flyer_timer = self.flyer_timer.saturating_sub(1);
        if self.flyer_timer == 0
            && let Some(event) = self.release_flyer()
        {
            events.push(event);
        }
    }

    fn release_flyer(&mut self) -> Option<GameEvent> {
        if self.flyer.is_some() {
            return None;
        }
        let screen = &self.config.screen;
        let stats = self.config.enemies.pterodactyl;
        // Never start far enough out to wrap on the first move.
        let width = (stats.width as f32).max(0.0);
        let inset = self.config.special_flyer.entry_offset.clamp(0.0, width);
        let from_left = self.rng.random_bool(0.5);
        let x = if from_left {
            -inset
        } else {
            screen.width + inset - width
        };
        let top = 50.0f32.min(screen.height / 3.0);
        let y = self.rng.random_range(top..=screen.height / 3.0);

        let id = self.alloc_id();
        let mut flyer = Enemy::spawn(
            id,
            Archetype::Pterodactyl,
            x,
            y,
            stats,
            &self.config.ai,
            &mut self.rng,
        );
        flyer.body.facing_right = from_left;
        flyer.body.vx = if from_left { stats.speed } else { -stats.speed };

        tracing::info!(id, x, y, "Special flyer released");
        self.sound.play(SoundEvent::Pterodactyl);
        self.flyer = Some(flyer);
        self.flyer_timer = self.config.special_flyer.spawn_delay_frames;
        Some(GameEvent::SpecialFlyerSpawned { enemy_id: id })
    }

    fn land_riders(&mut self) {
        for r in &mut self.riders {
            if !r.is_present() {
                continue;
            }
            let was_grounded = r.grounded;
            r.grounded = collision::resolve_landing(&mut r.body, &self.platforms, &self.config.physics);
            if r.grounded && !was_grounded {
                self.sound.play(SoundEvent::Land);
            }
        }
    }

    fn check_game_over(&mut self, events: &mut Vec<GameEvent>) {
        if self.game_over_signaled || !self.is_over() {
            return;
        }
        self.game_over_signaled = true;
        tracing::info!(wave = self.wave, frame = self.frame, "Game over");
        self.sound.play(SoundEvent::GameOver);
        events.push(GameEvent::GameOver);
    }

    fn draw_named(&self, surface: &mut dyn Surface, name: &str, dest: Rect, flip_x: bool) {
        surface.draw(&self.images.image(name), dest, flip_x);
    }
}

/// AI, movement, hazards and landing for one enemy.
fn advance_enemy(
    enemy: &mut Enemy,
    riders: &[Rider],
    platforms: &[Platform],
    cfg: &ArenaConfig,
    rng: &mut impl Rng,
) {
    let physics = &cfg.physics;
    let profile = FlightProfile::enemy(physics);

    enemy.body.begin_tick();
    physics::apply_gravity(&mut enemy.body, physics, profile.gravity_factor);

    let senses = Senses {
        riders,
        lava_y: cfg.screen.lava_y,
    };
    let steer = ai::think(enemy, &senses, &cfg.ai, rng);
    if let Some(vx) = steer.vx {
        enemy.body.vx = vx;
        enemy.body.face_velocity();
    }
    if steer.flaps > 0 {
        for _ in 0..steer.flaps {
            physics::flap(&mut enemy.body, &mut enemy.momentum, physics, &profile);
        }
        enemy.grounded = false;
    } else {
        physics::decay_momentum(&mut enemy.momentum, &profile);
    }
    if steer.dive {
        enemy.body.vy += physics.gravity * cfg.ai.dive_factor;
    }

    physics::integrate(&mut enemy.body, physics, cfg.screen.width);
    physics::clamp_to_ceiling(&mut enemy.body);
    if enemy.body.bottom() > cfg.screen.lava_y {
        enemy.body.vy = -physics.flap_power;
    }
    enemy.grounded = collision::resolve_landing(&mut enemy.body, platforms, physics);
}

impl<R: Rng> ArenaGame for LavaArena<R> {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Lava Joust".to_string(),
            description: "Unseat your foes from above, grab their eggs, and stay out of the lava"
                .to_string(),
            min_players: 1,
            max_players: 2,
        }
    }

    fn reset(&mut self, player_count: usize) {
        let count = player_count.clamp(1, 2);
        self.riders = (0..count)
            .map(|slot| Rider::new(slot, &self.config.player))
            .collect();
        self.enemies.clear();
        self.eggs.clear();
        self.flyer = None;
        self.flyer_timer = self.config.special_flyer.spawn_delay_frames;
        self.next_id = 1;
        self.wave = 0;
        self.frame = 0;
        self.paused = false;
        self.game_over_signaled = false;
        self.pending.clear();
        self.platforms = platform::build_layout(&self.config.layout, self.config.screen.width, 0);
        self.lava = Lava::new(
            self.config.screen.lava_y,
            self.config.screen.width,
            self.config.screen.height - self.config.screen.lava_y,
        );
        tracing::info!(players = count, "Round reset");
    }

    fn spawn_enemies(&mut self, bounders: u32, hunters: u32, shadow_lords: u32) {
        let screen = &self.config.screen;
        let margin = self
            .config
            .waves
            .spawn_margin
            .clamp(0.0, (screen.width / 2.0).max(0.0));
        let (x_lo, x_hi) = (margin, screen.width - margin);
        let y_lo = 50.0f32.min(screen.height / 3.0);
        let (half, third) = (screen.height / 2.0, screen.height / 3.0);

        let plan = [
            (Archetype::Bounder, bounders, half),
            (Archetype::Hunter, hunters, half),
            (Archetype::ShadowLord, shadow_lords, third),
        ];
        for (archetype, count, y_hi) in plan {
            for _ in 0..count {
                let x = self.rng.random_range(x_lo..=x_hi);
                let y = self.rng.random_range(y_lo..=y_hi);
                self.spawn_enemy_at(archetype, x, y);
            }
        }
        self.flyer_timer = self.config.special_flyer.spawn_delay_frames;
    }

    fn spawn_special_flyer(&mut self) {
        if let Some(event) = self.release_flyer() {
            self.pending.push(event);
        }
    }

    fn update(&mut self, keys: &KeyState) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        self.frame += 1;
        let mut events = std::mem::take(&mut self.pending);

        self.update_riders(keys, &mut events);
        self.update_enemies(&mut events);
        self.update_eggs(&mut events);
        self.lava.update(&mut self.rng);
        self.update_flyer(&mut events);
        self.tick_flyer_spawn(&mut events);
        self.land_riders();
        self.check_game_over(&mut events);

        events
    }

    fn render(&self, surface: &mut dyn Surface) {
        for p in &self.platforms {
            self.draw_named(surface, "platform", p.rect(), false);
        }

        self.draw_named(surface, "lava", self.lava.rect(), false);
        for b in self.lava.bubbles() {
            let dest = Rect::new(b.x as i32 - b.size, b.y as i32 - b.size, b.size * 2, b.size * 2);
            surface.fill_rect(dest, Color::BUBBLE);
        }

        for egg in &self.eggs {
            self.draw_named(surface, "egg", egg.body.rect(), false);
        }
        for e in self.enemies.iter().chain(self.flyer.as_ref()) {
            self.draw_named(
                surface,
                e.archetype.sprite_name(),
                e.body.rect(),
                !e.body.facing_right,
            );
        }

        for r in &self.riders {
            if !r.is_present() {
                continue;
            }
            if r.is_invincible() && self.frame % BLINK_PERIOD >= BLINK_PERIOD / 2 {
                continue;
            }
            let sprite = if r.slot == 0 { "player1" } else { "player2" };
            self.draw_named(surface, sprite, r.body.rect(), !r.body.facing_right);
        }
    }

    fn active_player_count(&self) -> usize {
        self.riders.iter().filter(|r| r.lives > 0).count()
    }

    fn all_eggs_collected(&self) -> bool {
        self.eggs.is_empty()
    }

    fn is_game_over(&self) -> bool {
        self.is_over()
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}
