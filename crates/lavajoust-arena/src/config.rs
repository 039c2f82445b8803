use std::fmt;

use serde::{Deserialize, Serialize};

use lavajoust_core::events::Archetype;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "LAVAJOUST_CONFIG";
/// Config file read when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/arena.toml";

/// Failure to read or parse a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Parse(e) => write!(f, "invalid arena config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

/// Data-driven configuration for the arena. Every value is tunable from
/// TOML; missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Seed for the AI random source when none is injected.
    pub seed: u64,
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyTable,
    pub ai: AiConfig,
    pub egg: EggConfig,
    pub waves: WaveConfig,
    pub special_flyer: SpecialFlyerConfig,
    pub layout: LayoutConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            screen: ScreenConfig::default(),
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            enemies: EnemyTable::default(),
            ai: AiConfig::default(),
            egg: EggConfig::default(),
            waves: WaveConfig::default(),
            special_flyer: SpecialFlyerConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Playfield bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
    /// Top edge of the lava. Touching it is fatal for riders.
    pub lava_y: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            lava_y: 680.0,
        }
    }
}

/// Flight tuning shared by every flight-capable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Base upward impulse of one flap, scaled by flap momentum.
    pub flap_power: f32,
    /// Momentum added per flap.
    pub flap_momentum_gain: f32,
    /// Momentum cap for riders.
    pub max_flap_momentum: f32,
    /// Momentum lost per idle tick for riders.
    pub flap_momentum_decay: f32,
    /// Enemy flaps are this fraction of a rider's.
    pub enemy_flap_scale: f32,
    /// Momentum cap for enemies.
    pub enemy_max_flap_momentum: f32,
    /// Momentum lost per idle tick for enemies.
    pub enemy_momentum_decay: f32,
    /// Enemies feel this fraction of gravity.
    pub enemy_gravity_factor: f32,
    /// Enemy rise speed is capped at this fraction of the vertical cap.
    pub enemy_rise_factor: f32,
    pub max_vertical_speed: f32,
    pub horizontal_acceleration: f32,
    pub horizontal_deceleration: f32,
    /// Acceleration multiplier while airborne.
    pub air_control: f32,
    pub max_horizontal_speed: f32,
    /// How far below a platform top a previous-frame bottom edge may sit
    /// and still count as landing from above.
    pub landing_margin: f32,
    /// Pixels added to every side of the landing check box.
    pub collision_inflate: i32,
    /// Downward speed above which the sub-stepped landing sweep runs.
    pub fast_fall_threshold: f32,
    /// Pixels of travel per sweep sub-step.
    pub substep_divisor: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_power: 3.0,
            flap_momentum_gain: 0.4,
            max_flap_momentum: 3.5,
            flap_momentum_decay: 0.03,
            enemy_flap_scale: 0.7,
            enemy_max_flap_momentum: 2.5,
            enemy_momentum_decay: 0.015,
            enemy_gravity_factor: 0.8,
            enemy_rise_factor: 0.8,
            max_vertical_speed: 15.0,
            horizontal_acceleration: 0.3,
            horizontal_deceleration: 0.1,
            air_control: 0.7,
            max_horizontal_speed: 8.0,
            landing_margin: 15.0,
            collision_inflate: 2,
            fast_fall_threshold: 10.0,
            substep_divisor: 5.0,
        }
    }
}

/// Rider tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: i32,
    pub height: i32,
    pub start_lives: u32,
    /// Ticks between losing a life and reappearing.
    pub respawn_frames: u32,
    /// Ticks of invincibility after reappearing.
    pub invincibility_frames: u32,
    /// Upward speed given to a rider who wins a joust.
    pub joust_boost: f32,
    /// An extra life is granted each time the score crosses a multiple of this.
    pub extra_life_score: u32,
    /// Spawn point per slot (top-left corner).
    pub spawn_points: Vec<[f32; 2]>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            start_lives: 3,
            respawn_frames: 90,
            invincibility_frames: 125,
            joust_boost: 5.0,
            extra_life_score: 10_000,
            spawn_points: vec![[400.0, 250.0], [800.0, 250.0]],
        }
    }
}

/// Speed, score value and size of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub speed: f32,
    pub points: u32,
    pub width: i32,
    pub height: i32,
}

/// Per-archetype stats table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub bounder: ArchetypeStats,
    pub hunter: ArchetypeStats,
    pub shadow_lord: ArchetypeStats,
    pub pterodactyl: ArchetypeStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            bounder: ArchetypeStats {
                speed: 3.0,
                points: 250,
                width: 64,
                height: 64,
            },
            hunter: ArchetypeStats {
                speed: 4.5,
                points: 500,
                width: 64,
                height: 64,
            },
            shadow_lord: ArchetypeStats {
                speed: 6.0,
                points: 1500,
                width: 64,
                height: 64,
            },
            pterodactyl: ArchetypeStats {
                speed: 7.0,
                points: 1000,
                width: 80,
                height: 64,
            },
        }
    }
}

impl EnemyTable {
    pub fn stats(&self, archetype: Archetype) -> ArchetypeStats {
        match archetype {
            Archetype::Bounder => self.bounder,
            Archetype::Hunter => self.hunter,
            Archetype::ShadowLord => self.shadow_lord,
            Archetype::Pterodactyl => self.pterodactyl,
        }
    }
}

/// Enemy behaviour tuning. Ranges are `[min, max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub flap_interval: [u32; 2],
    pub direction_interval: [u32; 2],
    /// Chance per grounded tick of an extra takeoff flap.
    pub bounder_takeoff_chance: f32,
    pub hunter_takeoff_chance: f32,
    pub shadow_lord_takeoff_chance: f32,
    pub hunter_aggression: [f32; 2],
    /// Hunters only climb toward riders at least this far above them.
    pub hunter_climb_gap: f32,
    pub hunter_climb_chance: f32,
    pub dash_interval: [u32; 2],
    pub dash_multiplier: f32,
    pub erratic_factor: [f32; 2],
    pub erratic_chance: f32,
    /// Extra gravity applied by a dive, in multiples of gravity.
    pub dive_factor: f32,
    pub pterodactyl_chase_multiplier: f32,
    /// Vertical band in which the flyer holds altitude instead of climbing.
    pub pterodactyl_hover_band: f32,
    pub pterodactyl_hover_chance: f32,
    /// Enemies within this distance above the lava flap on every tick.
    pub lava_flap_margin: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            flap_interval: [30, 60],
            direction_interval: [60, 180],
            bounder_takeoff_chance: 0.05,
            hunter_takeoff_chance: 0.15,
            shadow_lord_takeoff_chance: 0.25,
            hunter_aggression: [0.6, 0.9],
            hunter_climb_gap: 50.0,
            hunter_climb_chance: 0.3,
            dash_interval: [120, 240],
            dash_multiplier: 1.5,
            erratic_factor: [0.7, 1.0],
            erratic_chance: 0.05,
            dive_factor: 2.0,
            pterodactyl_chase_multiplier: 1.1,
            pterodactyl_hover_band: 20.0,
            pterodactyl_hover_chance: 0.2,
            lava_flap_margin: 40.0,
        }
    }
}

/// Egg tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EggConfig {
    pub width: i32,
    pub height: i32,
    /// Grounded ticks before hatching.
    pub lifetime: u32,
    pub max_bounces: u32,
    /// Fraction of speed kept on each bounce.
    pub restitution: f32,
    /// Eggs fall faster than riders.
    pub gravity_factor: f32,
    /// Downward speed of a freshly laid egg.
    pub initial_fall_speed: f32,
    pub points: u32,
}

impl Default for EggConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            lifetime: 625,
            max_bounces: 2,
            restitution: 0.5,
            gravity_factor: 1.2,
            initial_fall_speed: 2.0,
            points: 500,
        }
    }
}

/// Enemy counts for one wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub wave: u32,
    pub bounders: u32,
    pub hunters: u32,
    pub shadow_lords: u32,
}

/// Wave progression tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub table: Vec<WaveEntry>,
    /// Ticks of "get ready" between a cleared wave and the next.
    pub delay_frames: u32,
    /// Bonus to every living rider when a wave ends with no eggs left.
    pub all_eggs_bonus: u32,
    /// Enemies spawn at least this far from the side walls.
    pub spawn_margin: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        let rows: [(u32, u32, u32, u32); 10] = [
            (1, 3, 0, 0),
            (2, 4, 0, 0),
            (3, 5, 0, 0),
            (4, 3, 2, 0),
            (5, 2, 3, 0),
            (6, 3, 3, 0),
            (7, 2, 3, 1),
            (8, 3, 3, 1),
            (9, 2, 4, 1),
            (10, 3, 4, 2),
        ];
        Self {
            table: rows
                .iter()
                .map(|&(wave, bounders, hunters, shadow_lords)| WaveEntry {
                    wave,
                    bounders,
                    hunters,
                    shadow_lords,
                })
                .collect(),
            delay_frames: 187,
            all_eggs_bonus: 2000,
            spawn_margin: 50.0,
        }
    }
}

/// Special flyer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialFlyerConfig {
    /// Ticks after a wave spawns before the flyer arrives.
    pub spawn_delay_frames: u32,
    /// Side of the square mouth hitbox.
    pub mouth_size: i32,
    /// How far past the screen edge the flyer's outer side starts, on
    /// either side. Capped at the flyer's width.
    pub entry_offset: f32,
}

impl Default for SpecialFlyerConfig {
    fn default() -> Self {
        Self {
            spawn_delay_frames: 1875,
            mouth_size: 20,
            entry_offset: 50.0,
        }
    }
}

/// A fixed ledge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgeSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// A section of the bottom floor, in fractions of the screen width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorSection {
    pub start: f32,
    pub width: f32,
}

/// Platform layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub platform_height: i32,
    pub ledges: Vec<LedgeSpec>,
    /// Top of the bottom floor sections.
    pub floor_y: f32,
    /// Floor layouts indexed by wave (first entry is wave 1). Waves past
    /// the end reuse the last layout.
    pub floors: Vec<Vec<FloorSection>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let section = |start: f32, width: f32| FloorSection { start, width };
        Self {
            platform_height: 20,
            ledges: vec![
                LedgeSpec {
                    x: 120.0,
                    y: 170.0,
                    width: 200.0,
                },
                LedgeSpec {
                    x: 960.0,
                    y: 170.0,
                    width: 200.0,
                },
                LedgeSpec {
                    x: 240.0,
                    y: 330.0,
                    width: 800.0,
                },
                LedgeSpec {
                    x: 120.0,
                    y: 490.0,
                    width: 200.0,
                },
                LedgeSpec {
                    x: 960.0,
                    y: 490.0,
                    width: 200.0,
                },
            ],
            floor_y: 650.0,
            floors: vec![
                vec![section(0.0, 1.0)],
                vec![section(0.0, 0.45), section(0.55, 0.45)],
                vec![section(0.0, 0.3), section(0.35, 0.3), section(0.7, 0.3)],
                vec![
                    section(0.0, 0.2),
                    section(0.25, 0.2),
                    section(0.5, 0.2),
                    section(0.75, 0.25),
                ],
                vec![
                    section(0.0, 0.15),
                    section(0.25, 0.15),
                    section(0.5, 0.15),
                    section(0.75, 0.15),
                ],
                vec![
                    section(0.1, 0.1),
                    section(0.3, 0.1),
                    section(0.5, 0.1),
                    section(0.7, 0.1),
                    section(0.9, 0.1),
                ],
            ],
        }
    }
}

impl ArenaConfig {
    /// Load config from `LAVAJOUST_CONFIG` or `config/arena.toml`, falling
    /// back to defaults if neither is readable. The result is sanitized.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::from_file(&path) {
            Ok(cfg) => cfg.sanitized(),
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(contents).map_err(ConfigError::Parse)
    }

    /// Clamp out-of-range values into something the simulation can run
    /// with, logging each correction.
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.physics;
        if !(p.max_flap_momentum >= 1.0) {
            tracing::warn!(value = p.max_flap_momentum, "max_flap_momentum below 1.0, clamping");
            p.max_flap_momentum = 1.0;
        }
        if !(p.enemy_max_flap_momentum >= 1.0) {
            tracing::warn!(
                value = p.enemy_max_flap_momentum,
                "enemy_max_flap_momentum below 1.0, clamping"
            );
            p.enemy_max_flap_momentum = 1.0;
        }
        for (name, v) in [
            ("gravity", &mut p.gravity),
            ("flap_power", &mut p.flap_power),
            ("flap_momentum_gain", &mut p.flap_momentum_gain),
            ("flap_momentum_decay", &mut p.flap_momentum_decay),
            ("enemy_momentum_decay", &mut p.enemy_momentum_decay),
            ("horizontal_acceleration", &mut p.horizontal_acceleration),
            ("horizontal_deceleration", &mut p.horizontal_deceleration),
            ("landing_margin", &mut p.landing_margin),
        ] {
            if !(*v >= 0.0) {
                tracing::warn!(field = name, value = *v, "negative physics value, using 0");
                *v = 0.0;
            }
        }
        for (name, v) in [
            ("max_vertical_speed", &mut p.max_vertical_speed),
            ("max_horizontal_speed", &mut p.max_horizontal_speed),
            ("substep_divisor", &mut p.substep_divisor),
        ] {
            if !(*v > 0.0) {
                tracing::warn!(field = name, value = *v, "must be positive, using 1");
                *v = 1.0;
            }
        }
        p.air_control = clamp_unit("air_control", p.air_control);
        p.enemy_flap_scale = clamp_unit("enemy_flap_scale", p.enemy_flap_scale);
        p.enemy_rise_factor = clamp_unit("enemy_rise_factor", p.enemy_rise_factor);
        p.collision_inflate = p.collision_inflate.max(0);

        self.egg.restitution = clamp_unit("egg.restitution", self.egg.restitution);
        if self.egg.lifetime == 0 {
            tracing::warn!("egg.lifetime is 0, using 1");
            self.egg.lifetime = 1;
        }
        if self.player.spawn_points.is_empty() {
            tracing::warn!("player.spawn_points is empty, using defaults");
            self.player.spawn_points = PlayerConfig::default().spawn_points;
        }
        for range in [
            &mut self.ai.flap_interval,
            &mut self.ai.direction_interval,
            &mut self.ai.dash_interval,
        ] {
            range[0] = range[0].max(1);
            if range[1] <= range[0] {
                range[1] = range[0].saturating_add(1);
            }
        }
        let ai_defaults = AiConfig::default();
        self.ai.hunter_aggression = sanitize_range(
            "ai.hunter_aggression",
            self.ai.hunter_aggression,
            ai_defaults.hunter_aggression,
            1.0,
        );
        self.ai.erratic_factor = sanitize_range(
            "ai.erratic_factor",
            self.ai.erratic_factor,
            ai_defaults.erratic_factor,
            MAX_ERRATIC_FACTOR,
        );

        let screen = &mut self.screen;
        let screen_defaults = ScreenConfig::default();
        if !(screen.width.is_finite() && screen.width >= 1.0) {
            tracing::warn!(value = screen.width, "screen.width must be at least 1, using default");
            screen.width = screen_defaults.width;
        }
        if !(screen.height.is_finite() && screen.height > 0.0) {
            tracing::warn!(value = screen.height, "screen.height must be positive, using default");
            screen.height = screen_defaults.height;
        }
        if !(screen.lava_y.is_finite() && screen.lava_y > 0.0 && screen.lava_y <= screen.height) {
            let fallback = screen_defaults.lava_y.min(screen.height);
            tracing::warn!(
                value = screen.lava_y,
                fallback,
                "screen.lava_y must lie within the screen"
            );
            screen.lava_y = fallback;
        }

        let margin = self.waves.spawn_margin;
        if !margin.is_finite() {
            tracing::warn!(value = margin, "waves.spawn_margin is not finite, using default");
            self.waves.spawn_margin = WaveConfig::default().spawn_margin;
        } else if margin < 0.0 {
            tracing::warn!(value = margin, "waves.spawn_margin is negative, using 0");
            self.waves.spawn_margin = 0.0;
        }
        if !self.special_flyer.entry_offset.is_finite() {
            tracing::warn!(
                value = self.special_flyer.entry_offset,
                "special_flyer.entry_offset is not finite, using default"
            );
            self.special_flyer.entry_offset = SpecialFlyerConfig::default().entry_offset;
        }
        if self.layout.floors.is_empty() {
            tracing::warn!("layout.floors is empty, using defaults");
            self.layout.floors = LayoutConfig::default().floors;
        }
        self
    }
}

/// Upper bound for a rolled erratic factor.
const MAX_ERRATIC_FACTOR: f32 = 100.0;

/// A `[low, high]` roll range the RNG can sample: finite bounds within
/// `[0, max]`, low first. Non-finite bounds take the default's.
fn sanitize_range(name: &str, range: [f32; 2], default: [f32; 2], max: f32) -> [f32; 2] {
    let mut out = range;
    for (v, d) in out.iter_mut().zip(default) {
        if !v.is_finite() {
            *v = d;
        }
        *v = v.clamp(0.0, max);
    }
    if out[0] > out[1] {
        out.swap(0, 1);
    }
    if out != range {
        tracing::warn!(field = name, from = ?range, to = ?out, "unusable range, corrected");
    }
    out
}

fn clamp_unit(name: &str, v: f32) -> f32 {
    if (0.0..=1.0).contains(&v) {
        v
    } else {
        tracing::warn!(field = name, value = v, "expected a value in [0, 1], clamping");
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
    }
}
