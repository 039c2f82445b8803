use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use lavajoust_core::events::GameEvent;

use crate::LavaArena;
use crate::config::{WaveConfig, WaveEntry};

/// Enemy counts for one wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveCounts {
    pub bounders: u32,
    pub hunters: u32,
    pub shadow_lords: u32,
}

impl WaveCounts {
    pub fn total(&self) -> u32 {
        self.bounders + self.hunters + self.shadow_lords
    }
}

impl From<&WaveEntry> for WaveCounts {
    fn from(e: &WaveEntry) -> Self {
        Self {
            bounders: e.bounders,
            hunters: e.hunters,
            shadow_lords: e.shadow_lords,
        }
    }
}

/// Used when the configured table is empty.
const FALLBACK: WaveCounts = WaveCounts {
    bounders: 3,
    hunters: 0,
    shadow_lords: 0,
};

/// Enemy counts by wave number.
///
/// Waves past the last key grow from it: one more Bounder every 3 waves,
/// one more Hunter every 2, one more ShadowLord every wave. Waves between
/// keys use the nearest lower key; waves below the first key use the first.
#[derive(Debug, Clone, Default)]
pub struct WaveTable {
    entries: BTreeMap<u32, WaveCounts>,
}

impl WaveTable {
    pub fn new(entries: &[WaveEntry]) -> Self {
        Self {
            entries: entries.iter().map(|e| (e.wave, e.into())).collect(),
        }
    }

    pub fn counts(&self, wave: u32) -> WaveCounts {
        let Some((&last_wave, &last)) = self.entries.last_key_value() else {
            return FALLBACK;
        };
        if wave > last_wave {
            let diff = wave - last_wave;
            return WaveCounts {
                bounders: last.bounders + diff / 3,
                hunters: last.hunters + diff / 2,
                shadow_lords: last.shadow_lords + diff,
            };
        }
        self.entries
            .range(..=wave)
            .next_back()
            .or_else(|| self.entries.first_key_value())
            .map(|(_, c)| *c)
            .unwrap_or(FALLBACK)
    }
}

/// Where the wave cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave started yet.
    Idle,
    Fighting,
    /// Wave cleared; counting down to the next.
    GetReady { frames_left: u32 },
}

/// Drives wave progression on an arena: spawns each wave from the table,
/// notices when it is cleared, pays the all-eggs bonus and waits out the
/// "get ready" delay before the next.
#[derive(Debug, Clone)]
pub struct WaveDirector {
    table: WaveTable,
    delay_frames: u32,
    all_eggs_bonus: u32,
    wave: u32,
    phase: WavePhase,
}

impl WaveDirector {
    pub fn new(cfg: &WaveConfig) -> Self {
        Self {
            table: WaveTable::new(&cfg.table),
            delay_frames: cfg.delay_frames,
            all_eggs_bonus: cfg.all_eggs_bonus,
            wave: 0,
            phase: WavePhase::Idle,
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Start the next wave on `arena`.
    pub fn start_next<R: Rng>(&mut self, arena: &mut LavaArena<R>) -> Vec<GameEvent> {
        self.wave += 1;
        let counts = self.table.counts(self.wave);
        self.phase = WavePhase::Fighting;
        tracing::info!(
            wave = self.wave,
            bounders = counts.bounders,
            hunters = counts.hunters,
            shadow_lords = counts.shadow_lords,
            total = counts.total(),
            "Wave starting"
        );
        arena.begin_wave(self.wave, counts)
    }

    /// Advance one tick. Call after `LavaArena::update`.
    pub fn tick<R: Rng>(&mut self, arena: &mut LavaArena<R>) -> Vec<GameEvent> {
        if arena.is_over() {
            return Vec::new();
        }
        match self.phase {
            WavePhase::Idle => self.start_next(arena),
            WavePhase::Fighting => {
                if arena.enemy_count() > 0 {
                    return Vec::new();
                }
                let all_eggs_collected = arena.egg_count() == 0;
                let mut events = vec![GameEvent::WaveCleared {
                    wave: self.wave,
                    all_eggs_collected,
                }];
                if all_eggs_collected {
                    events.extend(arena.award_bonus(self.all_eggs_bonus));
                }
                tracing::debug!(wave = self.wave, all_eggs_collected, "Wave cleared");
                self.phase = WavePhase::GetReady {
                    frames_left: self.delay_frames,
                };
                events
            },
            WavePhase::GetReady { frames_left } => {
                if frames_left > 0 {
                    self.phase = WavePhase::GetReady {
                        frames_left: frames_left - 1,
                    };
                    Vec::new()
                } else {
                    self.start_next(arena)
                }
            },
        }
    }
}
