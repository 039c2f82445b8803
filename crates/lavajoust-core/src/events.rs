use serde::{Deserialize, Serialize};

use crate::game_trait::{EntityId, PlayerId};

/// Enemy archetypes, shared so events and the display layer can name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Bounder,
    Hunter,
    ShadowLord,
    Pterodactyl,
}

impl Archetype {
    /// What an egg laid by this archetype hatches into.
    ///
    /// Bounder -> Hunter -> ShadowLord -> Bounder. The special flyer never
    /// lays eggs and maps to itself.
    pub fn hatches_into(self) -> Archetype {
        match self {
            Archetype::Bounder => Archetype::Hunter,
            Archetype::Hunter => Archetype::ShadowLord,
            Archetype::ShadowLord => Archetype::Bounder,
            Archetype::Pterodactyl => Archetype::Pterodactyl,
        }
    }

    /// Sprite name used with `ImageLookup`.
    pub fn sprite_name(self) -> &'static str {
        match self {
            Archetype::Bounder => "bounder",
            Archetype::Hunter => "hunter",
            Archetype::ShadowLord => "shadow_lord",
            Archetype::Pterodactyl => "pterodactyl",
        }
    }
}

/// Why a rider lost a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Lava,
    Joust,
    SpecialFlyer,
}

/// Signals emitted by the arena during `update`.
///
/// These are the only way simulation outcomes reach the game-state layer;
/// nothing is raised as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreUpdate {
        player_id: PlayerId,
        score: u32,
    },
    EnemyDefeated {
        player_id: PlayerId,
        enemy_id: EntityId,
        archetype: Archetype,
        points: u32,
    },
    EggCollected {
        player_id: PlayerId,
        egg_id: EntityId,
        points: u32,
    },
    EggHatched {
        egg_id: EntityId,
        enemy_id: EntityId,
        archetype: Archetype,
    },
    EggLost {
        egg_id: EntityId,
    },
    JoustTie {
        player_id: PlayerId,
        enemy_id: EntityId,
    },
    PlayerDied {
        player_id: PlayerId,
        cause: DeathCause,
        lives_left: u32,
    },
    PlayerRespawned {
        player_id: PlayerId,
    },
    ExtraLife {
        player_id: PlayerId,
        lives: u32,
    },
    SpecialFlyerSpawned {
        enemy_id: EntityId,
    },
    SpecialFlyerDefeated {
        player_id: PlayerId,
        points: u32,
    },
    WaveStarted {
        wave: u32,
    },
    WaveCleared {
        wave: u32,
        all_eggs_collected: bool,
    },
    /// All riders are out of lives. Emitted once per round.
    GameOver,
}
