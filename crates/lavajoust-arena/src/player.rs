use serde::{Deserialize, Serialize};

use lavajoust_core::events::DeathCause;
use lavajoust_core::game_trait::PlayerId;
use lavajoust_core::input::{ControlBinding, RiderCommand};

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::entity::Body;
use crate::physics::{self, BASE_MOMENTUM, FlightProfile};

/// Where a rider is in the life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    /// Lost a life; reappears when the countdown ends.
    RespawnPending { frames_left: u32 },
    /// Out of lives for the rest of the round.
    Eliminated,
}

/// Result of a lethal hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub cause: DeathCause,
    pub lives_left: u32,
}

/// A player-controlled rider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    pub id: PlayerId,
    pub slot: usize,
    pub body: Body,
    pub lives: u32,
    pub score: u32,
    pub state: LifeState,
    pub invincibility: u32,
    pub momentum: f32,
    pub grounded: bool,
    pub binding: ControlBinding,
    spawn: [f32; 2],
    flap_held: bool,
}

impl Rider {
    pub fn new(slot: usize, cfg: &PlayerConfig) -> Self {
        let spawn = cfg
            .spawn_points
            .get(slot)
            .or(cfg.spawn_points.last())
            .copied()
            .unwrap_or([0.0, 0.0]);
        let mut body = Body::new(spawn[0], spawn[1], cfg.width, cfg.height);
        body.facing_right = slot == 0;
        Self {
            id: slot as PlayerId + 1,
            slot,
            body,
            lives: cfg.start_lives,
            score: 0,
            state: if cfg.start_lives > 0 {
                LifeState::Alive
            } else {
                LifeState::Eliminated
            },
            invincibility: 0,
            momentum: BASE_MOMENTUM,
            grounded: false,
            binding: ControlBinding::for_slot(slot),
            spawn,
            flap_held: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    /// Alive and on the field: can touch eggs and be chased.
    pub fn is_present(&self) -> bool {
        self.is_alive() && self.body.active
    }

    /// Present and not protected: lethal collisions apply.
    pub fn is_vulnerable(&self) -> bool {
        self.is_present() && !self.is_invincible()
    }

    pub fn is_respawning(&self) -> bool {
        matches!(self.state, LifeState::RespawnPending { .. })
    }

    /// Steer and flap. A flap fires once per key press, not per frame held.
    pub fn apply_command(&mut self, cmd: RiderCommand, physics: &PhysicsConfig) {
        let profile = FlightProfile::rider(physics);
        physics::steer(&mut self.body, cmd.move_dir, self.grounded, physics);

        if cmd.flap && !self.flap_held {
            physics::flap(&mut self.body, &mut self.momentum, physics, &profile);
            self.grounded = false;
        } else {
            physics::decay_momentum(&mut self.momentum, &profile);
        }
        self.flap_held = cmd.flap;
    }

    /// Count down invincibility. Returns true while still protected.
    pub fn tick_invincibility(&mut self) -> bool {
        self.invincibility = self.invincibility.saturating_sub(1);
        self.is_invincible()
    }

    /// Count down a pending respawn. Returns true on the tick the rider
    /// reappears.
    pub fn tick_respawn(&mut self, cfg: &PlayerConfig) -> bool {
        let LifeState::RespawnPending { frames_left } = self.state else {
            return false;
        };
        if frames_left <= 1 {
            self.respawn(cfg);
            true
        } else {
            self.state = LifeState::RespawnPending {
                frames_left: frames_left - 1,
            };
            false
        }
    }

    /// Lose a life unless protected. Returns `None` when the hit was
    /// ignored.
    pub fn kill(&mut self, cause: DeathCause, cfg: &PlayerConfig) -> Option<Death> {
        if !self.is_vulnerable() {
            return None;
        }
        self.lives = self.lives.saturating_sub(1);
        self.body.deactivate();
        self.body.vx = 0.0;
        self.body.vy = 0.0;
        self.grounded = false;
        self.state = if self.lives > 0 {
            LifeState::RespawnPending {
                frames_left: cfg.respawn_frames.max(1),
            }
        } else {
            LifeState::Eliminated
        };
        Some(Death {
            cause,
            lives_left: self.lives,
        })
    }

    /// Back to the spawn point with zeroed motion and fresh invincibility.
    pub fn respawn(&mut self, cfg: &PlayerConfig) {
        self.body.x = self.spawn[0];
        self.body.y = self.spawn[1];
        self.body.prev_y = self.spawn[1];
        self.body.vx = 0.0;
        self.body.vy = 0.0;
        self.body.active = true;
        self.momentum = BASE_MOMENTUM;
        self.grounded = false;
        self.flap_held = false;
        self.invincibility = cfg.invincibility_frames;
        self.state = LifeState::Alive;
    }

    /// Credit points. Returns how many extra lives the credit earned.
    pub fn add_score(&mut self, points: u32, extra_life_score: u32) -> u32 {
        let before = self.score;
        self.score = self.score.saturating_add(points);
        let earned = crate::scoring::extra_lives_earned(before, self.score, extra_life_score);
        self.lives += earned;
        earned
    }
}
