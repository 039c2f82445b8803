use serde::{Deserialize, Serialize};

use lavajoust_core::events::Archetype;
use lavajoust_core::game_trait::EntityId;

use crate::collision::{self, EggContact};
use crate::config::{EggConfig, PhysicsConfig, ScreenConfig};
use crate::entity::Body;
use crate::physics;
use crate::platform::Platform;

/// What happened to an egg during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggTick {
    Airborne,
    Bounced,
    /// Came to rest; the hatch countdown starts next tick.
    Settled,
    /// Resting and counting down.
    Waiting,
    /// Countdown finished; call [`Egg::hatch`] unless it was collected.
    Ripe,
    /// Sank into the lava. The egg is now inactive.
    Lost,
}

/// A defeated enemy waiting to hatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Egg {
    pub id: EntityId,
    /// Archetype of the enemy that laid it.
    pub archetype: Archetype,
    pub body: Body,
    /// Grounded ticks left before hatching.
    pub lifetime: u32,
    pub bounces: u32,
    pub on_ground: bool,
}

impl Egg {
    /// Laid at the defeated enemy's position, already falling.
    pub fn lay(id: EntityId, archetype: Archetype, x: f32, y: f32, cfg: &EggConfig) -> Self {
        let mut body = Body::new(x, y, cfg.width, cfg.height);
        body.vy = cfg.initial_fall_speed;
        Self {
            id,
            archetype,
            body,
            lifetime: cfg.lifetime.max(1),
            bounces: 0,
            on_ground: false,
        }
    }

    /// Archetype of the enemy this egg hatches into.
    pub fn hatches_into(&self) -> Archetype {
        self.archetype.hatches_into()
    }

    /// Deactivate and return the archetype to spawn in its place.
    pub fn hatch(&mut self) -> Archetype {
        self.body.deactivate();
        self.hatches_into()
    }

    pub fn tick(
        &mut self,
        platforms: &[Platform],
        physics: &PhysicsConfig,
        cfg: &EggConfig,
        screen: &ScreenConfig,
    ) -> EggTick {
        if self.on_ground {
            if collision::is_supported(&self.body, platforms) {
                self.lifetime = self.lifetime.saturating_sub(1);
                if self.lifetime == 0 {
                    return EggTick::Ripe;
                }
                return EggTick::Waiting;
            }
            // The floor under it went away.
            self.on_ground = false;
        }

        self.body.begin_tick();
        physics::apply_gravity(&mut self.body, physics, cfg.gravity_factor);
        physics::integrate(&mut self.body, physics, screen.width);

        if self.body.bottom() > screen.lava_y {
            self.body.deactivate();
            return EggTick::Lost;
        }

        match collision::resolve_egg_contact(
            &mut self.body,
            &mut self.bounces,
            platforms,
            physics,
            cfg,
        ) {
            EggContact::None => EggTick::Airborne,
            EggContact::Bounced => EggTick::Bounced,
            EggContact::Settled => {
                self.on_ground = true;
                EggTick::Settled
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct World {
        platforms: Vec<Platform>,
        physics: PhysicsConfig,
        egg: EggConfig,
        screen: ScreenConfig,
    }

    fn world() -> World {
        World {
            platforms: vec![Platform::new(0.0, 300.0, 400.0, 20)],
            physics: PhysicsConfig::default(),
            egg: EggConfig::default(),
            screen: ScreenConfig::default(),
        }
    }

    fn tick(egg: &mut Egg, w: &World) -> EggTick {
        egg.tick(&w.platforms, &w.physics, &w.egg, &w.screen)
    }

    fn settle(egg: &mut Egg, w: &World) {
        for _ in 0..500 {
            if tick(egg, w) == EggTick::Settled {
                return;
            }
        }
        panic!("egg never settled");
    }

    #[test]
    fn falls_bounces_twice_and_settles_on_top() {
        let w = world();
        let mut egg = Egg::lay(1, Archetype::Bounder, 100.0, 150.0, &w.egg);
        let mut bounces = 0;
        for _ in 0..500 {
            match tick(&mut egg, &w) {
                EggTick::Bounced => bounces += 1,
                EggTick::Settled => break,
                EggTick::Airborne => {},
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(bounces, 2);
        assert!(egg.on_ground);
        assert_eq!(egg.body.vy, 0.0);
        assert_eq!(egg.body.rect().bottom(), 300);
    }

    #[test]
    fn grounded_egg_hatches_after_its_lifetime() {
        let w = world();
        let mut egg = Egg::lay(1, Archetype::Hunter, 100.0, 150.0, &w.egg);
        settle(&mut egg, &w);
        let position = (egg.body.x, egg.body.y);
        assert_eq!(egg.lifetime, 625);

        for _ in 0..624 {
            assert_eq!(tick(&mut egg, &w), EggTick::Waiting);
        }
        assert_eq!(tick(&mut egg, &w), EggTick::Ripe);
        assert!(egg.body.active, "collection still wins on the ripe tick");
        assert_eq!(egg.hatch(), Archetype::ShadowLord);
        assert!(!egg.body.active);
        assert_eq!((egg.body.x, egg.body.y), position, "hatches where it rests");
    }

    #[test]
    fn lifetime_only_counts_while_grounded() {
        let w = world();
        let mut egg = Egg::lay(1, Archetype::Bounder, 100.0, 0.0, &w.egg);
        while tick(&mut egg, &w) != EggTick::Settled {}
        assert_eq!(egg.lifetime, 625);
    }

    #[test]
    fn egg_over_the_pit_is_lost() {
        let w = world();
        let mut egg = Egg::lay(1, Archetype::Bounder, 900.0, 500.0, &w.egg);
        let mut outcome = EggTick::Airborne;
        for _ in 0..200 {
            outcome = tick(&mut egg, &w);
            if outcome == EggTick::Lost {
                break;
            }
        }
        assert_eq!(outcome, EggTick::Lost);
        assert!(!egg.body.active);
    }

    #[test]
    fn resting_egg_falls_when_unsupported() {
        let mut w = world();
        let mut egg = Egg::lay(1, Archetype::Bounder, 100.0, 150.0, &w.egg);
        settle(&mut egg, &w);
        w.platforms.clear();
        assert_eq!(tick(&mut egg, &w), EggTick::Airborne);
        assert!(!egg.on_ground);
    }
}
