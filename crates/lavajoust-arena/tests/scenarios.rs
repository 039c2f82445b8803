//! End-to-end scenarios driven through `LavaArena::update`.

#[allow(dead_code)]
mod common;

use lavajoust_arena::LavaArena;
use lavajoust_arena::config::ArenaConfig;
use lavajoust_arena::enemy::Temperament;
use lavajoust_arena::player::LifeState;
use lavajoust_core::events::{Archetype, DeathCause, GameEvent};
use lavajoust_core::game_trait::ArenaGame;
use lavajoust_core::test_helpers::run_idle_ticks;

use common::{count, freeze_enemy_timers, idle, place_rider, still_arena};

#[test]
fn rider_above_enemy_unseats_it() {
    let mut cfg = ArenaConfig::default();
    cfg.enemies.bounder.height = 120;
    let mut game = still_arena(cfg);

    // Rider bottom 100. Enemy center 150, clipping the rider's left edge
    // so the egg drops clear of the rider.
    place_rider(&mut game, 0, 600.0, 36.0);
    let enemy_id = game.spawn_enemy_at(Archetype::Bounder, 545.0, 90.0);
    freeze_enemy_timers(&mut game);

    let events = idle(&mut game);
    assert!(events.contains(&GameEvent::EnemyDefeated {
        player_id: 1,
        enemy_id,
        archetype: Archetype::Bounder,
        points: 250,
    }));
    assert_eq!(game.enemy_count(), 0);
    assert_eq!(game.egg_count(), 1);
    assert_eq!(game.eggs()[0].archetype, Archetype::Bounder);
    assert_eq!(game.riders()[0].score, 250);
    assert!(events.contains(&GameEvent::ScoreUpdate {
        player_id: 1,
        score: 250,
    }));
}

#[test]
fn enemy_above_rider_kills_it() {
    let mut game = still_arena(ArenaConfig::default());
    place_rider(&mut game, 0, 600.0, 100.0);
    game.spawn_enemy_at(Archetype::Hunter, 610.0, 50.0);
    freeze_enemy_timers(&mut game);

    let events = idle(&mut game);
    assert!(events.contains(&GameEvent::PlayerDied {
        player_id: 1,
        cause: DeathCause::Joust,
        lives_left: 2,
    }));
    assert!(game.riders()[0].is_respawning());
    assert_eq!(game.enemy_count(), 1);
}

#[test]
fn grounded_egg_hatches_in_place_after_its_lifetime() {
    let mut game = LavaArena::new(ArenaConfig::default());
    // Rider parked on the top-left ledge, well away from the egg.
    place_rider(&mut game, 0, 150.0, 100.0);
    let egg_id = game.lay_egg_at(Archetype::Bounder, 1000.0, 400.0);

    while !game.eggs()[0].on_ground {
        idle(&mut game);
    }
    let rest_x = game.eggs()[0].body.x;
    let rest_bottom = game.eggs()[0].body.bottom();
    assert_eq!(game.eggs()[0].lifetime, 625);

    let events = run_idle_ticks(&mut game, 624);
    assert!(count(&events, |e| matches!(e, GameEvent::EggHatched { .. })) == 0);
    assert_eq!(game.eggs()[0].lifetime, 1);

    let events = idle(&mut game);
    let hatched = events.iter().find_map(|e| match e {
        GameEvent::EggHatched {
            egg_id: id,
            enemy_id,
            archetype,
        } if *id == egg_id => Some((*enemy_id, *archetype)),
        _ => None,
    });
    let (enemy_id, archetype) = hatched.expect("egg should hatch on its last tick");
    assert_eq!(archetype, Archetype::Hunter);
    assert_eq!(game.egg_count(), 0);

    let enemy = &game.enemies()[0];
    assert_eq!(enemy.id, enemy_id);
    // The taller enemy stands on the same ledge the egg rested on.
    assert_eq!(enemy.body.x, rest_x);
    assert_eq!(enemy.body.bottom(), rest_bottom);
    assert!(enemy.body.height > game.config().egg.height);
}

#[test]
fn invincible_rider_survives_contact_from_any_side() {
    let mut game = still_arena(ArenaConfig::default());
    place_rider(&mut game, 0, 600.0, 200.0);
    game.spawn_enemy_at(Archetype::ShadowLord, 600.0, 140.0);
    game.spawn_enemy_at(Archetype::Hunter, 600.0, 260.0);
    game.spawn_enemy_at(Archetype::Bounder, 560.0, 200.0);
    freeze_enemy_timers(&mut game);

    for _ in 0..200 {
        game.riders_mut()[0].invincibility = 10_000;
        let events = idle(&mut game);
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::PlayerDied { .. })),
            0
        );
        assert_eq!(game.riders()[0].state, LifeState::Alive);
    }
    assert_eq!(game.riders()[0].lives, 3);
}

#[test]
fn invincible_rider_is_bounced_off_the_lava() {
    let mut game = LavaArena::new(ArenaConfig::default());
    // Over the pit between floor sections on wave 2.
    game.begin_wave(2, lavajoust_arena::waves::WaveCounts {
        bounders: 0,
        hunters: 0,
        shadow_lords: 0,
    });
    place_rider(&mut game, 0, 610.0, 630.0);
    game.riders_mut()[0].body.vy = 5.0;
    game.riders_mut()[0].invincibility = 50;

    let events = idle(&mut game);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. })));
    assert!(game.riders()[0].body.vy < 0.0);
}

#[test]
fn last_life_lost_ends_the_game_once() {
    let mut game = still_arena(ArenaConfig::default());
    game.riders_mut()[0].lives = 1;
    place_rider(&mut game, 0, 600.0, 100.0);
    game.spawn_enemy_at(Archetype::Hunter, 610.0, 50.0);
    freeze_enemy_timers(&mut game);

    let mut events = idle(&mut game);
    events.extend(run_idle_ticks(&mut game, 200));
    assert_eq!(count(&events, |e| *e == GameEvent::GameOver), 1);
    assert!(game.is_game_over());
    assert_eq!(game.active_player_count(), 0);
    assert_eq!(game.riders()[0].state, LifeState::Eliminated);
}

#[test]
fn special_flyer_falls_to_a_mouth_strike() {
    let mut game = still_arena(ArenaConfig::default());
    game.spawn_special_flyer();
    let flyer = game.special_flyer_mut().expect("flyer spawned");
    flyer.body.x = 600.0;
    flyer.body.y = 300.0;
    flyer.body.prev_y = 300.0;
    flyer.body.vx = 0.0;
    flyer.body.vy = 0.0;
    flyer.body.facing_right = true;
    // The flyer climbs toward the rider this tick and ends with its mouth
    // at x 667..687, y 319..339. The rider's feet come down at 325.
    place_rider(&mut game, 0, 640.0, 261.0);

    let events = idle(&mut game);
    assert!(
        events.contains(&GameEvent::SpecialFlyerDefeated {
            player_id: 1,
            points: 1000,
        }),
        "events: {events:?}"
    );
    assert!(game.special_flyer().is_none());
    assert_eq!(game.riders()[0].score, 1000);
    assert!(game.riders()[0].is_alive());
}

#[test]
fn special_flyer_kills_on_body_contact() {
    let mut game = still_arena(ArenaConfig::default());
    game.spawn_special_flyer();
    let flyer = game.special_flyer_mut().expect("flyer spawned");
    flyer.body.x = 600.0;
    flyer.body.y = 300.0;
    flyer.body.prev_y = 300.0;
    flyer.body.vx = 0.0;
    flyer.body.vy = 0.0;
    // Level with the flyer: never a strike from above.
    place_rider(&mut game, 0, 620.0, 300.0);

    let events = idle(&mut game);
    assert!(events.contains(&GameEvent::PlayerDied {
        player_id: 1,
        cause: DeathCause::SpecialFlyer,
        lives_left: 2,
    }));
    assert!(game.special_flyer().is_some());
}

#[test]
fn invincible_rider_survives_special_flyer_body_contact() {
    let mut game = still_arena(ArenaConfig::default());
    game.spawn_special_flyer();
    let flyer = game.special_flyer_mut().expect("flyer spawned");
    flyer.body.x = 600.0;
    flyer.body.y = 300.0;
    flyer.body.prev_y = 300.0;
    flyer.body.vx = 0.0;
    flyer.body.vy = 0.0;
    place_rider(&mut game, 0, 620.0, 300.0);
    game.riders_mut()[0].invincibility = 100;

    let events = idle(&mut game);
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::PlayerDied { .. })),
        0
    );
    assert!(game.riders()[0].is_alive());
    assert_eq!(game.riders()[0].lives, 3);
    assert!(game.special_flyer().is_some());
}

#[test]
fn shadow_lord_dash_is_held_to_the_speed_cap() {
    let cfg = ArenaConfig::default();
    let cap = cfg.physics.max_horizontal_speed;
    let dash = cfg.enemies.shadow_lord.speed * cfg.ai.dash_multiplier;
    assert!(dash > cap);

    let mut game = still_arena(cfg);
    place_rider(&mut game, 0, 100.0, 100.0);
    // A fresh shadow lord dashes on its first tick; failed sign rolls send
    // it left.
    game.spawn_enemy_at(Archetype::ShadowLord, 600.0, 150.0);

    idle(&mut game);
    let enemy = &game.enemies()[0];
    assert_eq!(enemy.body.vx, -cap);
    assert_eq!(enemy.body.x, 600.0 - cap);
    assert!(matches!(
        enemy.temperament,
        Temperament::ShadowLord { dash_timer, .. } if dash_timer > 0
    ));
}

#[test]
fn extra_life_at_score_threshold() {
    let mut cfg = ArenaConfig::default();
    cfg.player.extra_life_score = 1000;
    let mut game = still_arena(cfg);
    game.riders_mut()[0].score = 900;
    let events = game.award_bonus(200);
    assert!(events.contains(&GameEvent::ExtraLife {
        player_id: 1,
        lives: 4,
    }));
}

#[test]
fn two_riders_are_told_apart() {
    let mut game = LavaArena::new(ArenaConfig::default());
    game.reset(2);
    let ids: Vec<_> = game.riders().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_ne!(game.riders()[0].binding, game.riders()[1].binding);
}
