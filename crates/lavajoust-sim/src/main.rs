use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lavajoust_arena::LavaArena;
use lavajoust_arena::autopilot;
use lavajoust_arena::config::ArenaConfig;
use lavajoust_arena::waves::WaveDirector;
use lavajoust_core::events::GameEvent;
use lavajoust_core::game_trait::ArenaGame;
use lavajoust_core::sound::SoundQueue;

#[derive(Debug, Serialize)]
struct RiderSummary {
    player_id: u64,
    score: u32,
    lives: u32,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    wave: u32,
    game_over: bool,
    riders: Vec<RiderSummary>,
    sounds: BTreeMap<&'static str, u32>,
}

/// Value of a `--name=value` argument, anywhere on the command line.
fn arg<T: std::str::FromStr>(prefix: &str) -> Option<T> {
    std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix(prefix).map(String::from))
        .and_then(|v| v.parse::<T>().ok())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = ArenaConfig::load();
    if let Some(seed) = arg::<u64>("--seed=") {
        config.seed = seed;
    }
    let ticks = arg::<u64>("--ticks=").unwrap_or(60 * 60 * 5);
    let players = arg::<usize>("--players=").unwrap_or(1);
    let json = std::env::args().any(|a| a == "--json");
    let seed = config.seed;

    let sounds = Rc::new(RefCell::new(SoundQueue::new()));
    let mut director = WaveDirector::new(&config.waves);
    let mut arena = LavaArena::new(config).with_sound(Box::new(Rc::clone(&sounds)));
    arena.reset(players);

    tracing::info!(seed, ticks, players, "Lava Joust simulation starting");

    let mut sound_counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut ran = 0;
    while ran < ticks {
        let keys = autopilot::drive_all(&arena);
        let mut events = arena.update(&keys);
        events.extend(director.tick(&mut arena));
        ran += 1;

        for cue in sounds.borrow_mut().drain() {
            *sound_counts.entry(cue.name()).or_default() += 1;
        }
        if json {
            for event in &events {
                match serde_json::to_string(event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "Failed to encode event"),
                }
            }
        }
        if events.contains(&GameEvent::GameOver) {
            break;
        }
    }

    let summary = Summary {
        seed,
        ticks: ran,
        wave: director.wave(),
        game_over: arena.is_game_over(),
        riders: arena
            .riders()
            .iter()
            .map(|r| RiderSummary {
                player_id: r.id,
                score: r.score,
                lives: r.lives,
            })
            .collect(),
        sounds: sound_counts,
    };

    if json {
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode summary"),
        }
        return;
    }

    println!(
        "seed {} | {} ticks | reached wave {}{}",
        summary.seed,
        summary.ticks,
        summary.wave,
        if summary.game_over { " | game over" } else { "" }
    );
    for r in &summary.riders {
        println!("  player {}: {} points, {} lives", r.player_id, r.score, r.lives);
    }
    for (name, n) in &summary.sounds {
        println!("  {name}: {n}");
    }
}
