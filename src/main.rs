/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use log::{info, warn};

use config::GameConfig;
use sim::scores;
use sim::world::WorldState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
/// Cap on ticks replayed after a stall, so the game never fast-forwards.
const MAX_CATCH_UP: u32 = 5;

fn main() {
    let (config, problems) = GameConfig::load();
    init_logging(&config);
    for problem in &problems {
        warn!("{}", problem);
        eprintln!("Warning: {problem}");
    }
    info!("pyramid-hop {} starting, tick {} ms", env!("CARGO_PKG_VERSION"), config.speed.tick_rate_ms);

    let mut world = WorldState::new(scores::data_path(&config.scores_file), config.seed);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.audio_enabled { SoundEngine::new() } else { None };

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        warn!("game loop ended with error: {}", e);
        eprintln!("Game error: {e}");
    }

    info!("session over");
    println!("Thanks for playing Pyramid Hop!");
    if let Some(best) = world.scores.best() {
        println!("Best score: {best}");
    }
}

/// Log to a file: the terminal belongs to the renderer. `RUST_LOG` wins
/// over the configured level.
fn init_logging(config: &GameConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    let path = scores::data_path(&config.log_file);
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let mut kb = InputState::new();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let dt = config.speed.dt();
    let mut last_tick = Instant::now();

    while !world.quit {
        let intents = kb.drain_events().to_vec();
        for intent in intents {
            let events = world.apply(intent);
            sound::play_events(sound, &events);
            if world.quit { break; }
        }

        let mut ticks = 0;
        while last_tick.elapsed() >= tick_rate && ticks < MAX_CATCH_UP {
            let events = world.tick(dt);
            sound::play_events(sound, &events);
            last_tick += tick_rate;
            ticks += 1;
        }
        if ticks == MAX_CATCH_UP {
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
