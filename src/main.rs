//! Motorway entry point
//!
//! Headless runner: drives the simulation with a simple autopilot, routes
//! cues to a logging sink and can print one JSON frame per tick for an
//! external renderer.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use motorway::audio::{CueRouter, LogSink};
use motorway::clock::FixedClock;
use motorway::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use motorway::sim::{Command, GameState, Rect, tick};
use motorway::{AudioSettings, SimError, Tuning};

/// Ticks of vehicle travel the autopilot keeps clear of
const LOOKAHEAD_TICKS: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(name = "motorway", version, about = "Headless dodge-the-traffic simulation")]
struct Args {
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Ticks to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: f32,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: f32,
    /// JSON tuning file (defaults are used for missing fields)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print a JSON snapshot after every tick
    #[arg(long)]
    json: bool,
    /// Run at the nominal tick rate instead of as fast as possible
    #[arg(long)]
    realtime: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Motorway (headless) starting...");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("motorway: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::from_path(path)?,
        None => Tuning::default(),
    };
    let mut state = GameState::new(args.seed, args.width, args.height, tuning)?;
    let mut router = CueRouter::new(AudioSettings::default(), LogSink);
    let mut clock = FixedClock::default();
    let mut last = Instant::now();

    while state.time_ticks < args.ticks {
        let due = if args.realtime {
            // The only wait in the loop: sleep to the next tick boundary
            std::thread::sleep(clock.until_next());
            let now = Instant::now();
            let due = clock.advance(now - last);
            last = now;
            due
        } else {
            1
        };

        for _ in 0..due {
            if let Some(command) = autopilot(&state) {
                state.submit(command);
            }
            tick(&mut state);
            router.handle(&state.drain_events());
            if args.json {
                println!("{}", serde_json::to_string(&state.snapshot())?);
            }
        }
    }

    let progress = state.progress();
    log::info!(
        "Finished {} ticks: level {} score {} lives {}",
        state.time_ticks,
        progress.level,
        progress.score,
        progress.lives
    );
    Ok(())
}

/// Demo player: step toward the goal when the next row is clear, back off
/// when the current row is about to be hit, restart after game over.
fn autopilot(state: &GameState) -> Option<Command> {
    if state.progression.game_over {
        return Some(Command::RestartCheckpoint);
    }
    let player = state.player();
    if !player.alive {
        return None;
    }

    let grid = state.world.grid;
    let row_clear = |y: f32| {
        let cell = Rect::new(player.pos.x, y, grid, grid);
        state
            .vehicles()
            .iter()
            .filter(|v| (v.lane_y - y).abs() < 0.5)
            .all(|v| {
                // Box covering where the vehicle will be over the lookahead
                let sweep = v.speed * LOOKAHEAD_TICKS;
                let swept = if sweep > 0.0 {
                    Rect::new(v.x, y, v.length + sweep, grid)
                } else {
                    Rect::new(v.x + sweep, y, v.length - sweep, grid)
                };
                !swept.intersects(&cell)
            })
    };

    let (up, here, down) = (player.pos.y - grid, player.pos.y, player.pos.y + grid);
    if row_clear(up) {
        Some(Command::Move { dx: 0, dy: -1 })
    } else if !row_clear(here) && down < state.world.height && row_clear(down) {
        Some(Command::Move { dx: 0, dy: 1 })
    } else {
        None
    }
}
