//! Fifteen entry point
//!
//! Headless demo: starts the game loop, plays random taps from the input
//! thread for a few seconds and prints the resulting board.
//!
//! Usage: `fifteen [settings.json]`

use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use fifteen::sim::{Direction, Game, GameSnapshot};
use fifteen::{GameLoop, Leaderboard, Settings, SharedGame, cell_position, format_time};

/// Taps attempted by the demo
const DEMO_TAPS: u32 = 200;
const TAP_INTERVAL: Duration = Duration::from_millis(20);

fn main() {
    env_logger::init();
    log::info!("Fifteen (native) starting...");

    let settings = std::env::args()
        .nth(1)
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let game = match Game::from_settings(&settings, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot start game: {}", e);
            std::process::exit(1);
        }
    };
    let shared = SharedGame::new(game);
    shared.with(|g| {
        g.on_solved(|record| {
            log::info!("Puzzle solved: {} moves in {}", record.moves, format_time(record.time()));
        })
    });

    let mut game_loop = GameLoop::from_settings(shared.clone(), &settings);
    let started = game_loop.start(|snapshot: &GameSnapshot, elapsed, info| {
        log::trace!(
            "frame +{:?}: {} moves, {}{}",
            elapsed,
            snapshot.moves,
            format_time(snapshot.elapsed),
            info.map(|i| format!(" [{i}]")).unwrap_or_default()
        );
    });
    if let Err(e) = started {
        log::error!("{}", e);
        std::process::exit(1);
    }

    // Input context: random taps on the board
    let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let size = settings.width * settings.height;
    for _ in 0..DEMO_TAPS {
        let cell = rng.random_range(0..size);
        let point = cell_position(cell, settings.width) + Vec2::splat(0.5);
        if !shared.apply_move(point, Direction::Toward) && shared.lock().is_solved() {
            break;
        }
        thread::sleep(TAP_INTERVAL);
    }

    game_loop.stop();

    let snapshot = shared.snapshot();
    for row in snapshot.cells.chunks(snapshot.width) {
        let line: Vec<String> = row
            .iter()
            .map(|&v| if v == 0 { "  .".to_string() } else { format!("{v:3}") })
            .collect();
        println!("{}", line.join(""));
    }
    println!(
        "{:?}: {} moves in {}",
        snapshot.phase,
        snapshot.moves,
        format_time(snapshot.elapsed)
    );

    if let Some(record) = shared.lock().record() {
        let mut leaderboard = Leaderboard::new();
        if let Some(rank) = leaderboard.add(record) {
            println!("Leaderboard rank #{rank}");
        }
    }
}
