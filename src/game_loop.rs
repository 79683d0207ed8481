//! Fixed-cadence game loop
//!
//! Runs on its own thread, separate from whatever delivers input. Each
//! iteration measures the time since the previous one, ticks the session,
//! advances tile animations and hands a snapshot to the redraw callback.
//! Input and loop share the session through `SharedGame`; every mutation and
//! every snapshot happens under its lock, and drawing happens after release.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::error::{ConfigError, LoopError};
use crate::settings::Settings;
use crate::sim::{Direction, Game, GameSnapshot};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// A game session shared between the input context and the loop thread
#[derive(Debug, Clone)]
pub struct SharedGame(Arc<Mutex<Game>>);

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self(Arc::new(Mutex::new(game)))
    }

    /// Exclusive access to the session.
    ///
    /// Solve observers run under this lock and must not lock again.
    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn apply_move(&self, point: Vec2, direction: Direction) -> bool {
        self.lock().apply_move(point, direction)
    }

    pub fn new_game(&self, width: usize, height: usize, hard_mode: bool) -> Result<(), ConfigError> {
        self.lock().new_game(width, height, hard_mode)
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock().set_paused(paused);
    }

    pub fn invert_paused(&self) {
        self.lock().invert_paused();
    }

    /// One frame under the lock: clock, animations, snapshot
    pub fn step(&self, dt: Duration) -> GameSnapshot {
        self.lock().step(dt)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }
}

/// Rolling frames-per-second estimate
#[derive(Debug, Clone)]
struct FpsCounter {
    frame_times: VecDeque<Instant>,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    fn record(&mut self, now: Instant) {
        if self.frame_times.len() == FPS_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(now);
    }

    fn fps(&self) -> Option<u32> {
        let (oldest, newest) = (self.frame_times.front()?, self.frame_times.back()?);
        let span = newest.duration_since(*oldest).as_secs_f64();
        (span > 0.0).then(|| ((self.frame_times.len() - 1) as f64 / span).round() as u32)
    }
}

/// Driver thread for a `SharedGame`
#[derive(Debug)]
pub struct GameLoop {
    game: SharedGame,
    frame_interval: Duration,
    show_fps: bool,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GameLoop {
    pub fn new(game: SharedGame, frame_interval: Duration) -> Self {
        Self {
            game,
            frame_interval,
            show_fps: false,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn from_settings(game: SharedGame, settings: &Settings) -> Self {
        Self::new(game, settings.frame_interval()).with_fps(settings.show_fps)
    }

    /// Pass an FPS readout as diagnostic text
    pub fn with_fps(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;
        self
    }

    #[inline]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Acquire)
    }

    /// Start ticking; `redraw` receives each frame's snapshot, the elapsed
    /// delta and optional diagnostic text.
    pub fn start<F>(&mut self, redraw: F) -> Result<(), LoopError>
    where
        F: FnMut(&GameSnapshot, Duration, Option<&str>) + Send + 'static,
    {
        if self.handle.is_some() {
            return Err(LoopError::AlreadyRunning);
        }

        self.running.store(true, Ordering::Release);
        let game = self.game.clone();
        let running = self.running.clone();
        let frame_interval = self.frame_interval;
        let show_fps = self.show_fps;

        let spawned = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || run(game, running, frame_interval, show_fps, redraw));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                log::info!("Game loop started ({:?} per frame)", frame_interval);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(LoopError::Spawn(e))
            }
        }
    }

    /// Stop ticking and join the thread. Safe to call when not running.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Game loop thread panicked");
            } else {
                log::info!("Game loop stopped");
            }
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<F>(game: SharedGame, running: Arc<AtomicBool>, frame_interval: Duration, show_fps: bool, mut redraw: F)
where
    F: FnMut(&GameSnapshot, Duration, Option<&str>),
{
    let mut fps = show_fps.then(FpsCounter::new);
    let mut last = Instant::now();

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();
        let elapsed = frame_start.duration_since(last);
        last = frame_start;

        let snapshot = game.step(elapsed);

        let info = fps.as_mut().and_then(|counter| {
            counter.record(frame_start);
            counter.fps().map(|f| format!("{f} fps"))
        });
        redraw(&snapshot, elapsed, info.as_deref());

        if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}
