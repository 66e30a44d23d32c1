use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use super::config::LoopConfig;
use super::env::Environment;
use super::rendering::WindowFrontend;
use super::session::{PlayError, PlaySession};

/// Opens a window sized for `session` and plays until quit.
///
/// Configuration problems are reported by `PlaySession::new`, before any
/// window exists.
pub fn run_in_window<E: Environment>(session: &mut PlaySession<E>) -> Result<(), PlayError> {
    let config = session.config();
    let mut frontend =
        WindowFrontend::new(&config.window_title, session.video_size(), config.window_scale)?;
    session.run(&mut frontend)
}

/// Plays `env` in a window with the given configuration and no observer.
pub fn play<E: Environment>(env: E, config: LoopConfig, no_op: E::Action) -> Result<(), PlayError> {
    let mut session = PlaySession::new(env, config, no_op)?;
    run_in_window(&mut session)
}

/// Sleeps out the remainder of each frame interval. No catch-up: a cycle that
/// overruns its budget is followed immediately by the next one.
#[derive(Debug)]
pub(crate) struct FrameClock {
    frame_target: Option<Duration>,
    cycle_start: Instant,
}

impl FrameClock {
    pub(crate) fn new(fps: u32) -> Self {
        let effective_fps = normalize_fps(fps);
        info!(fps = %format_fps(effective_fps), "frame_pacing");
        Self {
            frame_target: target_frame_duration(effective_fps),
            cycle_start: Instant::now(),
        }
    }

    pub(crate) fn begin_cycle(&mut self) {
        self.cycle_start = Instant::now();
    }

    pub(crate) fn wait_for_next_cycle(&self) {
        let elapsed = Instant::now().saturating_duration_since(self.cycle_start);
        let sleep = compute_cap_sleep(elapsed, self.frame_target);
        if sleep > Duration::ZERO {
            thread::sleep(sleep);
        }
    }
}

fn normalize_fps(fps: u32) -> Option<u32> {
    Some(fps).filter(|value| *value > 0)
}

fn target_frame_duration(fps: Option<u32>) -> Option<Duration> {
    fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_fps(fps: Option<u32>) -> String {
    match fps {
        Some(value) => value.to_string(),
        None => "unpaced".to_string(),
    }
}
