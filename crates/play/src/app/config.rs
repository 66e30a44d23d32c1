use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use super::rendering::FrameSize;

pub const FPS_ENV_VAR: &str = "PLAY_FPS";
pub const TRANSPOSE_ENV_VAR: &str = "PLAY_TRANSPOSE";
pub const WINDOW_SCALE_ENV_VAR: &str = "PLAY_WINDOW_SCALE";
/// Largest accepted window scale; bigger values are clamped.
pub const MAX_WINDOW_SCALE: u32 = 16;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Target cycles per second; 0 disables pacing.
    pub fps: u32,
    pub transpose: bool,
    pub window_scale: u32,
    /// Display size; derived from the observation space when unset.
    pub video_size: Option<FrameSize>,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "nes-py".to_string(),
            fps: 30,
            transpose: false,
            window_scale: 3,
            video_size: None,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

impl LoopConfig {
    pub fn with_env_overrides(self) -> Self {
        Self {
            fps: resolve_env_override(FPS_ENV_VAR, self.fps),
            transpose: resolve_env_flag(TRANSPOSE_ENV_VAR, self.transpose),
            window_scale: clamp_window_scale(resolve_env_override(
                WINDOW_SCALE_ENV_VAR,
                self.window_scale,
            )),
            ..self
        }
    }
}

pub fn resolve_env_override<T>(env_var: &'static str, fallback: T) -> T
where
    T: FromStr,
{
    match env::var(env_var) {
        Ok(value) => parse_override(env_var, &value).unwrap_or(fallback),
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "unable to read env var; falling back to config"
            );
            fallback
        }
    }
}

/// Accepts `1/0`, `true/false`, `yes/no` and `on/off`.
pub fn resolve_env_flag(env_var: &'static str, fallback: bool) -> bool {
    match env::var(env_var) {
        Ok(value) => parse_flag(&value).unwrap_or_else(|| {
            warn!(
                env_var,
                value = value.as_str(),
                "invalid flag env var value; falling back to config"
            );
            fallback
        }),
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "unable to read env var; falling back to config"
            );
            fallback
        }
    }
}

/// Keeps a window scale within `1..=MAX_WINDOW_SCALE`.
pub(crate) fn clamp_window_scale(scale: u32) -> u32 {
    let clamped = scale.clamp(1, MAX_WINDOW_SCALE);
    if clamped != scale {
        warn!(
            requested = scale,
            clamped,
            max = MAX_WINDOW_SCALE,
            "window scale out of range; clamping"
        );
    }
    clamped
}

fn parse_override<T: FromStr>(env_var: &'static str, value: &str) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                env_var,
                value, "invalid env var value; falling back to config"
            );
            None
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
