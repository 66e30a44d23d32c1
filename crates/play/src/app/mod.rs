mod actions;
mod config;
mod env;
mod frontend;
mod input;
mod joypad;
mod loop_runner;
mod metrics;
mod rendering;
mod session;

pub use actions::{ActionTable, KeysToAction};
pub use config::{
    resolve_env_flag, resolve_env_override, LoopConfig, FPS_ENV_VAR, MAX_WINDOW_SCALE,
    TRANSPOSE_ENV_VAR, WINDOW_SCALE_ENV_VAR,
};
pub use env::{
    BoxSpace, EnvError, Environment, Info, Observation, ObservationError, ObservationSpace,
    StepOutcome, StepRecord,
};
pub use frontend::{DisplayError, Frontend};
pub use input::{InputEvent, Key, KeySet};
pub use joypad::{JoypadBindings, JoypadButton, BUTTON_COUNT, JOYPAD_NO_OP};
pub use loop_runner::{play, run_in_window};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{normalize, DisplayFrame, FrameSize, WindowFrontend};
pub use session::{
    ConfigurationError, EnvOperation, LoopState, PlayError, PlaySession, StepCallback,
};
