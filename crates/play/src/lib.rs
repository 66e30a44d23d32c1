//! Keyboard-driven player for pixel environments exposing reset/step.

pub mod app;

pub use app::{
    normalize, play, resolve_env_flag, resolve_env_override, run_in_window, ActionTable, BoxSpace,
    ConfigurationError, DisplayError, DisplayFrame, EnvError, EnvOperation, Environment,
    FrameSize, Frontend, Info, InputEvent, JoypadBindings, JoypadButton, Key, KeySet,
    KeysToAction, LoopConfig, LoopMetricsSnapshot, LoopState, Observation, ObservationError,
    ObservationSpace, PlayError, PlaySession, StepCallback, StepOutcome, StepRecord,
    WindowFrontend, BUTTON_COUNT, FPS_ENV_VAR, JOYPAD_NO_OP, MAX_WINDOW_SCALE, TRANSPOSE_ENV_VAR,
    WINDOW_SCALE_ENV_VAR,
};
