use play::{resolve_env_flag, resolve_env_override, LoopConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::playfield::Playfield;
use super::step_limit::StepLimit;

const GRAYSCALE_ENV_VAR: &str = "PLAY_GRAYSCALE";
const MAX_STEPS_ENV_VAR: &str = "PLAY_MAX_STEPS";
const DEFAULT_MAX_STEPS: u64 = 3_600;

pub(crate) type DemoEnv = StepLimit<Playfield>;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) env: DemoEnv,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== nes-py player startup ===");

    let grayscale = resolve_env_flag(GRAYSCALE_ENV_VAR, false);
    let max_steps = resolve_env_override(MAX_STEPS_ENV_VAR, DEFAULT_MAX_STEPS);
    info!(grayscale, max_steps, "demo_environment");

    AppWiring {
        config: LoopConfig::default().with_env_overrides(),
        env: StepLimit::new(Playfield::new(grayscale), max_steps),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
