use std::fmt;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use super::actions::ActionTable;
use super::config::LoopConfig;
use super::env::{is_pixel_shape, EnvError, Environment, Observation, ObservationSpace, StepRecord};
use super::frontend::{DisplayError, DisplayLease, Frontend};
use super::input::{InputEvent, KeyInput, KeySet};
use super::loop_runner::FrameClock;
use super::metrics::MetricsAccumulator;
use super::rendering::{normalize, FrameSize};


/// Observer called once after every completed step.
pub type StepCallback<A> = Box<dyn FnMut(&StepRecord<'_, A>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Resetting,
    Stepping,
    Stopped,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("observation space is not a pixel box: {space:?}")]
    NotPixelBox { space: ObservationSpace },
    #[error("observation space shape {shape:?} is not HxW, HxWx1 or HxWx3")]
    UnsupportedShape { shape: Vec<usize> },
    #[error("environment exposes no key-to-action mapping, directly or unwrapped")]
    MissingKeysToAction,
    #[error("video size {width}x{height} has no pixels")]
    EmptyVideoSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvOperation {
    Reset,
    Step,
}

impl fmt::Display for EnvOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvOperation::Reset => f.write_str("reset"),
            EnvOperation::Step => f.write_str("step"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlayError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("environment {operation} failed: {source}")]
    Environment {
        operation: EnvOperation,
        #[source]
        source: EnvError,
    },
}

fn env_failure(operation: EnvOperation) -> impl FnOnce(EnvError) -> PlayError {
    move |source| PlayError::Environment { operation, source }
}

/// Drives one environment from keyboard input until quit.
///
/// Each cycle runs in a fixed order: reset or step the environment, render
/// the latest observation, drain input events, present. `run` adds frame
/// pacing between cycles and owns the display for the session.
pub struct PlaySession<E: Environment> {
    env: E,
    config: LoopConfig,
    actions: ActionTable<E::Action>,
    keys: KeySet,
    state: LoopState,
    last_observation: Option<Observation>,
    video_size: FrameSize,
    callback: Option<StepCallback<E::Action>>,
    pending_events: Vec<InputEvent>,
    episode: u64,
    metrics: MetricsAccumulator,
}

impl<E: Environment> PlaySession<E> {
    pub fn new(env: E, config: LoopConfig, no_op: E::Action) -> Result<Self, ConfigurationError> {
        let space = env.observation_space();
        let shape = pixel_box_shape(&space)?;
        let mapping = env
            .keys_to_action()
            .or_else(|| env.unwrapped().and_then(|inner| inner.keys_to_action()))
            .ok_or(ConfigurationError::MissingKeysToAction)?;

        let actions = ActionTable::new(mapping, no_op);
        let keys = KeySet::new(actions.relevant_keys().clone());
        let video_size = config
            .video_size
            .unwrap_or_else(|| FrameSize::for_grid(shape[0], shape[1], config.transpose));
        if video_size.pixel_count() == 0 {
            return Err(ConfigurationError::EmptyVideoSize {
                width: video_size.width,
                height: video_size.height,
            });
        }
        info!(
            shape = ?shape,
            combinations = actions.len(),
            relevant_keys = actions.relevant_keys().len(),
            no_op = ?actions.no_op(),
            fps = config.fps,
            transpose = config.transpose,
            video_width = video_size.width,
            video_height = video_size.height,
            "session_config"
        );
        let metrics = MetricsAccumulator::new(config.metrics_log_interval);

        Ok(Self {
            env,
            config,
            actions,
            keys,
            state: LoopState::Resetting,
            last_observation: None,
            video_size,
            callback: None,
            pending_events: Vec::new(),
            episode: 0,
            metrics,
        })
    }

    pub fn with_callback(
        mut self,
        callback: impl FnMut(&StepRecord<'_, E::Action>) + 'static,
    ) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != LoopState::Stopped
    }

    pub fn episode_done(&self) -> bool {
        self.state == LoopState::Resetting
    }

    pub fn last_observation(&self) -> Option<&Observation> {
        self.last_observation.as_ref()
    }

    pub fn video_size(&self) -> FrameSize {
        self.video_size
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn actions(&self) -> &ActionTable<E::Action> {
        &self.actions
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Runs cycles until quit, pacing to `fps`. The frontend is closed exactly
    /// once when this returns, whether by quit or by error.
    pub fn run<F: Frontend>(&mut self, frontend: &mut F) -> Result<(), PlayError> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }

        let mut display = DisplayLease::new(frontend);
        let mut clock = FrameClock::new(self.config.fps);
        loop {
            clock.begin_cycle();
            let state = self.run_cycle(&mut *display)?;
            self.log_metrics();
            if state == LoopState::Stopped {
                break;
            }
            clock.wait_for_next_cycle();
        }
        info!(episodes = self.episode, "shutdown");
        Ok(())
    }

    /// One unpaced cycle. A stopped session makes no further calls.
    pub fn run_cycle<F: Frontend>(&mut self, frontend: &mut F) -> Result<LoopState, PlayError> {
        if self.state == LoopState::Stopped {
            return Ok(self.state);
        }

        self.advance_environment()?;
        self.render(frontend)?;
        self.process_input(frontend)?;
        frontend.present()?;
        self.metrics.record_cycle();
        Ok(self.state)
    }

    fn advance_environment(&mut self) -> Result<(), PlayError> {
        match self.state {
            LoopState::Resetting => {
                self.last_observation = self
                    .env
                    .reset()
                    .map_err(env_failure(EnvOperation::Reset))?;
                self.state = LoopState::Stepping;
                self.episode += 1;
                info!(episode = self.episode, "episode_reset");
            }
            LoopState::Stepping => {
                let action = self.actions.resolve(&self.keys);
                let previous = self.last_observation.take();
                let outcome = self
                    .env
                    .step(&action)
                    .map_err(env_failure(EnvOperation::Step))?;
                self.metrics.record_step();

                if let Some(callback) = self.callback.as_mut() {
                    callback(&StepRecord {
                        previous: previous.as_ref(),
                        next: outcome.observation.as_ref(),
                        action: &action,
                        reward: outcome.reward,
                        done: outcome.done,
                        info: &outcome.info,
                    });
                }

                self.last_observation = outcome.observation;
                if outcome.done {
                    self.state = LoopState::Resetting;
                    self.metrics.record_episode();
                    info!(episode = self.episode, "episode_done");
                }
            }
            LoopState::Stopped => {}
        }
        Ok(())
    }

    fn render<F: Frontend>(&self, frontend: &mut F) -> Result<(), PlayError> {
        let Some(observation) = self.last_observation.as_ref() else {
            debug!("no_observation_to_render");
            return Ok(());
        };
        let frame = normalize(observation, self.config.transpose, self.video_size);
        frontend.blit(&frame)?;
        Ok(())
    }

    fn process_input<F: Frontend>(&mut self, frontend: &mut F) -> Result<(), PlayError> {
        self.pending_events.clear();
        frontend.poll_events(&mut self.pending_events)?;

        for event in self.pending_events.drain(..) {
            if self.keys.handle_event(event) != KeyInput::QuitRequested {
                continue;
            }
            if self.state != LoopState::Stopped {
                let reason = match event {
                    InputEvent::Quit => "window_close",
                    _ => "escape_key",
                };
                info!(reason, "shutdown_requested");
                self.state = LoopState::Stopped;
            }
        }
        Ok(())
    }

    fn log_metrics(&mut self) {
        if let Some(snapshot) = self.metrics.maybe_snapshot(Instant::now()) {
            info!(
                cycles_per_second = snapshot.cycles_per_second,
                steps_per_second = snapshot.steps_per_second,
                episodes_completed = snapshot.episodes_completed,
                held_keys = self.keys.len(),
                "loop_metrics"
            );
        }
    }
}

fn pixel_box_shape(space: &ObservationSpace) -> Result<Vec<usize>, ConfigurationError> {
    match space {
        ObservationSpace::Box(pixels) if is_pixel_shape(&pixels.shape) => Ok(pixels.shape.clone()),
        ObservationSpace::Box(pixels) => Err(ConfigurationError::UnsupportedShape {
            shape: pixels.shape.clone(),
        }),
        other => Err(ConfigurationError::NotPixelBox {
            space: other.clone(),
        }),
    }
}
