use play::{EnvError, Environment, Observation, ObservationSpace, StepOutcome};
use serde_json::Value;

/// Ends an episode after `max_steps` steps.
///
/// The wrapper does not expose a key table of its own; players reach the
/// inner environment's table through `unwrapped`.
#[derive(Debug)]
pub(crate) struct StepLimit<E> {
    inner: E,
    max_steps: u64,
    elapsed: u64,
}

impl<E: Environment> StepLimit<E> {
    pub(crate) fn new(inner: E, max_steps: u64) -> Self {
        Self {
            inner,
            max_steps: max_steps.max(1),
            elapsed: 0,
        }
    }
}

impl<E: Environment> Environment for StepLimit<E> {
    type Action = E::Action;

    fn observation_space(&self) -> ObservationSpace {
        self.inner.observation_space()
    }

    fn reset(&mut self) -> Result<Option<Observation>, EnvError> {
        self.elapsed = 0;
        self.inner.reset()
    }

    fn step(&mut self, action: &Self::Action) -> Result<StepOutcome, EnvError> {
        let mut outcome = self.inner.step(action)?;
        self.elapsed += 1;
        if self.elapsed >= self.max_steps && !outcome.done {
            outcome.done = true;
            outcome
                .info
                .insert("step_limit_reached".to_string(), Value::Bool(true));
        }
        Ok(outcome)
    }

    fn unwrapped(&self) -> Option<&dyn Environment<Action = Self::Action>> {
        self.inner
            .unwrapped()
            .or(Some(&self.inner as &dyn Environment<Action = Self::Action>))
    }
}
