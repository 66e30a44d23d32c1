mod bootstrap;
mod loop_runner;
mod playfield;
mod step_limit;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
