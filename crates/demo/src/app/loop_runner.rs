use std::process::ExitCode;

use play::{run_in_window, PlaySession, StepRecord, JOYPAD_NO_OP};
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let session = match PlaySession::new(app.env, app.config, JOYPAD_NO_OP) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    let mut session = session.with_callback(episode_reporter());

    if let Err(err) = run_in_window(&mut session) {
        error!(error = %err, "session_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn episode_reporter() -> impl FnMut(&StepRecord<'_, u8>) {
    let mut episode_return = 0.0;
    let mut steps = 0u64;
    move |record: &StepRecord<'_, u8>| {
        episode_return += record.reward;
        steps += 1;
        if record.done {
            info!(
                episode_return,
                steps,
                step_limit = record.info.contains_key("step_limit_reached"),
                "episode_finished"
            );
            episode_return = 0.0;
            steps = 0;
        }
    }
}
