use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    let wiring = app::build_app();
    app::run(wiring)
}
