use std::process::ExitCode;

mod app;

use app::bootstrap::{self, Startup};

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match bootstrap::build_app(&args) {
        Ok(Startup::Run(wiring)) => app::loop_runner::run(wiring),
        Ok(Startup::Help) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}
