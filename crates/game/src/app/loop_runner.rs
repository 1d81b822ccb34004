use std::io::{self, Write};
use std::process::ExitCode;

use quest_engine::{FrameResult, QuestController, TickError};
use thiserror::Error;
use tracing::{error, info, warn};

use super::autopilot::{self, AutopilotStep};
use super::bootstrap::{AppWiring, RunConfig, RunMode};
use super::quest::FINAL_SCENE;
use super::script::{self, ScriptError};

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error(transparent)]
    Tick(#[from] TickError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    QuestComplete,
    NoTargets,
    ScriptExhausted,
    QuitRequested,
    TickLimit,
}

impl StopReason {
    fn as_str(self) -> &'static str {
        match self {
            StopReason::QuestComplete => "quest_complete",
            StopReason::NoTargets => "no_targets",
            StopReason::ScriptExhausted => "script_exhausted",
            StopReason::QuitRequested => "quit_requested",
            StopReason::TickLimit => "tick_limit",
        }
    }
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_session(&app, &mut out) {
        Ok(controller) => match print_summary(&controller, &mut out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(error = %err, "run_failed");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!(error = %err, "run_failed");
            ExitCode::FAILURE
        }
    }
}

/// Drives one controller from the configured entry scene until the input
/// source runs dry or the tick budget is spent.
pub(crate) fn run_session(
    app: &AppWiring,
    out: &mut impl Write,
) -> Result<QuestController, RunError> {
    let run = &app.run;
    info!(
        start_scene = run.start_scene.scene_id(),
        move_speed = app.controller.move_speed,
        solid_collision = app.controller.solid_collision,
        max_ticks = run.max_ticks,
        emit_frames = run.emit_frames,
        script = matches!(run.mode, RunMode::Script(_)),
        "loop_config"
    );

    let mut controller = QuestController::new(app.controller, run.start_scene)?;
    let reason = match &run.mode {
        RunMode::Autopilot => drive_autopilot(&mut controller, run, out)?,
        RunMode::Script(path) => {
            let ticks = script::load_script(path)?.expand()?;
            drive_script(&mut controller, run, &ticks, out)?
        }
    };

    if reason == StopReason::TickLimit {
        warn!(max_ticks = run.max_ticks, scene = controller.scene().id(), "tick_limit_reached");
    }
    info!(
        reason = reason.as_str(),
        ticks = controller.tick(),
        scene = controller.scene().id(),
        words = controller.inventory().len(),
        "run_finished"
    );
    Ok(controller)
}

fn drive_autopilot(
    controller: &mut QuestController,
    run: &RunConfig,
    out: &mut impl Write,
) -> Result<StopReason, RunError> {
    while controller.tick() < run.max_ticks {
        match autopilot::next_step(controller) {
            AutopilotStep::Act { movement, interact } => {
                let frame = controller.advance(movement, interact)?;
                emit_frame(run, &frame, out)?;
            }
            AutopilotStep::Done => {
                return Ok(if controller.scene().id() == FINAL_SCENE.scene_id() {
                    StopReason::QuestComplete
                } else {
                    StopReason::NoTargets
                });
            }
        }
    }
    Ok(StopReason::TickLimit)
}

fn drive_script(
    controller: &mut QuestController,
    run: &RunConfig,
    ticks: &[script::ScriptedTick],
    out: &mut impl Write,
) -> Result<StopReason, RunError> {
    for tick in ticks {
        if controller.tick() >= run.max_ticks {
            return Ok(StopReason::TickLimit);
        }
        if tick.quit {
            return Ok(StopReason::QuitRequested);
        }
        let frame = controller.advance(tick.movement, tick.interact)?;
        emit_frame(run, &frame, out)?;
    }
    Ok(StopReason::ScriptExhausted)
}

fn emit_frame(run: &RunConfig, frame: &FrameResult, out: &mut impl Write) -> Result<(), RunError> {
    if run.emit_frames {
        serde_json::to_writer(&mut *out, frame)?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_summary(controller: &QuestController, out: &mut impl Write) -> io::Result<()> {
    let words = controller.inventory().words().collect::<Vec<_>>();
    writeln!(out, "scene: {}", controller.scene().id())?;
    writeln!(out, "ticks: {}", controller.tick())?;
    writeln!(out, "words: [{}]", words.join(", "))?;
    out.flush()
}
