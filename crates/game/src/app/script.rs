use std::fs;
use std::path::{Path, PathBuf};

use quest_engine::{FrameInput, InputAction, InputCollector, MoveIntent};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read playthrough script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid playthrough script {path} at '{json_path}': {message}")]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("script step {step} mixes held actions with a raw move intent")]
    MixedStep { step: usize },
}

/// A recorded playthrough, one entry per stretch of identical input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlaythroughScript {
    pub(crate) steps: Vec<ScriptStep>,
}

/// Either held `actions` (interact fires once per step, on its first tick)
/// or an analog `move` vector with an optional `interact` on the first tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    #[serde(default)]
    pub(crate) actions: Vec<InputAction>,
    #[serde(default, rename = "move")]
    pub(crate) movement: Option<[f32; 2]>,
    #[serde(default)]
    pub(crate) interact: bool,
    #[serde(default = "default_step_ticks")]
    pub(crate) ticks: u32,
}

fn default_step_ticks() -> u32 {
    1
}

/// One tick of replayed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScriptedTick {
    pub(crate) movement: MoveIntent,
    pub(crate) interact: bool,
    pub(crate) quit: bool,
}

pub(crate) fn load_script(path: &Path) -> Result<PlaythroughScript, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&raw).map_err(|error| ScriptError::Parse {
        path: path.to_path_buf(),
        json_path: error.path().to_string(),
        message: error.inner().to_string(),
    })
}

pub(crate) fn parse_script(
    raw: &str,
) -> Result<PlaythroughScript, serde_path_to_error::Error<serde_json::Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer)
}

impl PlaythroughScript {
    /// Expands the steps into per-tick input. Held actions go through an
    /// `InputCollector`, so an interact held for several ticks presses once.
    pub(crate) fn expand(&self) -> Result<Vec<ScriptedTick>, ScriptError> {
        let mut ticks = Vec::new();
        let mut collector = InputCollector::default();

        for (index, step) in self.steps.iter().enumerate() {
            match step.movement {
                Some(_) if !step.actions.is_empty() => {
                    return Err(ScriptError::MixedStep { step: index });
                }
                Some([dx, dy]) => {
                    for tick in 0..step.ticks {
                        ticks.push(ScriptedTick {
                            movement: MoveIntent::new(dx, dy),
                            interact: step.interact && tick == 0,
                            quit: false,
                        });
                    }
                }
                None => {
                    collector.release_all();
                    for action in &step.actions {
                        collector.set_action(*action, true);
                    }
                    if step.interact {
                        collector.set_action(InputAction::Interact, true);
                    }
                    for _ in 0..step.ticks {
                        ticks.push(scripted_tick(collector.snapshot_for_tick()));
                    }
                }
            }
        }

        Ok(ticks)
    }
}

fn scripted_tick(input: FrameInput) -> ScriptedTick {
    ScriptedTick {
        movement: input.move_intent(),
        interact: input.interact_pressed(),
        quit: input.quit_requested(),
    }
}
