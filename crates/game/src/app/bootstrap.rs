use std::path::PathBuf;
use std::str::FromStr;

use quest_engine::{ControllerConfig, SceneFactory};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::quest::{self, ENTRY_SCENE};

const MOVE_SPEED_ENV_VAR: &str = "WORD_QUEST_MOVE_SPEED";
const SOLID_COLLISION_ENV_VAR: &str = "WORD_QUEST_SOLID_COLLISION";
const MAX_TICKS_ENV_VAR: &str = "WORD_QUEST_MAX_TICKS";
pub(crate) const DEFAULT_MAX_TICKS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunMode {
    Autopilot,
    Script(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunConfig {
    pub(crate) mode: RunMode,
    pub(crate) max_ticks: u64,
    pub(crate) emit_frames: bool,
    pub(crate) start_scene: SceneFactory,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Autopilot,
            max_ticks: DEFAULT_MAX_TICKS,
            emit_frames: false,
            start_scene: ENTRY_SCENE,
        }
    }
}

pub(crate) struct AppWiring {
    pub(crate) controller: ControllerConfig,
    pub(crate) run: RunConfig,
}

pub(crate) enum Startup {
    Run(AppWiring),
    Help,
}

pub(crate) fn build_app(args: &[String]) -> Result<Startup, String> {
    init_tracing();
    info!("=== Word Quest Startup ===");

    let env = |name: &str| std::env::var(name).ok();
    let controller = controller_config_from_env(env);
    let run = run_config_from_env(env);
    let Some(run) = apply_cli_args(args, run)? else {
        return Ok(Startup::Help);
    };

    Ok(Startup::Run(AppWiring { controller, run }))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn controller_config_from_env(env: impl Fn(&str) -> Option<String>) -> ControllerConfig {
    let defaults = ControllerConfig::default();
    let move_speed = match parse_env_or(&env, MOVE_SPEED_ENV_VAR, defaults.move_speed) {
        speed if speed.is_finite() && speed > 0.0 => speed,
        speed => {
            warn!(var = MOVE_SPEED_ENV_VAR, value = speed, "invalid_env_override");
            defaults.move_speed
        }
    };
    let solid_collision = match env(SOLID_COLLISION_ENV_VAR) {
        Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!(var = SOLID_COLLISION_ENV_VAR, value = %raw, "invalid_env_override");
            defaults.solid_collision
        }),
        None => defaults.solid_collision,
    };

    ControllerConfig {
        move_speed,
        solid_collision,
    }
}

fn run_config_from_env(env: impl Fn(&str) -> Option<String>) -> RunConfig {
    let defaults = RunConfig::default();
    RunConfig {
        max_ticks: parse_env_or(&env, MAX_TICKS_ENV_VAR, defaults.max_ticks),
        ..defaults
    }
}

fn parse_env_or<T>(env: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    let Some(raw) = env(name) else {
        return default;
    };
    raw.trim().parse::<T>().unwrap_or_else(|_| {
        warn!(var = name, value = %raw, "invalid_env_override");
        default
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Returns `None` when help was requested and printed.
fn apply_cli_args(args: &[String], mut run: RunConfig) -> Result<Option<RunConfig>, String> {
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "--script" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --script".to_string())?;
                run.mode = RunMode::Script(PathBuf::from(value));
                index += 2;
            }
            "--max-ticks" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --max-ticks".to_string())?;
                run.max_ticks = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --max-ticks value '{value}' (expected u64)"))?;
                index += 2;
            }
            "--start" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --start".to_string())?;
                run.start_scene = quest::quest_scene(value)
                    .ok_or_else(|| format!("unknown scene '{value}' for --start"))?;
                index += 2;
            }
            "--frames" => {
                run.emit_frames = true;
                index += 1;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }

    Ok(Some(run))
}

fn print_usage() {
    println!("{}", usage_text());
}

pub(crate) fn usage_text() -> String {
    [
        "usage: word_quest [options]",
        "",
        "options:",
        "  --script <path>     replay a JSON playthrough script instead of the autopilot",
        "  --max-ticks <n>     stop after n ticks (default 10000)",
        "  --start <scene_id>  begin at another quest scene (default scene1)",
        "  --frames            print every frame as a JSON line on stdout",
        "  -h, --help          show this help",
        "",
        "environment:",
        "  WORD_QUEST_MOVE_SPEED       units walked per tick (default 2.0)",
        "  WORD_QUEST_SOLID_COLLISION  1/0, true/false (default true)",
        "  WORD_QUEST_MAX_TICKS        default for --max-ticks",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::quest::SCENE5;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn no_arguments_run_the_autopilot_from_the_entry_scene() {
        let run = apply_cli_args(&[], RunConfig::default())
            .expect("parse")
            .expect("run");
        assert_eq!(run, RunConfig::default());
        assert_eq!(run.start_scene, ENTRY_SCENE);
    }

    #[test]
    fn cli_arguments_override_run_config() {
        let run = apply_cli_args(
            &args(&["--script", "play.json", "--max-ticks", "50", "--frames", "--start", "scene5"]),
            RunConfig::default(),
        )
        .expect("parse")
        .expect("run");
        assert_eq!(run.mode, RunMode::Script(PathBuf::from("play.json")));
        assert_eq!(run.max_ticks, 50);
        assert!(run.emit_frames);
        assert_eq!(run.start_scene, SCENE5);
    }

    #[test]
    fn cli_errors_name_the_offending_flag() {
        let error = apply_cli_args(&args(&["--max-ticks"]), RunConfig::default())
            .expect_err("missing value");
        assert_eq!(error, "missing value for --max-ticks");

        let error = apply_cli_args(&args(&["--max-ticks", "many"]), RunConfig::default())
            .expect_err("bad value");
        assert!(error.contains("'many'"));

        let error = apply_cli_args(&args(&["--start", "scene42"]), RunConfig::default())
            .expect_err("bad scene");
        assert!(error.contains("scene42"));

        let error =
            apply_cli_args(&args(&["--fly"]), RunConfig::default()).expect_err("unknown flag");
        assert!(error.starts_with("unknown argument '--fly'"));
    }

    #[test]
    fn help_short_circuits() {
        let parsed = apply_cli_args(&args(&["--frames", "-h"]), RunConfig::default())
            .expect("parse");
        assert!(parsed.is_none());
    }

    #[test]
    fn env_overrides_apply_when_valid() {
        let config = controller_config_from_env(env_from(&[
            (MOVE_SPEED_ENV_VAR, "3.5"),
            (SOLID_COLLISION_ENV_VAR, "off"),
        ]));
        assert_eq!(config.move_speed, 3.5);
        assert!(!config.solid_collision);

        let run = run_config_from_env(env_from(&[(MAX_TICKS_ENV_VAR, " 120 ")]));
        assert_eq!(run.max_ticks, 120);
    }

    #[test]
    fn invalid_env_overrides_keep_defaults() {
        let config = controller_config_from_env(env_from(&[
            (MOVE_SPEED_ENV_VAR, "-1"),
            (SOLID_COLLISION_ENV_VAR, "maybe"),
        ]));
        assert_eq!(config, ControllerConfig::default());

        let config = controller_config_from_env(env_from(&[(MOVE_SPEED_ENV_VAR, "fast")]));
        assert_eq!(config.move_speed, ControllerConfig::default().move_speed);

        let run = run_config_from_env(env_from(&[(MAX_TICKS_ENV_VAR, "-5")]));
        assert_eq!(run.max_ticks, DEFAULT_MAX_TICKS);
    }
}
