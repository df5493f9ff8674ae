mod app;
mod effects;
mod render;
mod settings;
mod shell;

use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{Context, Result};
use studio_engine::{ensure_output_dir, EngineHandle};
use studio_logging::{studio_info, DEFAULT_LOG_FILE};

use crate::cli::{Cli, Command};
use app::{App, Input};
use effects::EffectRunner;
use settings::{AppSettings, Overrides};

pub fn run(cli: Cli) -> Result<ExitCode> {
    studio_logging::initialize(cli.log.into(), cli.log_level(), Path::new(DEFAULT_LOG_FILE));

    let mut settings = AppSettings::load(&cli.config)?;
    settings.apply(Overrides {
        output_dir: cli.output_dir.clone(),
        mode: cli.mode.map(Into::into),
        effect_id: cli.effect.clone(),
    });
    ensure_output_dir(&settings.output_dir)
        .with_context(|| format!("preparing output directory {:?}", settings.output_dir))?;
    studio_info!(
        "Starting with mode {:?}, effect {}, output {:?}",
        settings.service.mode,
        settings.service.effect_id,
        settings.output_dir
    );

    let engine = EngineHandle::new(settings.engine_config()).context("starting engine")?;
    let (tx, rx) = mpsc::channel();
    let relay = tx.clone();
    let runner = EffectRunner::new(engine, move |msg| relay.send(Input::Msg(msg)).is_ok());
    let mut app = App::new(runner);

    match cli.command {
        Command::Run { file, no_download } => {
            app::run_pipeline(&mut app, &rx, file, !no_download)
        }
        Command::Shell => {
            shell::spawn_stdin_reader(tx);
            app::run_shell(&mut app, &rx)
        }
    }
}
