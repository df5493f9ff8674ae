use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{bail, Result};
use studio_core::{update, AppState, AppViewModel, Msg, Phase, SelectedFile};
use studio_engine::media_type_for_path;
use studio_logging::{studio_info, studio_warn};

use super::effects::EffectRunner;
use super::render;
use super::shell::{parse_command, ShellCommand, HELP};

/// Everything the message loop waits on.
#[derive(Debug)]
pub enum Input {
    Msg(Msg),
    Line(String),
    Closed,
}

pub struct App {
    state: AppState,
    runner: EffectRunner,
    shown: AppViewModel,
}

impl App {
    pub fn new(runner: EffectRunner) -> Self {
        let state = AppState::new();
        let shown = state.view();
        Self {
            state,
            runner,
            shown,
        }
    }

    /// Applies `msg`, prints what changed and runs the effects.
    /// Returns the notifications raised along the way.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<String> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for line in render::changes(&self.shown, &view) {
                println!("{line}");
            }
            self.shown = view;
        }
        self.state = state;
        self.runner.execute(effects)
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }
}

/// What the non-interactive driver does after each message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Send(Msg),
    Wait,
    Finished,
    Failed,
}

/// Clicks the next enabled control once the pipeline has started.
pub fn next_step(view: &AppViewModel, download: bool) -> Step {
    match view.phase {
        Phase::Idle | Phase::Error => Step::Failed,
        Phase::Ready => match &view.result {
            None if view.generate.enabled => Step::Send(Msg::GenerateClicked),
            None => Step::Wait,
            Some(_) if !download || view.last_saved.is_some() => Step::Finished,
            Some(_) if view.download.enabled => Step::Send(Msg::DownloadClicked),
            Some(_) => Step::Wait,
        },
        Phase::Uploading | Phase::Submitting | Phase::Polling { .. } => Step::Wait,
    }
}

pub fn run_pipeline(
    app: &mut App,
    rx: &mpsc::Receiver<Input>,
    file: PathBuf,
    download: bool,
) -> Result<ExitCode> {
    // Unknown types still go through the core so the user sees its message.
    let media_type = media_type_for_path(&file).unwrap_or("application/octet-stream");
    let mut msg = Msg::FileSelected(SelectedFile::new(file, media_type));

    loop {
        if !app.dispatch(msg).is_empty() {
            return Ok(ExitCode::FAILURE);
        }
        let view = app.view();
        match next_step(&view, download) {
            Step::Send(next) => {
                msg = next;
                continue;
            }
            Step::Finished => {
                if let Some(result) = &view.result {
                    println!("result: {}", result.url);
                }
                if let Some(path) = &view.last_saved {
                    println!("saved to {}", path.display());
                }
                studio_info!("Pipeline finished");
                return Ok(ExitCode::SUCCESS);
            }
            Step::Failed => return Ok(ExitCode::FAILURE),
            Step::Wait => {}
        }

        msg = loop {
            match rx.recv() {
                Ok(Input::Msg(next)) => break next,
                Ok(other) => studio_warn!("Ignoring {:?} in run mode", other),
                Err(_) => bail!("engine stopped before the pipeline finished"),
            }
        };
    }
}

pub fn run_shell(app: &mut App, rx: &mpsc::Receiver<Input>) -> Result<ExitCode> {
    println!("{HELP}");
    print_view(&app.view());

    while let Ok(input) = rx.recv() {
        let msg = match input {
            Input::Msg(msg) => msg,
            Input::Closed => break,
            Input::Line(line) => match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(ShellCommand::Quit)) => break,
                Ok(Some(ShellCommand::Help)) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(Some(ShellCommand::Status)) => {
                    print_view(&app.view());
                    continue;
                }
                Ok(Some(command)) => command_msg(command),
                Err(message) => {
                    eprintln!("{message}; {HELP}");
                    continue;
                }
            },
        };
        app.dispatch(msg);
    }
    Ok(ExitCode::SUCCESS)
}

fn command_msg(command: ShellCommand) -> Msg {
    match command {
        ShellCommand::Upload(path) => {
            let media_type = media_type_for_path(&path).unwrap_or("application/octet-stream");
            Msg::FileSelected(SelectedFile::new(path, media_type))
        }
        ShellCommand::Generate => Msg::GenerateClicked,
        ShellCommand::Download => Msg::DownloadClicked,
        ShellCommand::Reset => Msg::ResetClicked,
        ShellCommand::Status | ShellCommand::Help | ShellCommand::Quit => Msg::NoOp,
    }
}

fn print_view(view: &AppViewModel) {
    for line in render::describe(view) {
        println!("{line}");
    }
}
