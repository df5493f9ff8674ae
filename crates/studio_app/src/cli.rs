use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use studio_engine::EffectMode;
use studio_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "studio",
    version,
    about = "Upload a photo, run a cartoon effect on it and save the result"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// RON settings file; a missing file means built-in defaults.
    #[arg(long, global = true, env = "STUDIO_CONFIG", default_value = "studio.ron")]
    pub config: PathBuf,

    /// Directory downloaded results are saved into.
    #[arg(long, global = true, env = "STUDIO_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Effect family to request.
    #[arg(long, global = true, value_enum)]
    pub mode: Option<ModeArg>,

    /// Effect identifier, e.g. `simpsonsCharacter`.
    #[arg(long, global = true)]
    pub effect: Option<String>,

    /// Where log records go.
    #[arg(long, global = true, value_enum, default_value = "file")]
    pub log: LogArg,

    /// Log at debug level.
    #[arg(short, long, global = true, env = "STUDIO_VERBOSE")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload FILE, generate, and download the result without prompting.
    Run {
        file: PathBuf,
        /// Stop once the result URL is known.
        #[arg(long)]
        no_download: bool,
    },
    /// Read commands from stdin: upload <path>, generate, download, reset, status, quit.
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Image,
    Video,
}

impl From<ModeArg> for EffectMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Image => EffectMode::ImageEffects,
            ModeArg::Video => EffectMode::VideoEffects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(log: LogArg) -> Self {
        match log {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
