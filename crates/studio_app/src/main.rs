mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match platform::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("studio: {err:#}");
            ExitCode::FAILURE
        }
    }
}
