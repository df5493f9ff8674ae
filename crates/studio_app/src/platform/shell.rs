use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use super::app::Input;

pub const HELP: &str = "commands: upload <path> | generate | download | reset | status | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Upload(PathBuf),
    Generate,
    Download,
    Reset,
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "upload" | "open" => {
            if rest.is_empty() {
                return Err("upload needs a file path".to_string());
            }
            ShellCommand::Upload(PathBuf::from(rest.trim_matches('"')))
        }
        "generate" | "gen" => ShellCommand::Generate,
        "download" | "save" => ShellCommand::Download,
        "reset" => ShellCommand::Reset,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

/// Forwards stdin lines to the message loop; EOF closes the shell.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
}

#[cfg(test)]
mod tests {
    use super::{parse_command, ShellCommand};
    use std::path::PathBuf;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("generate"), Ok(Some(ShellCommand::Generate)));
        assert_eq!(parse_command("  RESET "), Ok(Some(ShellCommand::Reset)));
        assert_eq!(parse_command("quit"), Ok(Some(ShellCommand::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn upload_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("upload \"my photos/me at beach.png\""),
            Ok(Some(ShellCommand::Upload(PathBuf::from(
                "my photos/me at beach.png"
            ))))
        );
        assert!(parse_command("upload").is_err());
    }

    #[test]
    fn unknown_words_are_rejected() {
        assert_eq!(
            parse_command("explode now"),
            Err("unknown command 'explode'".to_string())
        );
    }
}
