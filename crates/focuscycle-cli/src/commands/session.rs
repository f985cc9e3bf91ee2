//! Line-oriented intake on stdin.
//!
//! Cycles count down in the background between commands; the history
//! accumulates for as long as the session lives.

use focuscycle_core::timer::lock_session;
use focuscycle_core::{Config, Poller, PollerHandle, SystemClock, TimerSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{intake, runtime};
use crate::output::{print_event, print_history, TerminalPresenter};

const HELP: &str = "\
commands:
  start <minutes> <task...>   start a cycle
  interrupt                   interrupt the running cycle
  status                      show the countdown
  history [--json]            list all cycles
  help                        show this help
  quit                        leave the session";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Start { minutes: i64, task: String },
    Interrupt,
    Status,
    History { json: bool },
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for blank lines.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "start" => {
            let (minutes, task) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let minutes = minutes
                .parse::<i64>()
                .map_err(|_| format!("minutes: expected a number, got '{minutes}'"))?;
            Command::Start {
                minutes,
                task: task.trim().to_string(),
            }
        }
        "interrupt" | "stop" => Command::Interrupt,
        "status" => Command::Status,
        "history" => Command::History {
            json: rest == "--json",
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    runtime()?.block_on(session_loop(config, json))
}

async fn session_loop(config: Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = TimerSession::new(SystemClock).shared();
    let mut poller: Option<PollerHandle<SystemClock>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("error: {message}");
                continue;
            }
        };
        debug!(?command, "session command");

        match command {
            Command::Start { minutes, task } => {
                let intake = match intake(&task, minutes) {
                    Ok(intake) => intake,
                    Err(message) => {
                        eprintln!("error: {message}");
                        continue;
                    }
                };
                let started = lock_session(&session).start_validated(intake);
                match started {
                    Ok(events) => {
                        for event in &events {
                            print_event(event, json);
                        }
                        // The previous handle, if any, belongs to a cycle that already ended.
                        poller = Some(Poller::spawn(
                            session.clone(),
                            config.poller_config(),
                            TerminalPresenter::events_only(json),
                        ));
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Command::Interrupt => {
                let event = match poller.as_mut() {
                    Some(handle) => handle.interrupt().await,
                    None => None,
                };
                match event {
                    Some(event) => print_event(&event, json),
                    None => eprintln!("error: no cycle is running"),
                }
            }
            Command::Status => {
                let snapshot = lock_session(&session).snapshot();
                print_event(&snapshot, json);
            }
            Command::History { json: as_json } => {
                let rows = lock_session(&session).history();
                print_history(&rows, json || as_json)?;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    if let Some(mut handle) = poller.take() {
        handle.shutdown().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_with_multiword_task() {
        assert_eq!(
            parse_command("start 25 Write the report").unwrap(),
            Some(Command::Start {
                minutes: 25,
                task: "Write the report".into()
            })
        );
    }

    #[test]
    fn start_without_task_parses_to_empty_task() {
        assert_eq!(
            parse_command("start 25").unwrap(),
            Some(Command::Start {
                minutes: 25,
                task: String::new()
            })
        );
    }

    #[test]
    fn start_rejects_non_numeric_minutes() {
        let err = parse_command("start soon Draft").unwrap_err();
        assert!(err.starts_with("minutes:"));
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("interrupt").unwrap(), Some(Command::Interrupt));
        assert_eq!(parse_command("status").unwrap(), Some(Command::Status));
        assert_eq!(
            parse_command("history --json").unwrap(),
            Some(Command::History { json: true })
        );
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert!(parse_command("dance").is_err());
    }
}
