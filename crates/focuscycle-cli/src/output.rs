//! Terminal rendering: countdown line, title surface, events, history table.

use std::io::Write;

use focuscycle_core::{format_countdown, CountdownFrame, Event, HistoryRow, Presenter};

/// Renders poller output to the terminal.
///
/// In countdown mode the `MM:SS` line is redrawn in place on stderr and the
/// title is mirrored to the terminal window title. In events-only mode
/// (used by `session`) only events are printed, so stdin input is not
/// clobbered.
pub struct TerminalPresenter {
    json: bool,
    countdown: bool,
    terminal_title: bool,
    last_title: Option<String>,
}

impl TerminalPresenter {
    pub fn countdown(json: bool, terminal_title: bool) -> Self {
        Self {
            json,
            countdown: !json,
            terminal_title,
            last_title: None,
        }
    }

    pub fn events_only(json: bool) -> Self {
        Self {
            json,
            countdown: false,
            terminal_title: false,
            last_title: None,
        }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, frame: &CountdownFrame, title: &str) {
        if self.last_title.as_deref() == Some(title) {
            return;
        }
        self.last_title = Some(title.to_string());

        let mut stderr = std::io::stderr().lock();
        if self.terminal_title {
            let _ = write!(stderr, "\x1b]0;{title}\x07");
        }
        if self.countdown {
            let _ = if frame.is_running {
                write!(stderr, "\r{}", frame.display())
            } else {
                writeln!(stderr, "\r{}", frame.display())
            };
        }
        let _ = stderr.flush();
    }

    fn on_event(&mut self, event: &Event) {
        print_event(event, self.json);
    }
}

/// Human description of an event; `None` for events not worth a line.
pub fn describe_event(event: &Event) -> Option<String> {
    match event {
        Event::CycleCreated {
            task,
            minutes_amount,
            ..
        } => Some(format!(
            "started: {task} ({})",
            focuscycle_core::format::format_minutes(*minutes_amount)
        )),
        Event::CountdownStarted { .. } => None,
        Event::CycleFinished { task, .. } => Some(format!("completed: {task}")),
        Event::CycleInterrupted {
            task, elapsed_secs, ..
        } => Some(format!(
            "interrupted: {task} after {}",
            format_countdown(*elapsed_secs)
        )),
        Event::StateSnapshot {
            state,
            task,
            display,
            ..
        } => {
            let state = serde_json::to_value(state)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            Some(match task {
                Some(task) => format!("{state} {display} {task}"),
                None => format!("{state} {display}"),
            })
        }
    }
}

pub fn print_event(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    } else if let Some(line) = describe_event(event) {
        println!("{line}");
    }
}

pub fn print_history(rows: &[HistoryRow], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(rows)?);
    } else {
        print!("{}", render_history_table(rows));
    }
    Ok(())
}

pub fn render_history_table(rows: &[HistoryRow]) -> String {
    const HEADERS: [&str; 4] = ["TASK", "DURATION", "STARTED", "STATUS"];

    if rows.is_empty() {
        return "no cycles yet\n".to_string();
    }

    let cells: Vec<[&str; 4]> = rows
        .iter()
        .map(|r| [r.task.as_str(), r.duration.as_str(), r.started.as_str(), r.status.as_str()])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADERS).chain(cells.iter()) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
