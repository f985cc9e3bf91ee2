//! Countdown and duration formatting.

/// `MM` and `SS` halves of a countdown display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownParts {
    pub minutes: String,
    pub seconds: String,
}

/// Split remaining seconds into zero-padded minutes and seconds.
pub fn split_countdown(remaining_secs: u64) -> CountdownParts {
    CountdownParts {
        minutes: format!("{:02}", remaining_secs / 60),
        seconds: format!("{:02}", remaining_secs % 60),
    }
}

/// Render remaining seconds as `MM:SS`.
pub fn format_countdown(remaining_secs: u64) -> String {
    let parts = split_countdown(remaining_secs);
    format!("{}:{}", parts.minutes, parts.seconds)
}

/// Cycle length for the history table, e.g. "25 minutes".
pub fn format_minutes(minutes: u32) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}
