//! Read-only projection of the cycle log into display rows.
//!
//! Relative start times follow the buckets people expect from a
//! "5 minutes ago" style label: seconds collapse into "less than a minute",
//! hours and months are "about", years get "about/over/almost".

use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::cycle::{Cycle, CycleId, CycleStatus};
use crate::format::format_minutes;

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "interrupted")]
    Interrupted,
    #[serde(rename = "in progress")]
    InProgress,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Completed => "completed",
            StatusLabel::Interrupted => "interrupted",
            StatusLabel::InProgress => "in progress",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CycleStatus> for StatusLabel {
    fn from(status: CycleStatus) -> Self {
        match status {
            CycleStatus::Finished { .. } => StatusLabel::Completed,
            CycleStatus::Interrupted { .. } => StatusLabel::Interrupted,
            CycleStatus::Running => StatusLabel::InProgress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub cycle_id: CycleId,
    pub task: String,
    /// e.g. "25 minutes"
    pub duration: String,
    /// e.g. "about 2 hours ago"
    pub started: String,
    pub start_date: DateTime<Utc>,
    pub status: StatusLabel,
}

impl HistoryRow {
    pub fn from_cycle(cycle: &Cycle, now: DateTime<Utc>) -> Self {
        Self {
            cycle_id: cycle.id(),
            task: cycle.task().to_string(),
            duration: format_minutes(cycle.minutes_amount()),
            started: relative_to(cycle.start_date(), now),
            start_date: cycle.start_date(),
            status: cycle.status().into(),
        }
    }
}

/// Map the whole log, oldest first.
pub fn project(cycles: &[Cycle], now: DateTime<Utc>) -> Vec<HistoryRow> {
    cycles.iter().map(|c| HistoryRow::from_cycle(c, now)).collect()
}

/// "5 minutes ago", or "in 5 minutes" for a date after `now`.
pub fn relative_to(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if date <= now {
        format!("{} ago", distance(date, now))
    } else {
        format!("in {}", distance(now, date))
    }
}

/// Humanized distance between two instants, order-independent.
pub fn distance(a: DateTime<Utc>, b: DateTime<Utc>) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        };
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = round_div(minutes, 60);
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < 2_520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = round_div(minutes, MINUTES_IN_DAY);
        return plural(days, "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = round_div(minutes, MINUTES_IN_MONTH);
        return format!("about {}", plural(months, "month"));
    }

    let months = months_between(earlier, later);
    if months < 12 {
        let nearest = round_div(minutes, MINUTES_IN_MONTH);
        return plural(nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

fn round_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Full calendar months from `earlier` to `later`.
fn months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    let later_in_month = (later.day(), later.num_seconds_from_midnight());
    let earlier_in_month = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_in_month < earlier_in_month {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::cycle::CycleStore;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn ago(delta: Duration) -> String {
        relative_to(t0() - delta, t0())
    }

    #[test]
    fn minute_buckets() {
        assert_eq!(ago(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(ago(Duration::seconds(45)), "1 minute ago");
        assert_eq!(ago(Duration::seconds(60)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
    }

    #[test]
    fn hour_and_day_buckets() {
        assert_eq!(ago(Duration::minutes(45)), "about 1 hour ago");
        assert_eq!(ago(Duration::minutes(150)), "about 3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(5)), "5 days ago");
    }

    #[test]
    fn month_and_year_buckets() {
        assert_eq!(ago(Duration::days(40)), "about 1 month ago");
        assert_eq!(ago(Duration::days(100)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "about 1 year ago");
        assert_eq!(ago(Duration::days(365 + 200)), "over 1 year ago");
        assert_eq!(ago(Duration::days(365 + 320)), "almost 2 years ago");
    }

    #[test]
    fn future_dates_read_forward() {
        assert_eq!(relative_to(t0() + Duration::minutes(3), t0()), "in 3 minutes");
    }

    #[test]
    fn status_triage_is_exhaustive() {
        let at = t0();
        assert_eq!(StatusLabel::from(CycleStatus::Running), StatusLabel::InProgress);
        assert_eq!(StatusLabel::from(CycleStatus::Finished { at }), StatusLabel::Completed);
        assert_eq!(
            StatusLabel::from(CycleStatus::Interrupted { at }),
            StatusLabel::Interrupted
        );
        assert_eq!(StatusLabel::InProgress.to_string(), "in progress");
    }

    #[test]
    fn project_keeps_insertion_order() {
        let clock = ManualClock::new(t0());
        let mut store = CycleStore::new(clock.clone());
        let first = store.create_cycle("Draft", 25).unwrap();
        clock.advance(Duration::minutes(3));
        store.mark_interrupted(first.id());
        store.create_cycle("Review", 1).unwrap();
        clock.advance(Duration::minutes(2));

        let rows = project(store.list_cycles(), clock.now());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task, "Draft");
        assert_eq!(rows[0].duration, "25 minutes");
        assert_eq!(rows[0].started, "5 minutes ago");
        assert_eq!(rows[0].status, StatusLabel::Interrupted);
        assert_eq!(rows[1].task, "Review");
        assert_eq!(rows[1].duration, "1 minute");
        assert_eq!(rows[1].status, StatusLabel::InProgress);
    }

    #[test]
    fn row_serializes_status_label() {
        let clock = ManualClock::new(t0());
        let mut store = CycleStore::new(clock.clone());
        store.create_cycle("Draft", 25).unwrap();
        let rows = project(store.list_cycles(), clock.now());
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["status"], "in progress");
        assert_eq!(json["started"], "less than a minute ago");
    }
}
